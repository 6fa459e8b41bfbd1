//! Phase 4: normalize details and join them onto summaries.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::details::{DETAIL_TAG_KEY, PATH_KEY};
use crate::dataset::{JobRecord, ScrapeDataset, COLUMN_MAPPING, SCRAPED_DATE};
use crate::html::cell_to_text;
use crate::record::{flatten, join_list, str_field, FlatRow};

/// Raw key of the free-text description that gets its markup stripped.
pub const DESCRIPTION_KEY: &str = "jobPostingInfo.jobDescription";

/// Raw keys whose list values are rendered as comma-joined strings.
const LIST_KEYS: [&str; 1] = ["jobPostingInfo.additionalLocations"];

/// Flatten details and strip markup from the description field.
pub fn normalize_details(details: &[Value]) -> Vec<FlatRow> {
    details
        .iter()
        .map(|detail| {
            let mut row = flatten(detail);
            if let Some(description) = row.get_mut(DESCRIPTION_KEY) {
                *description = Value::String(cell_to_text(Some(&*description)));
            }
            row
        })
        .collect()
}

/// Join summaries to their details and project onto the output columns.
///
/// Each summary is matched to the first detail tagged with its
/// `externalPath`, and each path is joined at most once, so no two rows share
/// a path. Summaries whose detail was not fetched produce no row. A mapped column appears
/// only if at least one joined row carries its raw key; cells a row lacks
/// are null.
pub fn build_dataset(summaries: &[FlatRow], details: &[Value], scraped_date: &str) -> ScrapeDataset {
    let detail_rows = normalize_details(details);

    let mut by_path: HashMap<&str, &FlatRow> = HashMap::new();
    for row in &detail_rows {
        if let Some(path) = str_field(row, DETAIL_TAG_KEY) {
            by_path.entry(path).or_insert(row);
        }
    }

    let mut joined_paths: HashSet<&str> = HashSet::new();
    let joined: Vec<FlatRow> = summaries
        .iter()
        .filter_map(|summary| {
            let path = str_field(summary, PATH_KEY)?;
            let detail = by_path.get(path)?;
            if !joined_paths.insert(path) {
                return None;
            }
            let mut merged = summary.clone();
            for (key, value) in detail.iter() {
                merged.insert(key.clone(), value.clone());
            }
            Some(merged)
        })
        .collect();

    let available: Vec<(&str, &str)> = COLUMN_MAPPING
        .iter()
        .copied()
        .filter(|(raw, _)| joined.iter().any(|row| row.contains_key(*raw)))
        .collect();

    let mut columns = vec![SCRAPED_DATE.to_string()];
    columns.extend(available.iter().map(|(_, label)| label.to_string()));

    let mut dataset = ScrapeDataset::new(columns);
    for row in &joined {
        let mut record = JobRecord::new();
        record.insert(SCRAPED_DATE, Value::String(scraped_date.to_string()));
        for (raw, label) in &available {
            let value = match row.get(*raw) {
                Some(v) if LIST_KEYS.contains(raw) => join_list(v),
                Some(v) => v.clone(),
                None => Value::Null,
            };
            record.insert(*label, value);
        }
        dataset.push(record);
    }

    dataset
}
