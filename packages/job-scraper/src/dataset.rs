//! The final, export-ready table.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Label of the collection-date column prepended to every row.
pub const SCRAPED_DATE: &str = "Scraped Date";

/// Raw flattened key → output label, in output order.
pub const COLUMN_MAPPING: [(&str, &str); 8] = [
    ("jobPostingInfo.title", "Job Title"),
    ("jobPostingInfo.jobDescription", "Job Description"),
    ("jobPostingInfo.location", "Location"),
    ("jobPostingInfo.additionalLocations", "Additional Locations"),
    ("jobPostingInfo.startDate", "Posted Date"),
    ("jobPostingInfo.jobReqId", "Job ID"),
    ("jobPostingInfo.remoteType", "Remote Type"),
    ("jobPostingInfo.externalUrl", "Application URL"),
];

/// One output row keyed by column label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobRecord(IndexMap<String, Value>);

impl JobRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: Value) {
        self.0.insert(label.into(), value);
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.0.get(label)
    }

    /// String cell, `None` when absent, null or non-string.
    pub fn text(&self, label: &str) -> Option<&str> {
        self.0.get(label).and_then(Value::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Ordered rows sharing one column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeDataset {
    columns: Vec<String>,
    rows: Vec<JobRecord>,
}

impl ScrapeDataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Cells are reordered to the dataset's column order and
    /// missing cells are filled with null.
    pub fn push(&mut self, record: JobRecord) {
        let mut aligned = JobRecord::new();
        for column in &self.columns {
            let value = record.get(column).cloned().unwrap_or(Value::Null);
            aligned.insert(column.clone(), value);
        }
        self.rows.push(aligned);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[JobRecord] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, label: &str) -> Vec<&Value> {
        self.rows.iter().filter_map(|row| row.get(label)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_aligns_to_columns() {
        let mut dataset =
            ScrapeDataset::new(vec![SCRAPED_DATE.to_string(), "Job Title".to_string()]);

        let mut record = JobRecord::new();
        record.insert("Job Title", json!("Analyst"));
        record.insert("Unmapped", json!("dropped"));
        record.insert(SCRAPED_DATE, json!("2024-01-02"));
        dataset.push(record);

        let row = &dataset.rows()[0];
        assert_eq!(row.labels().collect::<Vec<_>>(), vec![SCRAPED_DATE, "Job Title"]);
        assert_eq!(row.text("Job Title"), Some("Analyst"));
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(dataset.column_count(), 2);
    }

    #[test]
    fn test_missing_cells_are_null() {
        let mut dataset = ScrapeDataset::new(vec!["Location".to_string()]);
        dataset.push(JobRecord::new());
        assert_eq!(dataset.column("Location"), vec![&Value::Null]);
    }

    #[test]
    fn test_record_serializes_as_object() {
        let mut record = JobRecord::new();
        record.insert(SCRAPED_DATE, json!("2024-01-02"));
        record.insert("Job ID", json!("R-1"));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"Scraped Date":"2024-01-02","Job ID":"R-1"}"#
        );
    }
}
