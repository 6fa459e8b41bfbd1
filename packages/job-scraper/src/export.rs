//! Writing a finished dataset to disk.

use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::dataset::ScrapeDataset;
use crate::error::Result;
use crate::record::display_value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const SHEET_NAME: &str = "Jobs";

/// Where and in which formats to write a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// Files are named `{file_prefix}_{date}.{ext}`.
    pub file_prefix: String,
    pub save_excel: bool,
    pub save_csv: bool,
    pub save_json: bool,
}

/// Write every enabled format and return the written paths.
///
/// Creates the output folder if needed. Files for the same date are
/// overwritten.
pub fn export_dataset(dataset: &ScrapeDataset, options: &ExportOptions, date: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&options.output_dir)?;
    let stem = format!("{}_{}", options.file_prefix, date);
    let mut exported = Vec::new();

    if options.save_excel {
        let path = options.output_dir.join(format!("{stem}.xlsx"));
        write_xlsx(dataset, &path)?;
        info!(path = %path.display(), "Excel saved");
        exported.push(path);
    }

    if options.save_csv {
        let path = options.output_dir.join(format!("{stem}.csv"));
        write_csv(dataset, &path)?;
        info!(path = %path.display(), "CSV saved");
        exported.push(path);
    }

    if options.save_json {
        let path = options.output_dir.join(format!("{stem}.json"));
        write_json(dataset, &path)?;
        info!(path = %path.display(), "JSON saved");
        exported.push(path);
    }

    Ok(exported)
}

/// Single unstyled worksheet: a header row, then one row per record.
/// Numbers and booleans keep their cell type; null cells are left blank.
pub fn write_xlsx(dataset: &ScrapeDataset, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, column) in (0u16..).zip(dataset.columns()) {
        sheet.write_string(0, col, column.as_str())?;
    }

    for (row_idx, row) in (1u32..).zip(dataset.rows()) {
        for (col, column) in (0u16..).zip(dataset.columns()) {
            match row.get(column) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row_idx, col, *b)?;
                }
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        sheet.write_number(row_idx, col, f)?;
                    }
                    None => {
                        sheet.write_string(row_idx, col, n.to_string())?;
                    }
                },
                Some(other) => {
                    sheet.write_string(row_idx, col, display_value(other))?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// CSV with a header row, prefixed with a UTF-8 BOM for spreadsheet apps.
pub fn write_csv(dataset: &ScrapeDataset, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        let cells = dataset
            .columns()
            .iter()
            .map(|column| row.get(column).map(display_value).unwrap_or_default());
        writer.write_record(cells)?;
    }
    writer.flush()?;
    Ok(())
}

/// JSON array of row objects, pretty-printed, non-ASCII kept as-is.
pub fn write_json(dataset: &ScrapeDataset, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, dataset.rows())?;
    file.flush()?;
    Ok(())
}
