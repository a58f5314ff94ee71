//! Export of the order relation listing to CSV, JSON and Excel.
//!
//! Every format carries the rows followed by the invoicing and collection
//! summary for the same filter.

use crate::db::relations::RelationRow;
use crate::libs::error::AppResult;
use crate::libs::statistics::StatisticsSummary;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

const ROW_HEADERS: [&str; 11] = [
    "Number",
    "Date",
    "Client",
    "Modality",
    "Service",
    "Consultant",
    "Total",
    "Invoiced",
    "Collected",
    "Sent",
    "Client ID",
];

const SUMMARY_HEADERS: [&str; 4] = ["Segment", "Count", "Time", "Percent"];

fn row_cells(row: &RelationRow) -> [String; 11] {
    [
        row.number.to_string(),
        row.date.clone(),
        row.client_name.clone().unwrap_or_default(),
        row.modality_description.clone().unwrap_or_default(),
        row.service_description.clone().unwrap_or_default(),
        row.consultant_name.clone().unwrap_or_default(),
        row.total_time.clone().unwrap_or_default(),
        row.invoiced.code().to_string(),
        row.collected.code().to_string(),
        row.sent.code().to_string(),
        row.client_id.to_string(),
    ]
}

fn summary_cells(summary: &StatisticsSummary) -> Vec<[String; 4]> {
    let total_percent = if summary.total_time.is_zero() { 0 } else { 100 };
    [
        ("Invoiced", summary.invoiced_count, summary.invoiced_time, summary.invoiced_percent),
        ("Not invoiced", summary.not_invoiced_count, summary.not_invoiced_time, summary.not_invoiced_percent),
        ("Collected", summary.collected_count, summary.collected_time, summary.collected_percent),
        ("Not collected", summary.not_collected_count, summary.not_collected_time, summary.not_collected_percent),
        ("Total", summary.total_count, summary.total_time, total_percent),
    ]
    .into_iter()
    .map(|(label, count, time, percent)| [label.to_string(), count.to_string(), time.to_string(), format!("{}%", percent)])
    .collect()
}

#[derive(Serialize)]
struct JsonExport<'a> {
    exported_at: String,
    rows: &'a [RelationRow],
    statistics: &'a StatisticsSummary,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the file goes to the working directory as
    /// `dexus_relations_<timestamp>.<ext>`.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "dexus_relations_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export(&self, rows: &[RelationRow], summary: &StatisticsSummary) -> AppResult<PathBuf> {
        match self.format {
            ExportFormat::Csv => self.export_csv(rows, summary)?,
            ExportFormat::Json => self.export_json(rows, summary)?,
            ExportFormat::Excel => self.export_excel(rows, summary)?,
        }
        Ok(self.output_path.clone())
    }

    fn export_csv(&self, rows: &[RelationRow], summary: &StatisticsSummary) -> AppResult<()> {
        // Sections differ in width.
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(&self.output_path)?;

        wtr.write_record(ROW_HEADERS)?;
        for row in rows {
            wtr.write_record(row_cells(row))?;
        }

        wtr.write_record([""])?;
        wtr.write_record(SUMMARY_HEADERS)?;
        for line in summary_cells(summary) {
            wtr.write_record(line)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn export_json(&self, rows: &[RelationRow], summary: &StatisticsSummary) -> AppResult<()> {
        let data = JsonExport {
            exported_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            rows,
            statistics: summary,
        };
        let json = serde_json::to_string_pretty(&data)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn export_excel(&self, rows: &[RelationRow], summary: &StatisticsSummary) -> AppResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Relations")?;
        write_header(worksheet, 0, &ROW_HEADERS, &header_format)?;
        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            worksheet.write_number(r, 0, row.number as f64)?;
            for (col, cell) in row_cells(row).iter().enumerate().skip(1) {
                worksheet.write_string(r, col as u16, cell)?;
            }
        }
        worksheet.autofit();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Summary")?;
        write_header(worksheet, 0, &SUMMARY_HEADERS, &header_format)?;
        for (i, line) in summary_cells(summary).iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                worksheet.write_string(i as u32 + 1, col as u16, cell)?;
            }
        }
        worksheet.autofit();

        workbook.save(&self.output_path)?;
        Ok(())
    }
}

fn write_header(worksheet: &mut Worksheet, row: u32, headers: &[&str], format: &Format) -> AppResult<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, *header, format)?;
    }
    Ok(())
}
