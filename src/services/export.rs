//! Record exports: json, csv, pdf, excel and markdown

use std::{fmt::Write as _, str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::{
    error::{AppError, AppResult},
    models::WeatherRecord,
    repository::RecordStore,
};

const TITLE: &str = "Weather Data Report";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SHEET_NAME: &str = "Weather Data";
const MAX_COLUMN_WIDTH: usize = 50;

pub const COLUMNS: [&str; 12] = [
    "Location",
    "Location Type",
    "Start Date",
    "End Date",
    "Temperature Min",
    "Temperature Max",
    "Temperature Avg",
    "Humidity",
    "Pressure",
    "Wind Speed",
    "Description",
    "Created At",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
    Excel,
    Markdown,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Markdown => "text/markdown",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => "weather_data.json",
            ExportFormat::Csv => "weather_data.csv",
            ExportFormat::Pdf => "weather_data.pdf",
            ExportFormat::Excel => "weather_data.xlsx",
            ExportFormat::Markdown => "weather_data.md",
        }
    }

    /// Serialize `records` (already in display order)
    pub fn render(&self, records: &[WeatherRecord], generated: DateTime<Utc>) -> AppResult<Vec<u8>> {
        match self {
            ExportFormat::Json => render_json(records),
            ExportFormat::Csv => render_csv(records),
            ExportFormat::Pdf => render_pdf(records, generated),
            ExportFormat::Excel => render_excel(records),
            ExportFormat::Markdown => Ok(render_markdown(records, generated).into_bytes()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" => Ok(ExportFormat::Excel),
            "markdown" => Ok(ExportFormat::Markdown),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A rendered export ready to be sent as an attachment
#[derive(Debug)]
pub struct ExportFile {
    pub content_type: &'static str,
    pub filename: &'static str,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn RecordStore>,
}

impl ExportService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn export(&self, format: ExportFormat) -> AppResult<ExportFile> {
        let records = self.store.list_all().await?;
        let body = format.render(&records, Utc::now())?;
        tracing::info!(
            "Exported {} records as {} ({} bytes)",
            records.len(),
            format.filename(),
            body.len()
        );
        Ok(ExportFile {
            content_type: format.content_type(),
            filename: format.filename(),
            body,
        })
    }
}

fn show(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// The 12 tabular cells of a record, nulls as empty strings
pub fn table_row(record: &WeatherRecord) -> [String; 12] {
    [
        record.location_name.clone(),
        record.location_type.as_str().to_string(),
        record.start_date.to_string(),
        record.end_date.to_string(),
        show(record.temperature_min),
        show(record.temperature_max),
        show(record.temperature_avg),
        record.humidity.map(|h| h.to_string()).unwrap_or_default(),
        show(record.pressure),
        show(record.wind_speed),
        record.description.clone().unwrap_or_default(),
        record.created_at.format(TIMESTAMP_FORMAT).to_string(),
    ]
}

// ---------------------------------------------------------------------------
// JSON / CSV / Markdown
// ---------------------------------------------------------------------------

fn render_json(records: &[WeatherRecord]) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(records)
        .map_err(|e| AppError::Internal(format!("JSON export failed: {}", e)))
}

fn render_csv(records: &[WeatherRecord]) -> AppResult<Vec<u8>> {
    let csv_error = |e: csv::Error| AppError::Internal(format!("CSV export failed: {}", e));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS).map_err(csv_error)?;
    for record in records {
        writer.write_record(table_row(record)).map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}

pub fn render_markdown(records: &[WeatherRecord], generated: DateTime<Utc>) -> String {
    let mut out = format!(
        "# {}\n\nGenerated on: {}\n\n",
        TITLE,
        generated.format(TIMESTAMP_FORMAT)
    );

    for record in records {
        // Writing to a String never fails
        let _ = write!(
            out,
            "## {}\n\n\
             - **Date Range:** {} to {}\n\
             - **Temperature:** {}\n\
             - **Humidity:** {}%\n\
             - **Pressure:** {} hPa\n\
             - **Wind Speed:** {} m/s\n\
             - **Description:** {}\n\
             - **Created:** {}\n\n",
            record.location_name,
            record.start_date,
            record.end_date,
            record.temperature_range(),
            or_na(record.humidity),
            or_na(record.pressure),
            or_na(record.wind_speed),
            or_na(record.description.as_deref()),
            record.created_at.format(TIMESTAMP_FORMAT),
        );
    }
    out
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------

/// US letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const INCH: f32 = 72.0;

/// One positioned line of text
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    pub text: String,
    /// Baseline, in points from the bottom of the page
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

impl PdfLine {
    fn new(text: impl Into<String>, y: f32, size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            y,
            size,
            bold,
        }
    }
}

/// Report lines grouped per page
pub fn pdf_layout(records: &[WeatherRecord], generated: DateTime<Utc>) -> Vec<Vec<PdfLine>> {
    let top = PAGE_HEIGHT;
    let mut pages = vec![vec![
        PdfLine::new(TITLE, top - INCH, 16.0, true),
        PdfLine::new(
            format!("Generated on: {}", generated.format(TIMESTAMP_FORMAT)),
            top - 1.2 * INCH,
            12.0,
            false,
        ),
    ]];

    let mut y = top - 1.5 * INCH;
    for record in records {
        if y < INCH {
            pages.push(Vec::new());
            y = top - INCH;
        }
        let Some(page) = pages.last_mut() else {
            break;
        };

        page.push(PdfLine::new(record.location_name.as_str(), y, 12.0, true));
        y -= 0.2 * INCH;
        page.push(PdfLine::new(
            format!("Date Range: {} to {}", record.start_date, record.end_date),
            y,
            10.0,
            false,
        ));
        y -= 0.15 * INCH;
        page.push(PdfLine::new(
            format!("Temperature: {}", record.temperature_range()),
            y,
            10.0,
            false,
        ));
        y -= 0.15 * INCH;
        page.push(PdfLine::new(
            format!("Description: {}", or_na(record.description.as_deref())),
            y,
            10.0,
            false,
        ));
        y -= 0.3 * INCH;
    }
    pages
}

fn render_pdf(records: &[WeatherRecord], generated: DateTime<Utc>) -> AppResult<Vec<u8>> {
    let pdf_error = |e: printpdf::Error| AppError::Internal(format!("PDF export failed: {}", e));

    let width = Mm::from(Pt(PAGE_WIDTH));
    let height = Mm::from(Pt(PAGE_HEIGHT));
    let (doc, first_page, first_layer) = PdfDocument::new(TITLE, width, height, "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let draw = |layer: &PdfLayerReference, lines: &[PdfLine]| {
        for line in lines {
            let font: &IndirectFontRef = if line.bold { &bold } else { &regular };
            layer.use_text(
                line.text.as_str(),
                line.size,
                Mm::from(Pt(INCH)),
                Mm::from(Pt(line.y)),
                font,
            );
        }
    };

    for (index, lines) in pdf_layout(records, generated).iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        draw(&layer, lines);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

// ---------------------------------------------------------------------------
// Excel
// ---------------------------------------------------------------------------

/// Width per column: longest cell (header included) plus 2, capped at 50
pub fn column_widths(rows: &[[String; 12]]) -> [usize; 12] {
    let mut widths = COLUMNS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
}

fn numeric_cell(record: &WeatherRecord, column: usize) -> Option<f64> {
    match column {
        4 => record.temperature_min.and_then(|v| v.to_f64()),
        5 => record.temperature_max.and_then(|v| v.to_f64()),
        6 => record.temperature_avg.and_then(|v| v.to_f64()),
        7 => record.humidity.map(f64::from),
        8 => record.pressure.and_then(|v| v.to_f64()),
        9 => record.wind_speed.and_then(|v| v.to_f64()),
        _ => None,
    }
}

/// Value written to one worksheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcelCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    /// Written with [`header_format`]
    pub header: bool,
}

pub fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

/// Header row then one row per record; empty text cells are left blank
pub fn excel_cells(records: &[WeatherRecord], rows: &[[String; 12]]) -> Vec<ExcelCell> {
    let mut cells: Vec<ExcelCell> = COLUMNS
        .iter()
        .enumerate()
        .map(|(col, title)| ExcelCell {
            row: 0,
            col: col as u16,
            value: CellValue::Text(title.to_string()),
            header: true,
        })
        .collect();

    for (i, (record, texts)) in records.iter().zip(rows.iter()).enumerate() {
        for (col, text) in texts.iter().enumerate() {
            let value = match numeric_cell(record, col) {
                Some(number) => CellValue::Number(number),
                None if text.is_empty() => continue,
                None => CellValue::Text(text.clone()),
            };
            cells.push(ExcelCell {
                row: (i + 1) as u32,
                col: col as u16,
                value,
                header: false,
            });
        }
    }
    cells
}

fn render_excel(records: &[WeatherRecord]) -> AppResult<Vec<u8>> {
    let xlsx_error =
        |e: rust_xlsxwriter::XlsxError| AppError::Internal(format!("Excel export failed: {}", e));

    let header = header_format();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    let rows: Vec<[String; 12]> = records.iter().map(table_row).collect();
    for cell in excel_cells(records, &rows) {
        let written = match (&cell.value, cell.header) {
            (CellValue::Text(text), true) => {
                worksheet.write_string_with_format(cell.row, cell.col, text.as_str(), &header)
            }
            (CellValue::Text(text), false) => {
                worksheet.write_string(cell.row, cell.col, text.as_str())
            }
            (CellValue::Number(number), _) => worksheet.write_number(cell.row, cell.col, *number),
        };
        written.map_err(xlsx_error)?;
    }

    for (col, width) in column_widths(&rows).iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width as f64)
            .map_err(xlsx_error)?;
    }

    let mut workbook = Workbook::new();
    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().map_err(xlsx_error)
}
