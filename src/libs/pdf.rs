//! PDF rendering for service orders and the order relation report.
//!
//! Pages are drawn with the standard Helvetica fonts, so no font files are
//! embedded. Text is encoded as Windows-1252 to match the fonts'
//! `WinAnsiEncoding`, which covers Portuguese accents.

use crate::db::orders::ServiceOrder;
use crate::db::relations::{AppliedFilters, RelationRow};
use crate::libs::config::{CompanyConfig, Config};
use crate::libs::dates::{to_user_date, USER_DATETIME_FORMAT};
use crate::libs::duration::Duration;
use crate::libs::error::AppResult;
use crate::libs::statistics::StatisticsSummary;
use crate::libs::status::Flag;
use crate::libs::validation::format_document;
use chrono::Local;
use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const A4_SHORT: f32 = 595.0;
const A4_LONG: f32 = 842.0;
const MARGIN: f32 = 40.0;
const FOOTER_HEIGHT: f32 = 30.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

const ORDER_FILE_PREFIX: &str = "os_";
const RELATION_FILE_PREFIX: &str = "relacao_";

fn encode(text: &str) -> Vec<u8> {
    WINDOWS_1252.encode(text).0.into_owned()
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH
}

/// Cuts `text` so it fits in `width`, marking the cut with `...`.
fn fit(text: &str, width: f32, size: f32) -> String {
    let max = (width / (size * GLYPH_WIDTH)).floor() as usize;
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Greedy word wrap by estimated width.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max = ((width / (size * GLYPH_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
            if needed > max && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    lines
}

/// Page operations collected top-down, breaking to a new page when the
/// cursor would run into the footer.
struct Layout {
    width: f32,
    height: f32,
    pages: Vec<Vec<Operation>>,
    y: f32,
}

impl Layout {
    fn new(width: f32, height: f32) -> Self {
        Layout {
            width,
            height,
            pages: vec![Vec::new()],
            y: height - MARGIN,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * MARGIN
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // `pages` starts with one page and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Starts a new page unless `height` still fits above the footer.
    /// Returns true when a page was added.
    fn reserve(&mut self, height: f32) -> bool {
        if self.y - height < MARGIN + FOOTER_HEIGHT {
            self.pages.push(Vec::new());
            self.y = self.height - MARGIN;
            return true;
        }
        false
    }

    fn skip(&mut self, height: f32) {
        self.y -= height;
    }

    fn text_at(&mut self, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        let font = if bold { FONT_BOLD } else { FONT_REGULAR };
        self.ops().extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn line_at(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops().extend([
            Operation::new("w", vec![0.5_f32.into()]),
            Operation::new("m", vec![x1.into(), y1.into()]),
            Operation::new("l", vec![x2.into(), y2.into()]),
            Operation::new("S", vec![]),
        ]);
    }

    /// Writes one line of text at the cursor and moves down.
    fn line(&mut self, x: f32, size: f32, bold: bool, text: &str) {
        let leading = size * 1.4;
        self.reserve(leading);
        self.y -= leading;
        let y = self.y;
        self.text_at(x, y, size, bold, text);
    }

    fn centered(&mut self, size: f32, bold: bool, text: &str) {
        let x = ((self.width - text_width(text, size)) / 2.0).max(MARGIN);
        self.line(x, size, bold, text);
    }

    /// Horizontal rule across the content width at the cursor.
    fn rule(&mut self) {
        self.y -= 4.0;
        let y = self.y;
        let right = self.width - MARGIN;
        self.line_at(MARGIN, y, right, y);
    }

    /// One table row; each cell is cut to its column width.
    fn row(&mut self, widths: &[f32], cells: &[String], size: f32, bold: bool) {
        let leading = size * 1.6;
        self.reserve(leading);
        self.y -= leading;
        let y = self.y;

        let mut x = MARGIN;
        for (width, cell) in widths.iter().zip(cells) {
            let text = fit(cell, width - 4.0, size);
            self.text_at(x + 2.0, y, size, bold, &text);
            x += width;
        }
    }

    /// Adds a footer to every page and builds the document.
    fn finish<F>(mut self, footer: F) -> AppResult<Vec<u8>>
    where
        F: Fn(usize, usize) -> Vec<String>,
    {
        let total = self.pages.len();
        let width = self.width;
        for (index, page) in self.pages.iter_mut().enumerate() {
            let mut y = MARGIN;
            for text in footer(index + 1, total).iter().rev() {
                let x = ((width - text_width(text, 8.0)) / 2.0).max(MARGIN);
                page.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![FONT_REGULAR.into(), 8.0_f32.into()]),
                    Operation::new("Td", vec![x.into(), y.into()]),
                    Operation::new("Tj", vec![Object::string_literal(encode(text))]),
                    Operation::new("ET", vec![]),
                ]);
                y += 10.0;
            }
        }

        build_document(self.width, self.height, self.pages)
    }
}

fn build_document(width: f32, height: f32, pages: Vec<Vec<Operation>>) -> AppResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![Object::from(0.0_f32), Object::from(0.0_f32), Object::from(width), Object::from(height)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Renders documents with the configured company header and writes them to
/// the output directory.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    company: CompanyConfig,
    output_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new<P: AsRef<Path>>(company: CompanyConfig, output_dir: P) -> Self {
        PdfRenderer {
            company,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.company(), config.pdf_dir()?))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn company_footer(&self) -> String {
        let document = format_document(&self.company.document);
        match (self.company.name.is_empty(), document.is_empty()) {
            (false, false) => format!("{} - {}", self.company.name, document),
            (false, true) => self.company.name.clone(),
            (true, false) => document,
            (true, true) => String::new(),
        }
    }

    fn header(&self, layout: &mut Layout) {
        if !self.company.name.is_empty() {
            layout.line(MARGIN, 14.0, true, &self.company.name);
        }
        let contact = [
            self.company.address.as_str(),
            self.company.phone.as_str(),
            self.company.email.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
        if !contact.is_empty() {
            layout.line(MARGIN, 9.0, false, &contact);
        }
        if !self.company.document.is_empty() {
            layout.line(MARGIN, 9.0, false, &format!("CNPJ: {}", format_document(&self.company.document)));
        }
        layout.rule();
    }

    pub fn order_pdf(&self, order: &ServiceOrder) -> AppResult<Vec<u8>> {
        let mut layout = Layout::new(A4_SHORT, A4_LONG);
        self.header(&mut layout);

        layout.skip(10.0);
        layout.centered(16.0, true, &format!("ORDEM DE SERVIÇO Nº {}", order.number()));
        layout.skip(10.0);

        let fields = [
            ("Cliente", order.client_name.clone()),
            ("CPF/CNPJ", format_document(&order.client_document)),
            ("Modalidade", or_dash(order.modality_description.as_deref())),
            ("Contato no local", or_dash(order.on_site_contact.as_deref())),
            ("Consultor", order.consultant_name.clone()),
            ("Data", order.date.clone()),
            ("Serviço", order.service_description.clone()),
        ];
        for (label, value) in fields {
            let value_width = layout.content_width() - 110.0;
            layout.line(MARGIN, 10.0, true, &format!("{}:", label));
            let y = layout.y;
            layout.text_at(MARGIN + 110.0, y, 10.0, false, &fit(&value, value_width, 10.0));
        }

        layout.skip(12.0);
        let column = layout.content_width() / 5.0;
        let widths = [column; 5];
        let headers = ["Início", "Término", "Desconto", "Traslado", "Total"].map(str::to_string);
        let times = [
            &order.start_time,
            &order.end_time,
            &order.discount_time,
            &order.transfer_time,
            &order.total_time,
        ]
        .map(|t| or_dash(t.as_deref()));
        layout.rule();
        layout.row(&widths, &headers, 10.0, true);
        layout.row(&widths, &times, 10.0, false);
        layout.rule();

        layout.skip(12.0);
        layout.line(MARGIN, 10.0, true, "Detalhamento:");
        let detail = order.detail.clone().unwrap_or_default();
        let content_width = layout.content_width();
        for line in wrap(&detail, content_width, 10.0) {
            layout.line(MARGIN, 10.0, false, &line);
        }

        layout.reserve(90.0);
        layout.skip(60.0);
        let half = layout.content_width() / 2.0;
        let y = layout.y;
        layout.line_at(MARGIN, y, MARGIN + half - 20.0, y);
        layout.line_at(MARGIN + half + 20.0, y, MARGIN + 2.0 * half, y);
        layout.text_at(MARGIN, y - 12.0, 9.0, false, &fit(&format!("Consultor: {}", order.consultant_name), half - 20.0, 9.0));
        layout.text_at(MARGIN + half + 20.0, y - 12.0, 9.0, false, &fit(&format!("Cliente: {}", order.client_name), half - 20.0, 9.0));

        let footer = self.company_footer();
        layout.finish(|_, _| vec![footer.clone()])
    }

    /// Renders the order and writes it as `os_<number>.pdf`.
    pub fn save_order(&self, order: &ServiceOrder) -> AppResult<PathBuf> {
        let bytes = self.order_pdf(order)?;
        self.write(&format!("{}{}.pdf", ORDER_FILE_PREFIX, order.number()), &bytes)
    }

    pub fn relation_pdf(&self, rows: &[RelationRow], summary: &StatisticsSummary, filters: &AppliedFilters) -> AppResult<Vec<u8>> {
        let mut layout = Layout::new(A4_LONG, A4_SHORT);
        self.header(&mut layout);

        layout.skip(6.0);
        layout.centered(14.0, true, "Relação de Ordens de Serviço");
        for line in describe_filters(filters) {
            layout.line(MARGIN, 9.0, false, &line);
        }
        layout.line(MARGIN, 9.0, false, &format!("Gerado em {}", Local::now().format(USER_DATETIME_FORMAT)));
        layout.skip(6.0);

        let widths = [50.0, 70.0, 200.0, 150.0, 140.0, 50.0, 50.0, 52.0];
        let headers = ["Nº", "Data", "Cliente", "Serviço", "Consultor", "Total", "Faturado", "Cobrado"].map(str::to_string);
        layout.rule();
        layout.row(&widths, &headers, 9.0, true);
        layout.rule();

        for row in rows {
            if layout.reserve(9.0 * 1.6) {
                layout.row(&widths, &headers, 9.0, true);
                layout.rule();
            }
            let cells = [
                format!("{:04}", row.number),
                row.date.clone(),
                row.client_name.clone().unwrap_or_default(),
                row.service_description.clone().unwrap_or_default(),
                row.consultant_name.clone().unwrap_or_default(),
                or_dash(row.total_time.as_deref()),
                row.invoiced.label().to_string(),
                row.collected.label().to_string(),
            ];
            layout.row(&widths, &cells, 9.0, false);
        }

        let listed: Duration = rows.iter().map(|r| Duration::parse_opt(r.total_time.as_deref())).sum();
        layout.rule();
        layout.row(
            &[470.0, 140.0, 50.0],
            &[format!("Total: {} ordem(ns)", rows.len()), String::new(), listed.to_string()],
            9.0,
            true,
        );

        layout.reserve(8.0 * 9.0 * 1.6);
        layout.skip(12.0);
        layout.line(MARGIN, 11.0, true, "Resumo");
        let summary_widths = [160.0, 90.0, 90.0, 60.0];
        layout.row(
            &summary_widths,
            &["Situação", "Quantidade", "Horas", "%"].map(str::to_string),
            9.0,
            true,
        );
        layout.rule();
        let total_percent = if summary.total_time.is_zero() { 0 } else { 100 };
        let lines = [
            ("Faturados", summary.invoiced_count, summary.invoiced_time, summary.invoiced_percent),
            ("Não Faturados", summary.not_invoiced_count, summary.not_invoiced_time, summary.not_invoiced_percent),
            ("Cobrados", summary.collected_count, summary.collected_time, summary.collected_percent),
            ("Não Cobrados", summary.not_collected_count, summary.not_collected_time, summary.not_collected_percent),
            ("Total", summary.total_count, summary.total_time, total_percent),
        ];
        for (label, count, time, percent) in lines {
            layout.row(
                &summary_widths,
                &[label.to_string(), count.to_string(), time.to_string(), format!("{}%", percent)],
                9.0,
                label == "Total",
            );
        }

        let company = self.company_footer();
        layout.finish(|page, total| vec![company.clone(), format!("Página {} de {}", page, total)])
    }

    /// Renders the report and writes it as `relacao_<timestamp>.pdf`.
    pub fn save_relations(&self, rows: &[RelationRow], summary: &StatisticsSummary, filters: &AppliedFilters) -> AppResult<PathBuf> {
        let bytes = self.relation_pdf(rows, summary, filters)?;
        let name = format!("{}{}.pdf", RELATION_FILE_PREFIX, Local::now().format("%Y%m%d_%H%M%S"));
        self.write(&name, &bytes)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(name);
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "pdf written");
        Ok(path)
    }

    /// Removes generated PDFs last modified more than `max_age` ago.
    /// Other files in the directory are left alone.
    pub fn cleanup_pdf_files(&self, max_age: std::time::Duration) -> AppResult<usize> {
        if !self.output_dir.exists() {
            return Ok(0);
        }

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let generated = name.ends_with(".pdf") && (name.starts_with(ORDER_FILE_PREFIX) || name.starts_with(RELATION_FILE_PREFIX));
            if !generated {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            let age = now.duration_since(modified).unwrap_or_default();
            if age > max_age {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Human-readable lines for the filters that were applied.
fn describe_filters(filters: &AppliedFilters) -> Vec<String> {
    let f = &filters.filter;
    if f.is_empty() {
        return vec!["Filtros: nenhum".to_string()];
    }
    let mut lines = Vec::new();

    if let Some(number) = f.number {
        lines.push(format!("Nº: {:04}", number));
    }

    let from = f.date_from.as_deref().map(str::trim).filter(|d| !d.is_empty());
    let to = f.date_to.as_deref().map(str::trim).filter(|d| !d.is_empty());
    match (from, to) {
        (Some(from), Some(to)) => lines.push(format!("Período: {} a {}", to_user_date(from), to_user_date(to))),
        (Some(from), None) => lines.push(format!("A partir de: {}", to_user_date(from))),
        (None, Some(to)) => lines.push(format!("Até: {}", to_user_date(to))),
        (None, None) => {}
    }

    if let Some(client) = f.client {
        let name = filters.client_name.clone().unwrap_or_else(|| format!("#{}", client));
        lines.push(format!("Cliente: {}", name));
    }
    if let Some(flag) = f.invoiced.as_deref().and_then(|v| Flag::from_code(&v.trim().to_uppercase())) {
        lines.push(format!("Faturado: {}", flag.label()));
    }
    if let Some(flag) = f.collected.as_deref().and_then(|v| Flag::from_code(&v.trim().to_uppercase())) {
        lines.push(format!("Cobrado: {}", flag.label()));
    }

    lines
}
