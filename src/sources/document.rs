//! Text extraction from uploaded documents.
//!
//! PDF and Word documents become plain text; spreadsheets and CSV files are
//! read into a [`Table`] for downstream analysis.

use crate::error::{Result, ToolbeltError};
use calamine::Reader as _;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, instrument};

/// Extracted document content.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentContent {
    /// Running text (pdf, docx).
    Text(String),
    /// Tabular data (csv, xlsx).
    Table(Table),
}

/// A header row plus data rows, all rendered as strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Render as a right-aligned text grid with a leading row index.
    pub fn render(&self) -> String {
        let columns = self
            .headers
            .len()
            .max(self.rows.iter().map(|r| r.len()).max().unwrap_or(0));

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let mut widths: Vec<usize> = (0..columns)
            .map(|i| self.headers.get(i).map(|h| h.chars().count()).unwrap_or(0))
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let empty = String::new();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header = " ".repeat(index_width);
        for (i, width) in widths.iter().enumerate() {
            let cell = self.headers.get(i).unwrap_or(&empty);
            header.push_str(&format!("  {:>width$}", cell, width = *width));
        }
        lines.push(header);

        for (n, row) in self.rows.iter().enumerate() {
            let mut line = format!("{:<width$}", n, width = index_width);
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).unwrap_or(&empty);
                line.push_str(&format!("  {:>width$}", cell, width = *width));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// Read a document from disk, dispatching on its file extension.
#[instrument]
pub async fn extract_path(path: &Path) -> Result<DocumentContent> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            ToolbeltError::UnsupportedDocument(format!("{} has no file extension", path.display()))
        })?;

    let bytes = tokio::fs::read(path).await?;
    extract(&bytes, extension)
}

/// Extract content from document bytes with the declared extension.
pub fn extract(bytes: &[u8], extension: &str) -> Result<DocumentContent> {
    let content = match extension.to_ascii_lowercase().as_str() {
        "pdf" => DocumentContent::Text(extract_pdf(bytes)?),
        "docx" => DocumentContent::Text(extract_docx(bytes)?),
        "xlsx" => DocumentContent::Table(extract_xlsx(bytes)?),
        "csv" => DocumentContent::Table(extract_csv(bytes)?),
        other => return Err(ToolbeltError::UnsupportedDocument(other.to_string())),
    };

    debug!("Extracted {} document", extension);
    Ok(content)
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ToolbeltError::Extraction(format!("Failed to read PDF: {}", e)))
}

fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ToolbeltError::Extraction(format!("Not a docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ToolbeltError::Extraction(format!("Missing document body: {}", e)))?
        .read_to_string(&mut xml)?;

    docx_paragraphs(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Paragraph texts of a WordprocessingML body.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ToolbeltError::Extraction(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ToolbeltError::Extraction(format!("Malformed docx XML: {}", e))),
        }
    }

    Ok(paragraphs)
}

fn extract_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: calamine::Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| ToolbeltError::Extraction(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolbeltError::Extraction("Workbook has no sheets".to_string()))?
        .map_err(|e| ToolbeltError::Extraction(format!("Failed to read sheet: {}", e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

    let headers = rows.next().unwrap_or_default();
    Ok(Table {
        headers,
        rows: rows.collect(),
    })
}

fn extract_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ToolbeltError::Extraction(format!("Failed to read CSV header: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ToolbeltError::Extraction(format!("Bad CSV row: {}", e)))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(Table { headers, rows })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{Cursor, Write};

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            for (name, content) in entries {
                writer
                    .start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    /// A docx archive holding only `word/document.xml`.
    pub fn docx_bytes(body: &str) -> Vec<u8> {
        zip_bytes(&[("word/document.xml", body)])
    }

    /// A docx whose paragraphs are the given lines.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        docx_bytes(&format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        ))
    }

    /// A one-sheet workbook. String cells are stored inline, numeric-looking
    /// cells as numbers.
    pub fn xlsx_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let sheet_rows: String = rows
            .iter()
            .enumerate()
            .map(|(r, cells)| {
                let cells: String = cells
                    .iter()
                    .enumerate()
                    .map(|(c, value)| {
                        let reference = format!("{}{}", (b'A' + c as u8) as char, r + 1);
                        if value.parse::<f64>().is_ok() {
                            format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value)
                        } else {
                            format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, reference, value)
                        }
                    })
                    .collect();
                format!(r#"<row r="{}">{}</row>"#, r + 1, cells)
            })
            .collect();

        let sheet = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            sheet_rows
        );

        zip_bytes(&[
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#,
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
            ),
            ("xl/worksheets/sheet1.xml", sheet.as_str()),
        ])
    }
}
