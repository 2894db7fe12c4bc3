//! Fixed-layout PDF report.
//!
//! US-letter pages: a title, a rule beneath it, then one `Key: value` line
//! per submitted field, spilling onto further pages when the first is full.
//! Written directly as PDF 1.4 with the built-in Helvetica font.

use std::io::Write;

use crate::error::{AppError, Result};

pub const REPORT_FILE_NAME: &str = "SEO_Report.pdf";
pub const REPORT_MIME: &str = "application/pdf";
pub const DOCUMENT_TITLE: &str = "Smart SEO Report";
pub const HEADING: &str = "Smart SEO Auditor Report";

/// Form field used for request-forgery protection; never printed.
pub const RESERVED_FIELD: &str = "csrf_token";

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const FONT_SIZE: u32 = 12;
const HEADING_POS: (u32, u32) = (230, 750);
const RULE_Y: u32 = 740;
const RULE_X: (u32, u32) = (50, 550);
const FIELD_X: u32 = 70;
const FIRST_LINE_Y: u32 = 710;
const CONTINUATION_FIRST_LINE_Y: u32 = 750;
const LINE_HEIGHT: u32 = 20;
const BOTTOM_MARGIN: u32 = 50;

/// Python-style capitalisation: first character upper-case, the rest lower-case.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lines printed for a set of fields, in submission order.
pub fn report_lines(fields: &[(String, String)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(key, _)| key != RESERVED_FIELD)
        .map(|(key, value)| format!("{}: {}", capitalize(key), value))
        .collect()
}

/// Encode text as a PDF literal string in WinAnsi.
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' | '\r' | '\t' => out.push(' '),
            ' '..='~' => out.push(ch),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

fn text_op(x: u32, y: u32, text: &str) -> String {
    format!(
        "BT /F1 {} Tf {} {} Td {} Tj ET\n",
        FONT_SIZE,
        x,
        y,
        pdf_string(text)
    )
}

/// Content streams, one per page.
fn layout(lines: &[String]) -> Vec<String> {
    let mut pages = Vec::new();
    let mut content = text_op(HEADING_POS.0, HEADING_POS.1, HEADING);
    content.push_str(&format!(
        "{} {} m {} {} l S\n",
        RULE_X.0, RULE_Y, RULE_X.1, RULE_Y
    ));
    let mut y = FIRST_LINE_Y;

    for line in lines {
        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut content));
            y = CONTINUATION_FIRST_LINE_Y;
        }
        content.push_str(&text_op(FIELD_X, y, line));
        y -= LINE_HEIGHT;
    }
    pages.push(content);
    pages
}

/// Render the report for `fields` as PDF bytes.
pub fn render_report(fields: &[(String, String)]) -> Result<Vec<u8>> {
    let lines = report_lines(fields);
    let pages = layout(&lines);
    write_pdf(&pages).map_err(|e| AppError::report(e.to_string()))
}

fn write_pdf(pages: &[String]) -> std::io::Result<Vec<u8>> {
    // 1 catalog, 2 page tree, 3 font, 4 info, then (page, content) pairs
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + i * 2).collect();
    let object_count = 4 + pages.len() * 2;

    let mut objects: Vec<String> = Vec::with_capacity(object_count);
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    objects.push(format!(
        "<< /Title {} /Producer (seo-auditor) >>",
        pdf_string(DOCUMENT_TITLE)
    ));
    for (content, page_id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    let mut buf: Vec<u8> = Vec::new();
    buf.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        write!(buf, "{} 0 obj\n{}\nendobj\n", index + 1, body)?;
    }

    let xref_start = buf.len();
    write!(buf, "xref\n0 {}\n", objects.len() + 1)?;
    buf.write_all(b"0000000000 65535 f \n")?;
    for offset in offsets {
        write!(buf, "{:010} 00000 n \n", offset)?;
    }
    write!(
        buf,
        "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    )?;

    Ok(buf)
}
