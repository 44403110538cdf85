//! Shared helpers for integration tests.

use sponsor_letters::{
    CanonicalEvent, CellValue, DocumentRenderer, EventRegistry, RenderError, RenderedDocuments,
    ResolvedPayload, UploadedTable,
};
use std::io::Cursor;

pub fn table(headers: &[&str], rows: &[&[&str]]) -> UploadedTable {
    UploadedTable::from_rows(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| CellValue::from_raw(cell)).collect())
            .collect(),
    )
}

/// Build real XLSX bytes so tests exercise the same read path uploads take.
pub fn xlsx_bytes(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).expect("new workbook has a sheet");

    for (col, header) in headers.iter().enumerate() {
        sheet
            .get_cell_mut(((col + 1) as u32, 1u32))
            .set_value(*header);
    }
    for (row_index, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut(((col + 1) as u32, (row_index + 2) as u32))
                .set_value(*value);
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor).expect("write workbook");
    cursor.into_inner()
}

pub fn sample_registry() -> EventRegistry {
    EventRegistry::from_events(vec![
        CanonicalEvent {
            name: "ASCO Direct from Chicago 2025".to_string(),
            date_text: "June 13-14, 2025".to_string(),
            venue: "Hyatt Regency McCormick Place".to_string(),
            city_state: "Chicago, IL".to_string(),
            year: None,
        },
        CanonicalEvent {
            name: "Best of ASCO Seattle 2025".to_string(),
            date_text: "July 11-12, 2025".to_string(),
            venue: "Sheraton Grand Seattle".to_string(),
            city_state: "Seattle, WA".to_string(),
            year: None,
        },
        CanonicalEvent {
            name: "Liver Meeting Direct from San Diego".to_string(),
            date_text: "November 7-8, 2025".to_string(),
            venue: "Marriott Marquis San Diego".to_string(),
            city_state: "San Diego, CA".to_string(),
            year: None,
        },
    ])
}

/// Renderer standing in for the external letter engine.
pub struct MockRenderer;

impl DocumentRenderer for MockRenderer {
    fn extensions(&self) -> (&str, &str) {
        ("docx", "pdf")
    }

    fn render(&self, payload: &ResolvedPayload) -> Result<RenderedDocuments, RenderError> {
        let body = format!("{} / {}", payload.company_name, payload.meeting_name);
        Ok(RenderedDocuments {
            editable: body.clone().into_bytes(),
            fixed: body.into_bytes(),
        })
    }
}

/// Renderer that always fails, for generation-error paths.
pub struct FailingRenderer {
    pub message: &'static str,
}

impl DocumentRenderer for FailingRenderer {
    fn extensions(&self) -> (&str, &str) {
        ("docx", "pdf")
    }

    fn render(&self, _payload: &ResolvedPayload) -> Result<RenderedDocuments, RenderError> {
        Err(RenderError::new(self.message))
    }
}
