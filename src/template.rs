//! Upload template export.
//!
//! A convenience artifact with no processing logic: an XLSX skeleton whose
//! headers match the default synonym table's primary variants, plus sample
//! rows, so uploaders can start from a file the schema resolver will accept
//! as-is.

use crate::error::PipelineError;
use std::io::Cursor;
use umya_spreadsheet::writer::xlsx;

const SHEET_NAME: &str = "Letters";

const HEADERS: [&str; 5] = [
    "Exhibitor Invite",
    "Event Name",
    "Total",
    "Official Address",
    "Expected Attendance",
];

const SAMPLE_ROWS: [[&str; 5]; 3] = [
    [
        "Sample Company Inc.",
        "ASCO Direct from Chicago 2025",
        "$5,000.00",
        "123 Main St, Suite 100, New York, NY 10001",
        "250",
    ],
    [
        "Another Corp",
        "Best of ASCO Seattle 2025",
        "$7,500.00",
        "456 Corporate Blvd, Chicago, IL 60601",
        "300",
    ],
    [
        "Medical Devices LLC",
        "Liver Meeting Direct from San Diego",
        "$10,000.00",
        "789 Medical Plaza, Boston, MA 02101",
        "200",
    ],
];

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Build the XLSX upload template as bytes.
pub fn build_upload_template() -> Result<Vec<u8>, PipelineError> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| PipelineError::Template("new workbook has no sheet".to_string()))?;
    sheet.set_name(SHEET_NAME);

    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .get_cell_mut(format!("{}1", column_letter(col)).as_str())
            .set_value(*header);
    }
    for (row_index, sample) in SAMPLE_ROWS.iter().enumerate() {
        let row_num = row_index + 2;
        for (col, value) in sample.iter().enumerate() {
            sheet
                .get_cell_mut(format!("{}{}", column_letter(col), row_num).as_str())
                .set_value(*value);
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    xlsx::write_writer(&book, &mut cursor)
        .map_err(|err| PipelineError::Template(err.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CanonicalField, SynonymTable, resolve_columns};
    use crate::table::UploadedTable;

    #[test]
    fn template_round_trips_through_the_schema_resolver() {
        let bytes = build_upload_template().unwrap();
        let table = UploadedTable::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(table.row_count(), SAMPLE_ROWS.len());
        let columns = resolve_columns(table.headers(), &SynonymTable::default()).unwrap();
        assert_eq!(columns.column(CanonicalField::CompanyName), Some(0));
        assert_eq!(columns.column(CanonicalField::EventName), Some(1));
        assert_eq!(columns.column(CanonicalField::Total), Some(2));
        assert_eq!(columns.column(CanonicalField::Address), Some(3));
        assert_eq!(columns.column(CanonicalField::ExpectedAttendance), Some(4));
    }
}
