//! Row normalization: one raw record -> one validated `IngestedRow`.
//!
//! Required fields that are blank append a human-readable error but never
//! stop extraction; every applicable error for a row is collected before the
//! row is closed. Optional fields are simply absent when blank.

use crate::model::IngestedRow;
use crate::money;
use crate::schema::{CanonicalField, ColumnMap};
use crate::table::{CellValue, UploadedTable};

/// Uploaded data row 1 lives on spreadsheet line 2; error messages must
/// address the line the user sees in their editor.
pub const HEADER_ROW_OFFSET: u32 = 2;

pub fn normalize_table(table: &UploadedTable, columns: &ColumnMap) -> Vec<IngestedRow> {
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, cells)| normalize_row(cells, columns, index as u32 + HEADER_ROW_OFFSET))
        .collect()
}

pub fn normalize_row(cells: &[CellValue], columns: &ColumnMap, row_number: u32) -> IngestedRow {
    let field_text = |field: CanonicalField| -> Option<String> {
        columns
            .column(field)
            .and_then(|index| cells.get(index))
            .and_then(CellValue::as_text)
    };

    let mut row = IngestedRow::new(row_number);

    row.raw_company_name = field_text(CanonicalField::CompanyName).unwrap_or_default();
    row.raw_event_text = field_text(CanonicalField::EventName).unwrap_or_default();
    row.raw_total_text = field_text(CanonicalField::Total).unwrap_or_default();
    row.address = field_text(CanonicalField::Address);
    row.expected_attendance = field_text(CanonicalField::ExpectedAttendance);
    row.date_text = field_text(CanonicalField::DateText);
    row.city = field_text(CanonicalField::City);
    row.venue = field_text(CanonicalField::Venue);
    row.discount_text = field_text(CanonicalField::DiscountText);

    if row.raw_company_name.is_empty() {
        row.add_error("Missing company name");
    }
    if row.raw_event_text.is_empty() {
        row.add_error("Missing event name");
    }
    if row.raw_total_text.is_empty() {
        row.add_error("Missing or invalid total");
    } else {
        match money::parse_amount(&row.raw_total_text) {
            Ok(amount) => row.total_amount = Some(amount),
            Err(err) => row.add_error(format!("Invalid total: {err}")),
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SynonymTable, resolve_columns};

    fn columns_for(headers: &[&str]) -> ColumnMap {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        resolve_columns(&headers, &SynonymTable::default()).unwrap()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn valid_row_extracts_all_fields() {
        let columns = columns_for(&[
            "Company",
            "Event Name",
            "Total",
            "Official Address",
            "Expected Attendance",
        ]);
        let row = normalize_row(
            &[
                text("Medical Devices LLC"),
                text("Best of ASCO Seattle 2025"),
                text("$5,000.00"),
                text("789 Medical Plaza, Boston, MA 02101"),
                CellValue::Number(250.0),
            ],
            &columns,
            2,
        );

        assert!(!row.has_errors());
        assert_eq!(row.raw_company_name, "Medical Devices LLC");
        assert_eq!(row.raw_total_text, "$5,000.00");
        assert_eq!(row.total_amount.unwrap(), "5000.00".parse().unwrap());
        assert_eq!(row.expected_attendance.as_deref(), Some("250"));
        assert_eq!(row.discount_text, None);
    }

    #[test]
    fn blank_required_fields_collect_every_error() {
        let columns = columns_for(&["Company", "Event", "Total"]);
        let row = normalize_row(
            &[CellValue::Empty, text("   "), CellValue::Empty],
            &columns,
            5,
        );

        assert_eq!(row.row_number, 5);
        assert_eq!(
            row.errors,
            vec![
                "Missing company name",
                "Missing event name",
                "Missing or invalid total",
            ]
        );
    }

    #[test]
    fn malformed_total_fails_the_row_not_the_batch() {
        let columns = columns_for(&["Company", "Event", "Total"]);
        let row = normalize_row(&[text("Acme"), text("ASCO Direct"), text("TBD")], &columns, 3);

        assert_eq!(row.total_amount, None);
        assert_eq!(row.errors, vec!["Invalid total: no numeric amount in 'TBD'"]);
    }

    #[test]
    fn zero_total_is_invalid() {
        let columns = columns_for(&["Company", "Event", "Total"]);
        let row = normalize_row(&[text("Acme"), text("ASCO Direct"), text("0")], &columns, 3);
        assert!(row.has_errors());
        assert_eq!(row.total_amount, None);
    }

    #[test]
    fn row_numbers_offset_for_header_line() {
        let table = UploadedTable::from_rows(
            ["Company", "Event", "Total"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            vec![
                vec![text("A"), text("E"), text("100")],
                vec![text("B"), text("E"), text("200")],
            ],
        );
        let columns = columns_for(&["Company", "Event", "Total"]);
        let rows = normalize_table(&table, &columns);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 3);
    }
}
