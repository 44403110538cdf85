use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// One entry in the canonical event registry.
///
/// Registry order is meaningful: the event matcher breaks score ties by
/// picking the first-listed candidate, so the venue/date that propagate into
/// a letter are deterministic for a fixed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub name: String,
    pub date_text: String,
    pub venue: String,
    pub city_state: String,
    /// Derived from `date_text` (or the name) when the snapshot omits it.
    #[serde(default)]
    pub year: Option<i32>,
}

/// The two letter kinds the pipeline produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DocumentType {
    #[serde(rename = "LOR")]
    Lor,
    #[serde(rename = "LOA")]
    Loa,
}

impl DocumentType {
    pub fn parse(value: &str) -> Result<Self, String> {
        Self::from_str(value.trim())
            .map_err(|_| format!("unknown document type '{value}' (expected LOR or LOA)"))
    }
}

/// One spreadsheet record after normalization.
///
/// Raw field text is kept verbatim; validation problems accumulate in
/// `errors` instead of aborting the row. A row with any entry in `errors`
/// never reaches document generation.
#[derive(Debug, Clone)]
pub struct IngestedRow {
    /// 1-based position as the user sees it in a spreadsheet editor
    /// (data index + header offset).
    pub row_number: u32,
    pub raw_company_name: String,
    pub raw_event_text: String,
    pub raw_total_text: String,
    pub address: Option<String>,
    pub expected_attendance: Option<String>,
    pub date_text: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub discount_text: Option<String>,
    /// Parsed from `raw_total_text`; `None` when the cell was blank or the
    /// text carried no usable amount (in which case `errors` says so).
    pub total_amount: Option<Decimal>,
    pub errors: Vec<String>,
    pub matched_event: Option<CanonicalEvent>,
}

impl IngestedRow {
    pub fn new(row_number: u32) -> Self {
        Self {
            row_number,
            raw_company_name: String::new(),
            raw_event_text: String::new(),
            raw_total_text: String::new(),
            address: None,
            expected_attendance: None,
            date_text: None,
            city: None,
            venue: None,
            discount_text: None,
            total_amount: None,
            errors: Vec::new(),
            matched_event: None,
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors joined for a report detail line.
    pub fn error_detail(&self) -> String {
        self.errors.join("; ")
    }
}

/// Fully merged, generation-ready record. Immutable once built; consumed by
/// the document-rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPayload {
    pub company_name: String,
    pub company_address: String,
    pub meeting_name: String,
    pub meeting_date_long: String,
    pub venue: String,
    pub city_state: String,
    pub event_year: Option<i32>,
    pub final_total: Decimal,
    /// The uploaded total text verbatim, for display in the letter body.
    pub amount_currency: String,
    pub document_type: DocumentType,
    /// "Name - Title" line, present for LOA only.
    pub signature_person: Option<String>,
    pub attendance_expected: Option<String>,
    pub audience_list: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Success,
    Error,
}

/// Per-row outcome record, in original table order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_number: u32,
    pub company_name: String,
    pub status: RowStatus,
    pub detail: String,
}

impl RowOutcome {
    pub fn is_success(&self) -> bool {
        self.status == RowStatus::Success
    }
}

/// Output aggregate of one batch run: the archive of generated documents
/// plus a full accounting of every row's fate.
#[derive(Debug)]
pub struct BatchResult {
    /// ZIP blob containing two uniquely named files per successful row.
    pub archive: Vec<u8>,
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<RowOutcome>,
}
