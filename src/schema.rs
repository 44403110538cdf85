//! Schema resolution for uploaded tables.
//!
//! Uploaders never agree on header spelling, so canonical fields are found
//! through a synonym table: canonical field -> accepted header variants,
//! matched case-insensitively on trimmed text. Resolution is pure; the one
//! fatal outcome is a structural error naming every missing required field.

use crate::error::PipelineError;
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    CompanyName,
    EventName,
    Total,
    ExpectedAttendance,
    DateText,
    City,
    Venue,
    Address,
    DiscountText,
}

impl CanonicalField {
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::CompanyName,
        CanonicalField::EventName,
        CanonicalField::Total,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::CompanyName => "companyName",
            CanonicalField::EventName => "eventName",
            CanonicalField::Total => "total",
            CanonicalField::ExpectedAttendance => "expectedAttendance",
            CanonicalField::DateText => "dateText",
            CanonicalField::City => "city",
            CanonicalField::Venue => "venue",
            CanonicalField::Address => "address",
            CanonicalField::DiscountText => "discountText",
        }
    }
}

/// Canonical field -> accepted header variants. Entry order doubles as field
/// priority when one header text could satisfy several fields ("location" is
/// a city variant before it is a venue variant).
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: IndexMap<CanonicalField, Vec<String>>,
}

impl SynonymTable {
    pub fn new(entries: IndexMap<CanonicalField, Vec<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(field, variants)| {
                let variants = variants
                    .into_iter()
                    .map(|v| v.trim().to_lowercase())
                    .collect();
                (field, variants)
            })
            .collect();
        Self { entries }
    }

    pub fn accepts(&self, field: CanonicalField, header: &str) -> bool {
        self.entries
            .get(&field)
            .map(|variants| variants.iter().any(|v| v == header))
            .unwrap_or(false)
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        let mut entries = IndexMap::new();
        entries.insert(
            CanonicalField::CompanyName,
            str_vec(&["exhibitor invite", "company", "company name", "exhibitor"]),
        );
        entries.insert(
            CanonicalField::EventName,
            str_vec(&["event name", "event", "meeting name", "meeting"]),
        );
        entries.insert(
            CanonicalField::Total,
            str_vec(&["total", "amount", "total amount", "price"]),
        );
        entries.insert(
            CanonicalField::ExpectedAttendance,
            str_vec(&["expected attendance", "attendance", "attendees"]),
        );
        entries.insert(
            CanonicalField::DateText,
            str_vec(&["date", "meeting date", "event date"]),
        );
        entries.insert(CanonicalField::City, str_vec(&["city", "location"]));
        entries.insert(CanonicalField::Venue, str_vec(&["venue", "location"]));
        entries.insert(
            CanonicalField::Address,
            str_vec(&["official address", "address", "company address"]),
        );
        entries.insert(CanonicalField::DiscountText, str_vec(&["discount"]));
        Self { entries }
    }
}

fn str_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Resolved mapping from canonical field to the column index it was found at.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: HashMap<CanonicalField, usize>,
}

impl ColumnMap {
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }
}

/// Map uploaded headers onto canonical fields.
///
/// Columns are scanned in table order; each header is consumed by the first
/// unmapped field that accepts it, so a field's match is always the earliest
/// qualifying column and no header serves two fields. Fails with a single
/// structural error when any required field remains unmapped.
pub fn resolve_columns(
    headers: &[String],
    synonyms: &SynonymTable,
) -> Result<ColumnMap, PipelineError> {
    let mut columns: HashMap<CanonicalField, usize> = HashMap::new();

    for (index, header) in headers.iter().enumerate() {
        let normalized = header.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        for field in synonyms.fields() {
            if columns.contains_key(&field) {
                continue;
            }
            if synonyms.accepts(field, &normalized) {
                columns.insert(field, index);
                break;
            }
        }
    }

    let missing: Vec<String> = CanonicalField::REQUIRED
        .iter()
        .copied()
        .filter(|field| !columns.contains_key(field))
        .map(|field| field.label().to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    Ok(ColumnMap { columns })
}
