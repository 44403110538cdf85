//! Payload resolution: one clean, matched row -> one generation-ready
//! record.
//!
//! Everything ambient the original pulled from global settings (signatory
//! roster, audience list) arrives here as explicit configuration. The row's
//! declared total is authoritative in bulk mode; nothing is repriced.

use crate::model::{DocumentType, IngestedRow, ResolvedPayload};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub name: String,
    pub title: String,
}

impl Signatory {
    /// "Name - Title" signature line as it appears in a letter.
    pub fn signature_line(&self) -> String {
        format!("{} - {}", self.name, self.title)
    }
}

/// Fixed roster of authorized signers, keyed by a short configuration key.
/// Unknown keys fall back to the designated default signer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatoryRoster {
    signers: IndexMap<String, Signatory>,
    default_key: String,
}

impl SignatoryRoster {
    pub fn new(signers: IndexMap<String, Signatory>, default_key: impl Into<String>) -> Self {
        Self {
            signers,
            default_key: default_key.into(),
        }
    }

    pub fn select(&self, key: &str) -> Option<&Signatory> {
        self.signers
            .get(key)
            .or_else(|| self.signers.get(&self.default_key))
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }
}

impl Default for SignatoryRoster {
    fn default() -> Self {
        let mut signers = IndexMap::new();
        signers.insert(
            "director".to_string(),
            Signatory {
                name: "Authorized Representative".to_string(),
                title: "Director of Events".to_string(),
            },
        );
        Self::new(signers, "director")
    }
}

/// Run-level defaults merged into every payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverDefaults {
    pub audience: Vec<String>,
}

impl Default for ResolverDefaults {
    fn default() -> Self {
        Self {
            audience: vec![
                "Physicians".to_string(),
                "Nurses".to_string(),
                "Pharmacists".to_string(),
                "Industry Representatives".to_string(),
            ],
        }
    }
}

/// Row-local resolution failures; recorded on the row, never raised past it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Letter of Agreement requires a company address")]
    MissingAddress,
    #[error("row has no matched event")]
    UnmatchedEvent,
    #[error("row has no parsed total")]
    MissingTotal,
    #[error("signatory roster is empty")]
    EmptyRoster,
}

/// Merge a clean row, its matched event, and the run configuration into a
/// `ResolvedPayload`. Address is mandatory only for LOA, which is why the
/// check lives here and not in normalization.
pub fn resolve_payload(
    row: &IngestedRow,
    document_type: DocumentType,
    signatory_key: &str,
    roster: &SignatoryRoster,
    defaults: &ResolverDefaults,
) -> Result<ResolvedPayload, ResolutionError> {
    let event = row
        .matched_event
        .as_ref()
        .ok_or(ResolutionError::UnmatchedEvent)?;
    let final_total = row.total_amount.ok_or(ResolutionError::MissingTotal)?;

    let company_address = row.address.clone().unwrap_or_default();
    if document_type == DocumentType::Loa && company_address.trim().is_empty() {
        return Err(ResolutionError::MissingAddress);
    }

    let signature_person = if document_type == DocumentType::Loa {
        let signer = roster
            .select(signatory_key)
            .ok_or(ResolutionError::EmptyRoster)?;
        Some(signer.signature_line())
    } else {
        None
    };

    Ok(ResolvedPayload {
        company_name: row.raw_company_name.clone(),
        company_address,
        meeting_name: event.name.clone(),
        meeting_date_long: event.date_text.clone(),
        venue: event.venue.clone(),
        city_state: event.city_state.clone(),
        event_year: event.year,
        final_total,
        amount_currency: row.raw_total_text.clone(),
        document_type,
        signature_person,
        attendance_expected: row.expected_attendance.clone(),
        audience_list: defaults.audience.clone(),
    })
}
