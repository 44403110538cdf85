//! Canonical event registry snapshot.
//!
//! The registry is owned by an external store; a batch run works against a
//! fully materialized, ordered, read-only snapshot taken at run start. The
//! snapshot is safe to share across concurrent runs because nothing here mutates
//! it.

use crate::error::PipelineError;
use crate::model::CanonicalEvent;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year regex is valid"));

#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: Vec<CanonicalEvent>,
}

impl EventRegistry {
    /// Build a snapshot, deriving missing years from each event's date text
    /// (falling back to the name).
    pub fn from_events(events: Vec<CanonicalEvent>) -> Self {
        let events = events
            .into_iter()
            .map(|mut event| {
                if event.year.is_none() {
                    event.year = derive_year(&event.date_text).or_else(|| derive_year(&event.name));
                }
                event
            })
            .collect();
        Self { events }
    }

    /// Load a snapshot file, YAML or JSON by extension.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let contents = fs::read_to_string(path)
            .map_err(|err| PipelineError::RegistryLoad(format!("{}: {err}", path.display())))?;
        let ext = path
            .extension()
            .and_then(|os| os.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let events: Vec<CanonicalEvent> = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|err| {
                PipelineError::RegistryLoad(format!("{}: {err}", path.display()))
            })?,
            "json" => serde_json::from_str(&contents).map_err(|err| {
                PipelineError::RegistryLoad(format!("{}: {err}", path.display()))
            })?,
            other => {
                return Err(PipelineError::RegistryLoad(format!(
                    "unsupported registry extension '{other}' (expected yaml or json)"
                )));
            }
        };

        Ok(Self::from_events(events))
    }

    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn derive_year(text: &str) -> Option<i32> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, date_text: &str) -> CanonicalEvent {
        CanonicalEvent {
            name: name.to_string(),
            date_text: date_text.to_string(),
            venue: "Hyatt Regency".to_string(),
            city_state: "Chicago, IL".to_string(),
            year: None,
        }
    }

    #[test]
    fn derives_year_from_date_text_then_name() {
        let registry = EventRegistry::from_events(vec![
            event("ASCO Direct Chicago", "June 13-14, 2025"),
            event("Liver Meeting Direct 2026", "TBA"),
            event("Undated Symposium", "TBA"),
        ]);

        assert_eq!(registry.events()[0].year, Some(2025));
        assert_eq!(registry.events()[1].year, Some(2026));
        assert_eq!(registry.events()[2].year, None);
    }

    #[test]
    fn snapshot_preserves_listed_order() {
        let registry = EventRegistry::from_events(vec![
            event("B Meeting", "2025"),
            event("A Meeting", "2025"),
        ]);
        let names: Vec<&str> = registry.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["B Meeting", "A Meeting"]);
    }

    #[test]
    fn yaml_snapshot_loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.yaml");
        fs::write(
            &path,
            "- name: Best of ASCO Seattle\n  date_text: July 11-12, 2025\n  venue: Sheraton Grand\n  city_state: Seattle, WA\n",
        )
        .unwrap();

        let registry = EventRegistry::from_file(&path).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.events()[0].name, "Best of ASCO Seattle");
        assert_eq!(registry.events()[0].year, Some(2025));
    }

    #[test]
    fn unsupported_extension_is_a_load_error() {
        let err = EventRegistry::from_file(Path::new("events.csv")).unwrap_err();
        assert!(err.to_string().contains("registry"));
    }
}
