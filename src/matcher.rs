//! Free-text event matching against the registry snapshot.
//!
//! Scoring sits behind the narrow `SimilarityScorer` seam so the algorithm
//! and acceptance threshold can be tuned without touching the matching
//! control flow. Matching reads only event names; date/venue/city on the row
//! are advisory and never scored.

use crate::model::{CanonicalEvent, IngestedRow};
use crate::registry::EventRegistry;
use std::collections::HashSet;

/// Default acceptance threshold. Exposed as an explicit tunable via
/// `EventMatcher::with_threshold` and the CLI.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Text similarity in `[0.0, 1.0]`. Implementations must be deterministic:
/// matching directly decides which venue and date land in a legal document.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, text: &str, candidate: &str) -> f64;
}

/// Default scorer: case-insensitive, whitespace-collapsed comparison.
/// Exact normalized equality scores 1.0; otherwise the better of
/// Jaro-Winkler similarity and token-overlap (Dice) carries the score, so
/// both near-spellings and reordered/partial names rank well.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameScorer;

impl SimilarityScorer for NameScorer {
    fn score(&self, text: &str, candidate: &str) -> f64 {
        let a = normalize(text);
        let b = normalize(candidate);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }

        let jaro = strsim::jaro_winkler(&a, &b);

        let tokens_a: HashSet<&str> = a.split(' ').collect();
        let tokens_b: HashSet<&str> = b.split(' ').collect();
        let overlap = tokens_a.intersection(&tokens_b).count() as f64;
        let dice = 2.0 * overlap / (tokens_a.len() + tokens_b.len()) as f64;

        jaro.max(dice)
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct EventMatcher {
    scorer: Box<dyn SimilarityScorer>,
    threshold: f64,
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self {
            scorer: Box::new(NameScorer),
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl EventMatcher {
    pub fn new(scorer: Box<dyn SimilarityScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Highest-scoring candidate with its score. Ties break to the
    /// first-listed registry entry: the scan keeps a candidate only on a
    /// strictly greater score.
    pub fn best_match<'a>(
        &self,
        text: &str,
        registry: &'a EventRegistry,
    ) -> Option<(&'a CanonicalEvent, f64)> {
        let mut best: Option<(&CanonicalEvent, f64)> = None;
        for event in registry.events() {
            let score = self.scorer.score(text, &event.name);
            match best {
                Some((_, current)) if score <= current => {}
                _ => best = Some((event, score)),
            }
        }
        best
    }

    /// Resolve one row's event text, setting `matched_event` or appending a
    /// matching error.
    pub fn match_row(&self, row: &mut IngestedRow, registry: &EventRegistry) {
        if row.raw_event_text.is_empty() {
            row.add_error("No event name provided");
            return;
        }

        match self.best_match(&row.raw_event_text, registry) {
            Some((event, score)) if score >= self.threshold => {
                tracing::debug!(
                    row = row.row_number,
                    event = %event.name,
                    score,
                    "matched event"
                );
                row.matched_event = Some(event.clone());
            }
            _ => {
                row.add_error(format!("Could not match event: {}", row.raw_event_text));
            }
        }
    }

    pub fn match_rows(&self, rows: &mut [IngestedRow], registry: &EventRegistry) {
        for row in rows.iter_mut() {
            self.match_row(row, registry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> EventRegistry {
        EventRegistry::from_events(
            names
                .iter()
                .map(|name| CanonicalEvent {
                    name: name.to_string(),
                    date_text: "June 2025".to_string(),
                    venue: "Venue".to_string(),
                    city_state: "City, ST".to_string(),
                    year: None,
                })
                .collect(),
        )
    }

    #[test]
    fn exact_name_always_wins_over_near_duplicates() {
        let registry = registry(&[
            "Best of ASCO Seattle 2025",
            "Best of ASCO",
            "Best of ASCO Chicago 2025",
        ]);
        let matcher = EventMatcher::default();
        let (event, score) = matcher.best_match("Best of ASCO", &registry).unwrap();
        assert_eq!(event.name, "Best of ASCO");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        let registry = registry(&["ASCO Direct from Chicago 2025"]);
        let matcher = EventMatcher::default();
        let (_, score) = matcher
            .best_match("  asco   DIRECT from chicago 2025 ", &registry)
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn ties_break_to_first_listed_candidate() {
        let registry = registry(&["Liver Meeting East", "Liver Meeting West"]);
        let matcher = EventMatcher::default();
        // Equidistant from both names; the first-listed entry must win.
        let (event, _) = matcher.best_match("Liver Meeting", &registry).unwrap();
        assert_eq!(event.name, "Liver Meeting East");
    }

    #[test]
    fn matching_is_deterministic_across_calls() {
        let registry = registry(&["ASCO Direct Chicago", "Best of ASCO Seattle"]);
        let matcher = EventMatcher::default();
        let first = matcher.best_match("asco chicago", &registry).map(|(e, s)| (e.name.clone(), s));
        for _ in 0..10 {
            let again = matcher.best_match("asco chicago", &registry).map(|(e, s)| (e.name.clone(), s));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn below_threshold_rows_get_a_matching_error() {
        let registry = registry(&["ASCO Direct Chicago"]);
        let matcher = EventMatcher::default();
        let mut row = IngestedRow::new(4);
        row.raw_event_text = "Knitting Retreat".to_string();
        matcher.match_row(&mut row, &registry);

        assert!(row.matched_event.is_none());
        assert_eq!(
            row.errors,
            vec!["Could not match event: Knitting Retreat"]
        );
    }

    #[test]
    fn empty_event_text_is_an_error_not_a_scan() {
        let registry = registry(&["ASCO Direct Chicago"]);
        let matcher = EventMatcher::default();
        let mut row = IngestedRow::new(3);
        matcher.match_row(&mut row, &registry);
        assert_eq!(row.errors, vec!["No event name provided"]);
    }

    #[test]
    fn threshold_is_tunable() {
        let registry = registry(&["ASCO Direct Chicago"]);
        let strict = EventMatcher::default().with_threshold(0.99);
        let mut row = IngestedRow::new(2);
        row.raw_event_text = "ASCO Chicago".to_string();
        strict.match_row(&mut row, &registry);
        assert!(row.matched_event.is_none());

        let lenient = EventMatcher::default().with_threshold(0.5);
        let mut row = IngestedRow::new(2);
        row.raw_event_text = "ASCO Chicago".to_string();
        lenient.match_row(&mut row, &registry);
        assert!(row.matched_event.is_some());
    }
}
