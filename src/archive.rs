//! In-memory ZIP assembly for generated documents.
//!
//! The archive is a single ordered sink: entries append in row order and the
//! whole blob is finalized once at the end of a batch. Entry names are
//! sanitized and bounded, and collisions after sanitization are
//! disambiguated with the source row number so no entry ever overwrites
//! another.

use crate::error::PipelineError;
use crate::model::DocumentType;
use crate::render::RenderedDocuments;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const COMPANY_SLUG_MAX: usize = 50;
const EVENT_SLUG_MAX: usize = 30;

/// Replace spaces and path-separator characters, drop control characters,
/// and bound the segment length.
pub fn sanitize_component(raw: &str, max_len: usize) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .take(max_len)
        .collect()
}

/// Base entry name (no extension) for one successful row.
pub fn entry_base_name(document_type: DocumentType, company: &str, event: &str) -> String {
    format!(
        "{}_{}_{}",
        document_type,
        sanitize_component(company, COMPANY_SLUG_MAX),
        sanitize_component(event, EVENT_SLUG_MAX),
    )
}

pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    used_names: HashSet<String>,
    entry_count: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            used_names: HashSet::new(),
            entry_count: 0,
        }
    }

    /// Append both documents for one row. Returns the final (possibly
    /// disambiguated) base name used inside the archive.
    pub fn add_documents(
        &mut self,
        base_name: &str,
        row_number: u32,
        extensions: (&str, &str),
        documents: &RenderedDocuments,
    ) -> Result<String, PipelineError> {
        let unique_base = if self.used_names.contains(base_name) {
            format!("{base_name}_row{row_number}")
        } else {
            base_name.to_string()
        };
        self.used_names.insert(unique_base.clone());

        let (editable_ext, fixed_ext) = extensions;
        self.append_entry(&format!("{unique_base}.{editable_ext}"), &documents.editable)?;
        self.append_entry(&format!("{unique_base}.{fixed_ext}"), &documents.fixed)?;
        Ok(unique_base)
    }

    fn append_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), PipelineError> {
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .map_err(|err| PipelineError::Archive(format!("{name}: {err}")))?;
        self.writer
            .write_all(bytes)
            .map_err(|err| PipelineError::Archive(format!("{name}: {err}")))?;
        self.entry_count += 1;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn finish(mut self) -> Result<Vec<u8>, PipelineError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|err| PipelineError::Archive(err.to_string()))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn documents() -> RenderedDocuments {
        RenderedDocuments {
            editable: b"editable".to_vec(),
            fixed: b"fixed".to_vec(),
        }
    }

    #[test]
    fn sanitization_replaces_separators_and_bounds_length() {
        assert_eq!(sanitize_component("Acme / Sons Inc", 50), "Acme___Sons_Inc");
        assert_eq!(sanitize_component("a".repeat(80).as_str(), 50).len(), 50);
        assert_eq!(sanitize_component("  Tabs\tand\nnewlines  ", 50), "Tabsandnewlines");
    }

    #[test]
    fn entry_names_follow_the_documented_pattern() {
        let base = entry_base_name(
            DocumentType::Lor,
            "Sample Company Inc.",
            "ASCO Direct from Chicago 2025",
        );
        assert_eq!(base, "LOR_Sample_Company_Inc._ASCO_Direct_from_Chicago_2025");
    }

    #[test]
    fn colliding_names_get_row_number_suffixes() {
        let mut builder = ArchiveBuilder::new();
        let first = builder
            .add_documents("LOR_Acme_Event", 2, ("docx", "pdf"), &documents())
            .unwrap();
        let second = builder
            .add_documents("LOR_Acme_Event", 7, ("docx", "pdf"), &documents())
            .unwrap();

        assert_eq!(first, "LOR_Acme_Event");
        assert_eq!(second, "LOR_Acme_Event_row7");
        assert_eq!(builder.entry_count(), 4);

        let bytes = builder.finish().unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"LOR_Acme_Event.docx"));
        assert!(names.contains(&"LOR_Acme_Event_row7.pdf"));
    }
}
