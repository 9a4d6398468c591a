//! Data structures and types for resume ingestion.
//!
//! This module defines the core types used throughout the library: the
//! structured record produced by segmentation and the error type shared by
//! the document extractors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while extracting text from an uploaded document.
///
/// Every variant originates in the container-parsing layer (dispatch, PDF,
/// DOCX) and is fatal to that single extraction call. Segmentation never
/// fails: garbled or empty text yields a minimally-populated record instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file format is not supported or could not be recognized.
    #[error("Unsupported or unrecognized format: {0}")]
    UnsupportedFormat(String),
    /// The byte buffer is not a well-formed ZIP archive.
    #[error("Invalid DOCX archive")]
    InvalidArchive,
    /// The central directory holds no `word/document.xml` entry.
    #[error("Could not find document.xml in DOCX")]
    MissingDocumentXml,
    /// The recorded local-header offset does not point at a local file header.
    #[error("Invalid DOCX local header")]
    InvalidLocalHeader,
    /// The document entry uses a compression method other than stored or deflate.
    #[error("Unsupported DOCX compression")]
    UnsupportedCompression,
    /// The deflate stream carrying the document body could not be inflated.
    #[error("DOCX decompression not supported in this browser")]
    DecompressionUnavailable,
}

/// Contact and identity fields recovered from the top of a resume.
///
/// Every field is best-effort free text. Nothing is validated against
/// real-world formats; a field the heuristics cannot fill is either the
/// empty string (`location`, `email`, `phone`) or a neutral fallback
/// (`name`, `headline`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub email: String,
    pub phone: String,
}

/// One work-experience block recovered from the experience section.
///
/// `id` is a 1-based sequential string assigned at construction and unique
/// within a single parse; the surrounding UI reassigns ids when it edits the
/// list. Dates are unparsed free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub highlights: Vec<String>,
}

/// One education block recovered from the education section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

/// The structured output of a resume parse.
///
/// Constructed fresh on every extraction; ownership transfers to the caller,
/// which may mutate it freely before persisting. The serialized field names
/// (camelCase dates included) are the de facto schema of the persistence
/// store's resume column, so renames here are breaking changes.
///
/// Invariants after segmentation:
/// - `experience` and `education` each hold at least one entry (a
///   placeholder is synthesized when the heuristics find none),
/// - `skills` is non-empty (placeholder skills otherwise),
/// - ids within each list are sequential from "1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub profile: Profile,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

impl ExperienceEntry {
    /// Sentinel entry used when the experience heuristics come up empty.
    pub fn placeholder() -> Self {
        Self {
            id: "1".to_string(),
            company: "Your Company".to_string(),
            role: "Role".to_string(),
            start_date: String::new(),
            end_date: String::new(),
            highlights: vec!["Summarize your achievements".to_string()],
        }
    }
}

impl EducationEntry {
    /// Sentinel entry used when the education heuristics come up empty.
    pub fn placeholder() -> Self {
        Self {
            id: "1".to_string(),
            school: "University or Certification".to_string(),
            degree: "Degree or Program".to_string(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

/// Sentinel skill list used when no skills were recognized.
pub fn placeholder_skills() -> Vec<String> {
    vec![
        "Collaboration".to_string(),
        "Problem solving".to_string(),
        "Leadership".to_string(),
    ]
}
