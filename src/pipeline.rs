//! Pipeline entry point: extractor dispatch, segmentation, demo fixture.

use crate::docx::extract_docx_text;
use crate::file_utils::detect_kind;
use crate::pdf::extract_pdf_text;
use crate::schema::{EducationEntry, ExperienceEntry, ExtractError, ParsedResume, Profile};
use crate::segmenter::segment;

/// Parses an uploaded resume file into a structured record.
///
/// Detects the file kind, extracts flat text with the matching extractor,
/// then always runs the segmenter over whatever text came out. Extraction
/// failures propagate; the caller presents them and asks for a re-upload.
pub fn parse_resume_bytes(
    bytes: &[u8],
    filename: Option<&str>,
    mime_type: Option<&str>,
) -> Result<ParsedResume, ExtractError> {
    let kind = detect_kind(filename, mime_type, bytes);
    let text = match kind.as_str() {
        "pdf" => extract_pdf_text(bytes),
        "docx" => extract_docx_text(bytes)?,
        "txt" => String::from_utf8_lossy(bytes).into_owned(),
        other => return Err(ExtractError::UnsupportedFormat(other.to_string())),
    };
    Ok(segment(&text))
}

/// Returns the fixed demo record used for guest flows and UI previews.
///
/// Same content on every call, and always satisfies the segmentation
/// invariants (non-empty experience, education, and skills).
pub fn dummy_resume_data() -> ParsedResume {
    ParsedResume {
        profile: Profile {
            name: "Alex Morgan".to_string(),
            headline: "Senior Product Designer".to_string(),
            location: "San Francisco, CA".to_string(),
            email: "alex.morgan@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
        },
        experience: vec![
            ExperienceEntry {
                id: "1".to_string(),
                company: "TechFlow Inc.".to_string(),
                role: "Senior Product Designer".to_string(),
                start_date: "2021".to_string(),
                end_date: "Present".to_string(),
                highlights: vec![
                    "Led the redesign of the core product interface, improving user engagement by 40%"
                        .to_string(),
                    "Established a comprehensive design system used across 5 different product lines"
                        .to_string(),
                    "Mentored junior designers and conducted weekly design critiques".to_string(),
                ],
            },
            ExperienceEntry {
                id: "2".to_string(),
                company: "Creative Solutions".to_string(),
                role: "UX Designer".to_string(),
                start_date: "2018".to_string(),
                end_date: "2021".to_string(),
                highlights: vec![
                    "Collaborated with product managers to define user requirements and flows"
                        .to_string(),
                    "Conducted user research and usability testing to validate design decisions"
                        .to_string(),
                    "Designed mobile-first interfaces for e-commerce clients".to_string(),
                ],
            },
        ],
        education: vec![EducationEntry {
            id: "1".to_string(),
            school: "California College of the Arts".to_string(),
            degree: "Bachelor of Fine Arts in Interaction Design".to_string(),
            start_date: "2014".to_string(),
            end_date: "2018".to_string(),
        }],
        skills: vec![
            "Figma".to_string(),
            "Prototyping".to_string(),
            "User Research".to_string(),
            "Design Systems".to_string(),
            "HTML/CSS".to_string(),
            "Agile Methodology".to_string(),
            "Adobe Creative Suite".to_string(),
            "Wireframing".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_upload_is_segmented_directly() {
        let text = b"Jane Doe\nSenior Engineer\njane@example.com";
        let resume = parse_resume_bytes(text, Some("resume.txt"), Some("text/plain")).unwrap();
        assert_eq!(resume.profile.name, "Jane Doe");
        assert_eq!(resume.profile.email, "jane@example.com");
    }

    #[test]
    fn test_pdf_upload_parses_end_to_end() {
        let pdf = b"%PDF-1.4\nBT (Jane Doe) Tj (Senior Engineer) Tj (jane@example.com) Tj ET";
        let resume = parse_resume_bytes(pdf, Some("resume.pdf"), Some("application/pdf")).unwrap();
        assert_eq!(resume.profile.name, "Jane Doe");
        assert_eq!(resume.profile.headline, "Senior Engineer");
        assert_eq!(resume.profile.email, "jane@example.com");
        // Heuristic misses fall back to placeholders, never errors.
        assert!(!resume.experience.is_empty());
        assert!(!resume.education.is_empty());
        assert!(!resume.skills.is_empty());
    }

    #[test]
    fn test_docx_error_propagates() {
        let err = parse_resume_bytes(b"not a zip", Some("resume.docx"), None).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidArchive));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = parse_resume_bytes(&[0u8, 1, 2, 3], None, None).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert_eq!(
            err.to_string(),
            "Unsupported or unrecognized format: unknown"
        );
    }

    #[test]
    fn test_dummy_resume_is_stable_and_well_formed() {
        let first = dummy_resume_data();
        let second = dummy_resume_data();
        assert_eq!(first, second);

        assert!(!first.experience.is_empty());
        assert!(!first.education.is_empty());
        assert!(!first.skills.is_empty());
        for (index, entry) in first.experience.iter().enumerate() {
            assert_eq!(entry.id, (index + 1).to_string());
            assert!(!entry.highlights.is_empty());
        }
    }
}
