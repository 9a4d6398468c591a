/// Detects the file kind from declared MIME type, filename extension, or
/// magic bytes.
///
/// The upload UI restricts declared types, but the declaration travels with
/// the file and may be absent (or lie), so detection tries the declared MIME
/// type first, then the filename extension, then the file's magic bytes.
///
/// # Arguments
///
/// * `filename` - Optional filename to check for extension-based detection
/// * `mime_type` - Optional declared media type from the uploader
/// * `bytes` - The file contents as a byte slice for magic byte detection
///
/// # Returns
///
/// A string representing the detected file kind:
/// - `"pdf"` - PDF documents (application/pdf, .pdf extension, or %PDF magic)
/// - `"docx"` - Word documents (OOXML or legacy MIME, .docx/.doc extension,
///   or PK zip signature)
/// - `"txt"` - Plain text (text/plain, .txt extension, or printable ASCII
///   content)
/// - `"unknown"` - Unable to determine file kind
///
/// # Detection Strategy
///
/// 1. Declared MIME type (exact match)
/// 2. Filename extension check (case-insensitive)
/// 3. Magic bytes check for PDF (%PDF header)
/// 4. Magic bytes check for ZIP-based formats (PK signature, assumed docx)
/// 5. Text detection based on printable ASCII characters
pub fn detect_kind(filename: Option<&str>, mime_type: Option<&str>, bytes: &[u8]) -> String {
    const PDF_MIME: &str = "application/pdf";
    const DOCX_MIME: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
    const LEGACY_DOC_MIME: &str = "application/msword";

    if let Some(mime) = mime_type {
        match mime {
            PDF_MIME => return "pdf".into(),
            DOCX_MIME | LEGACY_DOC_MIME => return "docx".into(),
            "text/plain" => return "txt".into(),
            _ => {}
        }
    }

    if let Some(name) = filename {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            return "pdf".into();
        }
        if lower.ends_with(".docx") || lower.ends_with(".doc") {
            return "docx".into();
        }
        if lower.ends_with(".txt") {
            return "txt".into();
        }
    }

    // fallback: magic
    if bytes.len() >= 4 && &bytes[0..4] == b"%PDF" {
        return "pdf".into();
    }
    // docx is a zip with PK
    if bytes.len() >= 2 && &bytes[0..2] == b"PK" {
        // assume docx (could be other zip types)
        return "docx".into();
    }
    // crude text detection: printable
    if !bytes.is_empty()
        && bytes
            .iter()
            .all(|b| *b == 9 || *b == 10 || *b == 13 || (32..=127).contains(b))
    {
        return "txt".into();
    }
    "unknown".into()
}
