//! DOCX (OOXML) text extraction.
//!
//! A `.docx` file is a ZIP archive whose body text lives in the
//! `word/document.xml` entry. Only that one entry is needed, so instead of
//! a full archive library this module walks the ZIP structure by hand:
//! backward scan for the End-Of-Central-Directory record, a pass over the
//! central directory to find the entry, then the local file header and the
//! entry body (stored or deflated). The recovered XML is flattened to plain
//! text with paragraph and line-break tags mapped to newlines.
//!
//! Not an OOXML document model: styles, tables, headers, and embedded
//! objects are ignored; only raw paragraph/break text survives.

use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

use crate::inflate::{InflateFormat, inflate};
use crate::schema::ExtractError;

const EOCD_SIG: u32 = 0x0605_4b50;
const CENTRAL_SIG: u32 = 0x0201_4b50;
const LOCAL_SIG: u32 = 0x0403_4b50;

/// Minimum size of the End-Of-Central-Directory record.
const EOCD_LEN: usize = 22;

const DOCUMENT_ENTRY: &[u8] = b"word/document.xml";

/// Whitespace runs that contain no newline collapse to a single space.
static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\n]+").expect("Invalid whitespace regex"));

/// Any whitespace run containing a newline folds to a bare newline.
static NEWLINE_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\n\s*").expect("Invalid newline regex"));

/// Central-directory facts needed to read one entry's body.
struct DocumentEntry {
    compression: u16,
    compressed_size: u32,
    local_header_offset: u32,
}

/// Extracts the document body text from a DOCX byte buffer.
///
/// Fails with an [`ExtractError`] when the buffer is not a well-formed ZIP
/// archive, when `word/document.xml` is absent, or when the entry cannot be
/// decompressed; it never returns partial text for a malformed container.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let eocd = find_eocd(bytes).ok_or(ExtractError::InvalidArchive)?;
    let cd_offset = read_u32_le(bytes, eocd + 16).ok_or(ExtractError::InvalidArchive)? as usize;
    let total_entries = read_u16_le(bytes, eocd + 10).ok_or(ExtractError::InvalidArchive)?;

    let entry = find_document_entry(bytes, cd_offset, total_entries)?
        .ok_or(ExtractError::MissingDocumentXml)?;
    let xml = read_entry_body(bytes, &entry)?;
    Ok(xml_to_text(&xml))
}

/// Scans backward from the end of the buffer for the EOCD signature.
///
/// A plain linear scan is enough in practice; archives produced by word
/// processors carry no trailing comment of consequence.
fn find_eocd(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < EOCD_LEN {
        return None;
    }
    (0..=bytes.len() - EOCD_LEN)
        .rev()
        .find(|&i| read_u32_le(bytes, i) == Some(EOCD_SIG))
}

/// Walks central-directory entries until `word/document.xml` turns up.
///
/// An entry without the central signature ends the walk (the directory is
/// exhausted or lying); a directory whose offsets point outside the buffer
/// is an invalid archive.
fn find_document_entry(
    bytes: &[u8],
    cd_offset: usize,
    total_entries: u16,
) -> Result<Option<DocumentEntry>, ExtractError> {
    let mut cursor = cd_offset;
    for _ in 0..total_entries {
        if read_u32_le(bytes, cursor) != Some(CENTRAL_SIG) {
            break;
        }
        let compression = read_u16_le(bytes, cursor + 10).ok_or(ExtractError::InvalidArchive)?;
        let compressed_size =
            read_u32_le(bytes, cursor + 20).ok_or(ExtractError::InvalidArchive)?;
        let name_len =
            read_u16_le(bytes, cursor + 28).ok_or(ExtractError::InvalidArchive)? as usize;
        let extra_len =
            read_u16_le(bytes, cursor + 30).ok_or(ExtractError::InvalidArchive)? as usize;
        let comment_len =
            read_u16_le(bytes, cursor + 32).ok_or(ExtractError::InvalidArchive)? as usize;
        let local_header_offset =
            read_u32_le(bytes, cursor + 42).ok_or(ExtractError::InvalidArchive)?;

        let name_start = cursor + 46;
        let name_end = name_start + name_len;
        let name = bytes
            .get(name_start..name_end)
            .ok_or(ExtractError::InvalidArchive)?;

        if name == DOCUMENT_ENTRY {
            return Ok(Some(DocumentEntry {
                compression,
                compressed_size,
                local_header_offset,
            }));
        }

        cursor = name_end + extra_len + comment_len;
    }
    Ok(None)
}

/// Reads and decodes the entry body behind its local file header.
fn read_entry_body(bytes: &[u8], entry: &DocumentEntry) -> Result<String, ExtractError> {
    let offset = entry.local_header_offset as usize;
    if read_u32_le(bytes, offset) != Some(LOCAL_SIG) {
        return Err(ExtractError::InvalidLocalHeader);
    }
    let name_len = read_u16_le(bytes, offset + 26).ok_or(ExtractError::InvalidLocalHeader)? as usize;
    let extra_len = read_u16_le(bytes, offset + 28).ok_or(ExtractError::InvalidLocalHeader)? as usize;

    let data_start = offset + 30 + name_len + extra_len;
    // Checked: a directory can claim sizes that overflow 32-bit usize on wasm.
    let data_end = data_start
        .checked_add(entry.compressed_size as usize)
        .ok_or(ExtractError::InvalidArchive)?;
    let data = bytes
        .get(data_start..data_end)
        .ok_or(ExtractError::InvalidArchive)?;

    match entry.compression {
        // Stored: the XML sits in the archive verbatim.
        0 => Ok(String::from_utf8_lossy(data).into_owned()),
        // Deflated: ZIP bodies are raw deflate, no zlib wrapper.
        8 => {
            let inflated =
                inflate(data, InflateFormat::Raw).ok_or(ExtractError::DecompressionUnavailable)?;
            Ok(String::from_utf8_lossy(&inflated).into_owned())
        }
        _ => Err(ExtractError::UnsupportedCompression),
    }
}

/// Flattens WordprocessingML to plain text.
///
/// Paragraph opens (`<w:p>`) and explicit line breaks (`<w:br/>`) become
/// newlines; text nodes are kept; every other tag boundary becomes a single
/// space so adjacent runs do not fuse. Malformed XML ends the walk with
/// whatever text was recovered up to that point.
fn xml_to_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:br" => out.push('\n'),
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    out.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => out.push(' '),
            Err(_) => break,
        }
    }

    normalize_whitespace(&out)
}

fn normalize_whitespace(text: &str) -> String {
    let collapsed = HORIZONTAL_WS.replace_all(text, " ");
    let folded = NEWLINE_WS.replace_all(&collapsed, "\n");
    folded.trim().to_string()
}

fn read_u16_le(bytes: &[u8], offset: usize) -> Option<u16> {
    let slice = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([slice[0], slice[1]]))
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::DeflateEncoder;
    use std::io::Write;

    fn push_u16(out: &mut Vec<u8>, value: u16) {
        out.extend_from_slice(&value.to_le_bytes());
    }

    fn push_u32(out: &mut Vec<u8>, value: u32) {
        out.extend_from_slice(&value.to_le_bytes());
    }

    /// Builds a minimal single-disk ZIP archive from (name, body, method)
    /// triples. Bodies are taken as already matching the stated method.
    fn build_zip(entries: &[(&str, &[u8], u16)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut locals = Vec::new();

        for (name, body, method) in entries {
            locals.push(out.len() as u32);
            push_u32(&mut out, 0x0403_4b50);
            push_u16(&mut out, 20); // version needed
            push_u16(&mut out, 0); // flags
            push_u16(&mut out, *method);
            push_u16(&mut out, 0); // mod time
            push_u16(&mut out, 0); // mod date
            push_u32(&mut out, 0); // crc (never verified here)
            push_u32(&mut out, body.len() as u32);
            push_u32(&mut out, body.len() as u32);
            push_u16(&mut out, name.len() as u16);
            push_u16(&mut out, 0); // extra
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(body);
        }

        let cd_offset = out.len() as u32;
        for ((name, body, method), local_offset) in entries.iter().zip(&locals) {
            push_u32(&mut out, 0x0201_4b50);
            push_u16(&mut out, 20); // version made by
            push_u16(&mut out, 20); // version needed
            push_u16(&mut out, 0); // flags
            push_u16(&mut out, *method);
            push_u16(&mut out, 0); // mod time
            push_u16(&mut out, 0); // mod date
            push_u32(&mut out, 0); // crc
            push_u32(&mut out, body.len() as u32);
            push_u32(&mut out, body.len() as u32);
            push_u16(&mut out, name.len() as u16);
            push_u16(&mut out, 0); // extra
            push_u16(&mut out, 0); // comment
            push_u16(&mut out, 0); // disk start
            push_u16(&mut out, 0); // internal attrs
            push_u32(&mut out, 0); // external attrs
            push_u32(&mut out, *local_offset);
            out.extend_from_slice(name.as_bytes());
        }
        let cd_size = out.len() as u32 - cd_offset;

        push_u32(&mut out, 0x0605_4b50);
        push_u16(&mut out, 0); // disk number
        push_u16(&mut out, 0); // cd disk
        push_u16(&mut out, entries.len() as u16);
        push_u16(&mut out, entries.len() as u16);
        push_u32(&mut out, cd_size);
        push_u32(&mut out, cd_offset);
        push_u16(&mut out, 0); // comment length
        out
    }

    fn deflate_raw(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    const SAMPLE_XML: &str = "<?xml version=\"1.0\"?>\
        <w:document><w:body>\
        <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>\
        <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>\
        </w:body></w:document>";

    #[test]
    fn test_stored_entry_round_trips_paragraphs() {
        let zip = build_zip(&[("word/document.xml", SAMPLE_XML.as_bytes(), 0)]);
        let text = extract_docx_text(&zip).unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn test_deflated_entry_round_trips_paragraphs() {
        let body = deflate_raw(SAMPLE_XML.as_bytes());
        let zip = build_zip(&[("word/document.xml", &body, 8)]);
        let text = extract_docx_text(&zip).unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn test_entry_found_after_other_entries() {
        let zip = build_zip(&[
            ("[Content_Types].xml", b"<Types/>", 0),
            ("word/styles.xml", b"<w:styles/>", 0),
            ("word/document.xml", SAMPLE_XML.as_bytes(), 0),
        ]);
        let text = extract_docx_text(&zip).unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn test_empty_buffer_is_invalid_archive() {
        assert!(matches!(
            extract_docx_text(b""),
            Err(ExtractError::InvalidArchive)
        ));
    }

    #[test]
    fn test_random_bytes_are_invalid_archive() {
        let junk: Vec<u8> = (0u16..512).map(|i| (i * 7 % 251) as u8).collect();
        assert!(matches!(
            extract_docx_text(&junk),
            Err(ExtractError::InvalidArchive)
        ));
    }

    #[test]
    fn test_truncated_eocd_is_invalid_archive() {
        let zip = build_zip(&[("word/document.xml", SAMPLE_XML.as_bytes(), 0)]);
        let truncated = &zip[..zip.len() - 8];
        assert!(matches!(
            extract_docx_text(truncated),
            Err(ExtractError::InvalidArchive)
        ));
    }

    #[test]
    fn test_missing_document_entry() {
        let zip = build_zip(&[("word/styles.xml", b"<w:styles/>", 0)]);
        assert!(matches!(
            extract_docx_text(&zip),
            Err(ExtractError::MissingDocumentXml)
        ));
    }

    #[test]
    fn test_bad_local_header_offset() {
        let mut zip = build_zip(&[("word/document.xml", SAMPLE_XML.as_bytes(), 0)]);
        // Corrupt the local signature in place; the central directory still
        // points at it.
        zip[0] = 0xff;
        assert!(matches!(
            extract_docx_text(&zip),
            Err(ExtractError::InvalidLocalHeader)
        ));
    }

    #[test]
    fn test_unsupported_compression_method() {
        let zip = build_zip(&[("word/document.xml", b"irrelevant", 99)]);
        let err = extract_docx_text(&zip).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedCompression));
        assert_eq!(err.to_string(), "Unsupported DOCX compression");
    }

    #[test]
    fn test_corrupt_deflate_body_is_fatal() {
        let zip = build_zip(&[("word/document.xml", b"\x00\x01garbage\xff", 8)]);
        assert!(matches!(
            extract_docx_text(&zip),
            Err(ExtractError::DecompressionUnavailable)
        ));
    }

    #[test]
    fn test_line_break_tag_maps_to_newline() {
        let xml = "<w:document><w:body><w:p><w:r>\
            <w:t>line one</w:t><w:br/><w:t>line two</w:t>\
            </w:r></w:p></w:body></w:document>";
        let zip = build_zip(&[("word/document.xml", xml.as_bytes(), 0)]);
        let text = extract_docx_text(&zip).unwrap();
        assert_eq!(text, "line one\nline two");
    }

    #[test]
    fn test_adjacent_runs_do_not_fuse() {
        let xml = "<w:document><w:body><w:p>\
            <w:r><w:t>Jane</w:t></w:r><w:r><w:t>Doe</w:t></w:r>\
            </w:p></w:body></w:document>";
        let zip = build_zip(&[("word/document.xml", xml.as_bytes(), 0)]);
        let text = extract_docx_text(&zip).unwrap();
        assert_eq!(text, "Jane Doe");
    }

    #[test]
    fn test_entities_are_decoded() {
        let xml = "<w:document><w:body><w:p><w:r>\
            <w:t>R&amp;D engineer</w:t>\
            </w:r></w:p></w:body></w:document>";
        let zip = build_zip(&[("word/document.xml", xml.as_bytes(), 0)]);
        let text = extract_docx_text(&zip).unwrap();
        assert_eq!(text, "R&D engineer");
    }

    #[test]
    fn test_normalize_whitespace_keeps_paragraph_breaks() {
        assert_eq!(
            normalize_whitespace("  First   line \n\n   Second\tline  "),
            "First line\nSecond line"
        );
    }
}
