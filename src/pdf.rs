//! Best-effort PDF text recovery.
//!
//! This is not a PDF object model. The extractor scans the raw bytes for
//! parenthesized literals next to the `Tj`/`TJ` text-showing operators,
//! which recovers any uncompressed content stream, then slices every
//! `stream`/`endstream` region, inflates it, and re-scans the inflated
//! bytes for the same pattern.
//!
//! Accepted imprecision: the xref table and object graph are never parsed,
//! filters other than deflate are skipped, PDF string escapes are left
//! as-is, and `TJ` arrays with interleaved positioning numbers only
//! contribute their parenthesized runs. Downstream segmentation is itself
//! heuristic and tolerant of this noise.

use once_cell::sync::Lazy;
use regex::Regex;
use regex::bytes::Regex as BytesRegex;

use crate::inflate::{InflateFormat, inflate};

/// A parenthesized literal followed by a text-show operator. `(?-u)` so the
/// class matches arbitrary Latin-1 bytes, not just valid UTF-8.
static LITERAL_TEXT: Lazy<BytesRegex> =
    Lazy::new(|| BytesRegex::new(r"(?-u)\(([^()]*)\)\s*TJ?").expect("Invalid literal-text regex"));

/// Same pattern over decoded text, for re-scanning inflated streams.
static LITERAL_TEXT_STR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]*)\)\s*TJ?").expect("Invalid literal-text regex"));

/// Start-of-stream marker: the `stream` keyword and its trailing EOL.
static STREAM_START: Lazy<BytesRegex> =
    Lazy::new(|| BytesRegex::new(r"stream[\r\n]+").expect("Invalid stream marker regex"));

const ENDSTREAM: &[u8] = b"endstream";

/// Extracts whatever literal text can be recovered from a PDF file.
///
/// Never fails: malformed input, foreign compression filters, and missing
/// markers all degrade to less (possibly no) recovered text. Captured
/// segments are joined with newlines in document order.
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    let mut segments: Vec<String> = Vec::new();

    // PDF structural syntax is Latin-1 even when content is compressed
    // binary, so literals found in the raw bytes decode byte-per-char.
    // Matches inside binary stream data are accepted noise.
    for caps in LITERAL_TEXT.captures_iter(bytes) {
        segments.push(latin1_to_string(&caps[1]));
    }

    let mut cursor = 0;
    while let Some(marker) = STREAM_START.find_at(bytes, cursor) {
        let start = marker.end();
        let Some(offset) = find_subslice(&bytes[start..], ENDSTREAM) else {
            break;
        };
        let end = start + offset;

        // FlateDecode streams are zlib-wrapped. Anything that fails to
        // inflate (other filters, corrupt data) is skipped, not fatal.
        if let Some(inflated) = inflate(&bytes[start..end], InflateFormat::Zlib) {
            let text = String::from_utf8_lossy(&inflated);
            for caps in LITERAL_TEXT_STR.captures_iter(&text) {
                segments.push(caps[1].to_string());
            }
        }

        // Resume past the consumed endstream so its own `stream` suffix is
        // never rescanned.
        cursor = end + ENDSTREAM.len();
    }

    segments.join("\n")
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
