//! Streaming DEFLATE adapter.
//!
//! Wraps `flate2`'s streaming decompressor behind the one call the
//! extractors need: feed a whole byte slice in, drain the output chunks in
//! order, hand back a single contiguous buffer. Failure is a value, not an
//! error — the PDF scanner skips an uninflatable stream and keeps going,
//! while the DOCX reader treats the same `None` as fatal because the
//! document body is the only payload it has.

use flate2::{Decompress, FlushDecompress, Status};

/// Wire framing of a compressed region handed to [`inflate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateFormat {
    /// Raw DEFLATE with no wrapper, as stored in ZIP entries (method 8).
    Raw,
    /// RFC 1950 zlib-wrapped DEFLATE, as used by PDF `FlateDecode` streams.
    Zlib,
}

const CHUNK_SIZE: usize = 32 * 1024;

/// Inflates `data` in a single pass.
///
/// Returns `None` when the bytes cannot be inflated — truncated input, a
/// different compression filter, or plain garbage. Trailing bytes after the
/// end of the compressed stream are ignored.
pub fn inflate(data: &[u8], format: InflateFormat) -> Option<Vec<u8>> {
    let mut decoder = Decompress::new(matches!(format, InflateFormat::Zlib));
    let mut output = Vec::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let consumed = decoder.total_in() as usize;
        let status = decoder
            .decompress(&data[consumed..], &mut chunk, FlushDecompress::Finish)
            .ok()?;
        let produced = decoder.total_out() as usize - output.len();
        output.extend_from_slice(&chunk[..produced]);

        match status {
            Status::StreamEnd => return Some(output),
            Status::Ok | Status::BufError => {
                // No input consumed and no output produced means the stream
                // is truncated or was never deflate to begin with.
                if produced == 0 && decoder.total_in() as usize == consumed {
                    return None;
                }
            }
        }
    }
}
