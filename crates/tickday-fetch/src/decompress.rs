//! LZMA decompression for bi5 files.

use lzma_rs::{lzma_compress, lzma_decompress};
use std::io::{BufReader, Cursor};
use thiserror::Error;

/// Errors that can occur during decompression.
#[derive(Error, Debug)]
pub enum DecompressError {
    /// LZMA decompression failed.
    #[error("LZMA decompression failed: {0}")]
    LzmaError(String),

    /// Empty input data.
    #[error("Empty input data")]
    EmptyInput,
}

/// Decompresses LZMA-compressed bi5 data.
///
/// Dukascopy bi5 files are LZMA-compressed binary data containing tick records.
///
/// # Errors
///
/// Returns an error if the input is empty or the stream is malformed.
pub fn decompress_bi5(compressed: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if compressed.is_empty() {
        return Err(DecompressError::EmptyInput);
    }

    let mut decompressed = Vec::new();
    let mut reader = BufReader::new(Cursor::new(compressed));

    lzma_decompress(&mut reader, &mut decompressed)
        .map_err(|e| DecompressError::LzmaError(e.to_string()))?;

    Ok(decompressed)
}

/// Compresses a raw record buffer into the bi5 container format.
///
/// Used to build fixtures and by tools that re-encode hours.
///
/// # Errors
///
/// Returns an error if the encoder fails to write.
pub fn compress_bi5(raw: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut compressed = Vec::new();
    let mut reader = BufReader::new(Cursor::new(raw));
    lzma_compress(&mut reader, &mut compressed)?;
    Ok(compressed)
}
