//! Binary record parsing for the bi5 format.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;
use tickday_types::RawRecord;

/// Errors that can occur during record parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Invalid data length (not a multiple of the record size).
    #[error("Invalid data length: {0} bytes (expected multiple of {1})")]
    InvalidLength(usize, usize),
}

/// Parses raw records from decompressed bi5 data.
///
/// Each record is 20 bytes, five big-endian `u32` words:
/// - bytes 0-3: milliseconds offset from hour start
/// - bytes 4-7: ask price raw
/// - bytes 8-11: bid price raw
/// - bytes 12-15: volume word
/// - bytes 16-19: reserved word
///
/// # Errors
///
/// Returns an error if the data length is not a multiple of 20. Nothing is
/// parsed from a misaligned buffer.
pub fn parse_records(
    data: &[u8],
) -> Result<impl ExactSizeIterator<Item = RawRecord> + '_, ParseError> {
    if !data.len().is_multiple_of(RawRecord::SIZE) {
        return Err(ParseError::InvalidLength(data.len(), RawRecord::SIZE));
    }

    Ok(data.chunks_exact(RawRecord::SIZE).map(parse_single_record))
}

/// Parses a single record from a 20-byte chunk.
#[inline]
fn parse_single_record(data: &[u8]) -> RawRecord {
    RawRecord::new(
        BigEndian::read_u32(&data[0..4]),
        BigEndian::read_u32(&data[4..8]),
        BigEndian::read_u32(&data[8..12]),
        BigEndian::read_u32(&data[12..16]),
        BigEndian::read_u32(&data[16..20]),
    )
}

/// Encodes records into the uncompressed bi5 layout.
#[must_use]
pub fn encode_records(records: &[RawRecord]) -> Vec<u8> {
    let mut data = vec![0u8; records.len() * RawRecord::SIZE];
    for (chunk, record) in data.chunks_exact_mut(RawRecord::SIZE).zip(records) {
        BigEndian::write_u32(&mut chunk[0..4], record.ms_offset);
        BigEndian::write_u32(&mut chunk[4..8], record.ask_raw);
        BigEndian::write_u32(&mut chunk[8..12], record.bid_raw);
        BigEndian::write_u32(&mut chunk[12..16], record.volume_raw);
        BigEndian::write_u32(&mut chunk[16..20], record.reserved);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_record() {
        let bytes = [
            0x00, 0x00, 0x03, 0xE8, // 1000
            0x00, 0x04, 0x0C, 0xD8, // 265432
            0x00, 0x04, 0x0C, 0xB8, // 265400
            0x00, 0x00, 0x00, 0x07, // 7
            0xDE, 0xAD, 0xBE, 0xEF, // reserved
        ];
        let record = parse_single_record(&bytes);

        assert_eq!(record.ms_offset, 1000);
        assert_eq!(record.ask_raw, 265_432);
        assert_eq!(record.bid_raw, 265_400);
        assert_eq!(record.volume_raw, 7);
        assert_eq!(record.reserved, 0xDEAD_BEEF);
    }

    #[test]
    fn test_parse_multiple_records() {
        let data = encode_records(&[
            RawRecord::new(0, 100, 99, 1, 0),
            RawRecord::new(1000, 101, 100, 2, 0),
        ]);

        let records: Vec<_> = parse_records(&data).unwrap().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ms_offset, 0);
        assert_eq!(records[1], RawRecord::new(1000, 101, 100, 2, 0));
    }

    #[test]
    fn test_invalid_length() {
        let data = vec![0u8; 25];
        let result = parse_records(&data);
        assert!(matches!(result, Err(ParseError::InvalidLength(25, 20))));
    }

    #[test]
    fn test_empty_data() {
        let ticks: Vec<_> = parse_records(&[]).unwrap().collect();
        assert!(ticks.is_empty());
    }
}
