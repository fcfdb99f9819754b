//! Delimited text output, plain and gzip-compressed.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use tickday_types::Tick;

use crate::{COLUMNS, FormatError, Formatter};

/// CSV formatter.
///
/// Rows are `timestamp,askPrice,bidPrice` with the timestamp in epoch
/// milliseconds and prices rendered with a fixed number of decimals.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Decimal places for prices (default: 3).
    precision: usize,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            precision: 3,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets the number of decimal places used for prices.
    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Formatter for CsvFormatter {
    fn write_ticks<W: Write + Send>(
        &self,
        ticks: &[Tick],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        let p = self.precision;

        if self.include_header {
            let [ts, ask, bid] = COLUMNS;
            writeln!(writer, "{ts}{d}{ask}{d}{bid}")?;
        }

        for tick in ticks {
            writeln!(
                writer,
                "{}{d}{:.p$}{d}{:.p$}",
                tick.timestamp_ms(),
                tick.ask(),
                tick.bid(),
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

/// Gzip-compressed CSV formatter.
#[derive(Debug, Clone)]
pub struct GzipCsvFormatter {
    inner: CsvFormatter,
    level: u32,
}

impl Default for GzipCsvFormatter {
    fn default() -> Self {
        Self::new(CsvFormatter::new())
    }
}

impl GzipCsvFormatter {
    /// Wraps a CSV formatter with default gzip compression.
    #[must_use]
    pub const fn new(inner: CsvFormatter) -> Self {
        Self { inner, level: 6 }
    }

    /// Sets the gzip compression level (0-9).
    #[must_use]
    pub const fn with_level(mut self, level: u32) -> Self {
        self.level = if level > 9 { 9 } else { level };
        self
    }
}

impl Formatter for GzipCsvFormatter {
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        let mut encoder = GzEncoder::new(writer, Compression::new(self.level));
        self.inner.write_ticks(ticks, &mut encoder)?;
        encoder.finish()?.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv.gz"
    }
}
