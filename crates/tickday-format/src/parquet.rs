//! Apache Parquet output format.

use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;
use tickday_types::Tick;

use crate::{COLUMNS, FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the Arrow schema for tick data.
    ///
    /// `timestamp` is epoch milliseconds (Int64); prices are full-precision f64.
    fn tick_schema() -> Schema {
        let [ts, ask, bid] = COLUMNS;
        Schema::new(vec![
            Field::new(ts, DataType::Int64, false),
            Field::new(ask, DataType::Float64, false),
            Field::new(bid, DataType::Float64, false),
        ])
    }

    /// Converts ticks to Arrow RecordBatch.
    fn ticks_to_batch(schema: Arc<Schema>, ticks: &[Tick]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = ticks.iter().map(Tick::timestamp_ms).collect();
        let asks: Vec<_> = ticks.iter().map(Tick::ask).collect();
        let bids: Vec<_> = ticks.iter().map(Tick::bid).collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(timestamps)),
                Arc::new(Float64Array::from(asks)),
                Arc::new(Float64Array::from(bids)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        let schema = Arc::new(Self::tick_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in ticks.chunks(self.row_group_size.max(1)) {
            let batch = Self::ticks_to_batch(Arc::clone(&schema), chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
