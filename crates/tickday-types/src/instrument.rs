//! Instrument symbols and price scale factors.

use serde::{Deserialize, Serialize};

use crate::TickdayError;

/// Scale factor used for symbols without a known entry.
pub const DEFAULT_SCALE_FACTOR: f64 = 1000.0;

/// Fewest decimal places used when rendering prices as text.
pub const MIN_PRICE_DECIMALS: usize = 3;

/// Most decimal places a raw `u32` price can need.
const MAX_PRICE_DECIMALS: usize = 10;

/// Known Dukascopy symbols and the divisor that recovers their decimal price.
const KNOWN_SCALE_FACTORS: &[(&str, f64)] = &[
    ("XAUUSD", 1_000.0),
    ("XAGUSD", 1_000.0),
    ("EURUSD", 100_000.0),
    ("GBPUSD", 100_000.0),
    ("AUDUSD", 100_000.0),
    ("NZDUSD", 100_000.0),
    ("USDCHF", 100_000.0),
    ("USDCAD", 100_000.0),
    ("EURGBP", 100_000.0),
    ("USDJPY", 1_000.0),
    ("EURJPY", 1_000.0),
    ("GBPJPY", 1_000.0),
    ("BTCUSD", 10.0),
    ("ETHUSD", 10.0),
];

/// A tradable instrument: feed symbol plus price scale factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    symbol: String,
    scale_factor: f64,
}

impl Instrument {
    /// Creates an instrument with an explicit scale factor.
    ///
    /// The symbol is normalized to upper case, as the feed expects.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty or the scale factor is not a
    /// positive finite number.
    pub fn new(symbol: impl Into<String>, scale_factor: f64) -> Result<Self, TickdayError> {
        let symbol = symbol.into().trim().to_uppercase();
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TickdayError::Instrument(format!(
                "symbol must be non-empty and alphanumeric, got '{symbol}'"
            )));
        }
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(TickdayError::Instrument(format!(
                "scale factor must be positive, got {scale_factor}"
            )));
        }
        Ok(Self {
            symbol,
            scale_factor,
        })
    }

    /// Creates an instrument using the known scale factor for `symbol`, or
    /// [`DEFAULT_SCALE_FACTOR`] if the symbol is not in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is invalid.
    pub fn from_symbol(symbol: &str) -> Result<Self, TickdayError> {
        let scale = Self::known_scale_factor(symbol).unwrap_or(DEFAULT_SCALE_FACTOR);
        Self::new(symbol, scale)
    }

    /// Looks up the scale factor for a known symbol (case-insensitive).
    #[must_use]
    pub fn known_scale_factor(symbol: &str) -> Option<f64> {
        let symbol = symbol.trim();
        KNOWN_SCALE_FACTORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(symbol))
            .map(|(_, scale)| *scale)
    }

    /// Returns the upper-case feed symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the price scale factor.
    #[must_use]
    pub const fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Returns the decimal places needed to render every price exactly.
    ///
    /// This is `ceil(log10(scale_factor))`, but never fewer than
    /// [`MIN_PRICE_DECIMALS`]: 3 for gold, 5 for EURUSD.
    #[must_use]
    pub fn price_decimals(&self) -> usize {
        let digits = self.scale_factor.log10().ceil();
        if digits.is_finite() && digits > 0.0 {
            (digits as usize).clamp(MIN_PRICE_DECIMALS, MAX_PRICE_DECIMALS)
        } else {
            MIN_PRICE_DECIMALS
        }
    }

    /// Returns the lower-case symbol used in output file names.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.symbol.to_lowercase()
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (scale {})", self.symbol, self.scale_factor)
    }
}
