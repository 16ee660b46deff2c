//! Core exchange rate logic and abstractions

pub mod ads;
pub mod cache;
pub mod chart;
pub mod compare;
pub mod config;
pub mod conversion;
pub mod log;
pub mod range;
pub mod rates;
pub mod table;

// Re-export main types for cleaner imports
pub use conversion::{ConversionError, convert, try_convert};
pub use range::{DateRange, DateRangePreset, resolve_range};
pub use rates::{
    CurrencyNameProvider, CurrencyNames, HistoricalPoint, HistoricalRateProvider, LatestRates,
    RateProvider, RateSet,
};
