//! Date range presets for historical rate queries

use chrono::{Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum DateRangePreset {
    SevenDays,
    OneMonth,
    ThreeMonths,
    OneYear,
}

impl Display for DateRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DateRangePreset::SevenDays => "7D",
                DateRangePreset::OneMonth => "1M",
                DateRangePreset::ThreeMonths => "3M",
                DateRangePreset::OneYear => "1Y",
            }
        )
    }
}

impl FromStr for DateRangePreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "7D" => Ok(DateRangePreset::SevenDays),
            "1M" => Ok(DateRangePreset::OneMonth),
            "3M" => Ok(DateRangePreset::ThreeMonths),
            "1Y" => Ok(DateRangePreset::OneYear),
            _ => Err(anyhow::anyhow!("Invalid date range preset: {}", s)),
        }
    }
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 4] = [
        DateRangePreset::SevenDays,
        DateRangePreset::OneMonth,
        DateRangePreset::ThreeMonths,
        DateRangePreset::OneYear,
    ];

    /// Human readable label, e.g. "3 Months".
    pub fn label(&self) -> &'static str {
        match self {
            DateRangePreset::SevenDays => "7 Days",
            DateRangePreset::OneMonth => "1 Month",
            DateRangePreset::ThreeMonths => "3 Months",
            DateRangePreset::OneYear => "1 Year",
        }
    }

    /// Calendar-aware start date for a range ending on `end`.
    ///
    /// Month arithmetic clamps to the last day of the target month, so
    /// 31 March minus one month is the last day of February.
    fn start_from(&self, end: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRangePreset::SevenDays => end.checked_sub_days(Days::new(7)),
            DateRangePreset::OneMonth => end.checked_sub_months(Months::new(1)),
            DateRangePreset::ThreeMonths => end.checked_sub_months(Months::new(3)),
            DateRangePreset::OneYear => end.checked_sub_months(Months::new(12)),
        }
    }
}

/// Inclusive calendar date range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_iso(&self) -> String {
        format_iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        format_iso(self.end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start_iso(), self.end_iso())
    }
}

/// Formats a date as zero-padded `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Resolves `preset` into a range ending on `today`.
pub fn resolve_range_from(preset: DateRangePreset, today: NaiveDate) -> DateRange {
    // Only dates near the start of chrono's supported calendar can underflow.
    let start = preset.start_from(today).unwrap_or(NaiveDate::MIN);
    DateRange { start, end: today }
}

/// Resolves `preset` into a range ending on the local calendar date.
pub fn resolve_range(preset: DateRangePreset) -> DateRange {
    resolve_range_from(preset, Local::now().date_naive())
}
