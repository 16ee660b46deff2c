//! Side-by-side comparison of a small set of currencies

use super::conversion::convert;
use super::rates::RateSet;
use std::collections::HashSet;
use thiserror::Error;

pub const MIN_COMPARED: usize = 2;
pub const MAX_COMPARED: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select at least {} currencies to compare", MIN_COMPARED)]
    TooFew,
    #[error("At most {} currencies can be compared", MAX_COMPARED)]
    TooMany,
    #[error("Please select different currencies, {0} is selected more than once")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRate {
    pub code: String,
    /// Rate per 1 unit of the base currency, `0.0` when unknown.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedAmount {
    pub currency: String,
    pub amount: f64,
}

/// A validated selection of currencies, all quoted against `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    base: String,
    selected: Vec<String>,
}

impl Comparison {
    pub fn new(base: &str, selected: Vec<String>) -> Result<Self, SelectionError> {
        if selected.len() < MIN_COMPARED {
            return Err(SelectionError::TooFew);
        }
        if selected.len() > MAX_COMPARED {
            return Err(SelectionError::TooMany);
        }

        let duplicate = {
            let mut seen = HashSet::new();
            selected
                .iter()
                .find(|code| !seen.insert(code.as_str()))
                .cloned()
        };
        if let Some(code) = duplicate {
            return Err(SelectionError::Duplicate(code));
        }

        Ok(Self {
            base: base.to_string(),
            selected,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn rates(&self, rates: &RateSet) -> Vec<CurrencyRate> {
        self.selected
            .iter()
            .map(|code| CurrencyRate {
                code: code.clone(),
                rate: if *code == self.base {
                    1.0
                } else {
                    rates.get(code).copied().unwrap_or(0.0)
                },
            })
            .collect()
    }

    /// Converts `amount` of `from` into every other selected currency.
    pub fn conversions(&self, amount: f64, from: &str, rates: &RateSet) -> Vec<ConvertedAmount> {
        self.selected
            .iter()
            .filter(|code| code.as_str() != from)
            .map(|to| ConvertedAmount {
                currency: to.clone(),
                amount: convert(amount, from, to, &self.base, rates),
            })
            .collect()
    }
}
