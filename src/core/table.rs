//! Filtering and sorting for the live rate table

use super::rates::{CurrencyNames, RateSet, currency_name};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Code,
    Name,
    Rate,
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "code" => Ok(SortField::Code),
            "name" => Ok(SortField::Name),
            "rate" => Ok(SortField::Rate),
            _ => Err(anyhow::anyhow!("Invalid sort field: {}", s)),
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortField::Code => "code",
                SortField::Name => "name",
                SortField::Rate => "rate",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Selecting the active field flips its direction; a new field starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub code: String,
    pub name: String,
    pub rate: f64,
}

fn matches(query: &str, code: &str, name: &str) -> bool {
    code.to_lowercase().contains(query) || name.to_lowercase().contains(query)
}

/// Rows for every rate whose code or name contains `query`, ordered by `sort`.
pub fn build_rows(
    rates: &RateSet,
    names: &CurrencyNames,
    query: &str,
    sort: SortState,
) -> Vec<RateRow> {
    let query = query.trim().to_lowercase();

    let mut rows: Vec<RateRow> = rates
        .iter()
        .filter_map(|(code, rate)| {
            let name = currency_name(names, code);
            matches(&query, code, name).then(|| RateRow {
                code: code.clone(),
                name: name.to_string(),
                rate: *rate,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Code => a.code.cmp(&b.code),
            SortField::Name => a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)),
            SortField::Rate => a.rate.total_cmp(&b.rate),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows
}
