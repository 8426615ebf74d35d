use crate::dataset::{Dataset, month_abbrev, parse_month};
use crate::errors::{DashboardError, Result};
use chrono::Month;
use std::fmt;
use tracing::warn;

pub const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSelector {
    #[default]
    All,
    Year(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthSelector {
    #[default]
    All,
    Month(Month),
}

/// The active pair of filters. `Selection::default()` is the unfiltered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub year: YearSelector,
    pub month: MonthSelector,
}

impl YearSelector {
    pub fn matches(self, year: Option<i32>) -> bool {
        match self {
            YearSelector::All => true,
            YearSelector::Year(selected) => year == Some(selected),
        }
    }
}

impl MonthSelector {
    pub fn matches(self, month: Month) -> bool {
        match self {
            MonthSelector::All => true,
            MonthSelector::Month(selected) => selected == month,
        }
    }
}

impl fmt::Display for YearSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelector::All => f.write_str(ALL),
            YearSelector::Year(year) => write!(f, "{year}"),
        }
    }
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthSelector::All => f.write_str(ALL),
            MonthSelector::Month(month) => f.write_str(month_abbrev(*month)),
        }
    }
}

impl Selection {
    pub fn new(year: YearSelector, month: MonthSelector) -> Self {
        Self { year, month }
    }

    /// Parses raw query values and checks them against what the dataset holds.
    /// Absent values mean "All".
    pub fn parse(dataset: &Dataset, year: Option<&str>, month: Option<&str>) -> Result<Self> {
        let year = match year.map(str::trim) {
            None | Some(ALL) => YearSelector::All,
            Some(raw) => {
                let parsed = raw
                    .parse::<i32>()
                    .ok()
                    .filter(|candidate| dataset.years().contains(candidate));
                match parsed {
                    Some(value) => YearSelector::Year(value),
                    None => return Err(rejected("year", raw)),
                }
            }
        };

        let month = match month.map(str::trim) {
            None | Some(ALL) => MonthSelector::All,
            Some(raw) => {
                let parsed = parse_month(raw).filter(|candidate| dataset.months().contains(candidate));
                match parsed {
                    Some(value) => MonthSelector::Month(value),
                    None => return Err(rejected("month", raw)),
                }
            }
        };

        Ok(Self { year, month })
    }
}

fn rejected(kind: &'static str, value: &str) -> DashboardError {
    warn!(kind, value, "rejecting selector");
    DashboardError::InvalidSelector {
        kind,
        value: value.to_string(),
    }
}
