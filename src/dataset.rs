use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub const CALENDAR: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})").expect("regex is valid"));

/// One row as it arrives from the sheet export, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Month", default)]
    pub month: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "QTY", default)]
    pub qty: Option<String>,
    #[serde(rename = "Sales Person", default)]
    pub sales_person: Option<String>,
    #[serde(rename = "Order Status", default)]
    pub order_status: Option<String>,
    #[serde(rename = "Order Set", default)]
    pub order_set: Option<String>,
    #[serde(rename = "Order Country", default)]
    pub order_country: Option<String>,
    #[serde(rename = "District", default)]
    pub district: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Sub-Category", default)]
    pub sub_category: Option<String>,
}

/// Categorical columns the dashboard breaks quantities down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    SalesPerson,
    OrderStatus,
    OrderSet,
    OrderCountry,
    District,
    Category,
    SubCategory,
}

impl Dimension {
    /// Category columns also treat the literal text "null" as missing.
    pub fn drops_null_literal(self) -> bool {
        matches!(self, Dimension::Category | Dimension::SubCategory)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub month: Month,
    pub year: Option<i32>,
    pub qty: f64,
    pub sales_person: Option<String>,
    pub order_status: Option<String>,
    pub order_set: Option<String>,
    pub order_country: Option<String>,
    pub district: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
}

impl SalesRecord {
    pub fn month_num(&self) -> u32 {
        self.month.number_from_month()
    }

    /// The group key for `dimension`, or `None` when the row has no usable value.
    pub fn key(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::SalesPerson => self.sales_person.as_deref(),
            Dimension::OrderStatus => self.order_status.as_deref(),
            Dimension::OrderSet => self.order_set.as_deref(),
            Dimension::OrderCountry => self.order_country.as_deref(),
            Dimension::District => self.district.as_deref(),
            Dimension::Category => self.category.as_deref(),
            Dimension::SubCategory => self.sub_category.as_deref(),
        }?;
        if dimension.drops_null_literal() && value.eq_ignore_ascii_case("null") {
            return None;
        }
        Some(value)
    }
}

/// Counters collected while normalizing a raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub invalid_month: usize,
    pub missing_year: usize,
    pub missing_qty: usize,
}

/// The immutable, normalized sales table shared by every request.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    report: LoadReport,
}

impl Dataset {
    pub fn from_raw(rows: impl IntoIterator<Item = RawRecord>) -> Self {
        let mut report = LoadReport::default();
        let mut records = Vec::new();

        for (index, raw) in rows.into_iter().enumerate() {
            report.rows_read += 1;
            let Some(record) = normalize(raw, &mut report) else {
                debug!(row = index + 1, "dropping row with invalid month");
                continue;
            };
            records.push(record);
        }
        report.rows_kept = records.len();

        info!(
            rows_read = report.rows_read,
            rows_kept = report.rows_kept,
            invalid_month = report.invalid_month,
            missing_year = report.missing_year,
            missing_qty = report.missing_qty,
            "sales dataset normalized"
        );

        Self { records, report }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct parsed years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter_map(|record| record.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct months present, in calendar order.
    pub fn months(&self) -> Vec<Month> {
        let present: BTreeSet<u32> = self.records.iter().map(SalesRecord::month_num).collect();
        CALENDAR
            .into_iter()
            .filter(|month| present.contains(&month.number_from_month()))
            .collect()
    }
}

fn normalize(raw: RawRecord, report: &mut LoadReport) -> Option<SalesRecord> {
    let Some(month) = raw.month.as_deref().and_then(parse_month) else {
        report.invalid_month += 1;
        return None;
    };

    let year = raw.year.as_deref().and_then(extract_year);
    if year.is_none() {
        report.missing_year += 1;
    }

    let qty = match raw.qty.as_deref().and_then(parse_qty) {
        Some(qty) => qty,
        None => {
            report.missing_qty += 1;
            0.0
        }
    };

    Some(SalesRecord {
        month,
        year,
        qty,
        sales_person: clean(raw.sales_person),
        order_status: clean(raw.order_status),
        order_set: clean(raw.order_set),
        order_country: clean(raw.order_country),
        district: clean(raw.district),
        category: clean(raw.category),
        sub_category: clean(raw.sub_category),
    })
}

/// Exact three-letter English abbreviation after trimming, e.g. `"Jan"`.
pub fn parse_month(raw: &str) -> Option<Month> {
    let trimmed = raw.trim();
    CALENDAR
        .into_iter()
        .find(|month| month_abbrev(*month) == trimmed)
}

pub fn month_abbrev(month: Month) -> &'static str {
    &month.name()[..3]
}

/// First run of four digits, so `"2023"`, `"2023.0"` and `"FY2023"` all give 2023.
pub fn extract_year(raw: &str) -> Option<i32> {
    YEAR_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_qty(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|qty| qty.is_finite())
}

/// Blank cells become missing; anything else is kept verbatim, so `" Dhaka"`
/// and `"Dhaka"` stay separate groups.
fn clean(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
