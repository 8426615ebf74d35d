use crate::dataset::{Dataset, Dimension, SalesRecord, month_abbrev};
use crate::errors::DashboardError;
use crate::models::{AggregateBundle, Breakdown, ChartKind, GroupPoint, Kpi, TrendChart, TrendPoint};
use crate::selectors::{MonthSelector, Selection, YearSelector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Which rows feed the monthly trend chart.
///
/// `AllRows` keeps the trend showing every year and month no matter what the
/// selectors say; `Filtered` makes it follow the selectors like every other chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendScope {
    #[default]
    #[serde(rename = "all")]
    AllRows,
    Filtered,
}

impl TrendScope {
    pub fn note(self) -> &'static str {
        match self {
            TrendScope::AllRows => "All years and months; the filters above do not apply",
            TrendScope::Filtered => "Follows the selected year and month",
        }
    }
}

impl FromStr for TrendScope {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TrendScope::AllRows),
            "filtered" => Ok(TrendScope::Filtered),
            other => Err(DashboardError::Config(format!(
                "trend scope must be 'all' or 'filtered', got '{other}'"
            ))),
        }
    }
}

const KPI_PREFIX: &str = "📦 Total QTY";

const MONTH_TREND: (&str, &str) = ("month-sales", "Monthly Sales Trend by Year (QTY)");

fn chart_meta(dimension: Dimension) -> (&'static str, &'static str, ChartKind) {
    match dimension {
        Dimension::SalesPerson => ("salesperson-sales", "Sales Person Sales (QTY)", ChartKind::Bar),
        Dimension::OrderStatus => ("delivery-status", "Delivery Status", ChartKind::Pie),
        Dimension::OrderSet => ("order-set-sales", "Order Set Sold (QTY)", ChartKind::Bar),
        Dimension::OrderCountry => ("country-sales", "Country-wise Sales (QTY)", ChartKind::Bar),
        Dimension::District => ("district-sales", "District-wise Sales (QTY)", ChartKind::Bar),
        Dimension::Category => ("category-sales", "Category-wise Sales (QTY)", ChartKind::Bar),
        Dimension::SubCategory => (
            "subcategory-sales",
            "Sub-Category-wise Sales (QTY)",
            ChartKind::Bar,
        ),
    }
}

/// Recomputes the KPI and every chart for one selector pair.
pub fn recompute(dataset: &Dataset, selection: Selection, scope: TrendScope) -> AggregateBundle {
    let filtered: Vec<&SalesRecord> = filter(dataset.records(), selection).collect();
    let total = total_qty(filtered.iter().copied());

    let trend_points = match scope {
        TrendScope::AllRows => month_trend(dataset.records()),
        TrendScope::Filtered => month_trend(filtered.iter().copied()),
    };

    let breakdown = |dimension| {
        let (id, title, kind) = chart_meta(dimension);
        Breakdown {
            id,
            title,
            kind,
            points: group_sum(filtered.iter().copied(), dimension),
        }
    };

    AggregateBundle {
        year: selection.year.to_string(),
        month: selection.month.to_string(),
        trend_scope: scope,
        kpi: Kpi {
            total_qty: total,
            text: kpi_text(selection, total),
        },
        month_trend: TrendChart {
            id: MONTH_TREND.0,
            title: MONTH_TREND.1,
            kind: ChartKind::Line,
            scope_note: scope.note(),
            points: trend_points,
        },
        sales_person: breakdown(Dimension::SalesPerson),
        order_status: breakdown(Dimension::OrderStatus),
        order_set: breakdown(Dimension::OrderSet),
        order_country: breakdown(Dimension::OrderCountry),
        district: breakdown(Dimension::District),
        category: breakdown(Dimension::Category),
        sub_category: breakdown(Dimension::SubCategory),
    }
}

pub fn filter(
    records: &[SalesRecord],
    selection: Selection,
) -> impl Iterator<Item = &SalesRecord> + '_ {
    records
        .iter()
        .filter(move |record| {
            selection.year.matches(record.year) && selection.month.matches(record.month)
        })
}

/// Plain `f64` summation in row order. Regrouping the same rows gives the
/// identical total for integral quantities; fractional ones may differ in the
/// last bits.
pub fn total_qty<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> f64 {
    records.into_iter().map(|record| record.qty).sum()
}

pub fn kpi_text(selection: Selection, total: f64) -> String {
    match (selection.year, selection.month) {
        (YearSelector::All, MonthSelector::All) => format!("{KPI_PREFIX} (Overall): {total}"),
        (YearSelector::Year(year), MonthSelector::All) => {
            format!("{KPI_PREFIX} in {year}: {total}")
        }
        (YearSelector::All, MonthSelector::Month(month)) => {
            format!("{KPI_PREFIX} in {}: {total}", month_abbrev(month))
        }
        (YearSelector::Year(year), MonthSelector::Month(month)) => {
            format!("{KPI_PREFIX} in {} {year}: {total}", month_abbrev(month))
        }
    }
}

/// Sums quantity per distinct value of `dimension`, ordered by label.
/// Rows without a usable key are left out.
pub fn group_sum<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    dimension: Dimension,
) -> Vec<GroupPoint> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        if let Some(key) = record.key(dimension) {
            *sums.entry(key).or_default() += record.qty;
        }
    }
    sums.into_iter()
        .map(|(label, qty)| GroupPoint {
            label: label.to_string(),
            qty,
        })
        .collect()
}

/// Quantity per (year, month), ordered by year then calendar month.
/// Rows without a parsed year have no place on the trend and are skipped.
pub fn month_trend<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> Vec<TrendPoint> {
    let mut sums: BTreeMap<(i32, u32), (chrono::Month, f64)> = BTreeMap::new();
    for record in records {
        let Some(year) = record.year else { continue };
        let entry = sums
            .entry((year, record.month_num()))
            .or_insert((record.month, 0.0));
        entry.1 += record.qty;
    }
    sums.into_iter()
        .map(|((year, month_num), (month, qty))| TrendPoint {
            year,
            month: month_abbrev(month),
            month_num,
            qty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CALENDAR, RawRecord};
    use chrono::Month;

    fn row(year: &str, month: &str, qty: &str) -> RawRecord {
        RawRecord {
            month: Some(month.into()),
            year: Some(year.into()),
            qty: Some(qty.into()),
            ..RawRecord::default()
        }
    }

    fn sold_by(person: &str, raw: RawRecord) -> RawRecord {
        RawRecord {
            sales_person: Some(person.into()),
            ..raw
        }
    }

    fn point(label: &str, qty: f64) -> GroupPoint {
        GroupPoint {
            label: label.into(),
            qty,
        }
    }

    fn trend(year: i32, month: &'static str, month_num: u32, qty: f64) -> TrendPoint {
        TrendPoint {
            year,
            month,
            month_num,
            qty,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_raw(vec![
            row("2023", "Jan", "10"),
            row("2023", "Feb", "5"),
            row("2024", "Jan", "7"),
        ])
    }

    fn select(year: YearSelector, month: MonthSelector) -> Selection {
        Selection::new(year, month)
    }

    #[test]
    fn kpi_follows_selectors() {
        let data = sample();
        let all = recompute(&data, Selection::default(), TrendScope::AllRows);
        assert_eq!(all.kpi.total_qty, 22.0);
        assert_eq!(all.kpi.text, "📦 Total QTY (Overall): 22");

        let year = recompute(
            &data,
            select(YearSelector::Year(2023), MonthSelector::All),
            TrendScope::AllRows,
        );
        assert_eq!(year.kpi.total_qty, 15.0);
        assert_eq!(year.kpi.text, "📦 Total QTY in 2023: 15");

        let both = recompute(
            &data,
            select(YearSelector::Year(2023), MonthSelector::Month(Month::January)),
            TrendScope::AllRows,
        );
        assert_eq!(both.kpi.total_qty, 10.0);
        assert_eq!(both.kpi.text, "📦 Total QTY in Jan 2023: 10");

        let month = recompute(
            &data,
            select(YearSelector::All, MonthSelector::Month(Month::January)),
            TrendScope::AllRows,
        );
        assert_eq!(month.kpi.total_qty, 17.0);
        assert_eq!(month.kpi.text, "📦 Total QTY in Jan: 17");
    }

    #[test]
    fn kpi_templates_are_distinct() {
        let texts = [
            kpi_text(select(YearSelector::All, MonthSelector::All), 1.0),
            kpi_text(select(YearSelector::Year(2023), MonthSelector::All), 1.0),
            kpi_text(select(YearSelector::All, MonthSelector::Month(Month::March)), 1.0),
            kpi_text(
                select(YearSelector::Year(2023), MonthSelector::Month(Month::March)),
                1.0,
            ),
        ];
        for (i, a) in texts.iter().enumerate() {
            for b in &texts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn month_trend_ignores_selectors_by_default() {
        let data = sample();
        let expected = vec![
            trend(2023, "Jan", 1, 10.0),
            trend(2023, "Feb", 2, 5.0),
            trend(2024, "Jan", 1, 7.0),
        ];
        for selection in [
            Selection::default(),
            select(YearSelector::Year(2024), MonthSelector::All),
            select(YearSelector::Year(2023), MonthSelector::Month(Month::February)),
        ] {
            let bundle = recompute(&data, selection, TrendScope::AllRows);
            assert_eq!(bundle.month_trend.points, expected);
        }
    }

    #[test]
    fn filtered_trend_scope_follows_selectors() {
        let data = sample();
        let bundle = recompute(
            &data,
            select(YearSelector::Year(2024), MonthSelector::All),
            TrendScope::Filtered,
        );
        assert_eq!(bundle.month_trend.points, vec![trend(2024, "Jan", 1, 7.0)]);
        assert_eq!(bundle.month_trend.scope_note, TrendScope::Filtered.note());
        assert_ne!(TrendScope::Filtered.note(), TrendScope::AllRows.note());
    }

    #[test]
    fn month_trend_uses_calendar_order_regardless_of_input_order() {
        let data = Dataset::from_raw(vec![
            row("2023", "Dec", "1"),
            row("2023", "Mar", "2"),
            row("2023", "Jan", "3"),
            row("2023", "Mar", "4"),
            row("", "Feb", "100"),
        ]);
        let months: Vec<_> = month_trend(data.records())
            .into_iter()
            .map(|point| (point.month, point.qty))
            .collect();
        assert_eq!(months, vec![("Jan", 3.0), ("Mar", 6.0), ("Dec", 1.0)]);
    }

    #[test]
    fn null_categories_only_leave_their_own_breakdown() {
        let mut rows = vec![
            RawRecord {
                category: Some("null".into()),
                sub_category: Some("Tees".into()),
                district: Some("Dhaka".into()),
                ..row("2023", "Jan", "3")
            },
            RawRecord {
                category: Some("Apparel".into()),
                sub_category: Some("NULL".into()),
                district: Some("Dhaka".into()),
                ..row("2023", "Jan", "4")
            },
            RawRecord {
                category: None,
                sub_category: None,
                district: Some("Khulna".into()),
                ..row("2023", "Feb", "2")
            },
        ];
        rows.push(row("2023", "Nope", "50"));
        let data = Dataset::from_raw(rows);
        let bundle = recompute(&data, Selection::default(), TrendScope::AllRows);

        assert_eq!(bundle.category.points, vec![point("Apparel", 4.0)]);
        assert_eq!(bundle.sub_category.points, vec![point("Tees", 3.0)]);
        assert_eq!(
            bundle.district.points,
            vec![point("Dhaka", 7.0), point("Khulna", 2.0)]
        );
        assert_eq!(bundle.kpi.total_qty, 9.0);
    }

    #[test]
    fn breakdowns_respect_filters_and_sort_by_label() {
        let data = Dataset::from_raw(vec![
            sold_by("Rina", row("2023", "Jan", "2")),
            sold_by("Arif", row("2023", "Jan", "3")),
            sold_by("Rina", row("2023", "Feb", "4")),
            sold_by("Zed", row("2024", "Jan", "9")),
        ]);
        let bundle = recompute(
            &data,
            select(YearSelector::Year(2023), MonthSelector::All),
            TrendScope::AllRows,
        );
        assert_eq!(
            bundle.sales_person.points,
            vec![point("Arif", 3.0), point("Rina", 6.0)]
        );
        assert_eq!(bundle.sales_person.id, "salesperson-sales");
        assert_eq!(bundle.order_status.kind, ChartKind::Pie);
    }

    #[test]
    fn missing_year_rows_only_leave_year_filtered_views() {
        let data = Dataset::from_raw(vec![row("2023", "Jan", "1"), row("n/a", "Jan", "2")]);
        let all = Selection::default();
        let jan = select(YearSelector::All, MonthSelector::Month(Month::January));
        let year = select(YearSelector::Year(2023), MonthSelector::All);

        assert_eq!(total_qty(filter(data.records(), all)), 3.0);
        assert_eq!(total_qty(filter(data.records(), jan)), 3.0);
        assert_eq!(total_qty(filter(data.records(), year)), 1.0);
    }

    fn year_and_month_totals(data: &Dataset, year: i32) -> (f64, f64) {
        let year = YearSelector::Year(year);
        let whole = total_qty(filter(data.records(), select(year, MonthSelector::All)));
        let by_month: f64 = CALENDAR
            .into_iter()
            .map(|month| select(year, MonthSelector::Month(month)))
            .map(|selection| total_qty(filter(data.records(), selection)))
            .sum();
        (whole, by_month)
    }

    #[test]
    fn year_total_equals_sum_of_its_months() {
        let data = Dataset::from_raw(vec![
            row("2023", "Jan", "10"),
            row("2023", "Mar", "3"),
            row("2023", "Mar", "4"),
            row("2023", "Nov", "8"),
            row("2024", "Mar", "40"),
        ]);
        let (whole, by_month) = year_and_month_totals(&data, 2023);
        assert_eq!(whole, 25.0);
        assert_eq!(whole, by_month);
    }

    #[test]
    fn fractional_year_total_matches_months_within_rounding() {
        let data = Dataset::from_raw(vec![
            row("2023", "Mar", "0.1"),
            row("2023", "Jan", "0.2"),
            row("2023", "Feb", "0.3"),
        ]);
        let (whole, by_month) = year_and_month_totals(&data, 2023);
        assert!((whole - 0.6).abs() < 1e-9);
        assert!((whole - by_month).abs() < 1e-9);
    }

    #[test]
    fn bundle_serializes_with_chart_descriptors() {
        let bundle = recompute(
            &sample(),
            select(YearSelector::Year(2023), MonthSelector::All),
            TrendScope::AllRows,
        );
        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["year"], "2023");
        assert_eq!(json["month"], "All");
        assert_eq!(json["trend_scope"], "all");
        assert_eq!(json["kpi"]["total_qty"], 15.0);
        assert_eq!(json["month_trend"]["kind"], "line");
        assert_eq!(json["month_trend"]["scope_note"], TrendScope::AllRows.note());
        assert_eq!(json["month_trend"]["points"][1]["month"], "Feb");
        assert_eq!(json["order_status"]["id"], "delivery-status");
        assert_eq!(json["order_status"]["kind"], "pie");
        assert_eq!(json["sub_category"]["title"], "Sub-Category-wise Sales (QTY)");
    }

    #[test]
    fn trend_scope_parses_config_values() {
        assert_eq!("all".parse::<TrendScope>().unwrap(), TrendScope::AllRows);
        assert_eq!(" Filtered ".parse::<TrendScope>().unwrap(), TrendScope::Filtered);
        assert!("sometimes".parse::<TrendScope>().is_err());
    }
}
