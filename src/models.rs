use crate::aggregate::TrendScope;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPoint {
    pub label: String,
    pub qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: &'static str,
    pub month_num: u32,
    pub qty: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub points: Vec<GroupPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendChart {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    /// Tells the reader whether the year/month filters apply to this chart.
    pub scope_note: &'static str,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub total_qty: f64,
    pub text: String,
}

/// Everything one filter change produces for the page.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateBundle {
    pub year: String,
    pub month: String,
    pub trend_scope: TrendScope,
    pub kpi: Kpi,
    pub month_trend: TrendChart,
    pub sales_person: Breakdown,
    pub order_status: Breakdown,
    pub order_set: Breakdown,
    pub order_country: Breakdown,
    pub district: Breakdown,
    pub category: Breakdown,
    pub sub_category: Breakdown,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub years: Vec<String>,
    pub months: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rows: usize,
}
