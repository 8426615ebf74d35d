use crate::aggregate::recompute;
use crate::dataset::{Dataset, month_abbrev};
use crate::errors::AppError;
use crate::models::{AggregateBundle, DashboardQuery, HealthResponse, OptionsResponse};
use crate::selectors::{ALL, Selection};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.title, &selector_options(&state.dataset)))
}

pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(selector_options(&state.dataset))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<AggregateBundle>, AppError> {
    let selection = Selection::parse(
        &state.dataset,
        query.year.as_deref(),
        query.month.as_deref(),
    )?;
    debug!(year = %selection.year, month = %selection.month, "recomputing dashboard");

    Ok(Json(recompute(&state.dataset, selection, state.trend_scope)))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rows: state.dataset.len(),
    })
}

/// Dropdown values: the "All" sentinel followed by what the dataset holds.
pub fn selector_options(dataset: &Dataset) -> OptionsResponse {
    let years = std::iter::once(ALL.to_string())
        .chain(dataset.years().into_iter().map(|year| year.to_string()))
        .collect();
    let months = std::iter::once(ALL.to_string())
        .chain(dataset.months().into_iter().map(|month| month_abbrev(month).to_string()))
        .collect();
    OptionsResponse { years, months }
}
