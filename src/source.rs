use crate::config::SourceLocation;
use crate::dataset::{Dataset, RawRecord};
use crate::errors::{DashboardError, Result};
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

const REQUIRED_COLUMNS: [&str; 3] = ["Month", "Year", "QTY"];

/// Fetches and normalizes the sales table. Any failure here is fatal to startup.
pub async fn load_dataset(location: &SourceLocation) -> Result<Dataset> {
    let payload = match location {
        SourceLocation::Url(url) => fetch_url(url).await,
        SourceLocation::File(path) => read_file(path).await,
    }
    .inspect_err(|err| error!("failed to load sales source: {err}"))?;

    info!(source = %location, bytes = payload.len(), "sales source loaded");
    let rows = parse_csv(payload.as_bytes())?;
    Ok(Dataset::from_raw(rows))
}

async fn fetch_url(url: &str) -> Result<String> {
    let unavailable = |reason: String| DashboardError::SourceUnavailable {
        location: url.to_string(),
        reason,
    };

    let response = reqwest::get(url)
        .await
        .map_err(|err| unavailable(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("HTTP {status}")));
    }
    response.text().await.map_err(|err| unavailable(err.to_string()))
}

/// Invalid UTF-8 is replaced rather than rejected, the same way
/// `reqwest::Response::text` decodes the URL source.
async fn read_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .await
        .map_err(|err| DashboardError::SourceUnavailable {
            location: path.display().to_string(),
            reason: err.to_string(),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses a CSV export with a header row. Unknown columns are ignored.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(DashboardError::MalformedSource(format!(
                "missing required column '{column}'"
            )));
        }
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row = result.map_err(|err| {
            DashboardError::MalformedSource(format!("CSV parse error at line {}: {err}", index + 2))
        })?;
        rows.push(row);
    }
    Ok(rows)
}
