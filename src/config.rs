use crate::aggregate::TrendScope;
use crate::errors::{DashboardError, Result};
use std::{env, fmt, path::PathBuf};

pub const DEFAULT_SHEET_ID: &str = "1_TWU8G6FDjEhRaFxoAwo3jD93Ccmn6zGRuphyrqww2k";
pub const DEFAULT_SHEET_NAME: &str = "ClickBD_Data";
pub const DEFAULT_TITLE: &str = "CLICKBD Online Shop Monthly Sales Report";
pub const DEFAULT_PORT: u16 = 8050;

/// Where the sales table is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceLocation,
    pub trend_scope: TrendScope,
    pub title: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let source = if let Some(path) = get("SALES_CSV_PATH") {
            SourceLocation::File(PathBuf::from(path))
        } else if let Some(url) = get("SALES_CSV_URL") {
            SourceLocation::Url(url)
        } else {
            let sheet_id = get("SALES_SHEET_ID").unwrap_or_else(|| DEFAULT_SHEET_ID.to_string());
            let sheet_name =
                get("SALES_SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());
            SourceLocation::Url(sheet_export_url(&sheet_id, &sheet_name))
        };

        let trend_scope = match get("DASHBOARD_TREND_SCOPE") {
            Some(value) => value.parse()?,
            None => TrendScope::default(),
        };

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|err| DashboardError::Config(format!("invalid PORT '{value}': {err}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            source,
            trend_scope,
            title: get("DASHBOARD_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            port,
        })
    }
}

/// CSV export endpoint of a published Google sheet.
pub fn sheet_export_url(sheet_id: &str, sheet_name: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:csv&sheet={sheet_name}")
}
