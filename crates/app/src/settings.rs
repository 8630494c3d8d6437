//! Settings for the command line front end, read from `settings.toml` and
//! `LEDGERLY__*` environment variables, then overridden by flags.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "ledgerly.db"
//!
//! [user]
//! id = "alice"
//! display_name = "Alice"
//! email = "alice@example.com"
//!
//! [dashboard]
//! recent_limit = 10
//! series_points = 30
//! period_days = -1
//! ```
use config::{Config, Environment, File};
use engine::{DashboardOptions, aggregation::Period};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "settings";
const ENV_PREFIX: &str = "LEDGERLY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("ledgerly.db".to_string())
    }
}

impl Database {
    /// `memory` selects the in-process store, anything else is a sqlite path.
    pub fn from_flag(value: &str) -> Self {
        if value.eq_ignore_ascii_case("memory") {
            Database::Memory
        } else {
            Database::Sqlite(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub recent_limit: usize,
    pub series_points: usize,
    /// `-1` means all time.
    pub period_days: i64,
}

impl Default for Dashboard {
    fn default() -> Self {
        let options = DashboardOptions::default();
        Self {
            recent_limit: options.recent_limit,
            series_points: options.series_points,
            period_days: Period::ALL_TIME_DAYS,
        }
    }
}

impl Dashboard {
    pub fn options(&self) -> DashboardOptions {
        DashboardOptions::default()
            .period(Period::from_days(self.period_days))
            .recent_limit(self.recent_limit)
            .series_points(self.series_points)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub user: Option<User>,
    pub dashboard: Dashboard,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
