use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::import_service::ImportLimits;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub limits: ImportLimits,
    /// Department names every tenant starts with; the department service
    /// owns the real reference data in production.
    pub departments: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_string("SH_BIND_ADDR", "127.0.0.1:18090")
            .parse::<SocketAddr>()
            .context("SH_BIND_ADDR must be a valid host:port")?;

        let max_upload_bytes = env_string("SH_MAX_UPLOAD_BYTES", "5242880")
            .parse::<usize>()
            .context("SH_MAX_UPLOAD_BYTES must be a byte count")?;

        let max_rows = env_string("SH_MAX_ROWS", "2000")
            .parse::<usize>()
            .context("SH_MAX_ROWS must be a row count")?;

        let base_budget_ms = env_string("SH_IMPORT_BASE_BUDGET_MS", "2000")
            .parse::<u64>()
            .context("SH_IMPORT_BASE_BUDGET_MS must be milliseconds")?;

        let per_row_budget_ms = env_string("SH_IMPORT_ROW_BUDGET_MS", "50")
            .parse::<u64>()
            .context("SH_IMPORT_ROW_BUDGET_MS must be milliseconds")?;

        let departments = env_string(
            "SH_DEPARTMENTS",
            "Engineering,Finance,Human Resources,Marketing,Operations,Sales",
        )
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

        Ok(Self {
            bind_addr,
            limits: ImportLimits {
                max_upload_bytes,
                max_rows,
                base_budget: Duration::from_millis(base_budget_ms),
                per_row_budget: Duration::from_millis(per_row_budget_ms),
            },
            departments,
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
