use super::defaults;
use super::models::{LogLevel, PagerConfig};
use crate::format::PaperFormat;
use serde::Deserialize;

/// On-disk layout: one TOML table per concern.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    pagination: PaginationConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for PagerConfig {
    fn from(tables: ConfigTables) -> Self {
        PagerConfig {
            format: tables.pagination.format,
            page_budget: tables.pagination.page_budget,
            start_page: tables.pagination.start_page,
            compact_after_split: tables.pagination.compact_after_split,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&PagerConfig> for ConfigTables {
    fn from(config: &PagerConfig) -> Self {
        ConfigTables {
            pagination: PaginationConfig {
                format: config.format,
                page_budget: config.page_budget,
                start_page: config.start_page,
                compact_after_split: config.compact_after_split,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PaginationConfig {
    #[serde(default = "defaults::default_format")]
    format: PaperFormat,
    #[serde(default = "defaults::default_page_budget")]
    page_budget: usize,
    #[serde(default = "defaults::default_start_page")]
    start_page: u32,
    #[serde(default = "defaults::default_compact_after_split")]
    compact_after_split: bool,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            format: defaults::default_format(),
            page_budget: defaults::default_page_budget(),
            start_page: defaults::default_start_page(),
            compact_after_split: defaults::default_compact_after_split(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
