use crate::format::PaperFormat;
use crate::pagination::PaginationOptions;
use serde::Deserialize;

/// Flat view of every setting; deserializable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct PagerConfig {
    #[serde(default = "crate::config::defaults::default_format")]
    pub format: PaperFormat,
    #[serde(default = "crate::config::defaults::default_page_budget")]
    pub page_budget: usize,
    #[serde(default = "crate::config::defaults::default_start_page")]
    pub start_page: u32,
    #[serde(default = "crate::config::defaults::default_compact_after_split")]
    pub compact_after_split: bool,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for PagerConfig {
    fn default() -> Self {
        PagerConfig {
            format: crate::config::defaults::default_format(),
            page_budget: crate::config::defaults::default_page_budget(),
            start_page: crate::config::defaults::default_start_page(),
            compact_after_split: crate::config::defaults::default_compact_after_split(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl PagerConfig {
    pub fn pagination_options(&self, chapter_id: Option<String>) -> PaginationOptions {
        PaginationOptions {
            format: self.format,
            page_budget: self.page_budget,
            chapter_id,
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
