use super::models::PagerConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> PagerConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return PagerConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!(format = %cfg.format, budget = cfg.page_budget, "Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            PagerConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<PagerConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("parse config tables")?;
    let mut config = PagerConfig::from(tables);
    if config.start_page == 0 {
        warn!("start_page must be at least 1; using 1");
        config.start_page = 1;
    }
    Ok(config)
}

pub fn serialize_config(config: &PagerConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("serialize config tables")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use crate::format::PaperFormat;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = parse_config("").expect("empty config should parse");
        assert_eq!(cfg, PagerConfig::default());
    }

    #[test]
    fn reads_sectioned_tables() {
        let cfg = parse_config(
            r#"
            [pagination]
            format = "novel"
            page_budget = 900
            compact_after_split = true

            [logging]
            log_level = "debug"
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.format, PaperFormat::Novel);
        assert_eq!(cfg.page_budget, 900);
        assert_eq!(cfg.start_page, 1);
        assert!(cfg.compact_after_split);
        assert_eq!(cfg.log_level, LogLevel::Debug);
    }

    #[test]
    fn zero_start_page_is_clamped() {
        let cfg = parse_config("[pagination]\nstart_page = 0\n").expect("config should parse");
        assert_eq!(cfg.start_page, 1);
    }

    #[test]
    fn unknown_format_is_an_error() {
        assert!(parse_config("[pagination]\nformat = \"scroll\"\n").is_err());
    }

    #[test]
    fn serialize_round_trips() {
        let cfg = PagerConfig {
            format: PaperFormat::B5,
            page_budget: 1234,
            start_page: 5,
            compact_after_split: true,
            log_level: LogLevel::Warn,
        };
        let raw = serialize_config(&cfg).expect("config should serialize");
        assert!(raw.contains("[pagination]"));
        assert_eq!(parse_config(&raw).expect("round trip should parse"), cfg);
    }

    #[test]
    fn missing_or_invalid_file_falls_back_to_defaults() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("chapter-pager-config-{nonce}.toml"));
        assert_eq!(load_config(&path), PagerConfig::default());

        std::fs::write(&path, "[pagination\nformat = ").expect("temp config should be written");
        assert_eq!(load_config(&path), PagerConfig::default());

        std::fs::write(&path, "[pagination]\nformat = \"letter\"\n")
            .expect("temp config should be written");
        assert_eq!(load_config(&path).format, PaperFormat::Letter);

        let _ = std::fs::remove_file(&path);
    }
}
