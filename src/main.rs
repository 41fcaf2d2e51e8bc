//! Command-line driver for the pagination engine.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load configuration from `conf/config.toml` (or `--config`).
//! - Read chapter text or page JSON, run one engine operation, print JSON.

use anyhow::{Context, Result, anyhow, bail};
use chapter_pager::config::{PagerConfig, load_config};
use chapter_pager::{
    ChapterSummary, Page, PageRecord, PaperFormat, compact_pages, merge_pages, paginate_chapter,
    redistribute_page,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";
const USAGE: &str = "Usage: chapter-pager [--config PATH] [--format NAME] [--start N] [--chapter ID] \
<split CHAPTER.txt | redistribute PAGES.json PAGE CONTENT.txt | compact PAGES.json | merge PAGES.json | summary PAGES.json>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Split {
        input: PathBuf,
    },
    Redistribute {
        pages: PathBuf,
        page_number: u32,
        content: PathBuf,
    },
    Compact {
        pages: PathBuf,
    },
    Merge {
        pages: PathBuf,
    },
    Summary {
        pages: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    command: Command,
    config_path: PathBuf,
    format: Option<PaperFormat>,
    start_page: Option<u32>,
    chapter_id: Option<String>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let mut config = load_config(&args.config_path);
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(start_page) = args.start_page {
        config.start_page = start_page;
    }
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        format = %config.format,
        budget = config.page_budget,
        level = %config.log_level,
        "Active pagination configuration"
    );

    match &args.command {
        Command::Split { input } => {
            let text = read_text(input)?;
            let pages = split_pages(&text, &config, args.chapter_id.clone());
            info!(path = %input.display(), pages = pages.len(), "Split chapter");
            print_json(&pages)
        }
        Command::Redistribute {
            pages,
            page_number,
            content,
        } => {
            let existing = read_pages(pages, &config)?;
            let new_content = read_text(content)?;
            let updated = redistribute_page(&existing, *page_number, &new_content, config.format)
                .with_context(|| format!("redistribute page {page_number}"))?;
            warn_on_overflow(&updated, config.format);
            print_json(&updated)
        }
        Command::Compact { pages } => {
            let existing = read_pages(pages, &config)?;
            print_json(&compact_pages(&existing, config.format))
        }
        Command::Merge { pages } => {
            let existing = read_pages(pages, &config)?;
            println!("{}", merge_pages(&existing));
            Ok(())
        }
        Command::Summary { pages } => {
            let existing = read_pages(pages, &config)?;
            print_json(&ChapterSummary::from_pages(&existing))
        }
    }
}

/// Paginate a chapter, optionally compacting it, numbered from the configured
/// start page either way.
fn split_pages(text: &str, config: &PagerConfig, chapter_id: Option<String>) -> Vec<Page> {
    let options = config.pagination_options(chapter_id);
    let pages = paginate_chapter(text, config.start_page, &options);
    if !config.compact_after_split {
        return pages;
    }
    compact_pages(&pages, config.format)
        .into_iter()
        .zip(config.start_page.max(1)..)
        .map(|(page, number)| page.renumbered(number))
        .collect()
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut format = None;
    let mut start_page = None;
    let mut chapter_id = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = PathBuf::from(flag_value(&mut args, "--config")?),
            "--format" => format = Some(flag_value(&mut args, "--format")?.parse::<PaperFormat>()?),
            "--start" => {
                let raw = flag_value(&mut args, "--start")?;
                start_page = Some(
                    raw.parse::<u32>()
                        .with_context(|| format!("invalid --start value: {raw}"))?,
                );
            }
            "--chapter" => chapter_id = Some(flag_value(&mut args, "--chapter")?),
            "-h" | "--help" => bail!(USAGE),
            other if other.starts_with("--") => bail!("unknown flag {other}\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().ok_or_else(|| anyhow!(USAGE))?;
    let mut next_path = |what: &str| -> Result<PathBuf> {
        positional
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("{name} needs {what}\n{USAGE}"))
    };
    let command = match name.as_str() {
        "split" => Command::Split {
            input: next_path("a chapter file")?,
        },
        "redistribute" => {
            let pages = next_path("a pages file")?;
            let raw_number = next_path("a page number")?;
            let raw_number = raw_number.to_string_lossy();
            let page_number = raw_number
                .parse::<u32>()
                .with_context(|| format!("invalid page number: {raw_number}"))?;
            Command::Redistribute {
                pages,
                page_number,
                content: next_path("a content file")?,
            }
        }
        "compact" => Command::Compact {
            pages: next_path("a pages file")?,
        },
        "merge" => Command::Merge {
            pages: next_path("a pages file")?,
        },
        "summary" => Command::Summary {
            pages: next_path("a pages file")?,
        },
        other => bail!("unknown command {other}\n{USAGE}"),
    };

    Ok(CliArgs {
        command,
        config_path,
        format,
        start_page,
        chapter_id,
    })
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_pages(path: &Path, config: &PagerConfig) -> Result<Vec<Page>> {
    let raw = read_text(path)?;
    let records: Vec<PageRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse pages JSON at {}", path.display()))?;
    info!(path = %path.display(), pages = records.len(), "Loaded pages");
    Ok(records
        .into_iter()
        .map(|record| Page::from_record(record, config.format))
        .collect())
}

fn warn_on_overflow(pages: &[Page], format: PaperFormat) {
    for page in pages.iter().filter(|page| page.exceeds_limit(format)) {
        warn!(
            page = page.page_number(),
            length = page.effective_length(),
            limit = format.char_limit(),
            "Page exceeds format limit"
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
