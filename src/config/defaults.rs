use crate::format::PaperFormat;
use crate::pagination::DEFAULT_PAGE_BUDGET;

pub(crate) fn default_format() -> PaperFormat {
    PaperFormat::A4
}

pub(crate) fn default_page_budget() -> usize {
    DEFAULT_PAGE_BUDGET
}

pub(crate) fn default_start_page() -> u32 {
    1
}

pub(crate) fn default_compact_after_split() -> bool {
    false
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
