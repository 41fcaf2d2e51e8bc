//! Paper formats and their page capacities.

use crate::error::PaginationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical page size a book is laid out for.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PaperFormat {
    A4,
    A5,
    B5,
    Letter,
    Novel,
}

/// Capacity figures for one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Effective characters that comfortably fit one page.
    pub char_limit: usize,
    /// Word count a page needs to be considered full.
    pub word_completion_threshold: usize,
}

impl PaperFormat {
    pub const ALL: [PaperFormat; 5] = [
        PaperFormat::A4,
        PaperFormat::A5,
        PaperFormat::B5,
        PaperFormat::Letter,
        PaperFormat::Novel,
    ];

    pub const fn capacity(self) -> Capacity {
        match self {
            PaperFormat::A4 => Capacity {
                char_limit: 2800,
                word_completion_threshold: 500,
            },
            PaperFormat::A5 => Capacity {
                char_limit: 1500,
                word_completion_threshold: 280,
            },
            PaperFormat::B5 => Capacity {
                char_limit: 2100,
                word_completion_threshold: 380,
            },
            PaperFormat::Letter => Capacity {
                char_limit: 2700,
                word_completion_threshold: 480,
            },
            PaperFormat::Novel => Capacity {
                char_limit: 1200,
                word_completion_threshold: 220,
            },
        }
    }

    pub const fn char_limit(self) -> usize {
        self.capacity().char_limit
    }

    pub const fn word_completion_threshold(self) -> usize {
        self.capacity().word_completion_threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaperFormat::A4 => "a4",
            PaperFormat::A5 => "a5",
            PaperFormat::B5 => "b5",
            PaperFormat::Letter => "letter",
            PaperFormat::Novel => "novel",
        }
    }
}

impl Default for PaperFormat {
    fn default() -> Self {
        PaperFormat::A4
    }
}

impl std::fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaperFormat {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PaperFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| PaginationError::UnknownFormat(s.to_string()))
    }
}
