use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One CSV row; always as long as the header list it was assembled for.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweetType {
    Reply,
    Retweet,
    Quote,
    Original,
}

impl TweetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TweetType::Reply => "reply",
            TweetType::Retweet => "retweet",
            TweetType::Quote => "quote",
            TweetType::Original => "original",
        }
    }
}

impl fmt::Display for TweetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which column set the row assembler emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSchema {
    #[default]
    Standard,
    Extended,
}

impl std::str::FromStr for RowSchema {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(RowSchema::Standard),
            "extended" => Ok(RowSchema::Extended),
            other => Err(format!(
                "unknown schema '{}', expected 'standard' or 'extended'",
                other
            )),
        }
    }
}

/// A file in the source directory that carries the gzip signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArchive {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Completed,
    /// The archive broke mid-way; rows written before the failure are kept.
    Abandoned(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rows_written: usize,
    pub records_skipped: usize,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_completed(&self) -> bool {
        self.outcome == FileOutcome::Completed
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub skipped_files: usize,
}

impl BatchReport {
    pub fn rows_written(&self) -> usize {
        self.files.iter().map(|f| f.rows_written).sum()
    }

    pub fn records_skipped(&self) -> usize {
        self.files.iter().map(|f| f.records_skipped).sum()
    }

    pub fn abandoned_files(&self) -> usize {
        self.files.iter().filter(|f| !f.is_completed()).count()
    }
}
