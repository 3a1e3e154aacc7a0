pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use app::pipelines::tweet_pipeline::TweetPipeline;
pub use config::{toml_config::TomlConfig, EtlSettings};
pub use core::path::{pluck, resolve, Lookup};
pub use core::row::{assemble_row, assemble_row_with, headers};
pub use core::{etl::EtlEngine, fields};
pub use domain::model::{BatchReport, FileOutcome, FileReport, RowSchema, TweetType};
pub use domain::ports::{CollectingSink, TracingSink, WarningSink};
pub use utils::error::{EtlError, Result};
