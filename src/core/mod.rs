pub mod archive;
pub mod batch;
pub mod etl;
pub mod fields;
pub mod path;
pub mod row;

pub use crate::domain::ports::{ConfigProvider, Pipeline};
