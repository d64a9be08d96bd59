pub mod cleaning;
pub mod cli;
pub mod collector;
pub mod config;
pub mod dataset;
pub mod error;
pub mod franchises;
pub mod game;
pub mod html_table;
pub mod http_cache;
pub mod http_client;
pub mod pipeline;
pub mod rolling;
pub mod schedule;

pub use error::{PipelineError, Result};
