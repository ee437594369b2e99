pub mod advice;
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod parser;

pub use advice::{AdviceError, AdviceSource, MockAdviceSource, OpenAiAdviceSource};
pub use config::Config;
pub use db::{init_db, Repository, SnapshotRecord};
pub use domain::{Action, ClosedTrade, OpenPosition, Side, Symbol};
pub use engine::{summarize, ParseOutcome, Summary};
pub use error::AppError;
