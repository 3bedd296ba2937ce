// Library surface for the CLI and integration tests.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod generator;
pub mod phrase;
pub mod report;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod storage;
pub mod time_series;
pub mod trainer;
pub mod trigram;
pub mod util;
pub mod windowed_average;

pub use error::{TrainerError, TrainerResult};
pub use generator::GeneratorKind;
pub use session::Session;
pub use stats::{SessionOutcome, Statistics};
pub use storage::{FileStore, StatsStore};
pub use trainer::Trainer;
