pub mod error;
pub mod export;
pub mod extensions;
pub mod library_config;
pub mod manager;
pub mod scanner;
pub mod selection;

pub use error::{ConfigError, ExportError};
pub use library_config::{AmalyzerConfig, AmalyzerConfigBuilder, TableWidths};
pub use manager::{BatchRunner, RunOptions, RunOptionsBuilder, RunSummary};
pub use scanner::{LocalScanner, ScanOptions};
pub use selection::{FilterSpec, SortKey};
