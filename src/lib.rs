pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{create_pool, PgSummaryStore, SummaryStore};
pub use error::{LoaderError, PipelineError};
pub use models::{RawVendorSummary, SummaryReport, VendorSummary};
pub use service::{run_vendor_summary, PipelineObserver, SummaryPipeline, TracingObserver};
