pub mod csv_loader;
pub mod observer;
pub mod summarizer;
pub mod transform;

pub use csv_loader::{read_csv, read_csv_file};
pub use observer::{PipelineObserver, TracingObserver};
pub use summarizer::{run_vendor_summary, SummaryPipeline};
