pub mod report;
pub mod summary;
pub mod table;

pub use report::{Stage, SummaryReport};
pub use summary::{RawVendorSummary, VendorSummary};
pub use table::{ColumnType, CsvColumn, CsvTable};
