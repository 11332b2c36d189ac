use crate::models::VendorSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Connect,
    Fetch,
    Clean,
    Derive,
    Sanitize,
    Dedupe,
    Persist,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Connect => "connect",
            Stage::Fetch => "fetch",
            Stage::Clean => "clean",
            Stage::Derive => "derive",
            Stage::Sanitize => "sanitize",
            Stage::Dedupe => "dedupe",
            Stage::Persist => "persist",
            Stage::Export => "export",
        };
        f.write_str(name)
    }
}

/// 单次运行统计
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub started_at: DateTime<Utc>,
    pub fetched_rows: usize,
    pub duplicates_dropped: usize,
    pub written_rows: u64,
    /// 前 N 行预览
    pub preview: Vec<VendorSummary>,
}
