use crate::error::PipelineError;
use crate::models::{Stage, SummaryReport};

/// 流水线进度观察者
pub trait PipelineObserver: Send + Sync {
    fn run_started(&self) {}

    /// 某阶段完成，`rows` 为该阶段输出行数
    fn stage_completed(&self, stage: Stage, rows: usize);

    fn run_finished(&self, _report: &SummaryReport) {}

    fn run_failed(&self, stage: Stage, error: &PipelineError);
}

/// 默认实现：输出到 tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn run_started(&self) {
        tracing::info!("vendor summary run started");
    }

    fn stage_completed(&self, stage: Stage, rows: usize) {
        match stage {
            Stage::Connect => tracing::info!("connected to database"),
            Stage::Fetch => tracing::info!("data fetched from database, {} rows", rows),
            Stage::Clean => tracing::info!("missing and non-finite values replaced, {} rows", rows),
            Stage::Derive => tracing::info!("calculated columns added"),
            Stage::Sanitize => tracing::info!("✓ final cleaning done, no inf/nan left"),
            Stage::Dedupe => tracing::info!("✓ duplicates dropped on VendorNumber + Brand, {} rows left", rows),
            Stage::Persist => tracing::info!("✓ {} rows appended into vendor summary table", rows),
            Stage::Export => tracing::info!("summary exported, {} rows", rows),
        }
    }

    fn run_finished(&self, report: &SummaryReport) {
        tracing::info!(
            "vendor summary completed: fetched {}, duplicates dropped {}, written {}",
            report.fetched_rows,
            report.duplicates_dropped,
            report.written_rows
        );
    }

    fn run_failed(&self, stage: Stage, error: &PipelineError) {
        tracing::error!("✗ vendor summary failed at {} stage: {}", stage, error);
    }
}
