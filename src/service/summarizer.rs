use crate::config::{AppConfig, SummaryConfig};
use crate::db::{self, queries, PgSummaryStore, SummaryStore};
use crate::error::PipelineError;
use crate::models::{Stage, SummaryReport};
use crate::service::observer::PipelineObserver;
use crate::service::transform;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// 供应商销售汇总流水线
///
/// 查询 → 清洗 → 派生 → 再清洗 → 去重 → (导出) → 追加写入。
pub struct SummaryPipeline<S> {
    store: S,
    observer: Arc<dyn PipelineObserver>,
    preview_rows: usize,
    export_path: Option<PathBuf>,
}

impl<S: SummaryStore> SummaryPipeline<S> {
    pub fn new(store: S, observer: Arc<dyn PipelineObserver>) -> Self {
        let defaults = SummaryConfig::default();
        Self {
            store,
            observer,
            preview_rows: defaults.preview_rows,
            export_path: defaults.export_path,
        }
    }

    pub fn with_settings(mut self, config: &SummaryConfig) -> Self {
        self.preview_rows = config.preview_rows;
        self.export_path = config.export_path.clone();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 执行一次汇总
    ///
    /// 写入之前的任何失败都不会触发写入。
    pub async fn run(&self) -> Result<SummaryReport, PipelineError> {
        self.observer.run_started();
        let started_at = Utc::now();

        let raw = self
            .store
            .fetch_vendor_summary()
            .await
            .map_err(|e| self.fail(Stage::Fetch, e))?;
        let fetched_rows = raw.len();
        self.observer.stage_completed(Stage::Fetch, fetched_rows);

        let mut rows = transform::clean(raw);
        self.observer.stage_completed(Stage::Clean, rows.len());

        transform::derive(&mut rows);
        self.observer.stage_completed(Stage::Derive, rows.len());

        transform::sanitize(&mut rows);
        self.observer.stage_completed(Stage::Sanitize, rows.len());

        let rows = transform::dedupe(rows);
        let duplicates_dropped = fetched_rows - rows.len();
        self.observer.stage_completed(Stage::Dedupe, rows.len());

        if let Some(path) = &self.export_path {
            queries::export_to_csv(&rows, path)
                .map_err(|e| self.fail(Stage::Export, PipelineError::from(e)))?;
            self.observer.stage_completed(Stage::Export, rows.len());
        }

        let written_rows = self
            .store
            .append_vendor_summary(&rows)
            .await
            .map_err(|e| self.fail(Stage::Persist, e))?;
        self.observer.stage_completed(Stage::Persist, written_rows as usize);

        let report = SummaryReport {
            started_at,
            fetched_rows,
            duplicates_dropped,
            written_rows,
            preview: rows.into_iter().take(self.preview_rows).collect(),
        };
        self.observer.run_finished(&report);
        Ok(report)
    }

    fn fail(&self, stage: Stage, error: PipelineError) -> PipelineError {
        self.observer.run_failed(stage, &error);
        error
    }
}

/// 按配置连接数据库并执行一次汇总
pub async fn run_vendor_summary(
    config: &AppConfig,
    observer: Arc<dyn PipelineObserver>,
) -> Result<SummaryReport, PipelineError> {
    let pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            let error = PipelineError::Connect(e);
            observer.run_failed(Stage::Connect, &error);
            return Err(error);
        }
    };
    observer.stage_completed(Stage::Connect, 0);

    if config.summary.create_table {
        if let Err(e) = queries::ensure_summary_table(&pool, &config.summary.table).await {
            let error = PipelineError::Write(e);
            observer.run_failed(Stage::Persist, &error);
            return Err(error);
        }
    }

    let store = PgSummaryStore::new(pool, &config.summary);
    let pipeline = SummaryPipeline::new(store, observer).with_settings(&config.summary);
    let result = pipeline.run().await;
    pipeline.store().pool().close().await;
    result
}
