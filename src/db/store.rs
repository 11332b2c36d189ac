use crate::config::SummaryConfig;
use crate::db::queries;
use crate::error::PipelineError;
use crate::models::{RawVendorSummary, VendorSummary};
use futures::future::BoxFuture;
use futures::FutureExt;
use sqlx::PgPool;
use std::time::Duration;

/// 汇总流水线的查询/写入接口
pub trait SummaryStore: Send + Sync {
    /// 执行汇总查询
    fn fetch_vendor_summary(&self) -> BoxFuture<'_, Result<Vec<RawVendorSummary>, PipelineError>>;

    /// 追加写入，返回写入行数
    fn append_vendor_summary<'a>(
        &'a self,
        rows: &'a [VendorSummary],
    ) -> BoxFuture<'a, Result<u64, PipelineError>>;
}

/// PostgreSQL 实现
pub struct PgSummaryStore {
    pool: PgPool,
    table: String,
    chunk_size: usize,
    write_timeout: Duration,
}

impl PgSummaryStore {
    pub fn new(pool: PgPool, config: &SummaryConfig) -> Self {
        Self {
            pool,
            table: config.table.clone(),
            chunk_size: config.chunk_size,
            write_timeout: config.write_timeout(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl SummaryStore for PgSummaryStore {
    fn fetch_vendor_summary(&self) -> BoxFuture<'_, Result<Vec<RawVendorSummary>, PipelineError>> {
        async move {
            queries::fetch_vendor_summary(&self.pool)
                .await
                .map_err(PipelineError::Query)
        }
        .boxed()
    }

    fn append_vendor_summary<'a>(
        &'a self,
        rows: &'a [VendorSummary],
    ) -> BoxFuture<'a, Result<u64, PipelineError>> {
        queries::append_vendor_summary(
            &self.pool,
            &self.table,
            rows,
            self.chunk_size,
            self.write_timeout,
        )
        .boxed()
    }
}
