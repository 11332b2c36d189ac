use std::time::Duration;
use thiserror::Error;

/// 汇总流水线错误
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("vendor summary query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("failed to append vendor summary rows: {0}")]
    Write(#[source] sqlx::Error),
    #[error("append to vendor summary timed out after {0:?}")]
    WriteTimeout(Duration),
    #[error("failed to export vendor summary: {0}")]
    Export(#[from] csv::Error),
}

/// CSV 导入错误
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("no CSV file configured (set loader.csv_file)")]
    MissingCsvPath,
    #[error("failed to read CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header has no columns")]
    NoColumns,
    #[error("CSV header column {0} is empty")]
    EmptyHeader(usize),
    #[error("database error while loading table: {0}")]
    Database(#[from] sqlx::Error),
}
