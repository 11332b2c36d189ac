use tracing::{error, info};
use vendor_summary::service::read_csv_file;
use vendor_summary::{create_pool, db, logging, AppConfig, LoaderError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    logging::init_logging(&config.log)?;

    if let Err(e) = load(&config).await {
        error!("✗ CSV load failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}

async fn load(config: &AppConfig) -> Result<(), LoaderError> {
    let path = config.loader.csv_file.as_ref().ok_or(LoaderError::MissingCsvPath)?;
    let table = read_csv_file(path)?;
    info!(
        "read {} rows, {} columns from {}",
        table.row_count(),
        table.columns.len(),
        path.display()
    );

    let pool = create_pool(&config.database).await?;
    let inserted = db::replace_table(&pool, &config.loader.table, &table, config.loader.chunk_size).await?;
    pool.close().await;

    info!(
        "Table `{}` created successfully in database `{}` ({} rows)",
        config.loader.table, config.database.database, inserted
    );
    Ok(())
}
