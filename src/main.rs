use std::sync::Arc;
use tracing::info;
use vendor_summary::{logging, run_vendor_summary, AppConfig, TracingObserver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::from_env()?;
    logging::init_logging(&config.log)?;
    info!("Starting vendor summary with config: {:?}", config);

    // 失败已由观察者记录，这里只负责非零退出
    let report = run_vendor_summary(&config, Arc::new(TracingObserver)).await?;

    println!(
        "✓ Data load completed. {} rows written, first {}:",
        report.written_rows,
        report.preview.len()
    );
    for row in &report.preview {
        println!(
            "{:>8} {:<32} {:>8} {:>14.2} {:>14.2} {:>10.2} {:>8.2}",
            row.vendor_number,
            row.vendor_name,
            row.brand,
            row.total_purchase_dollars,
            row.total_sales_dollars,
            row.profit_margin,
            row.stock_turnover
        );
    }

    Ok(())
}
