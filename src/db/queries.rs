use crate::db::{quote_ident, rows_per_statement};
use crate::error::PipelineError;
use crate::models::{RawVendorSummary, VendorSummary};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// 供应商销售汇总查询
///
/// 以采购汇总为主表，左连接销售汇总 (VendorNumber = VendorNo 且 Brand 相同)
/// 与运费汇总 (VendorNumber)，按采购总金额降序。
/// 聚合结果统一转为 float8，Brand/Volume 转为文本，不依赖导入时推断的列类型。
pub const VENDOR_SUMMARY_QUERY: &str = r#"
    WITH freight_summary AS (
        SELECT VendorNumber,
               SUM(Freight)::float8 AS freight_cost
        FROM vendor_invoice
        GROUP BY VendorNumber
    ),
    purchase_summary AS (
        SELECT p.VendorNumber,
               p.VendorName,
               p.Brand,
               p.Description,
               p.PurchasePrice,
               pp.Volume,
               pp.Price AS actual_price,
               SUM(p.Quantity) AS total_purchase_quantity,
               SUM(p.Dollars) AS total_purchase_dollars
        FROM purchase p
        JOIN purchase_price pp ON p.Brand = pp.Brand
        WHERE p.PurchasePrice > 0
        GROUP BY p.VendorNumber, p.VendorName, p.Brand, p.Description,
                 p.PurchasePrice, pp.Price, pp.Volume
    ),
    sales_summary AS (
        SELECT VendorNo,
               Brand,
               SUM(SalesDollars) AS total_sales_dollars,
               SUM(SalesPrice) AS total_sale_price,
               SUM(SalesQuantity) AS total_sale_quantity,
               SUM(ExciseTax) AS total_excise_tax
        FROM sales
        GROUP BY VendorNo, Brand
    )
    SELECT ps.VendorNumber::bigint AS vendor_number,
           ps.VendorName::text AS vendor_name,
           ps.Brand::text AS brand,
           ps.Description::text AS description,
           ps.PurchasePrice::float8 AS purchase_price,
           ps.actual_price::float8 AS actual_price,
           ps.Volume::text AS volume,
           ps.total_purchase_quantity::float8 AS total_purchase_quantity,
           ps.total_purchase_dollars::float8 AS total_purchase_dollars,
           ss.total_sale_quantity::float8 AS total_sale_quantity,
           ss.total_sales_dollars::float8 AS total_sales_dollars,
           ss.total_sale_price::float8 AS total_sale_price,
           ss.total_excise_tax::float8 AS total_excise_tax,
           fs.freight_cost
    FROM purchase_summary ps
    LEFT JOIN sales_summary ss
        ON ps.VendorNumber = ss.VendorNo
       AND ps.Brand = ss.Brand
    LEFT JOIN freight_summary fs
        ON ps.VendorNumber = fs.VendorNumber
    ORDER BY ps.total_purchase_dollars DESC NULLS LAST
"#;

/// 查询供应商销售汇总
pub async fn fetch_vendor_summary(pool: &PgPool) -> Result<Vec<RawVendorSummary>, sqlx::Error> {
    sqlx::query_as::<_, RawVendorSummary>(VENDOR_SUMMARY_QUERY)
        .fetch_all(pool)
        .await
}

/// 建表 (已存在时跳过)，主键 (VendorNumber, Brand)
pub async fn ensure_summary_table(pool: &PgPool, table: &str) -> Result<(), sqlx::Error> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            VendorNumber BIGINT NOT NULL,
            VendorName TEXT NOT NULL,
            Brand TEXT NOT NULL,
            Description TEXT NOT NULL,
            PurchasePrice DOUBLE PRECISION NOT NULL,
            ActualPrice DOUBLE PRECISION NOT NULL,
            Volume DOUBLE PRECISION NOT NULL,
            TotalPurchaseQuantity DOUBLE PRECISION NOT NULL,
            TotalPurchaseDollars DOUBLE PRECISION NOT NULL,
            TotalSaleQuantity DOUBLE PRECISION NOT NULL,
            TotalSalesDollars DOUBLE PRECISION NOT NULL,
            TotalSalePrice DOUBLE PRECISION NOT NULL,
            TotalExciseTax DOUBLE PRECISION NOT NULL,
            FreightCost DOUBLE PRECISION NOT NULL,
            GrossProfit DOUBLE PRECISION NOT NULL,
            ProfitMargin DOUBLE PRECISION NOT NULL,
            StockTurnover DOUBLE PRECISION NOT NULL,
            SalesPurchaseRatio DOUBLE PRECISION NOT NULL,
            PRIMARY KEY (VendorNumber, Brand)
        )
        "#,
        quote_ident(table)
    );

    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// 追加写入汇总结果
///
/// 分块构建批量 INSERT，全部分块在同一事务中执行；任一分块失败或超时时整体回滚。
pub async fn append_vendor_summary(
    pool: &PgPool,
    table: &str,
    rows: &[VendorSummary],
    chunk_size: usize,
    chunk_timeout: Duration,
) -> Result<u64, PipelineError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let chunk_size = rows_per_statement(VendorSummary::COLUMNS.len(), chunk_size);
    let insert_head = format!(
        "INSERT INTO {} ({}) ",
        quote_ident(table),
        VendorSummary::COLUMNS.join(", ")
    );

    let start_time = Instant::now();
    let mut tx = pool.begin().await.map_err(PipelineError::Write)?;
    let mut affected = 0u64;

    for (idx, chunk) in rows.chunks(chunk_size).enumerate() {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(&insert_head);
        query_builder.push_values(chunk, |mut b, row| {
            b.push_bind(row.vendor_number)
                .push_bind(&row.vendor_name)
                .push_bind(&row.brand)
                .push_bind(&row.description)
                .push_bind(row.purchase_price)
                .push_bind(row.actual_price)
                .push_bind(row.volume)
                .push_bind(row.total_purchase_quantity)
                .push_bind(row.total_purchase_dollars)
                .push_bind(row.total_sale_quantity)
                .push_bind(row.total_sales_dollars)
                .push_bind(row.total_sale_price)
                .push_bind(row.total_excise_tax)
                .push_bind(row.freight_cost)
                .push_bind(row.gross_profit)
                .push_bind(row.profit_margin)
                .push_bind(row.stock_turnover)
                .push_bind(row.sales_purchase_ratio);
        });

        let execute_result =
            tokio::time::timeout(chunk_timeout, query_builder.build().execute(&mut *tx)).await;

        match execute_result {
            Ok(Ok(result)) => {
                affected += result.rows_affected();
                tracing::debug!("chunk {} inserted, {} rows", idx, result.rows_affected());
            }
            Ok(Err(e)) => {
                tracing::error!("✗ INSERT failed at chunk {}, rolling back: {:?}", idx, e);
                return Err(PipelineError::Write(e));
            }
            Err(_) => {
                tracing::error!("✗ INSERT timed out at chunk {} (>{:?}), rolling back", idx, chunk_timeout);
                return Err(PipelineError::WriteTimeout(chunk_timeout));
            }
        }
    }

    tx.commit().await.map_err(PipelineError::Write)?;
    tracing::info!(
        "✓ appended {} rows into {}, elapsed: {:?}",
        affected,
        table,
        start_time.elapsed()
    );
    Ok(affected)
}

/// 导出汇总结果到 CSV
pub fn export_to_csv(rows: &[VendorSummary], output_path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(output_path)?;
    write_csv(rows, file)
}

/// 以输出表列名为表头写出 CSV
pub fn write_csv<W: Write>(rows: &[VendorSummary], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        writer.write_record(VendorSummary::COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
