//! 需要真实 PostgreSQL：`DATABASE_URL=postgres://... cargo test -- --ignored`
//!
//! 每个用例在独立 schema 中建表，结束后删除。

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use vendor_summary::config::SummaryConfig;
use vendor_summary::db::{self, queries};
use vendor_summary::service::read_csv;
use vendor_summary::{PgSummaryStore, SummaryPipeline, TracingObserver};

const PURCHASE_CSV: &str = "\
VendorNumber,VendorName,Brand,Description,PurchasePrice,Quantity,Dollars
1,ALPHA SPIRITS  ,A,Gin 750,10,2,20
1,ALPHA SPIRITS  ,A,Gin 750,10,3,30
1,ALPHA SPIRITS  ,Z,Sample,0,9,0
3,BETA IMPORTS,B,Rum 1L,20,10,200
3,BETA IMPORTS,C,Rye 375,5,4,20
";

const PURCHASE_PRICE_CSV: &str = "\
Brand,Price,Volume
A,15.99,750
B,25,1000
C,7.5,375
Z,1,50
";

const SALES_CSV: &str = "\
VendorNo,Brand,SalesDollars,SalesPrice,SalesQuantity,ExciseTax
1,A,30,15,2,0.5
1,A,50,15,2,0.5
3,B,100,25,4,1
";

const INVOICE_CSV: &str = "\
VendorNumber,Freight
3,10
3,2.5
9,100
";

/// 独立 schema 的连接池 (search_path 指向该 schema)
async fn scratch_pool(name: &str) -> (PgPool, String) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
    let schema = format!("vs_test_{}_{}", name, std::process::id());

    let admin = PgPool::connect(&url).await.unwrap();
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema))
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query(&format!("CREATE SCHEMA {}", schema))
        .execute(&admin)
        .await
        .unwrap();
    admin.close().await;

    let options = PgConnectOptions::from_str(&url)
        .unwrap()
        .options([("search_path", schema.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .unwrap();
    (pool, schema)
}

async fn drop_schema(pool: PgPool, schema: &str) {
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema))
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;
}

async fn load_base_tables(pool: &PgPool) {
    for (table, data) in [
        ("purchase", PURCHASE_CSV),
        ("purchase_price", PURCHASE_PRICE_CSV),
        ("sales", SALES_CSV),
        ("vendor_invoice", INVOICE_CSV),
    ] {
        let csv = read_csv(data.as_bytes()).unwrap();
        let inserted = db::replace_table(pool, table, &csv, 2).await.unwrap();
        assert_eq!(inserted as usize, csv.row_count(), "{}", table);
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn summary_query_joins_filters_and_orders() {
    let (pool, schema) = scratch_pool("query").await;
    load_base_tables(&pool).await;

    let rows = queries::fetch_vendor_summary(&pool).await.unwrap();

    let keys: Vec<_> = rows
        .iter()
        .map(|r| (r.vendor_number.unwrap(), r.brand.clone().unwrap()))
        .collect();
    // 按采购总金额降序，零价采购 (Z) 被过滤
    assert_eq!(
        keys,
        vec![(3, "B".to_string()), (1, "A".to_string()), (3, "C".to_string())]
    );

    let a = &rows[1];
    assert_eq!(a.vendor_name.as_deref(), Some("ALPHA SPIRITS  "));
    assert_eq!(a.total_purchase_quantity, Some(5.0));
    assert_eq!(a.total_purchase_dollars, Some(50.0));
    assert_eq!(a.total_sales_dollars, Some(80.0));
    assert_eq!(a.total_sale_quantity, Some(4.0));
    assert_eq!(a.total_excise_tax, Some(1.0));
    assert_eq!(a.actual_price, Some(15.99));
    assert_eq!(a.volume.as_deref(), Some("750"));
    assert_eq!(a.freight_cost, None);

    // 无销售的品牌仍保留，运费按供应商汇总
    let c = &rows[2];
    assert_eq!(c.total_sales_dollars, None);
    assert_eq!(c.total_sale_quantity, None);
    assert_eq!(c.freight_cost, Some(12.5));
    assert_eq!(rows[0].freight_cost, Some(12.5));

    drop_schema(pool, &schema).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn pipeline_appends_summary_from_base_tables() {
    let (pool, schema) = scratch_pool("pipeline").await;
    load_base_tables(&pool).await;

    let config = SummaryConfig::default();
    queries::ensure_summary_table(&pool, &config.table).await.unwrap();

    let store = PgSummaryStore::new(pool.clone(), &config);
    let pipeline = SummaryPipeline::new(store, Arc::new(TracingObserver)).with_settings(&config);
    let report = pipeline.run().await.unwrap();
    assert_eq!(report.fetched_rows, 3);
    assert_eq!(report.written_rows, 3);

    let a = report.preview.iter().find(|r| r.brand == "A").unwrap();
    assert_eq!(a.vendor_name, "ALPHA SPIRITS");
    assert_eq!(a.volume, 750.0);
    assert_eq!(a.total_purchase_dollars, 50.0);
    assert_eq!(a.total_sales_dollars, 80.0);
    assert_eq!(a.gross_profit, 30.0);
    assert!((a.profit_margin - 37.5).abs() < 1e-9);
    assert!((a.stock_turnover - 0.8).abs() < 1e-9);
    assert!((a.sales_purchase_ratio - 1.6).abs() < 1e-9);
    assert_eq!(a.freight_cost, 0.0);

    let stored: Vec<(i64, String, f64, f64)> = sqlx::query_as(
        "SELECT VendorNumber, Brand, TotalPurchaseDollars, FreightCost
         FROM vendor_sales_summary
         ORDER BY TotalPurchaseDollars DESC",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        stored,
        vec![
            (3, "B".to_string(), 200.0, 12.5),
            (1, "A".to_string(), 50.0, 0.0),
            (3, "C".to_string(), 20.0, 12.5),
        ]
    );

    // 第二次追加违反主键，整体回滚
    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, vendor_summary::PipelineError::Write(_)));
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vendor_sales_summary")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 3);

    drop_schema(pool, &schema).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn replace_table_drops_and_recreates() {
    let (pool, schema) = scratch_pool("loader").await;

    let first = read_csv("Brand,Price,Note\nA,1.5,x\nB,2,\n".as_bytes()).unwrap();
    db::replace_table(&pool, "Items", &first, 1000).await.unwrap();

    let second = read_csv("Brand,Qty\n  A  ,3\n".as_bytes()).unwrap();
    let inserted = db::replace_table(&pool, "Items", &second, 1000).await.unwrap();
    assert_eq!(inserted, 1);

    let columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT column_name::text, data_type::text
         FROM information_schema.columns
         WHERE table_schema = $1 AND table_name = 'items'
         ORDER BY ordinal_position",
    )
    .bind(&schema)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        columns,
        vec![
            ("brand".to_string(), "text".to_string()),
            ("qty".to_string(), "bigint".to_string()),
        ]
    );

    let (brand, qty): (String, i64) = sqlx::query_as("SELECT brand, qty FROM items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(brand, "  A  ");
    assert_eq!(qty, 3);

    let nulls = read_csv("Brand,Note\nA,\n".as_bytes()).unwrap();
    db::replace_table(&pool, "items", &nulls, 1000).await.unwrap();
    let (note,): (Option<String>,) = sqlx::query_as("SELECT note FROM items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(note, None);

    drop_schema(pool, &schema).await;
}
