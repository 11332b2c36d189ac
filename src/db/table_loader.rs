use crate::db::{quote_ident, rows_per_statement};
use crate::error::LoaderError;
use crate::models::{ColumnType, CsvTable};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

/// 建表语句
pub fn create_table_sql(table: &str, data: &CsvTable) -> String {
    let columns: Vec<String> = data
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.sql_type()))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), columns.join(", "))
}

/// 用 CSV 内容替换整张表 (已存在则先删除)
///
/// 删表、建表、插入在同一事务中完成，返回插入行数。
pub async fn replace_table(
    pool: &PgPool,
    table: &str,
    data: &CsvTable,
    chunk_size: usize,
) -> Result<u64, LoaderError> {
    if data.columns.is_empty() {
        return Err(LoaderError::NoColumns);
    }

    let start_time = Instant::now();
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create_table_sql(table, data))
        .execute(&mut *tx)
        .await?;

    let column_list: Vec<String> = data.columns.iter().map(|c| quote_ident(&c.name)).collect();
    let insert_head = format!("INSERT INTO {} ({}) ", quote_ident(table), column_list.join(", "));
    let chunk_size = rows_per_statement(data.columns.len(), chunk_size);

    let mut inserted = 0u64;
    for chunk in data.rows.chunks(chunk_size) {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(&insert_head);
        query_builder.push_values(chunk, |mut b, row| {
            for (column, cell) in data.columns.iter().zip(row) {
                match column.column_type {
                    ColumnType::BigInt => {
                        b.push_bind(cell.as_deref().and_then(|v| v.trim().parse::<i64>().ok()));
                    }
                    ColumnType::Double => {
                        b.push_bind(cell.as_deref().and_then(|v| v.trim().parse::<f64>().ok()));
                    }
                    ColumnType::Text => {
                        b.push_bind(cell.clone());
                    }
                }
            }
        });

        inserted += query_builder.build().execute(&mut *tx).await?.rows_affected();
        tracing::debug!("{}: {} / {} rows inserted", table, inserted, data.row_count());
    }

    tx.commit().await?;
    tracing::info!(
        "table {} replaced with {} rows, elapsed: {:?}",
        table,
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}
