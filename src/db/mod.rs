pub mod pool;
pub mod queries;
pub mod store;
pub mod table_loader;

pub use pool::create_pool;
pub use queries::*;
pub use store::{PgSummaryStore, SummaryStore};
pub use table_loader::replace_table;

/// PostgreSQL 单条语句绑定参数上限
pub const MAX_BIND_PARAMS: usize = 65_535;

/// 每条 INSERT 的行数，受绑定参数上限约束
pub fn rows_per_statement(column_count: usize, requested: usize) -> usize {
    let limit = MAX_BIND_PARAMS / column_count.max(1);
    requested.clamp(1, limit.max(1))
}

/// 转义标识符 (统一小写，与未加引号的 SQL 标识符一致)
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.to_lowercase().replace('"', "\"\""))
}
