/// 列类型 (由 CSV 内容推断)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Text,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvColumn {
    pub name: String,
    pub column_type: ColumnType,
}

/// 整个 CSV 文件读入内存后的表示，空单元格为 None
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub columns: Vec<CsvColumn>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl CsvTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
