use crate::error::LoaderError;
use crate::models::{ColumnType, CsvColumn, CsvTable};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 读取 CSV 文件
pub fn read_csv_file(path: &Path) -> Result<CsvTable, LoaderError> {
    let file = File::open(path)?;
    read_csv(file)
}

/// 读取整张 CSV 并推断每列类型
///
/// 全部非空值可解析为 i64 时为 BIGINT，可解析为 f64 时为 DOUBLE PRECISION，
/// 否则为 TEXT；整列为空时按 TEXT 处理。单元格内容不做修剪。
pub fn read_csv<R: Read>(reader: R) -> Result<CsvTable, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let names = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let name = h.trim_start_matches('\u{feff}').trim();
            if name.is_empty() {
                Err(LoaderError::EmptyHeader(idx))
            } else {
                Ok(name.to_lowercase())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if names.is_empty() {
        return Err(LoaderError::NoColumns);
    }

    let mut inference: Vec<TypeInference> = vec![TypeInference::default(); names.len()];
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let mut row = Vec::with_capacity(names.len());
        for (idx, cell) in record.iter().enumerate() {
            // 原样保存，只有真正的空单元格为 NULL
            if cell.is_empty() {
                row.push(None);
            } else {
                inference[idx].observe(cell.trim());
                row.push(Some(cell.to_string()));
            }
        }
        rows.push(row);
    }

    let columns = names
        .into_iter()
        .zip(inference)
        .map(|(name, inf)| CsvColumn {
            name,
            column_type: inf.column_type(),
        })
        .collect();

    Ok(CsvTable { columns, rows })
}

#[derive(Debug, Clone, Copy)]
struct TypeInference {
    seen: bool,
    int: bool,
    float: bool,
}

impl Default for TypeInference {
    fn default() -> Self {
        Self {
            seen: false,
            int: true,
            float: true,
        }
    }
}

impl TypeInference {
    fn observe(&mut self, cell: &str) {
        self.seen = true;
        if self.int && cell.parse::<i64>().is_err() {
            self.int = false;
        }
        if self.float && cell.parse::<f64>().is_err() {
            self.float = false;
        }
    }

    fn column_type(&self) -> ColumnType {
        match (self.seen, self.int, self.float) {
            (false, _, _) => ColumnType::Text,
            (true, true, _) => ColumnType::BigInt,
            (true, false, true) => ColumnType::Double,
            _ => ColumnType::Text,
        }
    }
}
