//! 汇总结果的清洗、派生、去重
//!
//! 全部为纯函数，不会失败。

use crate::models::{RawVendorSummary, VendorSummary};
use indexmap::IndexMap;

/// 非有限值 (±inf, NaN) 视为缺失
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn fill(value: Option<f64>) -> f64 {
    finite(value).unwrap_or(0.0)
}

/// 严格数值转换，无法解析或非有限时为 0
pub fn coerce_f64(text: Option<&str>) -> f64 {
    finite(text.and_then(|t| t.trim().parse::<f64>().ok())).unwrap_or(0.0)
}

/// 清洗阶段
///
/// 1. 非有限值替换为缺失
/// 2. 缺失替换为 0 (文本字段为空串)
/// 3. 去掉供应商名称首尾空白
/// 4. Volume 转为 f64
///
/// 派生字段此时为 0，由 [`derive`] 填充。
pub fn clean(raw: Vec<RawVendorSummary>) -> Vec<VendorSummary> {
    raw.into_iter().map(clean_row).collect()
}

fn clean_row(raw: RawVendorSummary) -> VendorSummary {
    VendorSummary {
        vendor_number: raw.vendor_number.unwrap_or(0),
        vendor_name: raw.vendor_name.map(|n| n.trim().to_string()).unwrap_or_default(),
        brand: raw.brand.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        purchase_price: fill(raw.purchase_price),
        actual_price: fill(raw.actual_price),
        volume: coerce_f64(raw.volume.as_deref()),
        total_purchase_quantity: fill(raw.total_purchase_quantity),
        total_purchase_dollars: fill(raw.total_purchase_dollars),
        total_sale_quantity: fill(raw.total_sale_quantity),
        total_sales_dollars: fill(raw.total_sales_dollars),
        total_sale_price: fill(raw.total_sale_price),
        total_excise_tax: fill(raw.total_excise_tax),
        freight_cost: fill(raw.freight_cost),
        ..VendorSummary::default()
    }
}

/// 计算毛利、毛利率、库存周转率、销采比，分母不为正时结果为 0
pub fn derive(rows: &mut [VendorSummary]) {
    for row in rows.iter_mut() {
        row.gross_profit = row.total_sales_dollars - row.total_purchase_dollars;

        row.profit_margin = if row.total_sales_dollars > 0.0 {
            row.gross_profit / row.total_sales_dollars * 100.0
        } else {
            0.0
        };

        row.stock_turnover = if row.total_purchase_quantity > 0.0 {
            row.total_sale_quantity / row.total_purchase_quantity
        } else {
            0.0
        };

        row.sales_purchase_ratio = if row.total_purchase_dollars > 0.0 {
            row.total_sales_dollars / row.total_purchase_dollars
        } else {
            0.0
        };
    }
}

/// 写库前的最终清洗：所有浮点字段强制为有限值 (幂等)
pub fn sanitize(rows: &mut [VendorSummary]) {
    for row in rows.iter_mut() {
        for field in row.numeric_fields_mut() {
            *field = fill(Some(*field));
        }
    }
}

/// 按 (VendorNumber, Brand) 去重，保留最后出现的一行
///
/// 保留行之间的相对顺序与其最后一次出现的位置一致。
pub fn dedupe(rows: Vec<VendorSummary>) -> Vec<VendorSummary> {
    let mut latest: IndexMap<(i64, String), VendorSummary> = IndexMap::with_capacity(rows.len());
    for row in rows.into_iter().rev() {
        let key = {
            let (vendor, brand) = row.key();
            (vendor, brand.to_string())
        };
        latest.entry(key).or_insert(row);
    }

    let mut kept: Vec<VendorSummary> = latest.into_values().collect();
    kept.reverse();
    kept
}
