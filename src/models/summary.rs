use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 汇总查询原始结果
///
/// 左连接未命中的字段为 NULL，数值字段一律可空；Volume 以文本形式返回。
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct RawVendorSummary {
    pub vendor_number: Option<i64>,
    pub vendor_name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub purchase_price: Option<f64>,
    pub actual_price: Option<f64>,
    pub volume: Option<String>,
    pub total_purchase_quantity: Option<f64>,
    pub total_purchase_dollars: Option<f64>,
    pub total_sale_quantity: Option<f64>,
    pub total_sales_dollars: Option<f64>,
    pub total_sale_price: Option<f64>,
    pub total_excise_tax: Option<f64>,
    pub freight_cost: Option<f64>,
}

/// 供应商销售汇总行 (vendor_sales_summary)
///
/// 主键为 (VendorNumber, Brand)。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VendorSummary {
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brand: String,
    pub description: String,
    pub purchase_price: f64,
    pub actual_price: f64,
    pub volume: f64,
    pub total_purchase_quantity: f64,
    pub total_purchase_dollars: f64,
    pub total_sale_quantity: f64,
    pub total_sales_dollars: f64,
    pub total_sale_price: f64,
    pub total_excise_tax: f64,
    pub freight_cost: f64,
    pub gross_profit: f64,
    pub profit_margin: f64,
    pub stock_turnover: f64,
    pub sales_purchase_ratio: f64,
}

impl VendorSummary {
    /// 输出表列名，顺序与 INSERT 绑定顺序一致
    pub const COLUMNS: [&'static str; 18] = [
        "VendorNumber",
        "VendorName",
        "Brand",
        "Description",
        "PurchasePrice",
        "ActualPrice",
        "Volume",
        "TotalPurchaseQuantity",
        "TotalPurchaseDollars",
        "TotalSaleQuantity",
        "TotalSalesDollars",
        "TotalSalePrice",
        "TotalExciseTax",
        "FreightCost",
        "GrossProfit",
        "ProfitMargin",
        "StockTurnover",
        "SalesPurchaseRatio",
    ];

    pub fn key(&self) -> (i64, &str) {
        (self.vendor_number, &self.brand)
    }

    /// 所有浮点字段
    pub fn numeric_fields(&self) -> [f64; 14] {
        [
            self.purchase_price,
            self.actual_price,
            self.volume,
            self.total_purchase_quantity,
            self.total_purchase_dollars,
            self.total_sale_quantity,
            self.total_sales_dollars,
            self.total_sale_price,
            self.total_excise_tax,
            self.freight_cost,
            self.gross_profit,
            self.profit_margin,
            self.stock_turnover,
            self.sales_purchase_ratio,
        ]
    }

    pub fn numeric_fields_mut(&mut self) -> [&mut f64; 14] {
        [
            &mut self.purchase_price,
            &mut self.actual_price,
            &mut self.volume,
            &mut self.total_purchase_quantity,
            &mut self.total_purchase_dollars,
            &mut self.total_sale_quantity,
            &mut self.total_sales_dollars,
            &mut self.total_sale_price,
            &mut self.total_excise_tax,
            &mut self.freight_cost,
            &mut self.gross_profit,
            &mut self.profit_margin,
            &mut self.stock_turnover,
            &mut self.sales_purchase_ratio,
        ]
    }
}
