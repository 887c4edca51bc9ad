use rust_decimal::Decimal;

use super::Month;

/// A planned spending limit for one category in one calendar month.
/// At most one budget may exist per (month, category) pair; the store
/// enforces this at write time.
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub category_id: i64,
    pub month: Month,
    pub amount: Decimal,
    pub description: String,
}

impl Budget {
    pub fn new(category_id: i64, month: Month, amount: Decimal, description: String) -> Self {
        Self {
            id: None,
            category_id,
            month,
            amount,
            description,
        }
    }
}
