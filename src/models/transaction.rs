use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A single dated expense. Amounts are strictly positive; the sign
/// convention is "money out", there is no income side.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub category_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(category_id: i64, description: String, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            category_id,
            description,
            amount,
            date,
        }
    }
}
