//! Trailing-six-month reconciliation of budgets against spending.
//!
//! Pure computation over rows already fetched from storage: no I/O and
//! no clock access. The reference date is an argument, so the same
//! inputs always produce the same rollup.

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::Month;

pub(crate) const WINDOW_MONTHS: usize = 6;

/// Transaction row with its category name resolved by the store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionRow {
    pub(crate) date: NaiveDate,
    pub(crate) category: String,
    pub(crate) amount: Decimal,
}

/// Budget row with its category name resolved by the store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetRow {
    pub(crate) month: Month,
    pub(crate) category: String,
    pub(crate) amount: Decimal,
    pub(crate) description: String,
}

/// The six calendar months ending at a reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthWindow {
    /// Index 0 is the month containing the reference date, index 5 the
    /// month five steps earlier. Wraps December -> January correctly.
    pub(crate) months_descending: [Month; WINDOW_MONTHS],
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl MonthWindow {
    pub(crate) fn ending_at(now: NaiveDate) -> Self {
        let current = Month::of(now);
        let mut months = [current; WINDOW_MONTHS];
        for (i, slot) in months.iter_mut().enumerate() {
            *slot = current.back(i as u32);
        }
        // Six calendar months back, clamped to the last valid day when
        // the day-of-month does not exist in the target month.
        let start = now
            .checked_sub_months(Months::new(WINDOW_MONTHS as u32))
            .unwrap_or(NaiveDate::MIN);
        Self {
            months_descending: months,
            start,
            end: now,
        }
    }

    pub(crate) fn current_month(&self) -> Month {
        self.months_descending[0]
    }

    pub(crate) fn contains(&self, month: Month) -> bool {
        self.months_descending.contains(&month)
    }
}

/// One category's budgeted and actual amounts within a single month.
/// Either side is zero when that month has no matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryBreakdown {
    pub(crate) name: String,
    pub(crate) budget_amount: Decimal,
    pub(crate) transaction_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthBucket {
    pub(crate) month: Month,
    pub(crate) categories: Vec<CategoryBreakdown>,
}

impl MonthBucket {
    pub(crate) fn total_budgeted(&self) -> Decimal {
        self.categories.iter().map(|c| c.budget_amount).sum()
    }

    pub(crate) fn total_spent(&self) -> Decimal {
        self.categories.iter().map(|c| c.transaction_amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rollup {
    /// Index 0 is the current month, index 5 the oldest window month.
    pub(crate) months: Vec<MonthBucket>,
    /// Flat listing of the current month's budgets for direct display.
    pub(crate) current_month_budgets: Vec<BudgetRow>,
}

impl Rollup {
    pub(crate) fn current(&self) -> &MonthBucket {
        &self.months[0]
    }
}

/// Reconcile budgets against spending over the six months ending at
/// `now`.
///
/// Rows outside the window are discarded here rather than trusted to
/// have been pre-filtered, so an over-fetching caller gets the same
/// answer. Duplicate (month, category) budget rows are summed; the
/// write path prevents them, but the engine does not depend on that.
pub(crate) fn compute_rollup(
    now: NaiveDate,
    transactions: &[TransactionRow],
    budgets: &[BudgetRow],
) -> Rollup {
    let window = MonthWindow::ending_at(now);

    let in_window_budgets: Vec<&BudgetRow> = budgets
        .iter()
        .filter(|b| window.contains(b.month))
        .collect();
    let in_range_txns: Vec<(&TransactionRow, Month)> = transactions
        .iter()
        .filter(|t| t.date >= window.start && t.date <= window.end)
        .map(|t| (t, Month::of(t.date)))
        .collect();

    let mut budgeted: HashMap<(Month, &str), Decimal> = HashMap::new();
    for b in &in_window_budgets {
        *budgeted.entry((b.month, b.category.as_str())).or_default() += b.amount;
    }
    let mut spent: HashMap<(Month, &str), Decimal> = HashMap::new();
    for (t, month) in &in_range_txns {
        *spent.entry((*month, t.category.as_str())).or_default() += t.amount;
    }

    let months = window
        .months_descending
        .iter()
        .map(|&month| {
            // Union of category names seen on either side this month,
            // budget side first, each name exactly once.
            let names = in_window_budgets
                .iter()
                .filter(|b| b.month == month)
                .map(|b| b.category.as_str())
                .chain(
                    in_range_txns
                        .iter()
                        .filter(|(_, m)| *m == month)
                        .map(|(t, _)| t.category.as_str()),
                );

            let mut seen = HashSet::new();
            let mut categories = Vec::new();
            for name in names {
                if !seen.insert(name) {
                    continue;
                }
                categories.push(CategoryBreakdown {
                    name: name.to_string(),
                    budget_amount: budgeted
                        .get(&(month, name))
                        .copied()
                        .unwrap_or(Decimal::ZERO),
                    transaction_amount: spent
                        .get(&(month, name))
                        .copied()
                        .unwrap_or(Decimal::ZERO),
                });
            }
            MonthBucket { month, categories }
        })
        .collect();

    let current = window.current_month();
    let current_month_budgets = budgets
        .iter()
        .filter(|b| b.month == current)
        .cloned()
        .collect();

    Rollup {
        months,
        current_month_budgets,
    }
}
