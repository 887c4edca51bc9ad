mod schema;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;
use crate::rollup::{BudgetRow, TransactionRow};

const DATE_FMT: &str = "%Y-%m-%d";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        if cat.name.trim().is_empty() {
            bail!("Category name cannot be empty");
        }
        self.conn
            .execute(
                "INSERT INTO categories (name) VALUES (?1)",
                params![cat.name],
            )
            .with_context(|| format!("Failed to create category '{}'", cat.name))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        if txn.amount <= Decimal::ZERO {
            bail!("Transaction amount must be positive");
        }
        self.conn.execute(
            "INSERT INTO transactions (category_id, description, amount, date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                txn.category_id,
                txn.description,
                txn.amount.to_string(),
                txn.date.format(DATE_FMT).to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_transactions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        category_id: Option<i64>,
        search: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT t.id, t.category_id, t.description, t.amount, t.date
             FROM transactions t WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(cid) = category_id {
            sql.push_str(&format!(" AND t.category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some(s) = search {
            sql.push_str(&format!(
                " AND t.description LIKE ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }
        if let Some(o) = offset {
            sql.push_str(&format!(" OFFSET {o}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let amount_str: String = row.get(3)?;
            let date_str: String = row.get(4)?;
            Ok(Transaction {
                id: Some(row.get(0)?),
                category_id: row.get(1)?,
                description: row.get(2)?,
                amount: Decimal::from_str(&amount_str).unwrap_or_default(),
                date: NaiveDate::parse_from_str(&date_str, DATE_FMT).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Latest transactions by date, for the dashboard panel.
    pub(crate) fn recent_transactions(&self, limit: u32) -> Result<Vec<Transaction>> {
        self.get_transactions(Some(limit), None, None, None)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    pub(crate) fn update_transaction_description(
        &self,
        transaction_id: i64,
        description: &str,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE transactions SET description = ?1 WHERE id = ?2",
            params![description, transaction_id],
        )?;
        Ok(())
    }

    pub(crate) fn update_transaction_category(
        &self,
        transaction_id: i64,
        category_id: i64,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE transactions SET category_id = ?1 WHERE id = ?2",
            params![category_id, transaction_id],
        )?;
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Create a budget. Rejects a second budget for the same
    /// (month, category); use `update_budget` to change an existing one.
    pub(crate) fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        if budget.amount <= Decimal::ZERO {
            bail!("Budget amount must be positive");
        }
        if self.find_budget(budget.month, budget.category_id)?.is_some() {
            bail!(
                "A budget already exists for this category in {}",
                budget.month
            );
        }
        self.conn.execute(
            "INSERT INTO budgets (category_id, month, amount, description)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                budget.category_id,
                budget.month.name(),
                budget.amount.to_string(),
                budget.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn update_budget(&self, budget: &Budget) -> Result<()> {
        if budget.amount <= Decimal::ZERO {
            bail!("Budget amount must be positive");
        }
        let id = match budget.id {
            Some(id) => id,
            None => bail!("Cannot update a budget that has not been saved"),
        };
        self.conn.execute(
            "UPDATE budgets SET category_id = ?1, month = ?2, amount = ?3, description = ?4
             WHERE id = ?5",
            params![
                budget.category_id,
                budget.month.name(),
                budget.amount.to_string(),
                budget.description,
                id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn get_budgets(&self, month: Month) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, month, amount, description FROM budgets WHERE month = ?1",
        )?;
        let rows = stmt.query_map(params![month.name()], |row| {
            let amt_str: String = row.get(3)?;
            Ok(Budget {
                id: Some(row.get(0)?),
                category_id: row.get(1)?,
                month,
                amount: Decimal::from_str(&amt_str).unwrap_or_default(),
                description: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn find_budget(&self, month: Month, category_id: i64) -> Result<Option<Budget>> {
        let result = self.conn.query_row(
            "SELECT id, category_id, amount, description FROM budgets
             WHERE month = ?1 AND category_id = ?2",
            params![month.name(), category_id],
            |row| {
                let amt_str: String = row.get(2)?;
                Ok(Budget {
                    id: Some(row.get(0)?),
                    category_id: row.get(1)?,
                    month,
                    amount: Decimal::from_str(&amt_str).unwrap_or_default(),
                    description: row.get(3)?,
                })
            },
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Rollup feeds ──────────────────────────────────────────

    /// Transactions within a date range (inclusive), category names
    /// resolved. Feed for the rollup engine.
    pub(crate) fn transactions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.date, c.name, t.amount
             FROM transactions t
             JOIN categories c ON t.category_id = c.id
             WHERE t.date >= ?1 AND t.date <= ?2",
        )?;
        let rows = stmt.query_map(
            params![
                start.format(DATE_FMT).to_string(),
                end.format(DATE_FMT).to_string(),
            ],
            |row| {
                let date_str: String = row.get(0)?;
                let amount_str: String = row.get(2)?;
                Ok(TransactionRow {
                    date: NaiveDate::parse_from_str(&date_str, DATE_FMT).unwrap_or_default(),
                    category: row.get(1)?,
                    amount: Decimal::from_str(&amount_str).unwrap_or_default(),
                })
            },
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Budgets whose month is one of the given months, category names
    /// resolved. Feed for the rollup engine.
    pub(crate) fn budgets_in_months(&self, months: &[Month]) -> Result<Vec<BudgetRow>> {
        if months.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: String = (0..months.len())
            .map(|i| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(",");
        let sql = format!(
            "SELECT b.month, c.name, b.amount, b.description
             FROM budgets b
             JOIN categories c ON b.category_id = c.id
             WHERE b.month IN ({placeholders})"
        );

        let param_values: Vec<Box<dyn rusqlite::types::ToSql>> = months
            .iter()
            .map(|m| Box::new(m.name()) as Box<dyn rusqlite::types::ToSql>)
            .collect();
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let month: String = row.get(0)?;
            let amount_str: String = row.get(2)?;
            Ok((
                month,
                row.get::<_, String>(1)?,
                Decimal::from_str(&amount_str).unwrap_or_default(),
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut budgets = Vec::new();
        for row in rows {
            let (month_str, category, amount, description) = row?;
            let month = Month::parse(&month_str)
                .with_context(|| format!("Unrecognized month '{month_str}' in budgets table"))?;
            budgets.push(BudgetRow {
                month,
                category,
                amount,
                description,
            });
        }
        Ok(budgets)
    }
}

#[cfg(test)]
mod tests;
