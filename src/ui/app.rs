use anyhow::Result;
use chrono::NaiveDate;

use crate::db::Database;
use crate::models::*;
use crate::rollup::{self, MonthWindow, Rollup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Budgets,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Budgets,
            Self::Categories,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Budgets => write!(f, "Budgets"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
    DeleteBudget { id: i64, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// Reference date the rollup window ends at. Captured once at
    /// startup so every refresh reconciles the same six months.
    pub(crate) today: NaiveDate,

    // Dashboard
    pub(crate) rollup: Rollup,
    pub(crate) recent: Vec<Transaction>,
    pub(crate) transaction_count: i64,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Categories
    pub(crate) categories: Vec<Category>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Budgets
    pub(crate) budgets: Vec<Budget>,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            today,

            rollup: rollup::compute_rollup(today, &[], &[]),
            recent: Vec::new(),
            transaction_count: 0,

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,

            categories: Vec::new(),
            category_index: 0,
            category_scroll: 0,

            budgets: Vec::new(),
            budget_index: 0,
            budget_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn current_month(&self) -> Month {
        Month::of(self.today)
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let window = MonthWindow::ending_at(self.today);
        let txns = db.transactions_in_range(window.start, window.end)?;
        let budgets = db.budgets_in_months(&window.months_descending)?;
        self.rollup = rollup::compute_rollup(self.today, &txns, &budgets);
        self.recent = db.recent_transactions(5)?;
        self.transaction_count = db.get_transaction_count()?;
        Ok(())
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };
        self.transactions = db.get_transactions(Some(200), None, None, search)?;
        self.transaction_count = db.get_transaction_count()?;
        if self.transaction_index >= self.transactions.len() && !self.transactions.is_empty() {
            self.transaction_index = self.transactions.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories()?;
        Ok(())
    }

    pub(crate) fn refresh_budgets(&mut self, db: &Database) -> Result<()> {
        self.budgets = db.get_budgets(self.current_month())?;
        if self.budget_index >= self.budgets.len() && !self.budgets.is_empty() {
            self.budget_index = self.budgets.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?;
        self.refresh_transactions(db)?;
        self.refresh_categories(db)?;
        self.refresh_budgets(db)?;
        Ok(())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
