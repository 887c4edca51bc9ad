use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::models::{Budget, Category, Transaction};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SpendView", cmd_quit, r);
    register_command!("quit", "Quit SpendView", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add 2024-03-10 Food 4.50 -- morning coffee)",
        cmd_add,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!("rename", "Rename selected transaction", cmd_rename, r);
    register_command!(
        "recat",
        "Re-categorize selected transaction (e.g. :recat Travel)",
        cmd_recat,
        r
    );
    register_command!(
        "budget",
        "Set this month's budget (e.g. :budget Food 500 -- groceries)",
        cmd_budget,
        r
    );
    register_command!(
        "delete-budget",
        "Delete selected budget",
        cmd_delete_budget,
        r
    );
    register_command!(
        "category",
        "Create category (e.g. :category Subscriptions)",
        cmd_category,
        r
    );
    register_command!(
        "search",
        "Search transactions (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search transactions (e.g. :s coffee)", cmd_search, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split an argument string on the " -- " marker that introduces a
/// free-text description.
fn split_description(args: &str) -> (&str, Option<&str>) {
    match args.split_once(" -- ") {
        Some((head, desc)) => (head.trim(), Some(desc.trim())),
        None => (args, None),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    app.refresh_budgets(db)?;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    app.refresh_categories(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :add <date> <category> <amount> [-- <description>]";

    if args.is_empty() {
        app.set_status(USAGE);
        return Ok(());
    }

    let (head, description) = split_description(args);
    let parts: Vec<&str> = head.splitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status(USAGE);
        return Ok(());
    }
    let date_str = parts[0];
    // Amount is the last token of the remainder; the middle (possibly
    // multi-word) is the category name.
    let rest: Vec<&str> = parts[1].rsplitn(2, ' ').collect();
    if rest.len() < 2 {
        app.set_status(USAGE);
        return Ok(());
    }
    let amount_str = rest[0];
    let category_name = rest[1];

    let date = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            app.set_status(format!("Invalid date: {date_str}. Use YYYY-MM-DD"));
            return Ok(());
        }
    };
    let amount = match Decimal::from_str(amount_str) {
        Ok(a) => a,
        Err(_) => {
            app.set_status(format!("Invalid amount: {amount_str}"));
            return Ok(());
        }
    };

    let categories = db.get_categories()?;
    let cat = match Category::find_by_name(&categories, category_name) {
        Some(c) => c,
        None => {
            app.set_status(format!(
                "Category '{category_name}' not found. Create it with :category {category_name}"
            ));
            return Ok(());
        }
    };
    let cat_id = match cat.id {
        Some(id) => id,
        None => {
            app.set_status("Category has no ID (this shouldn't happen)");
            return Ok(());
        }
    };

    let description = description.unwrap_or(category_name).to_string();
    let txn = Transaction::new(cat_id, description.clone(), amount, date);
    if let Err(e) = db.insert_transaction(&txn) {
        app.set_status(format!("{e}"));
        return Ok(());
    }

    app.refresh_transactions(db)?;
    app.refresh_dashboard(db)?;
    app.set_status(format!("Added: {description} ${amount} ({})", cat.name));
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if let Some(txn) = app.transactions.get(app.transaction_index) {
        if let Some(id) = txn.id {
            let desc = txn.description.clone();
            app.confirm_message = format!("Delete '{desc}'?");
            app.pending_action = Some(PendingAction::DeleteTransaction {
                id,
                description: desc,
            });
            app.input_mode = InputMode::Confirm;
        }
    }

    Ok(())
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if args.is_empty() {
        app.set_status("Usage: :rename <new description>");
        return Ok(());
    }

    if let Some(txn) = app.transactions.get(app.transaction_index) {
        if let Some(id) = txn.id {
            db.update_transaction_description(id, args)?;
            app.refresh_transactions(db)?;
            app.set_status(format!("Renamed transaction to: {args}"));
        }
    }

    Ok(())
}

fn cmd_recat(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if args.is_empty() {
        app.set_status("Usage: :recat <category_name>");
        return Ok(());
    }

    // Accepts a category name or a raw ID.
    let categories = db.get_categories()?;
    let cat = match Category::find_by_name(&categories, args) {
        Some(c) => Some(c.clone()),
        None => match args.parse::<i64>() {
            Ok(id) => db.get_category_by_id(id)?,
            Err(_) => None,
        },
    };

    if let Some(cat) = cat {
        if let (Some(cat_id), Some(txn)) = (cat.id, app.transactions.get(app.transaction_index)) {
            if let Some(txn_id) = txn.id {
                db.update_transaction_category(txn_id, cat_id)?;
                app.refresh_transactions(db)?;
                app.refresh_dashboard(db)?;
                app.set_status(format!("Categorized as: {}", cat.name));
            }
        }
    } else {
        app.set_status(format!("Category '{args}' not found"));
    }

    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :budget <category> <amount> [-- <description>]";

    if args.is_empty() {
        app.set_status(USAGE);
        return Ok(());
    }

    let (head, description) = split_description(args);
    // Last token is the amount, everything before is the category name.
    let parts: Vec<&str> = head.rsplitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status(USAGE);
        return Ok(());
    }
    let amount_str = parts[0];
    let category_name = parts[1];

    let amount = match Decimal::from_str(amount_str) {
        Ok(a) => a,
        Err(_) => {
            app.set_status(format!("Invalid amount: {amount_str}"));
            return Ok(());
        }
    };

    let categories = db.get_categories()?;
    let cat = match Category::find_by_name(&categories, category_name) {
        Some(c) => c,
        None => {
            app.set_status(format!("Category '{category_name}' not found"));
            return Ok(());
        }
    };
    let cat_id = match cat.id {
        Some(id) => id,
        None => {
            app.set_status("Category has no ID (this shouldn't happen)");
            return Ok(());
        }
    };

    let month = app.current_month();
    let result = match db.find_budget(month, cat_id)? {
        Some(existing) => {
            let mut updated = existing;
            updated.amount = amount;
            if let Some(desc) = description {
                updated.description = desc.to_string();
            }
            db.update_budget(&updated)
        }
        None => {
            let budget = Budget::new(
                cat_id,
                month,
                amount,
                description.unwrap_or_default().to_string(),
            );
            db.insert_budget(&budget).map(|_| ())
        }
    };

    if let Err(e) = result {
        app.set_status(format!("{e}"));
        return Ok(());
    }

    app.refresh_budgets(db)?;
    app.refresh_dashboard(db)?;
    app.screen = Screen::Budgets;
    app.set_status(format!("Budget set: {} = ${amount} for {month}", cat.name));
    Ok(())
}

fn cmd_delete_budget(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.budgets.is_empty() {
        app.set_status("No budgets to delete");
        return Ok(());
    }

    if let Some(budget) = app.budgets.get(app.budget_index) {
        if let Some(id) = budget.id {
            let cat_name = Category::find_by_id(&app.categories, budget.category_id)
                .map(|c| c.name.as_str())
                .unwrap_or("Unknown");
            app.confirm_message = format!("Delete budget for '{cat_name}'?");
            app.pending_action = Some(PendingAction::DeleteBudget {
                id,
                name: cat_name.to_string(),
            });
            app.input_mode = InputMode::Confirm;
        }
    }

    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name>. Creates a new category");
        return Ok(());
    }

    let cat = Category::new(args.to_string());
    if let Err(e) = db.insert_category(&cat) {
        app.set_status(format!("{e}"));
        return Ok(());
    }
    app.refresh_categories(db)?;
    app.set_status(format!("Created category: {args}"));
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}
