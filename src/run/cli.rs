use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Database;
use crate::models::{Budget, Category, Month, Transaction};
use crate::rollup::{self, MonthWindow};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(db),
        "add" => cli_add(&args[2..], db),
        "budget" => cli_budget(&args[2..], db),
        "categories" => cli_categories(&args[2..], db),
        "txns" => cli_txns(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendview {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendView — local-only personal finance tracker");
    println!();
    println!("Usage: spendview [command]");
    println!();
    println!("Commands:");
    println!("  (none)                            Launch interactive TUI");
    println!("  summary                           Print the 6-month budget vs spending rollup");
    println!("  add <date> <category> <amount> [description...]");
    println!("                                    Record a transaction (date: YYYY-MM-DD)");
    println!("  budget <month|.> <category> <amount> [description...]");
    println!("                                    Set a budget ('.' = current month, or a name/1-12)");
    println!("  categories [name]                 List categories, or create one");
    println!("  txns [--search <term>]            List recent transactions");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
}

fn cli_summary(db: &mut Database) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let window = MonthWindow::ending_at(today);
    let txns = db.transactions_in_range(window.start, window.end)?;
    let budgets = db.budgets_in_months(&window.months_descending)?;
    let rollup = rollup::compute_rollup(today, &txns, &budgets);

    println!("SpendView — last 6 months");
    println!("{}", "─".repeat(44));
    println!("  {:<12} {:>12} {:>12}", "Month", "Budgeted", "Spent");
    for bucket in &rollup.months {
        println!(
            "  {:<12} {:>12} {:>12}",
            bucket.month.name(),
            format!("${:.2}", bucket.total_budgeted()),
            format!("${:.2}", bucket.total_spent()),
        );
    }

    let current = rollup.current();
    if !current.categories.is_empty() {
        println!();
        println!("{} by category:", current.month);
        for cat in &current.categories {
            println!(
                "  {:<24} {:>10} of {:>10}",
                cat.name,
                format!("${:.2}", cat.transaction_amount),
                format!("${:.2}", cat.budget_amount),
            );
        }
    }

    if !rollup.current_month_budgets.is_empty() {
        println!();
        println!("Budgets for {}:", current.month);
        for line in &rollup.current_month_budgets {
            println!(
                "  {:<24} {:>10}  {}",
                line.category,
                format!("${:.2}", line.amount),
                line.description,
            );
        }
    }

    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: spendview add <date> <category> <amount> [description...]");
    }

    let date = NaiveDate::parse_from_str(&args[0], "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date: {}. Use YYYY-MM-DD", args[0]))?;
    let amount = Decimal::from_str(&args[2])
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", args[2]))?;

    let categories = db.get_categories()?;
    let cat = Category::find_by_name(&categories, &args[1]).ok_or_else(|| {
        anyhow::anyhow!(
            "Category '{}' not found. Create it with: spendview categories {}",
            args[1],
            args[1]
        )
    })?;
    let cat_id = cat
        .id
        .ok_or_else(|| anyhow::anyhow!("Category has no ID"))?;

    let description = if args.len() > 3 {
        args[3..].join(" ")
    } else {
        cat.name.clone()
    };

    let txn = Transaction::new(cat_id, description.clone(), amount, date);
    db.insert_transaction(&txn)?;
    println!("Added: {description} ${amount} ({}) on {date}", cat.name);
    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: spendview budget <month|.> <category> <amount> [description...]");
    }

    // Accepts ".", a month name, or a 1-12 index.
    let month = if args[0] == "." {
        Month::of(chrono::Local::now().date_naive())
    } else if let Ok(n) = args[0].parse::<u32>() {
        Month::from_index(n).ok_or_else(|| anyhow::anyhow!("Month index out of range: {n}"))?
    } else {
        Month::parse(&args[0])
            .ok_or_else(|| anyhow::anyhow!("Unrecognized month: {}", args[0]))?
    };
    let amount = Decimal::from_str(&args[2])
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", args[2]))?;

    let categories = db.get_categories()?;
    let cat = Category::find_by_name(&categories, &args[1])
        .ok_or_else(|| anyhow::anyhow!("Category '{}' not found", args[1]))?;
    let cat_id = cat
        .id
        .ok_or_else(|| anyhow::anyhow!("Category has no ID"))?;

    let description = if args.len() > 3 {
        args[3..].join(" ")
    } else {
        String::new()
    };

    match db.find_budget(month, cat_id)? {
        Some(existing) => {
            let mut updated = existing;
            updated.amount = amount;
            if !description.is_empty() {
                updated.description = description;
            }
            db.update_budget(&updated)?;
            println!("Budget updated: {} = ${amount} for {month}", cat.name);
        }
        None => {
            db.insert_budget(&Budget::new(cat_id, month, amount, description))?;
            println!("Budget set: {} = ${amount} for {month}", cat.name);
        }
    }
    Ok(())
}

fn cli_categories(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        let categories = db.get_categories()?;
        if categories.is_empty() {
            println!("No categories. Create one with: spendview categories <name>");
            return Ok(());
        }
        for cat in &categories {
            println!("  {cat}");
        }
        return Ok(());
    }

    let name = args.join(" ");
    db.insert_category(&Category::new(name.clone()))?;
    println!("Created category: {name}");
    Ok(())
}

fn cli_txns(args: &[String], db: &mut Database) -> Result<()> {
    let search = args
        .windows(2)
        .find(|w| w[0] == "--search")
        .map(|w| w[1].as_str());

    let txns = db.get_transactions(Some(20), None, None, search)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    let categories = db.get_categories()?;
    println!(
        "{:<12} {:<32} {:<18} {:>10}",
        "Date", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(76));
    for txn in &txns {
        let cat_name = Category::find_by_id(&categories, txn.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("—");
        println!(
            "{:<12} {:<32} {:<18} {:>10}",
            txn.date.to_string(),
            txn.description,
            cat_name,
            format!("${:.2}", txn.amount),
        );
    }
    Ok(())
}
