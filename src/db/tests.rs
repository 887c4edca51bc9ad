#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_category(db: &Database, name: &str) -> i64 {
    db.insert_category(&Category::new(name.into())).unwrap()
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = seed_category(&db, "Food");
    assert!(id > 0);

    let cats = db.get_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Food");

    let fetched = db.get_category_by_id(id).unwrap();
    assert_eq!(fetched.unwrap().name, "Food");
}

#[test]
fn test_category_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_category_by_id(99999).unwrap().is_none());
}

#[test]
fn test_category_name_unique() {
    let db = Database::open_in_memory().unwrap();
    seed_category(&db, "Food");
    let result = db.insert_category(&Category::new("Food".into()));
    assert!(result.is_err());
    assert_eq!(db.get_categories().unwrap().len(), 1);
}

#[test]
fn test_category_empty_name_rejected() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.insert_category(&Category::new("   ".into())).is_err());
}

#[test]
fn test_categories_sorted_by_name() {
    let db = Database::open_in_memory().unwrap();
    seed_category(&db, "Travel");
    seed_category(&db, "Food");
    seed_category(&db, "Rent");

    let names: Vec<String> = db
        .get_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Food", "Rent", "Travel"]);
}

// ── Transactions ──────────────────────────────────────────────

fn setup_test_data(db: &Database) -> (i64, i64) {
    let food = seed_category(db, "Food");
    let travel = seed_category(db, "Travel");

    let txns = vec![
        Transaction::new(food, "Groceries".into(), dec!(87.30), date(2024, 3, 5)),
        Transaction::new(food, "Coffee".into(), dec!(5.25), date(2024, 3, 10)),
        Transaction::new(travel, "Train ticket".into(), dec!(42.99), date(2024, 2, 15)),
        Transaction::new(food, "Takeout".into(), dec!(23.00), date(2024, 1, 20)),
    ];
    for txn in &txns {
        db.insert_transaction(txn).unwrap();
    }

    (food, travel)
}

#[test]
fn test_transaction_insert_and_query() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    let txn = Transaction::new(food, "Coffee".into(), dec!(4.50), date(2024, 3, 10));
    let id = db.insert_transaction(&txn).unwrap();
    assert!(id > 0);

    let txns = db.get_transactions(Some(10), None, None, None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].description, "Coffee");
    assert_eq!(txns[0].amount, dec!(4.50));
    assert_eq!(txns[0].date, date(2024, 3, 10));
}

#[test]
fn test_transaction_nonpositive_amount_rejected() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    let zero = Transaction::new(food, "Nothing".into(), dec!(0), date(2024, 3, 1));
    assert!(db.insert_transaction(&zero).is_err());

    let negative = Transaction::new(food, "Refund".into(), dec!(-5), date(2024, 3, 1));
    assert!(db.insert_transaction(&negative).is_err());

    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_transaction_search() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let results = db
        .get_transactions(Some(100), None, None, Some("coffee"))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].description, "Coffee");

    let results = db
        .get_transactions(Some(100), None, None, Some("nonexistent"))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_transaction_category_filter() {
    let db = Database::open_in_memory().unwrap();
    let (food, travel) = setup_test_data(&db);

    let food_txns = db
        .get_transactions(Some(100), None, Some(food), None)
        .unwrap();
    assert_eq!(food_txns.len(), 3);

    let travel_txns = db
        .get_transactions(Some(100), None, Some(travel), None)
        .unwrap();
    assert_eq!(travel_txns.len(), 1);
}

#[test]
fn test_transaction_ordering_date_descending() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let txns = db.get_transactions(Some(100), None, None, None).unwrap();
    for window in txns.windows(2) {
        assert!(window[0].date >= window[1].date);
    }
}

#[test]
fn test_transaction_limit_offset() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let limited = db.get_transactions(Some(2), None, None, None).unwrap();
    assert_eq!(limited.len(), 2);

    let offset = db.get_transactions(Some(2), Some(2), None, None).unwrap();
    assert_eq!(offset.len(), 2);
    assert_ne!(limited[0].description, offset[0].description);
}

#[test]
fn test_recent_transactions() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let recent = db.recent_transactions(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].description, "Coffee");
    assert_eq!(recent[1].description, "Groceries");
}

#[test]
fn test_transaction_update_description() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");
    let id = db
        .insert_transaction(&Transaction::new(
            food,
            "Cofee".into(),
            dec!(4.50),
            date(2024, 3, 10),
        ))
        .unwrap();

    db.update_transaction_description(id, "Coffee").unwrap();
    let txns = db.get_transactions(Some(1), None, None, None).unwrap();
    assert_eq!(txns[0].description, "Coffee");
}

#[test]
fn test_transaction_update_category() {
    let db = Database::open_in_memory().unwrap();
    let (food, travel) = setup_test_data(&db);

    let txns = db
        .get_transactions(Some(1), None, Some(food), None)
        .unwrap();
    let id = txns[0].id.unwrap();

    db.update_transaction_category(id, travel).unwrap();
    let moved = db
        .get_transactions(Some(100), None, Some(travel), None)
        .unwrap();
    assert!(moved.iter().any(|t| t.id == Some(id)));
}

#[test]
fn test_transaction_delete() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let txns = db.get_transactions(Some(100), None, None, None).unwrap();
    let count_before = txns.len();
    let id = txns[0].id.unwrap();

    db.delete_transaction(id).unwrap();

    let txns = db.get_transactions(Some(100), None, None, None).unwrap();
    assert_eq!(txns.len(), count_before - 1);
    assert!(!txns.iter().any(|t| t.id == Some(id)));
}

#[test]
fn test_transaction_count() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 0);
    setup_test_data(&db);
    assert_eq!(db.get_transaction_count().unwrap(), 4);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_crud() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    let budget = Budget::new(food, Month::March, dec!(500), "groceries".into());
    let id = db.insert_budget(&budget).unwrap();
    assert!(id > 0);

    let budgets = db.get_budgets(Month::March).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, dec!(500));
    assert_eq!(budgets[0].description, "groceries");

    let mut updated = budgets[0].clone();
    updated.amount = dec!(600);
    db.update_budget(&updated).unwrap();
    let budgets = db.get_budgets(Month::March).unwrap();
    assert_eq!(budgets[0].amount, dec!(600));

    db.delete_budget(id).unwrap();
    assert!(db.get_budgets(Month::March).unwrap().is_empty());
}

#[test]
fn test_budget_duplicate_rejected() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    db.insert_budget(&Budget::new(food, Month::March, dec!(500), String::new()))
        .unwrap();
    let result = db.insert_budget(&Budget::new(food, Month::March, dec!(300), String::new()));
    assert!(result.is_err());
    assert_eq!(db.get_budgets(Month::March).unwrap().len(), 1);
}

#[test]
fn test_budget_same_category_different_months_allowed() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    db.insert_budget(&Budget::new(food, Month::March, dec!(500), String::new()))
        .unwrap();
    db.insert_budget(&Budget::new(food, Month::April, dec!(450), String::new()))
        .unwrap();

    assert_eq!(db.get_budgets(Month::March).unwrap().len(), 1);
    assert_eq!(db.get_budgets(Month::April).unwrap().len(), 1);
    assert!(db.get_budgets(Month::May).unwrap().is_empty());
}

#[test]
fn test_budget_nonpositive_amount_rejected() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    let zero = Budget::new(food, Month::March, dec!(0), String::new());
    assert!(db.insert_budget(&zero).is_err());
}

#[test]
fn test_find_budget() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");
    let travel = seed_category(&db, "Travel");

    db.insert_budget(&Budget::new(food, Month::March, dec!(500), String::new()))
        .unwrap();

    assert!(db.find_budget(Month::March, food).unwrap().is_some());
    assert!(db.find_budget(Month::March, travel).unwrap().is_none());
    assert!(db.find_budget(Month::April, food).unwrap().is_none());
}

// ── Rollup feeds ──────────────────────────────────────────────

#[test]
fn test_transactions_in_range_resolves_names() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let rows = db
        .transactions_in_range(date(2024, 3, 1), date(2024, 3, 31))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.category == "Food"));
}

#[test]
fn test_transactions_in_range_inclusive_endpoints() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");
    db.insert_transaction(&Transaction::new(
        food,
        "Edge".into(),
        dec!(10),
        date(2024, 3, 1),
    ))
    .unwrap();

    let rows = db
        .transactions_in_range(date(2024, 3, 1), date(2024, 3, 1))
        .unwrap();
    assert_eq!(rows.len(), 1);

    let rows = db
        .transactions_in_range(date(2024, 3, 2), date(2024, 3, 31))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_budgets_in_months_resolves_names() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");
    let travel = seed_category(&db, "Travel");

    db.insert_budget(&Budget::new(food, Month::March, dec!(500), String::new()))
        .unwrap();
    db.insert_budget(&Budget::new(travel, Month::February, dec!(250), String::new()))
        .unwrap();
    db.insert_budget(&Budget::new(food, Month::August, dec!(999), String::new()))
        .unwrap();

    let rows = db
        .budgets_in_months(&[Month::March, Month::February])
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .any(|r| r.month == Month::March && r.category == "Food" && r.amount == dec!(500)));
    assert!(rows
        .iter()
        .any(|r| r.month == Month::February && r.category == "Travel"));
}

#[test]
fn test_budgets_in_months_empty_input() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.budgets_in_months(&[]).unwrap().is_empty());
}

// ── Decimal precision ─────────────────────────────────────────

#[test]
fn test_decimal_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Food");

    db.insert_transaction(&Transaction::new(
        food,
        "Precise".into(),
        dec!(1234.5678),
        date(2024, 3, 1),
    ))
    .unwrap();

    let txns = db.get_transactions(Some(1), None, None, None).unwrap();
    assert_eq!(txns[0].amount, dec!(1234.5678));
}

#[test]
fn test_tenth_amounts_roundtrip_exactly() {
    let db = Database::open_in_memory().unwrap();
    let food = seed_category(&db, "Coffee");

    for d in 1..=10 {
        db.insert_transaction(&Transaction::new(
            food,
            "Espresso".into(),
            dec!(0.1),
            date(2024, 3, d),
        ))
        .unwrap();
    }

    let rows = db
        .transactions_in_range(date(2024, 3, 1), date(2024, 3, 31))
        .unwrap();
    let total: Decimal = rows.iter().map(|r| r.amount).sum();
    assert_eq!(total, dec!(1.0));
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_schema_version_set() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_double_migrate_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_open_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendview.db");

    {
        let db = Database::open(&path).unwrap();
        let food = db.insert_category(&Category::new("Food".into())).unwrap();
        db.insert_transaction(&Transaction::new(
            food,
            "Coffee".into(),
            dec!(4.50),
            date(2024, 3, 10),
        ))
        .unwrap();
    }

    // Reopen and confirm the data survived.
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 1);
}
