#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Month ─────────────────────────────────────────────────────

#[test]
fn test_month_index_mapping() {
    assert_eq!(Month::January.index(), 1);
    assert_eq!(Month::December.index(), 12);
    assert_eq!(Month::from_index(1), Some(Month::January));
    assert_eq!(Month::from_index(12), Some(Month::December));
    assert_eq!(Month::from_index(0), None);
    assert_eq!(Month::from_index(13), None);
}

#[test]
fn test_month_index_roundtrip() {
    for m in Month::ALL {
        assert_eq!(Month::from_index(m.index()), Some(m));
    }
}

#[test]
fn test_month_of_date() {
    assert_eq!(Month::of(date(2024, 1, 31)), Month::January);
    assert_eq!(Month::of(date(2024, 6, 15)), Month::June);
    assert_eq!(Month::of(date(2023, 12, 1)), Month::December);
}

#[test]
fn test_month_parse() {
    assert_eq!(Month::parse("March"), Some(Month::March));
    assert_eq!(Month::parse("march"), Some(Month::March));
    assert_eq!(Month::parse("MARCH"), Some(Month::March));
    assert_eq!(Month::parse("  July "), Some(Month::July));
    assert_eq!(Month::parse("Mar"), None);
    assert_eq!(Month::parse(""), None);
}

#[test]
fn test_month_parse_roundtrip() {
    for m in Month::ALL {
        assert_eq!(Month::parse(m.name()), Some(m));
    }
}

#[test]
fn test_month_back_within_year() {
    assert_eq!(Month::June.back(0), Month::June);
    assert_eq!(Month::June.back(1), Month::May);
    assert_eq!(Month::June.back(5), Month::January);
}

#[test]
fn test_month_back_wraps_year() {
    assert_eq!(Month::January.back(1), Month::December);
    assert_eq!(Month::February.back(5), Month::September);
    assert_eq!(Month::March.back(12), Month::March);
    assert_eq!(Month::March.back(13), Month::February);
}

#[test]
fn test_month_display() {
    assert_eq!(format!("{}", Month::October), "October");
    assert_eq!(Month::October.short_name(), "Oct");
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_new() {
    let cat = Category::new("Food".into());
    assert!(cat.id.is_none());
    assert_eq!(cat.name, "Food");
}

#[test]
fn test_category_find_by_name_case_insensitive() {
    let cats = vec![
        Category {
            id: Some(1),
            name: "Food".into(),
        },
        Category {
            id: Some(2),
            name: "Rent".into(),
        },
    ];
    assert_eq!(Category::find_by_name(&cats, "food").unwrap().id, Some(1));
    assert_eq!(Category::find_by_name(&cats, "RENT").unwrap().id, Some(2));
    assert!(Category::find_by_name(&cats, "Travel").is_none());
}

#[test]
fn test_category_find_by_id() {
    let cats = vec![Category {
        id: Some(7),
        name: "Utilities".into(),
    }];
    assert_eq!(Category::find_by_id(&cats, 7).unwrap().name, "Utilities");
    assert!(Category::find_by_id(&cats, 8).is_none());
}

#[test]
fn test_category_display() {
    let cat = Category::new("Groceries".into());
    assert_eq!(format!("{cat}"), "Groceries");
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_transaction_new() {
    let txn = Transaction::new(3, "Coffee".into(), dec!(4.50), date(2024, 3, 10));
    assert!(txn.id.is_none());
    assert_eq!(txn.category_id, 3);
    assert_eq!(txn.amount, dec!(4.50));
    assert_eq!(Month::of(txn.date), Month::March);
}

#[test]
fn test_month_of_ignores_year() {
    assert_eq!(Month::of(date(2023, 11, 2)), Month::of(date(2024, 11, 28)));
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_new() {
    let budget = Budget::new(1, Month::March, dec!(500), "groceries".into());
    assert!(budget.id.is_none());
    assert_eq!(budget.category_id, 1);
    assert_eq!(budget.month, Month::March);
    assert_eq!(budget.amount, dec!(500));
    assert_eq!(budget.description, "groceries");
}
