//! Income/expense direction heuristics
//!
//! Expense keywords always win over income keywords when both appear; an
//! expense-shaped verb is the stronger evidence of actual money movement.

use serde::{Deserialize, Serialize};

/// Direction of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "Income",
            Direction::Expense => "Expense",
        }
    }
}

pub(crate) const INCOME_KEYWORDS: &[&str] = &[
    "received", "credited", "bonus", "salary", "earned", "sold", "sale", "sell",
];

pub(crate) const EXPENSE_KEYWORDS: &[&str] = &[
    "paid", "bought", "spent", "purchase", "bill", "deducted", "cost", "rent", "emi", "dinner",
    "lunch",
];

/// Classify the direction of a statement. Defaults to Expense.
pub fn classify(text: &str) -> Direction {
    let text = text.to_lowercase();

    let mut direction = Direction::Expense;
    if INCOME_KEYWORDS.iter().any(|k| text.contains(k)) {
        direction = Direction::Income;
    }
    if EXPENSE_KEYWORDS.iter().any(|k| text.contains(k)) {
        direction = Direction::Expense;
    }
    direction
}
