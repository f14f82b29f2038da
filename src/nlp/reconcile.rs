//! Reconciliation of direction heuristics with semantic category matches
//!
//! An ordered rule chain: later rules are higher-confidence and override
//! earlier ones unconditionally.

use crate::nlp::direction::{Direction, EXPENSE_KEYWORDS};

/// Resolve conflicts between the heuristic direction and the matched category.
pub fn reconcile(text: &str, direction: Direction, category: String) -> (Direction, String) {
    let text = text.to_lowercase();
    let mut direction = direction;
    let mut category = category;

    // Income-shaped category without contradicting text wins over the default.
    let category_lower = category.to_lowercase();
    if (category_lower.contains("salary") || category_lower.contains("income"))
        && !text.contains("tax")
        && !text.contains("paid")
    {
        direction = Direction::Income;
    }

    // An expense verb forces Expense; income categories on expense-shaped
    // sentences are a known matcher confusion, corrected to Shopping.
    if EXPENSE_KEYWORDS.iter().any(|k| text.contains(k)) {
        direction = Direction::Expense;
        if category == "Other Income" || category == "Salary & Income" {
            category = "Shopping".to_string();
        }
    }

    // Selling always means incoming money.
    if text.contains("sold") || text.contains("sell") {
        direction = Direction::Income;
        category = "Other Income".to_string();
    }

    (direction, category)
}
