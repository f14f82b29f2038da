//! Advisory text over already-loaded transactions and budgets
//!
//! The pipeline does not own storage; callers pass their transaction and
//! budget lists in and get a short advisory message back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::nlp::direction::Direction;

/// A recorded transaction, as the caller stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: Direction,
}

/// Budget key for the overall spending limit
pub const GENERAL_BUDGET: &str = "General";

/// Summarize spending against budgets as a short advisory message.
pub fn generate_insight(entries: &[LedgerEntry], budgets: &HashMap<String, f64>) -> String {
    let total_expense: f64 = entries
        .iter()
        .filter(|e| e.direction == Direction::Expense)
        .map(|e| e.amount)
        .sum();

    let mut warnings = Vec::new();
    if let Some(&limit) = budgets.get(GENERAL_BUDGET) {
        if total_expense > limit {
            warnings.push(format!(
                "You have exceeded your total budget of {:.2}!",
                limit
            ));
        } else if total_expense > limit * 0.8 {
            warnings.push("Careful! You are at 80% of your budget.".to_string());
        }
    }

    if total_expense == 0.0 {
        return "No spending data yet. Add an expense!".to_string();
    }

    let mut message = format!("Total spending: {:.2}. ", total_expense);
    if warnings.is_empty() {
        message.push_str("You are within safe limits. Keep saving!");
    } else {
        message.push_str(&warnings.join(" "));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64) -> LedgerEntry {
        LedgerEntry {
            amount,
            direction: Direction::Expense,
        }
    }

    fn income(amount: f64) -> LedgerEntry {
        LedgerEntry {
            amount,
            direction: Direction::Income,
        }
    }

    #[test]
    fn test_no_spending() {
        let msg = generate_insight(&[income(5000.0)], &HashMap::new());
        assert_eq!(msg, "No spending data yet. Add an expense!");
    }

    #[test]
    fn test_within_limits() {
        let budgets = HashMap::from([(GENERAL_BUDGET.to_string(), 1000.0)]);
        let msg = generate_insight(&[expense(200.0), expense(100.0)], &budgets);
        assert!(msg.starts_with("Total spending: 300.00."));
        assert!(msg.contains("within safe limits"));
    }

    #[test]
    fn test_eighty_percent_warning() {
        let budgets = HashMap::from([(GENERAL_BUDGET.to_string(), 1000.0)]);
        let msg = generate_insight(&[expense(850.0)], &budgets);
        assert!(msg.contains("80% of your budget"));
    }

    #[test]
    fn test_exceeded_budget() {
        let budgets = HashMap::from([(GENERAL_BUDGET.to_string(), 1000.0)]);
        let msg = generate_insight(&[expense(1200.0)], &budgets);
        assert!(msg.contains("exceeded your total budget of 1000.00"));
    }

    #[test]
    fn test_income_does_not_count_as_spending() {
        let budgets = HashMap::from([(GENERAL_BUDGET.to_string(), 1000.0)]);
        let msg = generate_insight(&[income(5000.0), expense(100.0)], &budgets);
        assert!(msg.starts_with("Total spending: 100.00."));
    }
}
