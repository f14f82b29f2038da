//! Intent classification for user utterances
//!
//! Priority-ordered keyword rules; the first matching rule wins. Query
//! phrasing dominates numeric content, so "I spent 500 and want the report"
//! is a query, not a transaction.

use serde::{Deserialize, Serialize};

/// Coarse purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Transaction,
    BudgetGoal,
    Query,
    Reset,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Transaction => "transaction",
            Intent::BudgetGoal => "budget_goal",
            Intent::Query => "query",
            Intent::Reset => "reset",
        }
    }
}

/// Sub-classification of query utterances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Balance,
    HighestExpense,
    Report,
    General,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Balance => "balance",
            QueryType::HighestExpense => "highest_expense",
            QueryType::Report => "report",
            QueryType::General => "general",
        }
    }
}

const BUDGET_KEYWORDS: &[&str] = &["save", "saving", "budget", "goal", "target", "limit"];

const QUERY_KEYWORDS: &[&str] = &[
    "how much",
    "balance",
    "total",
    "spent",
    "left",
    "report",
    "biggest",
    "highest",
    "show me",
    "ledger",
    "history",
    "breakdown",
    "spending",
    "income",
    "expense",
];

const BALANCE_KEYWORDS: &[&str] = &["balance", "left", "money"];
const HIGHEST_KEYWORDS: &[&str] = &["biggest", "highest"];
const REPORT_KEYWORDS: &[&str] = &["report", "breakdown", "ledger"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classify the coarse purpose of an utterance.
///
/// Total over all inputs; anything unrecognized is a transaction.
pub fn classify(text: &str) -> (Intent, Option<QueryType>) {
    let text = text.to_lowercase();

    if text.trim() == "reset" || text.contains("reset data") {
        return (Intent::Reset, None);
    }

    if contains_any(&text, BUDGET_KEYWORDS) && !text.contains("spent") {
        return (Intent::BudgetGoal, None);
    }

    if contains_any(&text, QUERY_KEYWORDS) {
        let query_type = if contains_any(&text, BALANCE_KEYWORDS) {
            QueryType::Balance
        } else if contains_any(&text, HIGHEST_KEYWORDS) {
            QueryType::HighestExpense
        } else if contains_any(&text, REPORT_KEYWORDS) {
            QueryType::Report
        } else {
            QueryType::General
        };
        return (Intent::Query, Some(query_type));
    }

    (Intent::Transaction, None)
}
