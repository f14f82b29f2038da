//! Prediction pipeline
//!
//! Orchestrates intent classification, amount extraction, direction
//! heuristics, nearest-neighbor categorization, and reconciliation behind a
//! single `predict` call. State is an immutable knowledge-base snapshot, so
//! one instance can serve concurrent callers without locking.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nlp::amount;
use crate::nlp::direction::{self, Direction};
use crate::nlp::embedder::Embedder;
use crate::nlp::intent::{self, Intent, QueryType};
use crate::nlp::knowledge::KnowledgeBase;
use crate::nlp::matcher::{CategoryMatcher, UNCATEGORIZED};
use crate::nlp::reconcile::reconcile;

/// Default high-value alert threshold
pub const DEFAULT_ALERT_THRESHOLD: f64 = 5000.0;

/// Structured result of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub intent: Intent,
    pub original_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

/// The full intent detection + categorization pipeline
pub struct Pipeline {
    matcher: CategoryMatcher,
    alert_threshold: f64,
}

impl Pipeline {
    pub fn new(embedder: Box<dyn Embedder>, knowledge: KnowledgeBase) -> Self {
        Self {
            matcher: CategoryMatcher::new(embedder, knowledge),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.matcher.set_min_score(min_score);
        self
    }

    pub fn with_alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = threshold;
        self
    }

    pub fn matcher(&self) -> &CategoryMatcher {
        &self.matcher
    }

    /// Turn a free-text statement into a structured prediction.
    ///
    /// Never mutates the knowledge base; identical input against the same
    /// snapshot yields identical output.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let (intent, query_type) = intent::classify(text);

        let mut prediction = Prediction {
            intent,
            original_text: text.to_string(),
            query_type,
            amount: 0.0,
            category: UNCATEGORIZED.to_string(),
            direction: Direction::Expense,
            alert: None,
        };

        match intent {
            // Reset is handled by the caller; queries carry only their type.
            Intent::Reset | Intent::Query => {}
            Intent::Transaction => {
                prediction.amount = amount::extract(text);
                // No detected amount: skip categorization so non-financial
                // text misrouted here stays uncategorized.
                if prediction.amount > 0.0 {
                    let heuristic = direction::classify(text);
                    let matched = self.matcher.best_match(text)?;
                    let (dir, category) = reconcile(text, heuristic, matched.category);
                    prediction.direction = dir;
                    prediction.category = category;
                }
                if prediction.direction == Direction::Expense
                    && prediction.amount > self.alert_threshold
                {
                    prediction.alert = Some("High value transaction detected".to_string());
                }
            }
            Intent::BudgetGoal => {
                prediction.amount = amount::extract(text);
                // Only the reconciled category matters for a goal; the
                // direction stays at its default.
                let heuristic = direction::classify(text);
                let matched = self.matcher.best_match(text)?;
                let (_, category) = reconcile(text, heuristic, matched.category);
                prediction.category = category;
            }
        }

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::embedder::HashEmbedder;
    use crate::nlp::matcher::GENERAL;

    fn test_pipeline() -> Pipeline {
        let embedder = HashEmbedder::new();
        let rows = vec![
            ("paid for dinner at a restaurant", "Food & Dining"),
            ("bought groceries from the supermarket", "Groceries"),
            ("salary received from employer", "Salary & Income"),
            ("sold some old furniture online", "Other Income"),
            ("bought new shoes at the mall", "Shopping"),
            ("monthly rent for the apartment", "Rent & Housing"),
        ]
        .into_iter()
        .map(|(t, c)| (t.to_string(), c.to_string()))
        .collect();
        let knowledge = KnowledgeBase::from_rows(rows, &embedder).unwrap();
        Pipeline::new(Box::new(embedder), knowledge)
    }

    #[test]
    fn test_expense_transaction() {
        let p = test_pipeline().predict("paid 500 for dinner").unwrap();
        assert_eq!(p.intent, Intent::Transaction);
        assert_eq!(p.amount, 500.0);
        assert_eq!(p.direction, Direction::Expense);
        assert_eq!(p.category, "Food & Dining");
        assert_eq!(p.query_type, None);
        assert_eq!(p.alert, None);
    }

    #[test]
    fn test_income_transaction() {
        let p = test_pipeline().predict("received 20000 salary").unwrap();
        assert_eq!(p.intent, Intent::Transaction);
        assert_eq!(p.amount, 20000.0);
        assert_eq!(p.direction, Direction::Income);
        assert_eq!(p.category, "Salary & Income");
    }

    #[test]
    fn test_budget_goal() {
        let p = test_pipeline()
            .predict("I want to save 5000 for vacation")
            .unwrap();
        assert_eq!(p.intent, Intent::BudgetGoal);
        assert_eq!(p.amount, 5000.0);
        assert_eq!(p.query_type, None);
        assert_eq!(p.direction, Direction::Expense);
    }

    #[test]
    fn test_balance_query() {
        let p = test_pipeline().predict("what is my balance").unwrap();
        assert_eq!(p.intent, Intent::Query);
        assert_eq!(p.query_type, Some(QueryType::Balance));
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.category, UNCATEGORIZED);
    }

    #[test]
    fn test_reset() {
        let p = test_pipeline().predict("reset").unwrap();
        assert_eq!(p.intent, Intent::Reset);
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.category, UNCATEGORIZED);
        assert_eq!(p.direction, Direction::Expense);
    }

    #[test]
    fn test_sold_forces_other_income() {
        let p = test_pipeline()
            .predict("sold my old bike for 3000")
            .unwrap();
        assert_eq!(p.intent, Intent::Transaction);
        assert_eq!(p.amount, 3000.0);
        assert_eq!(p.direction, Direction::Income);
        assert_eq!(p.category, "Other Income");
    }

    #[test]
    fn test_amountless_transaction_stays_uncategorized() {
        let p = test_pipeline().predict("paid for dinner").unwrap();
        assert_eq!(p.intent, Intent::Transaction);
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.category, UNCATEGORIZED);
        assert_eq!(p.direction, Direction::Expense);
    }

    #[test]
    fn test_unrelated_transaction_is_uncategorized() {
        let p = test_pipeline().predict("xyzzy 900 frobnicate").unwrap();
        assert_eq!(p.intent, Intent::Transaction);
        assert_eq!(p.amount, 900.0);
        assert_eq!(p.category, UNCATEGORIZED);
    }

    #[test]
    fn test_high_value_alert() {
        let p = test_pipeline().predict("paid 6000 for rent").unwrap();
        assert_eq!(p.direction, Direction::Expense);
        assert_eq!(
            p.alert.as_deref(),
            Some("High value transaction detected")
        );
    }

    #[test]
    fn test_no_alert_for_income() {
        let p = test_pipeline().predict("received 20000 salary").unwrap();
        assert_eq!(p.alert, None);
    }

    #[test]
    fn test_degraded_mode_uses_general() {
        let pipeline = Pipeline::new(Box::new(HashEmbedder::new()), KnowledgeBase::empty());
        let p = pipeline.predict("paid 100 for lunch").unwrap();
        assert_eq!(p.category, GENERAL);
        assert_eq!(p.direction, Direction::Expense);
    }

    #[test]
    fn test_idempotent() {
        let pipeline = test_pipeline();
        let a = pipeline.predict("paid 500 for dinner").unwrap();
        let b = pipeline.predict("paid 500 for dinner").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialized_shape() {
        let p = test_pipeline().predict("paid 500 for dinner").unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["intent"], "transaction");
        assert_eq!(json["type"], "Expense");
        assert_eq!(json["amount"], 500.0);
        assert!(json.get("query_type").is_none());
    }
}
