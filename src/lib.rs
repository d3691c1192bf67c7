//! BasketForge: A Rust CLI application for market basket analysis
//!
//! This library mines frequent itemsets from boolean transaction data with the
//! Apriori algorithm, derives scored association rules from them, and projects
//! the top-ranked rules into a directed graph visualization.

pub mod cli;
pub mod data;
pub mod mine;
pub mod rules;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_transactions, TransactionMatrix};
pub use mine::{mine_frequent_itemsets, FrequentItemsets, ItemId, Itemset};
pub use rules::{generate_rules, rank_rules, Metric, Rule};
pub use viz::{project_rules, render_rule_graph, RuleEdge};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
