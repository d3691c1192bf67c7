//! Association rule generation, scoring, and ranking

use clap::ValueEnum;

use crate::mine::{FrequentItemsets, ItemId};

/// Scoring metric used to filter candidate rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    /// support(antecedent ∪ consequent) / support(antecedent)
    Confidence,
    /// confidence / support(consequent); > 1 means positive association
    Lift,
    /// (1 - support(consequent)) / (1 - confidence); undefined at confidence 1
    Conviction,
}

/// A scored association rule: antecedent ⇒ consequent.
///
/// Both sides are disjoint canonical itemsets whose union was frequent.
/// Rules are immutable once scored; ranking only reorders collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Vec<ItemId>,
    pub consequent: Vec<ItemId>,
    /// Support of antecedent ∪ consequent
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    /// `None` when confidence is 1 (conviction diverges)
    pub conviction: Option<f64>,
}

impl Rule {
    /// Value of the chosen metric, or `None` if it is undefined for this rule
    pub fn metric_value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Confidence => Some(self.confidence),
            Metric::Lift => Some(self.lift),
            Metric::Conviction => self.conviction,
        }
    }
}

/// Generate all rules from the mined itemsets whose `metric` is at least
/// `min_threshold`.
///
/// Every frequent itemset of size >= 2 contributes one candidate rule per
/// non-empty proper subset (the antecedent); the consequent is the remainder.
/// All supports come from the miner's index, never from rescanning data.
/// Rules whose metric is undefined are dropped individually; they never
/// abort the run. Output order is unspecified, ranking is a separate step.
pub fn generate_rules(
    frequent: &FrequentItemsets,
    metric: Metric,
    min_threshold: f64,
) -> crate::Result<Vec<Rule>> {
    if !min_threshold.is_finite() {
        anyhow::bail!("min_threshold must be a finite number");
    }

    let mut rules = Vec::new();

    for itemset in frequent.itemsets() {
        let items = &itemset.items;
        if items.len() < 2 || items.len() >= u32::BITS as usize {
            continue;
        }

        // Bitmask enumeration of non-empty proper subsets as antecedents
        let splits = 1u32 << items.len();
        for mask in 1..splits - 1 {
            let (antecedent, consequent) = split_by_mask(items, mask);

            let Some(rule) = score_rule(antecedent, consequent, itemset.support, frequent) else {
                continue;
            };

            match rule.metric_value(metric) {
                Some(value) if value >= min_threshold => rules.push(rule),
                _ => {}
            }
        }
    }

    Ok(rules)
}

/// Stable multi-key sort: confidence descending, then lift descending.
///
/// Ties keep insertion order, so identical inputs rank identically across runs.
pub fn rank_rules(mut rules: Vec<Rule>) -> Vec<Rule> {
    rules.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then(b.lift.total_cmp(&a.lift))
    });
    rules
}

/// Partition a canonical itemset by an antecedent bitmask; both halves stay sorted
fn split_by_mask(items: &[ItemId], mask: u32) -> (Vec<ItemId>, Vec<ItemId>) {
    let mut antecedent = Vec::new();
    let mut consequent = Vec::new();
    for (i, &item) in items.iter().enumerate() {
        if mask & (1 << i) != 0 {
            antecedent.push(item);
        } else {
            consequent.push(item);
        }
    }
    (antecedent, consequent)
}

/// Score one antecedent/consequent split, or `None` if any required support
/// is missing from the index or a denominator is zero
fn score_rule(
    antecedent: Vec<ItemId>,
    consequent: Vec<ItemId>,
    union_support: f64,
    frequent: &FrequentItemsets,
) -> Option<Rule> {
    let antecedent_support = frequent.support_of(&antecedent)?;
    let consequent_support = frequent.support_of(&consequent)?;

    if antecedent_support <= 0.0 || consequent_support <= 0.0 {
        return None;
    }

    let confidence = union_support / antecedent_support;
    let lift = confidence / consequent_support;
    let conviction = if confidence < 1.0 {
        Some((1.0 - consequent_support) / (1.0 - confidence))
    } else {
        None
    };

    Some(Rule {
        antecedent,
        consequent,
        support: union_support,
        confidence,
        lift,
        conviction,
    })
}
