//! Level-wise (Apriori) frequent itemset mining

use std::collections::HashMap;

use crate::data::TransactionMatrix;

/// Index of an item into the transaction matrix's column-label table
pub type ItemId = u32;

/// A frequent itemset in canonical (sorted) form with its observed support
#[derive(Debug, Clone, PartialEq)]
pub struct Itemset {
    /// Member items, always sorted ascending
    pub items: Vec<ItemId>,
    /// Fraction of transactions containing every member, in [0, 1]
    pub support: f64,
}

/// All frequent itemsets discovered by a mining run, plus a support index.
///
/// The index maps canonical itemset keys to their supports across every level,
/// so rule generation can look up sub-itemset supports instead of rescanning
/// the transaction matrix.
#[derive(Debug, Default)]
pub struct FrequentItemsets {
    itemsets: Vec<Itemset>,
    index: HashMap<Vec<ItemId>, f64>,
}

impl FrequentItemsets {
    /// Support of a frequent itemset, or `None` if it was never retained
    pub fn support_of(&self, items: &[ItemId]) -> Option<f64> {
        self.index.get(items).copied()
    }

    /// All retained itemsets in discovery order (level 1 first)
    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// Size of the largest retained itemset
    pub fn max_size(&self) -> usize {
        self.itemsets
            .iter()
            .map(|itemset| itemset.items.len())
            .max()
            .unwrap_or(0)
    }

    fn insert(&mut self, items: Vec<ItemId>, support: f64) {
        self.index.insert(items.clone(), support);
        self.itemsets.push(Itemset { items, support });
    }
}

/// Mine all frequent itemsets meeting `min_support` from the matrix.
///
/// Level-wise search: level 1 scores every column, level k joins frequent
/// (k-1)-itemsets and prunes candidates whose (k-1)-subsets are not all
/// frequent before counting support. Support never increases with itemset
/// size, so pruned candidates cannot be frequent. Terminates when a level
/// retains nothing.
///
/// An empty result is a valid outcome, not an error; only out-of-range
/// `min_support` or an empty matrix fail.
pub fn mine_frequent_itemsets(
    matrix: &TransactionMatrix,
    min_support: f64,
) -> crate::Result<FrequentItemsets> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        anyhow::bail!("min_support must be in (0, 1], got {}", min_support);
    }
    if matrix.n_transactions() == 0 {
        anyhow::bail!("cannot mine an empty transaction matrix");
    }

    let mut frequent = FrequentItemsets::default();

    // Level 1: every column is a candidate
    let mut current_level: Vec<Vec<ItemId>> = Vec::new();
    for item in 0..matrix.n_items() as ItemId {
        let support = matrix.support(&[item]);
        if support >= min_support {
            frequent.insert(vec![item], support);
            current_level.push(vec![item]);
        }
    }

    // Level k: join, prune, count, retain; stop when a level comes up empty
    while !current_level.is_empty() {
        let mut next_level = Vec::new();

        for candidate in join_candidates(&current_level) {
            if !all_subsets_frequent(&candidate, &frequent) {
                continue;
            }

            let support = matrix.support(&candidate);
            if support >= min_support {
                next_level.push((candidate, support));
            }
        }

        current_level = next_level
            .into_iter()
            .map(|(items, support)| {
                frequent.insert(items.clone(), support);
                items
            })
            .collect();
    }

    Ok(frequent)
}

/// Join frequent k-itemsets sharing a (k-1)-prefix into sorted (k+1)-candidates
fn join_candidates(level: &[Vec<ItemId>]) -> Vec<Vec<ItemId>> {
    let mut sorted_level: Vec<&Vec<ItemId>> = level.iter().collect();
    sorted_level.sort();

    let mut candidates = Vec::new();
    for (i, first) in sorted_level.iter().enumerate() {
        let prefix_len = first.len() - 1;
        for second in &sorted_level[i + 1..] {
            if first[..prefix_len] != second[..prefix_len] {
                // Sorted order means no later itemset shares this prefix
                break;
            }
            let mut candidate = (*first).clone();
            candidate.push(second[prefix_len]);
            candidates.push(candidate);
        }
    }
    candidates
}

/// Anti-monotonicity prune: every (k-1)-subset must already be frequent
fn all_subsets_frequent(candidate: &[ItemId], frequent: &FrequentItemsets) -> bool {
    let mut subset = Vec::with_capacity(candidate.len() - 1);
    for skip in 0..candidate.len() {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, &item)| item),
        );
        if frequent.support_of(&subset).is_none() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Matrix from rows of 0/1 flags
    fn matrix_from_rows(labels: &[&str], rows: &[&[u8]]) -> TransactionMatrix {
        let n_rows = rows.len();
        let n_cols = labels.len();
        let flat: Vec<bool> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&cell| cell != 0))
            .collect();
        let presence = Array2::from_shape_vec((n_rows, n_cols), flat).unwrap();
        let labels = labels.iter().map(|label| label.to_string()).collect();
        TransactionMatrix::new(presence, labels).unwrap()
    }

    fn toy_matrix() -> TransactionMatrix {
        // [{A,B}, {A,B}, {A,C}, {B,C}]
        matrix_from_rows(
            &["A", "B", "C"],
            &[&[1, 1, 0], &[1, 1, 0], &[1, 0, 1], &[0, 1, 1]],
        )
    }

    #[test]
    fn test_toy_scenario_supports() {
        let frequent = mine_frequent_itemsets(&toy_matrix(), 0.5).unwrap();

        assert_eq!(frequent.support_of(&[0]), Some(0.75)); // {A}
        assert_eq!(frequent.support_of(&[1]), Some(0.75)); // {B}
        assert_eq!(frequent.support_of(&[2]), Some(0.5)); // {C}
        assert_eq!(frequent.support_of(&[0, 1]), Some(0.5)); // {A,B}
        assert_eq!(frequent.support_of(&[0, 2]), None); // {A,C} at 0.25
        assert_eq!(frequent.support_of(&[0, 1, 2]), None);
        assert_eq!(frequent.max_size(), 2);
    }

    #[test]
    fn test_anti_monotonicity_holds() {
        let frequent = mine_frequent_itemsets(&toy_matrix(), 0.25).unwrap();

        for superset in frequent.itemsets() {
            for subset in frequent.itemsets() {
                if subset.items.iter().all(|item| superset.items.contains(item)) {
                    assert!(
                        superset.support <= subset.support + 1e-12,
                        "{:?} has higher support than its subset {:?}",
                        superset.items,
                        subset.items
                    );
                }
            }
        }
    }

    #[test]
    fn test_higher_threshold_yields_subset() {
        let loose = mine_frequent_itemsets(&toy_matrix(), 0.25).unwrap();
        let tight = mine_frequent_itemsets(&toy_matrix(), 0.5).unwrap();

        for itemset in tight.itemsets() {
            assert_eq!(
                loose.support_of(&itemset.items),
                Some(itemset.support),
                "{:?} frequent at 0.5 but not at 0.25",
                itemset.items
            );
        }
        assert!(tight.len() <= loose.len());
    }

    #[test]
    fn test_full_support_boundary() {
        let matrix = matrix_from_rows(&["A", "B"], &[&[1, 1], &[1, 0], &[1, 1]]);
        let frequent = mine_frequent_itemsets(&matrix, 1.0).unwrap();

        // Only A is present in every transaction
        assert_eq!(frequent.len(), 1);
        assert_eq!(frequent.support_of(&[0]), Some(1.0));
    }

    #[test]
    fn test_unattainable_threshold_yields_empty_set() {
        let matrix = matrix_from_rows(&["A", "B"], &[&[1, 0], &[0, 1]]);
        let frequent = mine_frequent_itemsets(&matrix, 0.9).unwrap();

        assert!(frequent.is_empty());
        assert_eq!(frequent.max_size(), 0);
    }

    #[test]
    fn test_all_zero_column_never_appears() {
        let matrix = matrix_from_rows(&["A", "B"], &[&[1, 0], &[1, 0]]);
        let frequent = mine_frequent_itemsets(&matrix, 0.1).unwrap();

        assert_eq!(frequent.support_of(&[1]), None);
        assert_eq!(frequent.len(), 1);
    }

    #[test]
    fn test_invalid_min_support_rejected() {
        let matrix = toy_matrix();
        assert!(mine_frequent_itemsets(&matrix, 0.0).is_err());
        assert!(mine_frequent_itemsets(&matrix, -0.5).is_err());
        assert!(mine_frequent_itemsets(&matrix, 1.5).is_err());
        assert!(mine_frequent_itemsets(&matrix, f64::NAN).is_err());
    }

    #[test]
    fn test_three_item_level() {
        // {A,B,C} in 2 of 3 rows; all pairs and singles also frequent
        let matrix = matrix_from_rows(
            &["A", "B", "C"],
            &[&[1, 1, 1], &[1, 1, 1], &[1, 1, 0]],
        );
        let frequent = mine_frequent_itemsets(&matrix, 0.5).unwrap();

        assert_eq!(frequent.support_of(&[0, 1, 2]), Some(2.0 / 3.0));
        assert_eq!(frequent.support_of(&[0, 1]), Some(1.0));
        assert_eq!(frequent.max_size(), 3);
    }

    #[test]
    fn test_join_candidates_keeps_canonical_order() {
        let level = vec![vec![0, 1], vec![0, 2], vec![1, 2]];
        let candidates = join_candidates(&level);

        assert_eq!(candidates, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_prune_requires_all_subsets() {
        let matrix = toy_matrix();
        let frequent = mine_frequent_itemsets(&matrix, 0.5).unwrap();

        // {A,C} is not frequent, so {A,B,C} must be pruned
        assert!(!all_subsets_frequent(&[0, 1, 2], &frequent));
        assert!(all_subsets_frequent(&[0, 1], &frequent));
    }
}
