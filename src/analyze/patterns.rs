//! Frequent position itemsets and association rules.
//!
//! Games become one-hot transactions over the observed position codes
//! (duplicate positions within a lineup count as present once). A level-wise
//! Apriori pass finds frequent itemsets; the minimum support starts at 0.10
//! and steps down by 0.01 until something qualifies, bottoming out at an
//! empty result. Rules are derived from the itemsets and kept when their
//! confidence reaches 0.50.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyze::formations::SIGNATURE_LEN;
use crate::models::{position_rank, PositionField};
use crate::repository::{starters_by_game, LineupRepository};

/// Initial minimum support for the adaptive search, in hundredths.
const INITIAL_SUPPORT_PCT: u32 = 10;

/// Minimum confidence for a rule to be reported.
const MIN_CONFIDENCE: f64 = 0.5;

/// An association rule between position subsets.
#[derive(Debug, Clone, Serialize)]
pub struct AssociationRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Mine association rules over a team's starting-position sets.
///
/// Empty input, or no itemset frequent at any support down to zero, yields
/// an empty table.
pub fn mine_formation_rules(
    repo: &LineupRepository,
    team: &str,
    position_field: PositionField,
) -> Vec<AssociationRule> {
    let transactions = build_transactions(repo, team, position_field);
    if transactions.games.is_empty() {
        return Vec::new();
    }

    let frequent = adaptive_frequent_itemsets(&transactions.games);
    if frequent.is_empty() {
        return Vec::new();
    }

    derive_rules(&frequent, &transactions.universe)
}

/// Transactions carry at most [`MASK_BITS`] distinct position codes; codes
/// past that bound (after canonical ordering) are dropped from the universe.
const MASK_BITS: usize = u64::BITS as usize;

struct Transactions {
    /// Distinct position codes, canonical order; bit i of a game mask marks
    /// presence of universe[i]. Length never exceeds [`MASK_BITS`].
    universe: Vec<String>,
    games: Vec<u64>,
}

fn build_transactions(
    repo: &LineupRepository,
    team: &str,
    position_field: PositionField,
) -> Transactions {
    let starters = repo.starters_for_team(team);
    let games = starters_by_game(&starters);

    let mut position_lists: Vec<Vec<String>> = Vec::new();
    for rows in games.values() {
        if rows.len() != SIGNATURE_LEN {
            continue;
        }
        position_lists.push(
            rows.iter()
                .map(|r| r.position_for(position_field).to_string())
                .collect(),
        );
    }

    let mut universe: Vec<String> = position_lists
        .iter()
        .flatten()
        .cloned()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    universe.sort_by(|a, b| {
        position_rank(a)
            .cmp(&position_rank(b))
            .then_with(|| a.cmp(b))
    });
    if universe.len() > MASK_BITS {
        warn!(
            codes = universe.len(),
            kept = MASK_BITS,
            "position vocabulary exceeds mask width, dropping tail codes"
        );
        universe.truncate(MASK_BITS);
    }

    let index: HashMap<&str, usize> = universe
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let masks = position_lists
        .iter()
        .map(|positions| {
            let mut mask = 0u64;
            for p in positions {
                if let Some(&i) = index.get(p.as_str()) {
                    mask |= 1 << i;
                }
            }
            mask
        })
        .collect();

    Transactions {
        universe,
        games: masks,
    }
}

/// Linear search downward from the initial support until the itemset table
/// is non-empty. Terminates with an empty table at support zero.
fn adaptive_frequent_itemsets(games: &[u64]) -> HashMap<u64, f64> {
    let mut support_pct = INITIAL_SUPPORT_PCT;
    while support_pct > 0 {
        let min_support = f64::from(support_pct) / 100.0;
        let frequent = frequent_itemsets(games, min_support);
        if !frequent.is_empty() {
            info!(min_support, itemsets = frequent.len(), "frequent itemsets found");
            return frequent;
        }
        debug!(min_support, "no frequent itemsets, lowering support");
        support_pct -= 1;
    }
    HashMap::new()
}

/// Level-wise Apriori over bitmask transactions. Returns each frequent
/// itemset (as a mask) with its support.
fn frequent_itemsets(games: &[u64], min_support: f64) -> HashMap<u64, f64> {
    let total = games.len();
    if total == 0 {
        return HashMap::new();
    }

    let support_of = |mask: u64| -> f64 {
        games.iter().filter(|g| *g & mask == mask).count() as f64 / total as f64
    };

    let universe_bits: u64 = games.iter().fold(0, |acc, g| acc | g);
    let singletons: Vec<u64> = (0..MASK_BITS)
        .filter(|i| universe_bits & (1 << i) != 0)
        .map(|i| 1u64 << i)
        .collect();

    let mut frequent: HashMap<u64, f64> = HashMap::new();
    let mut level: Vec<u64> = Vec::new();
    for &s in &singletons {
        let sup = support_of(s);
        if sup >= min_support {
            frequent.insert(s, sup);
            level.push(s);
        }
    }

    while !level.is_empty() {
        // Candidates: unions of this level's itemsets with frequent
        // singletons, one bit larger, all subsets frequent.
        let mut candidates: Vec<u64> = Vec::new();
        for &itemset in &level {
            for &s in &singletons {
                let candidate = itemset | s;
                if candidate == itemset || !frequent.contains_key(&s) {
                    continue;
                }
                if candidates.contains(&candidate) {
                    continue;
                }
                if all_subsets_frequent(candidate, &frequent) {
                    candidates.push(candidate);
                }
            }
        }

        let mut next_level = Vec::new();
        for candidate in candidates {
            let sup = support_of(candidate);
            if sup >= min_support {
                frequent.insert(candidate, sup);
                next_level.push(candidate);
            }
        }
        level = next_level;
    }

    frequent
}

/// Apriori pruning: every (k-1)-subset of a k-candidate must be frequent.
fn all_subsets_frequent(candidate: u64, frequent: &HashMap<u64, f64>) -> bool {
    let mut bits = candidate;
    while bits != 0 {
        let bit = bits & bits.wrapping_neg();
        let subset = candidate & !bit;
        if subset != 0 && !frequent.contains_key(&subset) {
            return false;
        }
        bits &= bits - 1;
    }
    true
}

fn derive_rules(frequent: &HashMap<u64, f64>, universe: &[String]) -> Vec<AssociationRule> {
    let mut rules = Vec::new();

    for (&itemset, &support) in frequent {
        if itemset.count_ones() < 2 {
            continue;
        }
        // Every nonempty proper submask is an antecedent candidate; its
        // support is known because subsets of frequent itemsets are frequent.
        let mut antecedent = (itemset.wrapping_sub(1)) & itemset;
        while antecedent != 0 {
            let consequent = itemset & !antecedent;
            if let (Some(&sup_a), Some(&sup_c)) =
                (frequent.get(&antecedent), frequent.get(&consequent))
            {
                let confidence = support / sup_a;
                if confidence >= MIN_CONFIDENCE {
                    rules.push(AssociationRule {
                        antecedent: mask_names(antecedent, universe),
                        consequent: mask_names(consequent, universe),
                        support,
                        confidence,
                        lift: confidence / sup_c,
                    });
                }
            }
            antecedent = (antecedent - 1) & itemset;
        }
    }

    rules.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.support
                    .partial_cmp(&a.support)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
    rules
}

fn mask_names(mask: u64, universe: &[String]) -> Vec<String> {
    universe
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, p)| p.clone())
        .collect()
}
