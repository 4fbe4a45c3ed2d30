//! Canonical ordering over position codes.
//!
//! Formation signatures compare equal only when their position lists are
//! sorted the same way, so a single static rank table defines the order.
//! Codes outside the table sort after every ranked code, keeping their
//! original relative order (the sort used must be stable).

/// Canonical position codes in formation-sort order, goalkeeper first.
pub const POSITION_ORDER: [&str; 19] = [
    "GK", "CB", "LB", "RB", "WB", "LWB", "RWB", "DM", "CM", "AMC", "AML", "AMR", "LM", "RM", "LW",
    "RW", "LF", "RF", "CF",
];

/// Sort rank for a position code. Unranked codes share the rank just past
/// the table so a stable sort leaves them in input order at the tail.
pub fn position_rank(code: &str) -> usize {
    POSITION_ORDER
        .iter()
        .position(|p| *p == code)
        .unwrap_or(POSITION_ORDER.len())
}

/// Sort a game's position list into canonical signature order.
///
/// The result is order-independent of the input among ranked codes; ties and
/// unranked codes preserve input order (stable sort).
pub fn sort_positions(positions: &mut [String]) {
    positions.sort_by_key(|p| position_rank(p));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_codes_in_table_order() {
        assert_eq!(position_rank("GK"), 0);
        assert_eq!(position_rank("CB"), 1);
        assert_eq!(position_rank("CF"), 18);
        assert!(position_rank("DM") < position_rank("CM"));
    }

    #[test]
    fn test_unranked_codes_sort_last() {
        assert_eq!(position_rank("SW"), POSITION_ORDER.len());
        assert!(position_rank("SW") > position_rank("CF"));
    }

    #[test]
    fn test_sort_positions_canonical() {
        let mut positions = vec![
            "CM".to_string(),
            "CB".to_string(),
            "CF".to_string(),
            "CB".to_string(),
            "DM".to_string(),
        ];
        sort_positions(&mut positions);
        assert_eq!(positions, vec!["CB", "CB", "DM", "CM", "CF"]);
    }

    #[test]
    fn test_sort_positions_order_independent() {
        let mut a = vec!["RW", "CB", "LB", "CM", "CF"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let mut b = vec!["CF", "CM", "LB", "CB", "RW"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        sort_positions(&mut a);
        sort_positions(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_positions_unranked_stable() {
        let mut positions = vec!["ZZ", "CB", "XX", "GK"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        sort_positions(&mut positions);
        // Unranked codes keep their relative order at the tail.
        assert_eq!(positions, vec!["GK", "CB", "ZZ", "XX"]);
    }
}
