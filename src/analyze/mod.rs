//! Lineup analytics engine.
//!
//! Pure computations over a repository snapshot:
//! - Co-starter and anticorrelated player rankings
//! - Positional formation profiles
//! - Frequent position itemsets and association rules
//! - Per-player position/opponent profiles
//!
//! Every analyzer is a pure function of (records, query parameters); empty
//! results are values, never errors.

pub mod cooccurrence;
pub mod formations;
pub mod patterns;
pub mod player;

pub use cooccurrence::*;
pub use formations::*;
pub use patterns::*;
pub use player::*;

/// How many rows the ranked co-starter tables retain.
pub const TOP_N: usize = 10;

/// Integer percentage of `count / total`, rounded half up. Zero denominator
/// yields 0.
pub fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Format an integer percentage for display, e.g. "67%".
pub fn format_percent(count: usize, total: usize) -> String {
    format!("{}%", percent(count, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(1, 1), 100);
    }

    #[test]
    fn test_percent_zero_denominator() {
        assert_eq!(percent(5, 0), 0);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(2, 3), "67%");
        assert_eq!(format_percent(0, 4), "0%");
    }
}
