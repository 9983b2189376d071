//! Scoring module - points, levels and gravity speed
//!
//! Line clears score `LINE_SCORES[n] * level`, plus a combo bonus of
//! `COMBO_BASE * combo * level` where `combo` already counts the clear being
//! scored. Levels start at 1 and advance every `LINES_PER_LEVEL` lines.

use crate::types::{
    BASE_DROP_INTERVAL_MS, COMBO_BASE, DROP_INTERVAL_DECAY, HARD_DROP_POINTS_PER_ROW,
    LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_INTERVAL_MS,
};

/// Points for one lock that cleared `lines` rows
///
/// `combo` is the combo counter after this lock has been counted.
/// A lock that clears nothing scores 0.
pub fn score_for_clear(lines: usize, level: u32, combo: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let base = LINE_SCORES.get(lines).copied().unwrap_or(LINE_SCORES[4]);
    let combo_bonus = COMBO_BASE.saturating_mul(combo).saturating_mul(level);
    base.saturating_mul(level).saturating_add(combo_bonus)
}

/// Level for a running line total (starts at 1)
pub fn level_from_total_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity period for `level` with the default base and floor
pub fn drop_interval_ms(level: u32) -> u32 {
    drop_interval_with(level, BASE_DROP_INTERVAL_MS, MIN_DROP_INTERVAL_MS)
}

/// Gravity period: `max(min_ms, base_ms * 0.85^(level - 1))`, rounded to whole ms
pub fn drop_interval_with(level: u32, base_ms: u32, min_ms: u32) -> u32 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let interval = (base_ms as f64 * DROP_INTERVAL_DECAY.powi(exponent)).round();
    (interval as u32).max(min_ms)
}

/// Points for a hard drop that fell `rows` rows
pub fn hard_drop_points(rows: u32) -> u32 {
    rows.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_at_level_one() {
        assert_eq!(score_for_clear(1, 1, 0), 100);
        assert_eq!(score_for_clear(2, 1, 0), 300);
        assert_eq!(score_for_clear(3, 1, 0), 500);
        assert_eq!(score_for_clear(4, 1, 0), 800);
    }

    #[test]
    fn test_level_and_combo_multiply() {
        assert_eq!(score_for_clear(2, 3, 2), 300 * 3 + 50 * 2 * 3);
        assert_eq!(score_for_clear(2, 3, 2), 1200);
        // First clear of a chain already carries combo 1
        assert_eq!(score_for_clear(1, 1, 1), 150);
    }

    #[test]
    fn test_no_lines_no_points() {
        assert_eq!(score_for_clear(0, 5, 3), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_from_total_lines(0), 1);
        assert_eq!(level_from_total_lines(9), 1);
        assert_eq!(level_from_total_lines(10), 2);
        assert_eq!(level_from_total_lines(29), 3);
        assert_eq!(level_from_total_lines(100), 11);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(1), 1000);
        assert_eq!(drop_interval_ms(2), 850);
        assert!(drop_interval_ms(10) < drop_interval_ms(9));
        assert_eq!(drop_interval_ms(20), 50);
        assert_eq!(drop_interval_ms(500), 50);
    }

    #[test]
    fn test_drop_interval_never_increases() {
        let mut prev = drop_interval_ms(1);
        for level in 2..60 {
            let cur = drop_interval_ms(level);
            assert!(cur <= prev);
            assert!(cur >= MIN_DROP_INTERVAL_MS);
            prev = cur;
        }
    }

    #[test]
    fn test_drop_interval_custom_base() {
        assert_eq!(drop_interval_with(1, 500, 20), 500);
        assert_eq!(drop_interval_with(40, 500, 20), 20);
    }

    #[test]
    fn test_hard_drop_points() {
        assert_eq!(hard_drop_points(0), 0);
        assert_eq!(hard_drop_points(18), 36);
    }
}
