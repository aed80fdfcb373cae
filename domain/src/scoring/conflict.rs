//! Conflict detection and score merging
//!
//! Two judgments of the same paper may disagree. The policy below decides
//! when the disagreement is large enough to warrant a third judgment, and
//! how the final score is merged once all judgments are in.

use serde::{Deserialize, Serialize};

use super::score::DetailedScore;

/// Disagreement thresholds between two judgments of one candidate.
///
/// Dimension thresholds sit at roughly half of each dimension's maximum, so
/// two judges can disagree sharply on one axis while the totals still look
/// close. All values are tunable policy, not invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPolicy {
    /// Maximum tolerated difference between totals
    pub total_diff: u32,
    /// Maximum tolerated difference on the innovation dimension
    pub innovation_diff: u32,
    /// Maximum tolerated difference on the technical dimension
    pub technical_diff: u32,
    /// Maximum tolerated difference on the practical dimension
    pub practical_diff: u32,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            total_diff: 20,
            innovation_diff: 20,
            technical_diff: 15,
            practical_diff: 15,
        }
    }
}

impl ConflictPolicy {
    /// Conflict policy with a custom total threshold and default dimension
    /// thresholds
    pub fn with_total_diff(total_diff: u32) -> Self {
        Self {
            total_diff,
            ..Self::default()
        }
    }

    /// Whether two judgments disagree beyond tolerance.
    ///
    /// Built on absolute differences, so the check is symmetric in its
    /// arguments.
    pub fn is_conflict(&self, a: &DetailedScore, b: &DetailedScore) -> bool {
        a.total.abs_diff(b.total) > self.total_diff
            || a.innovation.abs_diff(b.innovation) > self.innovation_diff
            || a.technical.abs_diff(b.technical) > self.technical_diff
            || a.practical.abs_diff(b.practical) > self.practical_diff
    }
}

/// Merge two or three judgments into a final 0-100 score.
///
/// With two judgments the final score is their mean. With a third, the pair
/// of totals closest to each other wins and the remaining judgment is
/// discarded as the outlier (two-of-three agreement). Distance ties resolve
/// in the fixed order (1,2), (1,3), (2,3).
pub fn merge_final_score(
    score1: &DetailedScore,
    score2: &DetailedScore,
    score3: Option<&DetailedScore>,
) -> f64 {
    let Some(score3) = score3 else {
        return mean(score1.total, score2.total);
    };

    let pairs = [
        (score1.total, score2.total),
        (score1.total, score3.total),
        (score2.total, score3.total),
    ];
    let mut best = pairs[0];
    for pair in &pairs[1..] {
        if pair.0.abs_diff(pair.1) < best.0.abs_diff(best.1) {
            best = *pair;
        }
    }
    mean(best.0, best.1)
}

fn mean(a: u32, b: u32) -> f64 {
    f64::from(a + b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(total: u32) -> DetailedScore {
        // Spread a total across dimensions without breaching bounds.
        let innovation = (total * 2 / 5).min(40);
        let technical = ((total - innovation) / 2).min(30);
        let practical = total - innovation - technical;
        let s = DetailedScore::new(innovation, technical, practical);
        assert_eq!(s.total, total);
        s
    }

    #[test]
    fn test_total_gap_over_threshold_conflicts() {
        let policy = ConflictPolicy::default();
        assert!(policy.is_conflict(&score(75), &score(25)));
        assert!(!policy.is_conflict(&score(75), &score(73)));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = ConflictPolicy::default();
        // Exactly 20 apart on totals and within dimension tolerances.
        let a = DetailedScore::new(20, 15, 15);
        let b = DetailedScore::new(10, 10, 10);
        assert_eq!(a.total.abs_diff(b.total), 20);
        assert!(!policy.is_conflict(&a, &b));

        let c = DetailedScore::new(20, 15, 16);
        assert_eq!(c.total.abs_diff(b.total), 21);
        assert!(policy.is_conflict(&c, &b));
    }

    #[test]
    fn test_dimension_gap_conflicts_despite_close_totals() {
        let policy = ConflictPolicy::default();
        let a = DetailedScore::new(30, 5, 5); // total 40
        let b = DetailedScore::new(5, 20, 14); // total 39
        assert!(policy.is_conflict(&a, &b));
        assert!(policy.is_conflict(&b, &a));
    }

    #[test]
    fn test_detection_is_symmetric() {
        let policy = ConflictPolicy::default();
        let samples = [
            DetailedScore::new(0, 0, 0),
            DetailedScore::new(40, 30, 30),
            DetailedScore::new(21, 0, 0),
            DetailedScore::new(0, 16, 0),
            DetailedScore::new(0, 0, 16),
            DetailedScore::new(20, 15, 15),
            DetailedScore::new(10, 10, 10),
            DetailedScore::new(35, 2, 3),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(
                    policy.is_conflict(a, b),
                    policy.is_conflict(b, a),
                    "asymmetric for {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_merge_two_scores_is_mean() {
        assert_eq!(merge_final_score(&score(75), &score(70), None), 72.5);
    }

    #[test]
    fn test_merge_three_keeps_closest_pair() {
        // 75 and 70 agree; 25 is the outlier.
        let merged = merge_final_score(&score(75), &score(25), Some(&score(70)));
        assert_eq!(merged, 72.5);
    }

    #[test]
    fn test_merge_three_tie_prefers_first_pair() {
        // |60-50| == |50-40|: (score1, score2) wins by order.
        let merged = merge_final_score(&score(60), &score(50), Some(&score(40)));
        assert_eq!(merged, 55.0);
    }
}
