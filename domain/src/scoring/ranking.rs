//! Ranking and top-N selection

use super::score::PaperScore;

/// Order candidates by final score, best first.
///
/// Returns positions into `scores`. Failed candidates carry no final score
/// and are excluded. The sort is stable, so equal scores keep the order the
/// candidates arrived in.
pub fn rank(scores: &[PaperScore]) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = scores
        .iter()
        .enumerate()
        .filter_map(|(position, score)| score.ranked_score().map(|value| (position, value)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(position, _)| position).collect()
}

/// Positions of the top `top_n` candidates by final score.
///
/// `top_n == 0` disables selection entirely; a `top_n` larger than the
/// ranked pool is clamped to it.
pub fn select_top_n(scores: &[PaperScore], top_n: usize) -> Vec<usize> {
    let mut ranked = rank(scores);
    ranked.truncate(top_n);
    ranked
}
