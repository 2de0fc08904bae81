//! Similar-option selection.
//!
//! The AI never plays strictly greedy: every candidate within a band of the
//! best score stays in the running, and one is drawn with probability
//! proportional to `score^1.5`. Candidates outside the band are never picked.

use crate::core::GameRng;

/// A candidate with its score.
#[derive(Clone, Debug, PartialEq)]
pub struct Scored<T> {
    pub option: T,
    pub score: f64,
}

impl<T> Scored<T> {
    pub fn new(option: T, score: f64) -> Self {
        Self { option, score }
    }
}

/// Selection weight of a retained candidate.
fn weight(score: f64) -> f64 {
    let w = score.max(0.0).powf(1.5);
    if w.is_finite() {
        w
    } else {
        0.0
    }
}

/// Pick among the candidates scoring within `threshold` of the best.
///
/// Returns `None` only for an empty input. If every retained weight is zero
/// (all scores at or below zero) the best candidate is returned.
pub fn pick_from_similar_options<T>(
    mut options: Vec<Scored<T>>,
    threshold: f64,
    rng: &mut GameRng,
) -> Option<Scored<T>> {
    if options.len() <= 1 {
        return options.pop();
    }

    options.sort_by(|a, b| b.score.total_cmp(&a.score));
    let top = options[0].score;
    options.retain(|o| top - o.score <= threshold);

    let weights: Vec<f64> = options.iter().map(|o| weight(o.score)).collect();
    let index = rng.choose_weighted(&weights).unwrap_or(0);
    Some(options.swap_remove(index))
}
