use crate::client::SearchHit;

/// Pick the answer of the highest-scoring hit at or above `threshold`.
///
/// Hits with equal scores keep the order the service returned them in. A NaN
/// score never clears the threshold.
#[inline]
pub fn select_best_match(hits: Vec<SearchHit>, threshold: f64) -> Option<String> {
    let mut survivors: Vec<SearchHit> = hits
        .into_iter()
        .filter(|hit| hit.score >= threshold)
        .collect();

    survivors.sort_by(|a, b| b.score.total_cmp(&a.score));

    survivors.into_iter().next().map(|hit| hit.answer)
}
