//! Cosine similarity and top-k ranking

use ndarray::ArrayViewMut1;

use crate::types::SimilarityResult;

/// Scale `v` to unit length in place; a zero vector stays zero
///
/// Values are first divided by the largest magnitude so that any finite
/// input normalizes without overflowing.
pub(crate) fn normalize(mut v: ArrayViewMut1<'_, f64>) {
    let scale = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 {
        return;
    }
    v.mapv_inplace(|x| x / scale);

    let norm = v.dot(&v).sqrt();
    v.mapv_inplace(|x| x / norm);
}

/// Cosine similarity of two unit (or zero) vectors given their dot product
#[inline]
pub(crate) fn unit_cosine(dot: f64) -> f64 {
    if dot.is_finite() {
        dot.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Keep the `top_k` best scores, highest first, lower index first on ties
pub(crate) fn rank_top_k<I>(scores: I, top_k: usize) -> Vec<SimilarityResult>
where
    I: IntoIterator<Item = f64>,
{
    let mut results: Vec<SimilarityResult> = scores
        .into_iter()
        .enumerate()
        .map(|(index, similarity)| SimilarityResult::new(index, similarity))
        .collect();

    let by_rank = |a: &SimilarityResult, b: &SimilarityResult| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.index.cmp(&b.index))
    };

    if top_k < results.len() {
        results.select_nth_unstable_by(top_k, by_rank);
        results.truncate(top_k);
    }
    results.sort_by(by_rank);

    results
}
