pub const DEFAULT_MIN_RELEVANCE: f32 = 0.2;

/// Inclusive threshold check.
pub fn passes(score: f32, min_relevance: f32) -> bool {
	score >= min_relevance
}

/// Keeps every paper whose score reaches `min_relevance`, in input order. Papers and scores are
/// paired positionally; a paper without a score is dropped.
pub fn filter<'a, T>(papers: &'a [T], scores: &[f32], min_relevance: f32) -> Vec<&'a T> {
	papers
		.iter()
		.zip(scores)
		.filter(|(_, score)| passes(**score, min_relevance))
		.map(|(paper, _)| paper)
		.collect()
}
