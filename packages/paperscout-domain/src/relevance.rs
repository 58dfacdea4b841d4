use crate::{catalog::KeywordEntry, paper::PaperRecord, text};

/// Upper bound of a relevance score, in weight points (tenths).
const MAX_POINTS: u32 = 10;

pub fn searchable_text(title: &str, abstract_text: &str) -> String {
	text::normalize(&format!("{title} {abstract_text}"))
}

pub fn score(paper: &PaperRecord, catalog: &[KeywordEntry]) -> f32 {
	score_text(&searchable_text(&paper.title, &paper.abstract_text), catalog)
}

/// Additive weighted-keyword score over already normalized text, clamped to `[0.0, 1.0]` only
/// after every phrase has been counted. Each distinct phrase counts at most once.
pub fn score_text(normalized: &str, catalog: &[KeywordEntry]) -> f32 {
	let points: u32 = matches(normalized, catalog).iter().map(|entry| entry.weight.points()).sum();

	points.min(MAX_POINTS) as f32 / MAX_POINTS as f32
}

pub fn matched_phrases(paper: &PaperRecord, catalog: &[KeywordEntry]) -> Vec<&'static str> {
	matches(&searchable_text(&paper.title, &paper.abstract_text), catalog)
		.into_iter()
		.map(|entry| entry.phrase)
		.collect()
}

fn matches(normalized: &str, catalog: &[KeywordEntry]) -> Vec<KeywordEntry> {
	if normalized.is_empty() {
		return Vec::new();
	}

	let mut seen: Vec<String> = Vec::with_capacity(catalog.len());
	let mut hits = Vec::new();

	for entry in catalog {
		let phrase = text::normalize(entry.phrase);

		if phrase.is_empty() || seen.contains(&phrase) {
			continue;
		}
		if normalized.contains(phrase.as_str()) {
			hits.push(*entry);
		}

		seen.push(phrase);
	}

	hits
}
