use time::macros::datetime;

use paperscout_domain::{
	KeywordEntry, PaperRecord, Topic, Weight,
	catalog::{self, search_terms},
	filter, relevance,
};

fn paper(id: &str, title: &str, abstract_text: &str) -> PaperRecord {
	PaperRecord {
		id: id.to_string(),
		title: title.to_string(),
		authors: vec!["Ada Lovelace".to_string()],
		published: datetime!(2026-10-17 08:00 UTC),
		updated: None,
		categories: vec!["cs.CV".to_string()],
		primary_category: "cs.CV".to_string(),
		pdf_url: format!("https://arxiv.org/pdf/{id}"),
		arxiv_url: format!("https://arxiv.org/abs/{id}"),
		abstract_text: abstract_text.to_string(),
	}
}

fn approx(a: f32, b: f32) -> bool {
	(a - b).abs() < 1e-6
}

#[test]
fn high_plus_medium_scores_half() {
	let catalog = catalog::catalog(Topic::Vlm);
	let p = paper(
		"2610.00001v1",
		"Grounded answers",
		"We train a vision language model on multimodal web data.",
	);
	let score = relevance::score(&p, &catalog);

	assert!(approx(score, 0.5), "score was {score}");
	assert!(filter::passes(score, filter::DEFAULT_MIN_RELEVANCE));
}

#[test]
fn low_tier_only_is_filtered_out() {
	let catalog = catalog::catalog(Topic::Vlm);
	let p = paper("2610.00002v1", "Retrieval", "A cross-modal retrieval benchmark.");
	let score = relevance::score(&p, &catalog);

	assert!(approx(score, 0.1), "score was {score}");
	assert!(!filter::passes(score, filter::DEFAULT_MIN_RELEVANCE));
}

#[test]
fn no_catalog_phrase_scores_zero() {
	let catalog = catalog::catalog(Topic::Both);
	let p = paper("2610.00003v1", "Sparse solvers", "We study preconditioners for PDEs.");

	assert_eq!(relevance::score(&p, &catalog), 0.0);
	assert_eq!(relevance::score_text("", &catalog), 0.0);
}

#[test]
fn repeated_phrase_counts_once() {
	let catalog = catalog::catalog(Topic::Vlm);
	let once = relevance::score_text("multimodal", &catalog);
	let thrice = relevance::score_text("multimodal multimodal multimodal", &catalog);

	assert!(approx(once, thrice));
}

#[test]
fn matching_ignores_case_and_whitespace_layout() {
	let catalog = catalog::catalog(Topic::Vla);
	let p = paper("2610.00004v1", "EMBODIED\n AI agents", "Robotic\tManipulation at scale.");

	assert!(approx(relevance::score(&p, &catalog), 0.5));
	assert_eq!(relevance::matched_phrases(&p, &catalog), vec!["embodied ai", "robotic manipulation"]);
}

#[test]
fn overlapping_tiers_are_clamped_to_one() {
	let catalog = catalog::catalog(Topic::Both);
	let text = relevance::searchable_text(
		"VLM and VLA",
		"A vision language model and a vision language action policy for embodied AI with \
		multimodal visual reasoning and robotic manipulation.",
	);
	let score = relevance::score_text(&text, &catalog);

	assert!(approx(score, 1.0), "score was {score}");
}

#[test]
fn scores_are_deterministic_and_bounded() {
	let samples = [
		("", ""),
		("VLM", "vlm VLM vision-language"),
		("Imitation learning", "behavioral cloning and policy learning"),
		("Nothing", "to see here"),
	];

	for topic in [Topic::Vlm, Topic::Vla, Topic::Both] {
		let catalog = catalog::catalog(topic);

		for (title, abstract_text) in samples {
			let p = paper("2610.00005v1", title, abstract_text);
			let first = relevance::score(&p, &catalog);
			let second = relevance::score(&p, &catalog);

			assert_eq!(first.to_bits(), second.to_bits());
			assert!((0.0..=1.0).contains(&first));
		}
	}
}

#[test]
fn both_counts_shared_phrase_once() {
	let catalog = [
		KeywordEntry { phrase: "multimodal", weight: Weight::Medium },
		KeywordEntry { phrase: "Multimodal", weight: Weight::High },
	];

	assert!(approx(relevance::score_text("multimodal agents", &catalog), 0.2));
}

#[test]
fn filter_keeps_order_and_inclusive_threshold() {
	let papers = ["a", "b", "c", "d", "e"];
	let scores = [0.3, 0.1, 0.2, 0.0, 1.0];
	let kept = filter::filter(&papers, &scores, 0.2);

	assert_eq!(kept, vec![&"a", &"c", &"e"]);

	for (paper, score) in papers.iter().zip(scores) {
		assert_eq!(kept.contains(&paper), score >= 0.2);
	}
}

#[test]
fn excluded_category_is_reported() {
	let p = paper("2610.00006v1", "t", "a");

	assert_eq!(p.in_any_category(&["cs.CV".to_string()]), Some("cs.CV"));
	assert_eq!(p.in_any_category(&["cs.RO".to_string()]), None);
}

#[test]
fn both_search_terms_concatenate_topics() {
	let both = search_terms(Topic::Both);

	assert_eq!(both.len(), search_terms(Topic::Vlm).len() + search_terms(Topic::Vla).len());
	assert_eq!(both.first(), Some(&"vision language model"));
}

#[test]
fn topic_serializes_upper_case() {
	assert_eq!(serde_json::to_string(&Topic::Both).expect("serialize"), "\"BOTH\"");
}
