use std::{collections::HashSet, fmt, str::FromStr};

use serde::Serialize;

use crate::text;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Topic {
	Vlm,
	Vla,
	Both,
}
impl Topic {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Vlm => "VLM",
			Self::Vla => "VLA",
			Self::Both => "BOTH",
		}
	}
}
impl fmt::Display for Topic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Topic {
	type Err = UnknownTopic;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"vlm" => Ok(Self::Vlm),
			"vla" => Ok(Self::Vla),
			"both" => Ok(Self::Both),
			_ => Err(UnknownTopic(raw.to_string())),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownTopic(pub String);
impl fmt::Display for UnknownTopic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown topic {:?}; expected vlm, vla, or both.", self.0)
	}
}
impl std::error::Error for UnknownTopic {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
	High,
	Medium,
	Low,
}
impl Weight {
	/// Weight in tenths. Scores are accumulated in these integer units so that tier sums compare
	/// exactly against thresholds.
	pub const fn points(self) -> u32 {
		match self {
			Self::High => 3,
			Self::Medium => 2,
			Self::Low => 1,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeywordEntry {
	pub phrase: &'static str,
	pub weight: Weight,
}

const fn entry(phrase: &'static str, weight: Weight) -> KeywordEntry {
	KeywordEntry { phrase, weight }
}

const VLM_CATALOG: &[KeywordEntry] = &[
	entry("vlm", Weight::High),
	entry("vision language model", Weight::High),
	entry("vision-language", Weight::High),
	entry("multimodal", Weight::Medium),
	entry("visual reasoning", Weight::Medium),
	entry("visual instruction", Weight::Medium),
	entry("image captioning", Weight::Medium),
	entry("visual grounding", Weight::Medium),
	entry("cross-modal", Weight::Low),
	entry("image-text", Weight::Low),
	entry("visual understanding", Weight::Low),
];

const VLA_CATALOG: &[KeywordEntry] = &[
	entry("vla", Weight::High),
	entry("vision language action", Weight::High),
	entry("embodied ai", Weight::High),
	entry("embodied agent", Weight::High),
	entry("robotic manipulation", Weight::Medium),
	entry("action planning", Weight::Medium),
	entry("visual navigation", Weight::Medium),
	entry("robot learning", Weight::Medium),
	entry("policy learning", Weight::Low),
	entry("motor control", Weight::Low),
	entry("behavioral cloning", Weight::Low),
];

const VLM_SEARCH_TERMS: &[&str] = &[
	"vision language model",
	"VLM",
	"vision-language",
	"multimodal",
	"visual instruction",
	"visual reasoning",
	"visual question answering",
	"image captioning",
	"visual grounding",
	"cross-modal",
	"vision-and-language",
	"visual understanding",
	"image-text",
];

const VLA_SEARCH_TERMS: &[&str] = &[
	"vision language action",
	"VLA",
	"embodied AI",
	"embodied agent",
	"embodied intelligence",
	"action prediction",
	"behavioral cloning",
	"imitation learning",
	"policy learning",
];

/// Weighted keyword set for `topic`, in tier order. [`Topic::Both`] is the union of both
/// catalogs; a phrase present in both keeps its first (VLM) weight.
pub fn catalog(topic: Topic) -> Vec<KeywordEntry> {
	match topic {
		Topic::Vlm => VLM_CATALOG.to_vec(),
		Topic::Vla => VLA_CATALOG.to_vec(),
		Topic::Both => {
			let mut seen = HashSet::new();

			VLM_CATALOG
				.iter()
				.chain(VLA_CATALOG)
				.filter(|entry| seen.insert(text::normalize(entry.phrase)))
				.copied()
				.collect()
		},
	}
}

/// Discovery keywords for `topic`. These drive the upstream search query and are reported in the
/// run metadata; they are broader than the scoring catalog.
pub fn search_terms(topic: Topic) -> Vec<&'static str> {
	match topic {
		Topic::Vlm => VLM_SEARCH_TERMS.to_vec(),
		Topic::Vla => VLA_SEARCH_TERMS.to_vec(),
		Topic::Both => VLM_SEARCH_TERMS.iter().chain(VLA_SEARCH_TERMS).copied().collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catalogs_have_no_duplicate_phrases() {
		for topic in [Topic::Vlm, Topic::Vla, Topic::Both] {
			let entries = catalog(topic);
			let distinct: HashSet<_> = entries.iter().map(|entry| entry.phrase).collect();

			assert_eq!(distinct.len(), entries.len(), "duplicate phrase in {topic}");
		}
	}

	#[test]
	fn both_is_union_of_single_topics() {
		let both = catalog(Topic::Both);

		assert_eq!(both.len(), VLM_CATALOG.len() + VLA_CATALOG.len());
		assert!(both.iter().any(|entry| entry.phrase == "vlm"));
		assert!(both.iter().any(|entry| entry.phrase == "embodied ai"));
	}

	#[test]
	fn embodied_agent_is_a_high_tier_vla_phrase() {
		let vla = catalog(Topic::Vla);

		assert!(vla.contains(&entry("embodied agent", Weight::High)));
		assert!(vla.iter().all(|entry| entry.phrase != "imitation learning"));
	}

	#[test]
	fn parses_topic_case_insensitively() {
		assert_eq!("VLM".parse::<Topic>(), Ok(Topic::Vlm));
		assert_eq!(" both ".parse::<Topic>(), Ok(Topic::Both));
		assert!("robotics".parse::<Topic>().is_err());
	}
}
