use time::OffsetDateTime;

/// Paper metadata as delivered by discovery. Never mutated once it enters the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct PaperRecord {
	/// arXiv-style identifier including the version suffix, e.g. "2501.01234v1".
	pub id: String,
	pub title: String,
	pub authors: Vec<String>,
	pub published: OffsetDateTime,
	pub updated: Option<OffsetDateTime>,
	pub categories: Vec<String>,
	pub primary_category: String,
	pub pdf_url: String,
	/// Abstract page URL.
	pub arxiv_url: String,
	pub abstract_text: String,
}
impl PaperRecord {
	/// Reference handed to the oracle; it reads the document itself.
	pub fn document_ref(&self) -> &str {
		&self.pdf_url
	}

	pub fn in_any_category(&self, categories: &[String]) -> Option<&str> {
		self.categories
			.iter()
			.find(|category| categories.iter().any(|excluded| excluded == *category))
			.map(String::as_str)
	}
}
