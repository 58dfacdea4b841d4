use std::time::Duration;

use quick_xml::{
	Reader,
	events::{BytesStart, Event},
};
use reqwest::Client;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use paperscout_config::DiscoveryConfig;
use paperscout_domain::PaperRecord;

use crate::{Error, Result};

const USER_AGENT: &str = concat!("paperscout/", env!("CARGO_PKG_VERSION"));
const PDF_BASE: &str = "https://arxiv.org/pdf/";
const ABS_BASE: &str = "https://arxiv.org/abs/";

#[derive(Clone, Debug)]
pub struct DiscoveryQuery {
	pub search_query: String,
	/// Papers published before this instant are dropped.
	pub since: OffsetDateTime,
	pub max_results: u32,
}

/// `all:"kw1" OR all:"kw2" ...`
pub fn build_query(terms: &[&str]) -> String {
	terms.iter().map(|term| format!("all:\"{term}\"")).collect::<Vec<_>>().join(" OR ")
}

/// Newest-first listing from the arXiv export API, restricted to the query window.
pub async fn search(cfg: &DiscoveryConfig, query: &DiscoveryQuery) -> Result<Vec<PaperRecord>> {
	let client = Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.user_agent(USER_AGENT)
		.build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let max_results = query.max_results.to_string();
	let res = client
		.get(url)
		.query(&[
			("search_query", query.search_query.as_str()),
			("start", "0"),
			("max_results", max_results.as_str()),
			("sortBy", "submittedDate"),
			("sortOrder", "descending"),
		])
		.send()
		.await?;
	let status = res.status().as_u16();
	let body = res.text().await?;

	if !(200..300).contains(&status) {
		return Err(Error::Status {
			status,
			message: body.trim().chars().take(200).collect(),
		});
	}

	let papers = parse_feed(&body)?;
	let total = papers.len();
	let recent = papers
		.into_iter()
		.filter(|paper| paper.published >= query.since)
		.collect::<Vec<_>>();

	tracing::info!(fetched = total, in_window = recent.len(), "arXiv listing received.");

	Ok(recent)
}

/// Parses an Atom feed into paper records. Entries without an id or a valid publication date are
/// skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>> {
	let mut reader = Reader::from_str(xml);

	reader.config_mut().trim_text(true);

	let mut papers = Vec::new();
	let mut entry: Option<EntryBuilder> = None;
	let mut current = String::new();
	let mut in_author = false;

	loop {
		let event = reader.read_event().map_err(|err| Error::InvalidResponse {
			message: format!("Malformed arXiv feed at byte {}: {err}", reader.buffer_position()),
		})?;

		match event {
			Event::Start(ref e) => {
				let tag = local_name(e);

				if tag == "entry" {
					entry = Some(EntryBuilder::default());
				} else if let Some(builder) = entry.as_mut() {
					if tag == "author" {
						in_author = true;
					} else {
						builder.element(&tag, &attributes(e));
						current = tag;
					}
				}
			},
			Event::Empty(ref e) =>
				if let Some(builder) = entry.as_mut() {
					builder.element(&local_name(e), &attributes(e));
				},
			Event::Text(ref e) =>
				if let Some(builder) = entry.as_mut() {
					let text = e.unescape().map_err(|err| Error::InvalidResponse {
						message: format!("Malformed text in arXiv feed: {err}"),
					})?;

					builder.text(&current, &text, in_author);
				},
			Event::End(ref e) => {
				let name = e.local_name();

				match name.as_ref() {
					b"entry" => {
						if let Some(paper) = entry.take().and_then(EntryBuilder::finish) {
							papers.push(paper);
						}
					},
					b"author" => in_author = false,
					_ => {},
				}

				current.clear();
			},
			Event::Eof => break,
			_ => {},
		}
	}

	Ok(papers)
}

fn local_name(e: &BytesStart<'_>) -> String {
	String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
	e.attributes()
		.flatten()
		.map(|attr| {
			(
				String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
				String::from_utf8_lossy(&attr.value).into_owned(),
			)
		})
		.collect()
}

fn attribute(attrs: &[(String, String)], key: &str) -> Option<String> {
	attrs.iter().find(|(name, _)| name == key).map(|(_, value)| value.clone())
}

#[derive(Default)]
struct EntryBuilder {
	id_url: String,
	title: String,
	summary: String,
	published: String,
	updated: String,
	authors: Vec<String>,
	categories: Vec<String>,
	primary_category: Option<String>,
	pdf_url: Option<String>,
	abs_url: Option<String>,
}
impl EntryBuilder {
	fn element(&mut self, tag: &str, attrs: &[(String, String)]) {
		match tag {
			"category" =>
				if let Some(term) = attribute(attrs, "term") {
					self.categories.push(term);
				},
			"primary_category" => self.primary_category = attribute(attrs, "term"),
			"link" => {
				let title = attribute(attrs, "title");
				let rel = attribute(attrs, "rel");
				let Some(href) = attribute(attrs, "href") else { return };

				if title.as_deref() == Some("pdf") {
					self.pdf_url = Some(href);
				} else if rel.as_deref() == Some("alternate") {
					self.abs_url = Some(href);
				}
			},
			_ => {},
		}
	}

	fn text(&mut self, tag: &str, text: &str, in_author: bool) {
		match tag {
			"id" => self.id_url.push_str(text),
			"title" => self.title.push_str(text),
			"summary" => self.summary.push_str(text),
			"published" => self.published.push_str(text),
			"updated" => self.updated.push_str(text),
			"name" if in_author => self.authors.push(collapse(text)),
			_ => {},
		}
	}

	fn finish(self) -> Option<PaperRecord> {
		let id = self.id_url.trim().rsplit("/abs/").next().unwrap_or_default().trim().to_string();

		if id.is_empty() {
			tracing::warn!(entry = %self.id_url, "Skipping arXiv entry without an identifier.");

			return None;
		}

		let published = match OffsetDateTime::parse(self.published.trim(), &Rfc3339) {
			Ok(published) => published,
			Err(err) => {
				tracing::warn!(
					paper_id = %id,
					published = %self.published,
					error = %err,
					"Skipping arXiv entry with an unreadable publication date."
				);

				return None;
			},
		};
		let updated = OffsetDateTime::parse(self.updated.trim(), &Rfc3339).ok();
		let primary_category = self
			.primary_category
			.or_else(|| self.categories.first().cloned())
			.unwrap_or_default();
		let pdf_url = self.pdf_url.unwrap_or_else(|| format!("{PDF_BASE}{id}"));
		let arxiv_url = self.abs_url.unwrap_or_else(|| format!("{ABS_BASE}{id}"));

		Some(PaperRecord {
			id,
			title: collapse(&self.title),
			authors: self.authors,
			published,
			updated,
			categories: self.categories,
			primary_category,
			pdf_url,
			arxiv_url,
			abstract_text: collapse(&self.summary),
		})
	}
}

fn collapse(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}
