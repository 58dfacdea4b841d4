use std::{
	fs,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use paperscout_config::Output;
use paperscout_domain::SummaryText;

use crate::{
	Error, Result,
	pipeline::{PipelineResult, ProcessedPaper},
	time_serde,
};

pub const DATA_SOURCE: &str = "arxiv.org";
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
	pub metadata: ReportMetadata,
	pub papers: Vec<ReportPaper>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
	pub run_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub crawl_date: OffsetDateTime,
	pub total_papers: usize,
	pub search_keywords: Vec<String>,
	pub search_topic: String,
	pub min_relevance_score: f32,
	pub data_source: String,
	pub discovered: usize,
	pub excluded: usize,
	pub filtered_out: usize,
	pub summarized: usize,
	pub failed: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportPaper {
	pub id: String,
	pub title: String,
	pub authors: Vec<String>,
	#[serde(with = "crate::time_serde::date")]
	pub published_date: Date,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub updated_date: Option<Date>,
	pub categories: Vec<String>,
	pub primary_category: String,
	pub pdf_url: String,
	pub arxiv_url: String,
	/// `null` for papers whose summarization failed.
	pub summary: Option<ReportSummary>,
	#[serde(with = "crate::time_serde")]
	pub crawl_timestamp: OffsetDateTime,
	pub relevance_score: f32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub processing_status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub failure_reason: Option<String>,
	#[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
	pub abstract_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
	pub chinese_summary: String,
	pub english_summary: String,
}
impl From<&SummaryText> for ReportSummary {
	fn from(summary: &SummaryText) -> Self {
		Self {
			chinese_summary: summary.chinese_summary(),
			english_summary: summary.english_summary(),
		}
	}
}

impl Report {
	/// Papers that went through summarization, highest relevance first. Ties keep processing order.
	pub fn build(result: &PipelineResult, output: &Output) -> Self {
		let mut papers = result
			.papers
			.iter()
			.filter(|entry| entry.was_attempted())
			.map(|entry| ReportPaper::from_processed(entry, output))
			.collect::<Vec<_>>();

		papers.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

		let stats = result.stats;

		Self {
			metadata: ReportMetadata {
				run_id: result.run_id,
				crawl_date: result.started_at,
				total_papers: papers.len(),
				search_keywords: result.keywords.clone(),
				search_topic: result.topic.as_str().to_string(),
				min_relevance_score: result.min_relevance,
				data_source: DATA_SOURCE.to_string(),
				discovered: stats.discovered,
				excluded: stats.excluded,
				filtered_out: stats.filtered_out,
				summarized: stats.summarized,
				failed: stats.failed,
			},
			papers,
		}
	}
}

impl ReportPaper {
	fn from_processed(entry: &ProcessedPaper, output: &Output) -> Self {
		let paper = &entry.paper;
		let failure = entry.failure();
		let status = if failure.is_some() { STATUS_FAILED } else { STATUS_SUCCESS };
		let processing_status = output.include_processing_status.then(|| status.to_string());

		Self {
			id: paper.id.clone(),
			title: paper.title.clone(),
			authors: paper.authors.clone(),
			published_date: paper.published.date(),
			updated_date: paper.updated.map(|updated| updated.date()),
			categories: paper.categories.clone(),
			primary_category: paper.primary_category.clone(),
			pdf_url: paper.pdf_url.clone(),
			arxiv_url: paper.arxiv_url.clone(),
			summary: entry.summary().map(ReportSummary::from),
			crawl_timestamp: entry.processed_at,
			relevance_score: entry.score,
			processing_status,
			failure_reason: failure.map(ToString::to_string),
			abstract_text: output.include_abstract.then(|| paper.abstract_text.clone()),
		}
	}
}

/// `<dir>/<file_prefix>_<YYYY-MM-DD>.json`
pub fn file_path(output: &Output, date: Date) -> Result<PathBuf> {
	let stamp = date.format(time_serde::date::FORMAT)?;

	Ok(Path::new(&output.dir).join(format!("{}_{stamp}.json", output.file_prefix)))
}

/// Builds the report for `result` and writes it as pretty-printed UTF-8 JSON.
pub fn write(result: &PipelineResult, output: &Output) -> Result<PathBuf> {
	let report = Report::build(result, output);
	let path = file_path(output, result.started_at.date())?;
	let json = serde_json::to_string_pretty(&report)?;

	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)
			.map_err(|source| Error::WriteReport { path: path.clone(), source })?;
	}

	fs::write(&path, json).map_err(|source| Error::WriteReport { path: path.clone(), source })?;

	tracing::info!(path = %path.display(), papers = report.papers.len(), "Report written.");

	Ok(path)
}
