use std::time::Duration;

use time::OffsetDateTime;
use uuid::Uuid;

use paperscout_config::Config;
use paperscout_domain::{PaperRecord, SummaryText, Topic, catalog, filter, relevance};
use paperscout_providers::arxiv::{self, DiscoveryQuery};

use crate::{
	Error, PaperScout, Result,
	protocol::{
		FailureKind, ProtocolOutcome, ProtocolSettings, SummaryAttempt, SummaryFailure,
		VerifiedSummarizer,
	},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineRequest {
	pub topic: Topic,
	pub days_back: u32,
	pub max_results: u32,
}
impl PipelineRequest {
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let topic = cfg
			.search
			.topic
			.parse::<Topic>()
			.map_err(|err| Error::InvalidConfig { message: err.to_string() })?;

		Ok(Self { topic, days_back: cfg.search.days_back, max_results: cfg.search.max_results })
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaperOutcome {
	/// Dropped before scoring because of an excluded category.
	Excluded { category: String },
	FilteredOut,
	Summarized(SummaryText),
	Failed(SummaryFailure),
}

#[derive(Clone, Debug)]
pub struct ProcessedPaper {
	pub paper: PaperRecord,
	/// Excluded papers are never scored and carry 0.0.
	pub score: f32,
	pub outcome: PaperOutcome,
	pub attempts: Vec<SummaryAttempt>,
	pub processed_at: OffsetDateTime,
}
impl ProcessedPaper {
	pub fn summary(&self) -> Option<&SummaryText> {
		match &self.outcome {
			PaperOutcome::Summarized(summary) => Some(summary),
			_ => None,
		}
	}

	pub fn failure(&self) -> Option<&SummaryFailure> {
		match &self.outcome {
			PaperOutcome::Failed(failure) => Some(failure),
			_ => None,
		}
	}

	/// True for papers that passed the filter and went through summarization.
	pub fn was_attempted(&self) -> bool {
		matches!(self.outcome, PaperOutcome::Summarized(_) | PaperOutcome::Failed(_))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
	pub discovered: usize,
	pub excluded: usize,
	pub filtered_out: usize,
	pub summarized: usize,
	pub failed: usize,
}
impl RunStats {
	fn tally(papers: &[ProcessedPaper]) -> Self {
		let mut stats = Self { discovered: papers.len(), ..Self::default() };

		for paper in papers {
			match paper.outcome {
				PaperOutcome::Excluded { .. } => stats.excluded += 1,
				PaperOutcome::FilteredOut => stats.filtered_out += 1,
				PaperOutcome::Summarized(_) => stats.summarized += 1,
				PaperOutcome::Failed(_) => stats.failed += 1,
			}
		}

		stats
	}
}

/// Everything one run produced, in discovery order.
#[derive(Clone, Debug)]
pub struct PipelineResult {
	pub run_id: Uuid,
	pub started_at: OffsetDateTime,
	pub topic: Topic,
	pub keywords: Vec<String>,
	pub min_relevance: f32,
	pub papers: Vec<ProcessedPaper>,
	pub stats: RunStats,
}

impl PaperScout {
	pub async fn run_configured(&self) -> Result<PipelineResult> {
		self.run(PipelineRequest::from_config(&self.cfg)?).await
	}

	/// Discovery, exclusion, scoring, filtering, then one paper at a time through the verified
	/// summarization protocol. Only a discovery failure aborts the run.
	pub async fn run(&self, req: PipelineRequest) -> Result<PipelineResult> {
		let started_at = OffsetDateTime::now_utc();
		let run_id = Uuid::new_v4();
		let terms = catalog::search_terms(req.topic);
		let query = DiscoveryQuery {
			search_query: arxiv::build_query(&terms),
			since: started_at - time::Duration::days(i64::from(req.days_back)),
			max_results: req.max_results,
		};

		tracing::info!(
			%run_id,
			topic = %req.topic,
			days_back = req.days_back,
			max_results = req.max_results,
			"Starting discovery."
		);

		let discovered = self
			.providers
			.discovery
			.search(&self.cfg.discovery, &query)
			.await
			.map_err(|err| Error::DiscoveryUnavailable { message: err.to_string() })?;
		let mut papers = self.score_papers(req.topic, discovered, started_at);
		let min_relevance = self.cfg.filter.min_relevance;
		let candidates = papers
			.iter()
			.enumerate()
			.filter(|(_, entry)| !matches!(entry.outcome, PaperOutcome::Excluded { .. }))
			.map(|(index, entry)| (index, entry.score))
			.collect::<Vec<_>>();
		let indices = candidates.iter().map(|(index, _)| *index).collect::<Vec<_>>();
		let scores = candidates.iter().map(|(_, score)| *score).collect::<Vec<_>>();
		let survivors =
			filter::filter(&indices, &scores, min_relevance).into_iter().copied().collect::<Vec<_>>();

		tracing::info!(
			%run_id,
			candidates = indices.len(),
			selected = survivors.len(),
			min_relevance,
			"Relevance filter applied."
		);

		self.summarize_all(&mut papers, &survivors).await;

		let stats = RunStats::tally(&papers);

		tracing::info!(
			%run_id,
			discovered = stats.discovered,
			excluded = stats.excluded,
			filtered_out = stats.filtered_out,
			summarized = stats.summarized,
			failed = stats.failed,
			"Run finished."
		);

		Ok(PipelineResult {
			run_id,
			started_at,
			topic: req.topic,
			keywords: terms.into_iter().map(str::to_string).collect(),
			min_relevance,
			papers,
			stats,
		})
	}

	fn score_papers(
		&self,
		topic: Topic,
		discovered: Vec<PaperRecord>,
		now: OffsetDateTime,
	) -> Vec<ProcessedPaper> {
		let keyword_catalog = catalog::catalog(topic);
		let excluded_categories = &self.cfg.search.exclude_categories;

		discovered
			.into_iter()
			.map(|paper| {
				let (score, outcome) = match paper.in_any_category(excluded_categories) {
					Some(category) => {
						tracing::debug!(paper_id = %paper.id, category, "Excluded category.");

						(0.0, PaperOutcome::Excluded { category: category.to_string() })
					},
					None => {
						let score = relevance::score(&paper, &keyword_catalog);

						tracing::debug!(
							paper_id = %paper.id,
							score,
							matched = ?relevance::matched_phrases(&paper, &keyword_catalog),
							"Scored paper."
						);

						(score, PaperOutcome::FilteredOut)
					},
				};

				ProcessedPaper { paper, score, outcome, attempts: Vec::new(), processed_at: now }
			})
			.collect()
	}

	async fn summarize_all(&self, papers: &mut [ProcessedPaper], survivors: &[usize]) {
		let settings = ProtocolSettings::from_config(&self.cfg);
		let summarizer =
			VerifiedSummarizer::new(&self.cfg.oracle, &settings, &self.providers, &self.shutdown);
		let paper_delay =
			Duration::try_from_secs_f64(self.cfg.pacing.paper_delay_secs).unwrap_or(Duration::ZERO);
		let total = survivors.len();

		for (position, &index) in survivors.iter().enumerate() {
			let Some(entry) = papers.get_mut(index) else { continue };

			if position > 0 && !self.shutdown.is_triggered() {
				self.providers.pause(paper_delay).await;
			}
			if self.shutdown.is_triggered() {
				entry.outcome = PaperOutcome::Failed(SummaryFailure::bare(FailureKind::Cancelled));
				entry.processed_at = OffsetDateTime::now_utc();

				continue;
			}

			tracing::info!(
				paper_id = %entry.paper.id,
				score = entry.score,
				position = position + 1,
				total,
				"Summarizing paper."
			);

			let run = summarizer.run(&entry.paper).await;

			entry.attempts = run.attempts;
			entry.outcome = match run.outcome {
				ProtocolOutcome::Accepted(summary) => PaperOutcome::Summarized(summary),
				ProtocolOutcome::Failed(failure) => PaperOutcome::Failed(failure),
			};
			entry.processed_at = OffsetDateTime::now_utc();
		}
	}
}
