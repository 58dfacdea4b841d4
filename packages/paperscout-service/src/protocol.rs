use std::{fmt, time::Duration};

use paperscout_config::{Config, OracleConfig};
use paperscout_domain::{PaperRecord, SummaryText, Verdict, prompt, summary};

use crate::{Providers, ShutdownSignal};

/// Delay and attempt settings for the verified summarization protocol.
#[derive(Clone, Debug, PartialEq)]
pub struct ProtocolSettings {
	pub verification_enabled: bool,
	/// Wait between a generation and its verification.
	pub cooldown: Duration,
	/// Wait before every oracle call.
	pub request_delay: Duration,
	pub max_attempts: u32,
}
impl ProtocolSettings {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			verification_enabled: cfg.verification.enabled,
			cooldown: seconds(cfg.verification.cooldown_secs),
			request_delay: seconds(cfg.pacing.request_delay_secs),
			max_attempts: cfg.verification.max_attempts,
		}
	}

	/// Upper bound on generate calls for one paper.
	pub fn generate_budget(&self) -> u32 {
		self.max_attempts.saturating_add(1)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
	VerificationRejected,
	VerificationExhausted,
	OracleUnavailable,
	MalformedResponse,
	Cancelled,
}
impl FailureKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::VerificationRejected => "verification rejected",
			Self::VerificationExhausted => "verification exhausted",
			Self::OracleUnavailable => "oracle unavailable",
			Self::MalformedResponse => "malformed oracle response",
			Self::Cancelled => "cancelled",
		}
	}
}

/// Why a paper, or one attempt on it, did not produce an accepted summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryFailure {
	pub kind: FailureKind,
	pub detail: Option<String>,
}
impl SummaryFailure {
	pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
		Self { kind, detail: Some(detail.into()) }
	}

	pub fn bare(kind: FailureKind) -> Self {
		Self { kind, detail: None }
	}
}
impl fmt::Display for SummaryFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.detail {
			Some(detail) => write!(f, "{}: {detail}", self.kind.as_str()),
			None => f.write_str(self.kind.as_str()),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptVerdict {
	Pending,
	Accepted,
	Rejected,
}

/// One generate round. `text` is `None` when the oracle produced nothing usable.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryAttempt {
	pub round: u32,
	pub text: Option<SummaryText>,
	pub verdict: AttemptVerdict,
	pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProtocolOutcome {
	Accepted(SummaryText),
	Failed(SummaryFailure),
}

#[derive(Clone, Debug)]
pub struct ProtocolRun {
	pub outcome: ProtocolOutcome,
	pub attempts: Vec<SummaryAttempt>,
	pub generate_calls: u32,
	pub verify_calls: u32,
}

#[derive(Debug)]
enum State {
	Idle,
	Generating { attempt: u32 },
	AwaitingCooldown { attempt: u32, candidate: SummaryText },
	Verifying { attempt: u32, candidate: SummaryText },
	Retrying { attempt: u32, failure: SummaryFailure },
	Accepted { summary: SummaryText },
	Failed { failure: SummaryFailure },
}

#[derive(Default)]
struct AttemptLog {
	attempts: Vec<SummaryAttempt>,
	generate_calls: u32,
	verify_calls: u32,
}
impl AttemptLog {
	fn record(&mut self, round: u32, text: Option<SummaryText>, verdict: AttemptVerdict) {
		self.attempts.push(SummaryAttempt { round, text, verdict, reason: None });
	}

	fn reject(&mut self, round: u32, text: Option<SummaryText>, reason: String) {
		self.attempts.push(SummaryAttempt {
			round,
			text,
			verdict: AttemptVerdict::Rejected,
			reason: Some(reason),
		});
	}

	fn resolve(&mut self, round: u32, verdict: AttemptVerdict, reason: Option<String>) {
		if let Some(attempt) = self.attempts.iter_mut().rev().find(|attempt| attempt.round == round) {
			attempt.verdict = verdict;
			attempt.reason = reason;
		}
	}

	fn finish(self, outcome: ProtocolOutcome) -> ProtocolRun {
		ProtocolRun {
			outcome,
			attempts: self.attempts,
			generate_calls: self.generate_calls,
			verify_calls: self.verify_calls,
		}
	}
}

/// Drives one paper through generate, cooldown, verify, and retry until it is accepted or fails.
pub struct VerifiedSummarizer<'a> {
	oracle_cfg: &'a OracleConfig,
	settings: &'a ProtocolSettings,
	providers: &'a Providers,
	shutdown: &'a ShutdownSignal,
}
impl<'a> VerifiedSummarizer<'a> {
	pub fn new(
		oracle_cfg: &'a OracleConfig,
		settings: &'a ProtocolSettings,
		providers: &'a Providers,
		shutdown: &'a ShutdownSignal,
	) -> Self {
		Self { oracle_cfg, settings, providers, shutdown }
	}

	pub async fn run(&self, paper: &PaperRecord) -> ProtocolRun {
		let mut log = AttemptLog::default();
		let mut state = State::Idle;

		loop {
			state = match state {
				State::Accepted { summary } => return log.finish(ProtocolOutcome::Accepted(summary)),
				State::Failed { failure } => {
					tracing::warn!(paper_id = %paper.id, reason = %failure, "Summarization failed.");

					return log.finish(ProtocolOutcome::Failed(failure));
				},
				_ if self.shutdown.is_triggered() =>
					State::Failed { failure: SummaryFailure::bare(FailureKind::Cancelled) },
				state => self.step(state, paper, &mut log).await,
			};
		}
	}

	async fn step(&self, state: State, paper: &PaperRecord, log: &mut AttemptLog) -> State {
		match state {
			State::Idle => State::Generating { attempt: 1 },
			State::Generating { attempt } => self.generate(attempt, paper, log).await,
			State::AwaitingCooldown { attempt, candidate } => {
				self.providers.pause(self.settings.cooldown).await;

				State::Verifying { attempt, candidate }
			},
			State::Verifying { attempt, candidate } =>
				self.verify(attempt, paper, candidate, log).await,
			State::Retrying { attempt, failure } => self.retry(attempt, failure, paper),
			terminal @ (State::Accepted { .. } | State::Failed { .. }) => terminal,
		}
	}

	async fn generate(&self, attempt: u32, paper: &PaperRecord, log: &mut AttemptLog) -> State {
		let document = paper.document_ref();
		let prompt = prompt::generation_prompt(document);

		self.providers.pause(self.settings.request_delay).await;

		log.generate_calls += 1;

		tracing::debug!(paper_id = %paper.id, attempt, "Requesting summary.");

		let raw = match self.providers.oracle.summarize(self.oracle_cfg, document, &prompt).await {
			Ok(raw) => raw,
			Err(err) => {
				let failure = SummaryFailure::new(FailureKind::OracleUnavailable, err.to_string());

				log.reject(attempt, None, failure.to_string());

				return State::Retrying { attempt, failure };
			},
		};
		let candidate = match summary::parse_summary(&raw) {
			Ok(candidate) => candidate,
			Err(err) => {
				let failure = SummaryFailure::new(FailureKind::MalformedResponse, err.to_string());

				log.reject(attempt, None, failure.to_string());

				return State::Retrying { attempt, failure };
			},
		};

		if !self.settings.verification_enabled {
			log.record(attempt, Some(candidate.clone()), AttemptVerdict::Accepted);

			tracing::info!(paper_id = %paper.id, attempt, "Summary accepted without verification.");

			return State::Accepted { summary: candidate };
		}

		log.record(attempt, Some(candidate.clone()), AttemptVerdict::Pending);

		State::AwaitingCooldown { attempt, candidate }
	}

	async fn verify(
		&self,
		attempt: u32,
		paper: &PaperRecord,
		candidate: SummaryText,
		log: &mut AttemptLog,
	) -> State {
		self.providers.pause(self.settings.request_delay).await;

		log.verify_calls += 1;

		match self.providers.oracle.verify(self.oracle_cfg, paper.document_ref(), &candidate).await {
			Ok(Verdict::Accepted) => {
				log.resolve(attempt, AttemptVerdict::Accepted, None);

				tracing::info!(paper_id = %paper.id, attempt, "Summary verified.");

				State::Accepted { summary: candidate }
			},
			Ok(Verdict::Rejected { reason }) => {
				log.resolve(attempt, AttemptVerdict::Rejected, Some(reason.clone()));

				State::Retrying {
					attempt,
					failure: SummaryFailure::new(FailureKind::VerificationRejected, reason),
				}
			},
			Err(err) => {
				let failure = SummaryFailure::new(FailureKind::OracleUnavailable, err.to_string());

				log.resolve(attempt, AttemptVerdict::Rejected, Some(failure.to_string()));

				State::Retrying { attempt, failure }
			},
		}
	}

	fn retry(&self, attempt: u32, failure: SummaryFailure, paper: &PaperRecord) -> State {
		let budget = self.settings.generate_budget();

		if attempt < budget {
			tracing::warn!(
				paper_id = %paper.id,
				attempt,
				budget,
				reason = %failure,
				"Summary attempt failed. Retrying."
			);

			return State::Generating { attempt: attempt + 1 };
		}

		let failure = match failure.kind {
			FailureKind::VerificationRejected => {
				tracing::debug!(paper_id = %paper.id, last_reason = %failure, "Attempt budget spent.");

				SummaryFailure::bare(FailureKind::VerificationExhausted)
			},
			_ => failure,
		};

		State::Failed { failure }
	}
}

fn seconds(value: f64) -> Duration {
	Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
