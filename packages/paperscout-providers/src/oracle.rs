use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use paperscout_config::OracleConfig;
use paperscout_domain::{SummaryText, Verdict, prompt, verdict};

use crate::{Error, Result};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends a generation prompt and returns the raw reply text.
pub async fn summarize(cfg: &OracleConfig, prompt: &str) -> Result<String> {
	complete(cfg, prompt).await
}

/// Asks the oracle to judge `candidate` against the document and reads its verdict.
pub async fn verify(cfg: &OracleConfig, document: &str, candidate: &SummaryText) -> Result<Verdict> {
	let reply = complete(cfg, &prompt::verification_prompt(document, candidate)).await?;

	Ok(verdict::parse_verdict(&reply))
}

/// One chat completion with transport-level retries. Only timeouts, connection failures, 429 and
/// 5xx responses are retried; everything else fails on the first attempt.
pub async fn complete(cfg: &OracleConfig, prompt: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let mut attempt = 1;

	loop {
		match send_once(&client, &url, cfg, &body).await {
			Ok(content) => return Ok(content),
			Err(err) if err.is_retryable() && attempt < cfg.max_retries => {
				tracing::warn!(
					provider = %cfg.provider_id,
					attempt,
					error = %err,
					"Oracle request failed. Retrying."
				);
				tokio::time::sleep(Duration::from_millis(cfg.retry_delay_ms)).await;

				attempt += 1;
			},
			Err(err) => return Err(err),
		}
	}
}

async fn send_once(client: &Client, url: &str, cfg: &OracleConfig, body: &Value) -> Result<String> {
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(body)
		.send()
		.await?;
	let status = res.status().as_u16();
	let text = res.text().await?;

	if !(200..300).contains(&status) {
		return Err(Error::Status { status, message: describe_failure(status, &text) });
	}

	parse_completion(serde_json::from_str(&text)?)
}

fn parse_completion(json: Value) -> Result<String> {
	if let Some(message) = api_error_message(&json) {
		return Err(Error::InvalidResponse { message: format!("Oracle returned an error: {message}") });
	}

	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Oracle response is missing choices content.".to_string(),
		})?
		.trim();

	if content.is_empty() {
		return Err(Error::InvalidResponse { message: "Oracle returned empty content.".to_string() });
	}

	Ok(content.to_string())
}

fn api_error_message(json: &Value) -> Option<String> {
	let error = json.get("error")?;

	Some(
		error
			.get("message")
			.and_then(|m| m.as_str())
			.map(str::to_string)
			.unwrap_or_else(|| error.to_string()),
	)
}

fn describe_failure(status: u16, body: &str) -> String {
	let detail = serde_json::from_str::<Value>(body)
		.ok()
		.and_then(|json| api_error_message(&json))
		.unwrap_or_else(|| {
			let trimmed = body.trim();

			if trimmed.is_empty() {
				"empty response body".to_string()
			} else {
				trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
			}
		});
	let hint = match status {
		400 => Some("document URL may be unreachable or unsupported"),
		401 => Some("API key is invalid or expired"),
		403 => Some("access denied"),
		429 => Some("rate limit exceeded"),
		500..=599 => Some("server error"),
		_ => None,
	};

	match hint {
		Some(hint) => format!("{detail} ({hint})"),
		None => detail,
	}
}
