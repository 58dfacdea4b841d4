const MAX_REASON_CHARS: usize = 200;
const UNRECOGNIZED: &str = "unrecognized verification verdict";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
	Accepted,
	Rejected { reason: String },
}
impl Verdict {
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted)
	}
}

/// Reads a verification answer. Only an explicit pass counts as acceptance: a negative marker
/// anywhere in the verdict wins, and an answer without any marker is a rejection.
///
/// The verdict line is preferred. When it carries no marker itself (a bare `验证结果：` label or a
/// heading), the first following line that is not a reason decides, then the whole reply.
pub fn parse_verdict(raw: &str) -> Verdict {
	let lines = raw.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>();
	let verdict = lines.iter().position(|line| is_verdict_line(line)).and_then(|index| {
		classify(lines[index]).or_else(|| {
			lines[index + 1..]
				.iter()
				.find(|line| reason_text(line).is_none())
				.and_then(|line| classify(line))
		})
	});

	match verdict.or_else(|| classify(raw)) {
		Some(true) => Verdict::Accepted,
		Some(false) => Verdict::Rejected { reason: reason(raw) },
		None => Verdict::Rejected {
			reason: reason_line(raw).unwrap_or_else(|| UNRECOGNIZED.to_string()),
		},
	}
}

fn is_verdict_line(line: &str) -> bool {
	let lower = line.trim_start_matches(['#', '*', '-', ' ']).to_lowercase();

	line.contains("验证结果") || lower.starts_with("verdict") || lower.starts_with("result")
}

fn classify(text: &str) -> Option<bool> {
	let upper = text.to_uppercase();

	if text.contains("不通过") || text.contains("未通过") || upper.contains("FAIL") {
		return Some(false);
	}
	if text.contains("通过") || upper.contains("PASS") {
		return Some(true);
	}

	None
}

fn reason(raw: &str) -> String {
	reason_line(raw).unwrap_or_else(|| truncate(raw.trim()))
}

fn reason_line(raw: &str) -> Option<String> {
	raw.lines().map(str::trim).find_map(reason_text)
}

fn reason_text(line: &str) -> Option<String> {
	let line = line.trim_start_matches(['*', '-', ' ']);
	let rest = line
		.strip_prefix("原因")
		.or_else(|| line.strip_prefix("Reason"))
		.or_else(|| line.strip_prefix("reason"))?;
	let rest = rest.trim_start_matches([':', '：', '*', ' ']).trim();

	(!rest.is_empty()).then(|| truncate(rest))
}

fn truncate(text: &str) -> String {
	text.chars().take(MAX_REASON_CHARS).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_explicit_pass() {
		assert_eq!(parse_verdict("验证结果：通过\n原因：无"), Verdict::Accepted);
		assert_eq!(parse_verdict("Verdict: PASS"), Verdict::Accepted);
	}

	#[test]
	fn negative_marker_wins() {
		let verdict = parse_verdict("验证结果：不通过\n原因：方法描述与论文不符。");

		assert_eq!(verdict, Verdict::Rejected { reason: "方法描述与论文不符。".to_string() });
	}

	#[test]
	fn verdict_line_is_preferred_over_body() {
		let raw = "总结中提到的实验均已通过复核。\n验证结果：不通过\n原因：贡献被夸大。";

		assert!(!parse_verdict(raw).is_accepted());
	}

	#[test]
	fn marker_on_line_after_verdict_label_is_read() {
		assert_eq!(parse_verdict("验证结果：\n通过\n原因：四项均满足。"), Verdict::Accepted);
		assert_eq!(parse_verdict("### 验证结果\n**通过**"), Verdict::Accepted);
		assert_eq!(
			parse_verdict("验证结果：\n不通过\n原因：遗漏了主要贡献。"),
			Verdict::Rejected { reason: "遗漏了主要贡献。".to_string() }
		);
	}

	#[test]
	fn reason_line_after_bare_label_does_not_decide() {
		let raw = "验证结果：\n原因：总结基本通过了格式检查。\n不通过";

		assert!(!parse_verdict(raw).is_accepted());
	}

	#[test]
	fn unlabelled_reply_falls_back_to_whole_text() {
		assert_eq!(parse_verdict("四项检查均通过。"), Verdict::Accepted);
	}

	#[test]
	fn missing_marker_is_rejection() {
		assert_eq!(
			parse_verdict("I could not open the document."),
			Verdict::Rejected { reason: UNRECOGNIZED.to_string() }
		);
	}
}
