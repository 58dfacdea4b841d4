use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::text;

const ZH_PROBLEM: &str = "问题";
const ZH_METHOD: &str = "方法";
const ZH_CONTRIBUTION: &str = "贡献";
const EN_PROBLEM: &str = "Problem";
const EN_METHOD: &str = "Method";
const EN_CONTRIBUTION: &str = "Contribution";
const LABEL_PREFIX: &str = r"(?m)^[ \t>*\-•·\d.、)）]*(?:\*\*)?";
const LABEL_SUFFIX: &str = r"(?:\*\*)?[ \t]*[:：][ \t]*(?:\*\*)?";

static FIELD_REGEXES: LazyLock<Vec<(Language, Field, Regex)>> = LazyLock::new(|| {
	[Language::Chinese, Language::English]
		.into_iter()
		.flat_map(|language| Field::ALL.map(|field| (language, field)))
		.map(|(language, field)| {
			let pattern = format!("{LABEL_PREFIX}{}{LABEL_SUFFIX}(.*)$", field.pattern(language));

			(language, field, Regex::new(&pattern).expect("valid summary field regex"))
		})
		.collect()
});
static ANY_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	let labels = [Language::Chinese, Language::English]
		.into_iter()
		.flat_map(|language| Field::ALL.map(|field| field.pattern(language)))
		.collect::<Vec<_>>()
		.join("|");

	Regex::new(&format!("{LABEL_PREFIX}(?:{labels}){LABEL_SUFFIX}"))
		.expect("valid summary label regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
	Chinese,
	English,
}
impl Language {
	pub fn code(self) -> &'static str {
		match self {
			Self::Chinese => "zh",
			Self::English => "en",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	Problem,
	Method,
	Contribution,
}
impl Field {
	const ALL: [Self; 3] = [Self::Problem, Self::Method, Self::Contribution];

	fn label(self, language: Language) -> &'static str {
		match (language, self) {
			(Language::Chinese, Self::Problem) => ZH_PROBLEM,
			(Language::Chinese, Self::Method) => ZH_METHOD,
			(Language::Chinese, Self::Contribution) => ZH_CONTRIBUTION,
			(Language::English, Self::Problem) => EN_PROBLEM,
			(Language::English, Self::Method) => EN_METHOD,
			(Language::English, Self::Contribution) => EN_CONTRIBUTION,
		}
	}

	fn pattern(self, language: Language) -> &'static str {
		match (language, self) {
			(Language::Chinese, Self::Problem) => "(?:核心)?问题",
			(Language::Chinese, Self::Method) => "(?:主要)?方法",
			(Language::Chinese, Self::Contribution) => "(?:关键|主要)?贡献",
			(Language::English, Self::Problem) => r"(?i:(?:core\s+)?problem(?:\s+statement)?)",
			(Language::English, Self::Method) => r"(?i:(?:main\s+)?method(?:ology|s)?)",
			(Language::English, Self::Contribution) => r"(?i:(?:key\s+)?contributions?)",
		}
	}
}

/// Problem, method and contribution sentences in one language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryFields {
	pub problem: String,
	pub method: String,
	pub contribution: String,
}
impl SummaryFields {
	fn get(&self, field: Field) -> &str {
		match field {
			Field::Problem => &self.problem,
			Field::Method => &self.method,
			Field::Contribution => &self.contribution,
		}
	}

	fn compose(&self, language: Language) -> String {
		Field::ALL
			.iter()
			.map(|field| format!("{}: {}", field.label(language), self.get(*field)))
			.collect::<Vec<_>>()
			.join(" | ")
	}
}

/// The six sentences of one bilingual summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryText {
	pub zh: SummaryFields,
	pub en: SummaryFields,
}
impl SummaryText {
	/// `问题: X | 方法: Y | 贡献: Z`
	pub fn chinese_summary(&self) -> String {
		self.zh.compose(Language::Chinese)
	}

	/// `Problem: X | Method: Y | Contribution: Z`
	pub fn english_summary(&self) -> String {
		self.en.compose(Language::English)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryParseError {
	Empty,
	MissingField { language: Language, field: Field },
	WrongScript { language: Language, field: Field },
}
impl fmt::Display for SummaryParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => write!(f, "oracle returned empty text"),
			Self::MissingField { language, field } => {
				write!(f, "missing {} field {:?}", language.code(), field.label(*language))
			},
			Self::WrongScript { language, field } => write!(
				f,
				"{} field {:?} is not written in the expected language",
				language.code(),
				field.label(*language)
			),
		}
	}
}
impl std::error::Error for SummaryParseError {}

/// Parses a raw generation into the six labelled sentences.
///
/// Labels may use ASCII or full-width colons, list markers, and markdown bold; a single line of
/// `label: sentence | label: sentence` segments is accepted as well.
pub fn parse_summary(raw: &str) -> Result<SummaryText, SummaryParseError> {
	if raw.trim().is_empty() {
		return Err(SummaryParseError::Empty);
	}

	let lines = raw.replace('|', "\n");
	let zh = parse_fields(&lines, Language::Chinese)?;
	let en = parse_fields(&lines, Language::English)?;

	Ok(SummaryText { zh, en })
}

fn parse_fields(lines: &str, language: Language) -> Result<SummaryFields, SummaryParseError> {
	let mut values = Vec::with_capacity(Field::ALL.len());

	for field in Field::ALL {
		let value = capture_field(lines, language, field)
			.ok_or(SummaryParseError::MissingField { language, field })?;
		let well_formed = match language {
			Language::Chinese => text::contains_han(&value),
			Language::English => text::contains_latin_letters(&value) && !text::contains_han(&value),
		};

		if !well_formed {
			return Err(SummaryParseError::WrongScript { language, field });
		}

		values.push(value);
	}

	let contribution = values.pop().unwrap_or_default();
	let method = values.pop().unwrap_or_default();
	let problem = values.pop().unwrap_or_default();

	Ok(SummaryFields { problem, method, contribution })
}

fn capture_field(lines: &str, language: Language, field: Field) -> Option<String> {
	let re = FIELD_REGEXES
		.iter()
		.find(|(lang, f, _)| *lang == language && *f == field)
		.map(|(_, _, re)| re)?;

	re.captures_iter(lines).find_map(|caps| {
		let whole = caps.get(0)?;
		let value = clean_sentence(caps.get(1)?.as_str());

		if value.is_empty() {
			continuation(&lines[whole.end()..])
		} else {
			Some(value)
		}
	})
}

/// The sentence of a label written on its own line: the next non-empty line, unless that line is
/// another label or a section heading.
fn continuation(rest: &str) -> Option<String> {
	let line = rest.lines().map(str::trim).find(|line| !line.is_empty())?;

	if line.starts_with('【') || line.starts_with('#') || ANY_LABEL_REGEX.is_match(line) {
		return None;
	}

	let value = clean_sentence(line.trim_start_matches("**"));

	(!value.is_empty()).then_some(value)
}

fn clean_sentence(raw: &str) -> String {
	raw.trim()
		.trim_end_matches("**")
		.trim()
		.trim_matches(|ch| matches!(ch, '"' | '“' | '”' | '「' | '」'))
		.trim()
		.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	const WELL_FORMED: &str = "【中文总结】
问题：现有视觉语言模型在长视频推理中容易遗漏关键帧。
方法：提出一种基于关键帧检索的分层推理框架。
贡献：在三个基准上显著提升了长视频问答准确率。

【English Summary】
Problem: Existing vision-language models miss key frames when reasoning over long videos.
Method: A hierarchical reasoning framework built on key-frame retrieval.
Contribution: Clear accuracy gains on three long-video QA benchmarks.";

	#[test]
	fn parses_labelled_sections() {
		let summary = parse_summary(WELL_FORMED).expect("parse failed");

		assert_eq!(summary.zh.method, "提出一种基于关键帧检索的分层推理框架。");
		assert_eq!(
			summary.en.problem,
			"Existing vision-language models miss key frames when reasoning over long videos."
		);
	}

	#[test]
	fn composes_pipe_joined_summaries() {
		let summary = parse_summary(WELL_FORMED).expect("parse failed");

		assert!(summary.chinese_summary().starts_with("问题: 现有视觉语言模型"));
		assert_eq!(summary.chinese_summary().matches(" | ").count(), 2);
		assert!(summary.english_summary().contains(" | Method: A hierarchical"));
		assert!(summary.english_summary().contains(" | Contribution: Clear accuracy"));
	}

	#[test]
	fn accepts_markdown_and_inline_segments() {
		let raw = "- **问题**: 机器人操作泛化差 | **方法**: 视觉语言动作模型 | **贡献**: 零样本迁移\n\
			1. **Problem:** Poor generalization in manipulation.\n\
			2. **Method:** A vision-language-action model.\n\
			3. **Key contributions:** Zero-shot transfer.";
		let summary = parse_summary(raw).expect("parse failed");

		assert_eq!(summary.zh.problem, "机器人操作泛化差");
		assert_eq!(summary.en.method, "A vision-language-action model.");
		assert_eq!(summary.en.contribution, "Zero-shot transfer.");
	}

	#[test]
	fn reads_sentence_on_line_after_label() {
		let raw = "问题：\n现有模型难以定位区域。\n方法：\n**区域感知微调**\n贡献：三项基准最佳。\n\
			Problem:\nModels fail to localize regions.\nMethod: Region-aware tuning.\n\
			Contribution: Best results on three benchmarks.";
		let summary = parse_summary(raw).expect("parse failed");

		assert_eq!(summary.zh.problem, "现有模型难以定位区域。");
		assert_eq!(summary.zh.method, "区域感知微调");
		assert_eq!(summary.en.problem, "Models fail to localize regions.");
	}

	#[test]
	fn empty_label_does_not_borrow_next_label() {
		let raw = "问题：\n方法：乙。\n贡献：丙。\nProblem: A.\nMethod: B.\nContribution: C.";

		assert_eq!(
			parse_summary(raw),
			Err(SummaryParseError::MissingField { language: Language::Chinese, field: Field::Problem })
		);
	}

	#[test]
	fn rejects_missing_english_field() {
		let raw = "问题：甲。\n方法：乙。\n贡献：丙。\nProblem: A.\nMethod: B.";

		assert_eq!(
			parse_summary(raw),
			Err(SummaryParseError::MissingField {
				language: Language::English,
				field: Field::Contribution,
			})
		);
	}

	#[test]
	fn rejects_chinese_field_without_han() {
		let raw = "问题：A problem.\n方法：乙。\n贡献：丙。\nProblem: A.\nMethod: B.\nContribution: C.";

		assert_eq!(
			parse_summary(raw),
			Err(SummaryParseError::WrongScript { language: Language::Chinese, field: Field::Problem })
		);
	}

	#[test]
	fn rejects_empty_text() {
		assert_eq!(parse_summary("  \n "), Err(SummaryParseError::Empty));
	}
}
