use unicode_normalization::UnicodeNormalization;
use unicode_script::{Script, UnicodeScript};

/// Case-folded, NFKC-normalized text with every whitespace run collapsed to one space.
pub fn normalize(input: &str) -> String {
	let folded: String = input.nfkc().flat_map(char::to_lowercase).collect();

	folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn contains_han(input: &str) -> bool {
	input.chars().any(|ch| ch.script() == Script::Han)
}

pub fn contains_latin_letters(input: &str) -> bool {
	input.chars().any(|ch| ch.is_alphabetic() && ch.script() == Script::Latin)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collapses_whitespace_and_case() {
		assert_eq!(normalize("  Vision\n\tLanguage   MODEL "), "vision language model");
	}

	#[test]
	fn nfkc_folds_fullwidth_latin() {
		assert_eq!(normalize("ＶＬＭ"), "vlm");
	}

	#[test]
	fn detects_scripts() {
		assert!(contains_han("提出了一种方法"));
		assert!(!contains_han("A method."));
		assert!(contains_latin_letters("A method."));
		assert!(!contains_latin_letters("方法。"));
	}
}
