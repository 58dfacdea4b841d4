use crate::summary::SummaryText;

/// Generation prompt for one document. Depends on the document reference only, so a retry never
/// carries text from an earlier attempt.
pub fn generation_prompt(document: &str) -> String {
	format!(
		"请仔细阅读以下URL中的完整论文内容，并严格基于该论文的实际内容进行分析：

论文URL: {document}

重要要求：
1. 必须完整阅读URL中的论文全文
2. 只能基于该URL论文的实际内容进行总结
3. 不得添加任何URL论文中未提及的内容
4. 每个字段只写一句话

请严格按以下格式输出，不要输出其他内容：

【中文总结】
问题：<该论文要解决的核心问题，一句话>
方法：<该论文提出的主要方法，一句话>
贡献：<该论文的关键贡献，一句话>

【English Summary】
Problem: <the core problem the paper addresses, one sentence>
Method: <the main method the paper proposes, one sentence>
Contribution: <the key contribution of the paper, one sentence>"
	)
}

pub fn verification_prompt(document: &str, candidate: &SummaryText) -> String {
	format!(
		"请仔细阅读以下URL中的论文内容，并验证给出的总结是否准确：

论文URL: {document}

待验证的总结：
中文总结：{zh}
英文总结：{en}

请逐项验证：
1. 总结是否严格基于该论文的实际内容
2. 总结是否准确反映了论文的核心问题、方法和贡献
3. 总结中是否包含了论文中未提及的内容
4. 总结是否满足格式要求（问题、方法、贡献各一句话，中英文各一份）

只有四项全部满足时才算通过。请按以下格式回答：
验证结果：通过/不通过
原因：<如果不通过，请说明具体原因>",
		zh = candidate.chinese_summary(),
		en = candidate.english_summary(),
	)
}
