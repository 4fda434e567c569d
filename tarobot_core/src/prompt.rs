//! Prompt assembly for the interpretation collaborator.

/// Build the instruction prompt that forwards a retained draw to the
/// text-generation collaborator.
///
/// The template asks for a plain-text, emoji-friendly reading covering each
/// card in its position, card interactions, the overall theme and advice.
#[must_use]
pub fn build_interpret_prompt(last_draw: &str) -> String {
    let mut prompt = format!("请为以下塔罗牌结果进行详细解读：\n\n{last_draw}\n\n");
    prompt.push_str("请给出整体的解读，并分析各个卡片之间的关系和对问题的指引。解读应该包括以下几个方面：\n");
    prompt.push_str("1. 每张牌在当前位置的含义\n");
    prompt.push_str("2. 牌与牌之间的关系和互动\n");
    prompt.push_str("3. 整体牌阵所揭示的主题或问题\n");
    prompt.push_str("4. 对未来的预测或建议\n");
    prompt.push_str("请用通俗易懂的语言进行解读，避免使用过于专业或晦涩的术语。");
    prompt.push_str("在解读中适当加入表情符号，使文本更加生动有趣。保持文本清晰易读，不要使用任何特殊格式或标记。");
    prompt.push_str("在关键点或重要概念前可以使用emoji表情，如🔮、💫、🌟等，增加视觉吸引力。");
    prompt.push_str("总结部分可以用'💡总结：'开头，使其更加醒目。");
    prompt.push_str("请注意，不要使用任何Markdown语法或其他特殊格式，只需使用纯文本和emoji。");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_draw() {
        let prompt = build_interpret_prompt("1. 现在：月亮（逆位）");
        assert!(prompt.starts_with("请为以下塔罗牌结果进行详细解读：\n\n1. 现在：月亮（逆位）"));
        assert!(prompt.contains("4. 对未来的预测或建议"));
        assert!(prompt.ends_with("只需使用纯文本和emoji。"));
    }
}
