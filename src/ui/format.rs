use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// One displayable line of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    /// `* item`, shown without its marker
    Bullet(String),
    /// `3. item`, shown verbatim
    Numbered(String),
    Paragraph(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Bullet(t) | Block::Numbered(t) | Block::Paragraph(t) => t,
        }
    }
}

/// Split a reply into lines, drop blank ones and classify the rest.
pub fn format_reply(text: &str) -> Vec<Block> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix('*') {
        Block::Bullet(rest.trim().to_string())
    } else if NUMBERED.is_match(line) {
        Block::Numbered(line.to_string())
    } else {
        Block::Paragraph(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_lines() {
        let blocks = format_reply("* foo\n2. bar\nplain text");
        assert_eq!(
            blocks,
            vec![
                Block::Bullet("foo".into()),
                Block::Numbered("2. bar".into()),
                Block::Paragraph("plain text".into()),
            ]
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        let blocks = format_reply("\n\nfirst\n   \n\nsecond\n");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("first".into()),
                Block::Paragraph("second".into())
            ]
        );
    }

    #[test]
    fn test_lines_trimmed_before_classification() {
        let blocks = format_reply("   *   indented bullet  \n  10. tenth");
        assert_eq!(blocks[0], Block::Bullet("indented bullet".into()));
        assert_eq!(blocks[1], Block::Numbered("10. tenth".into()));
    }

    #[test]
    fn test_number_without_dot_is_paragraph() {
        assert_eq!(
            format_reply("2024 was a good year"),
            vec![Block::Paragraph("2024 was a good year".into())]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = format_reply("* a\r\n* b\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text(), "b");
    }

    #[test]
    fn test_empty_reply() {
        assert!(format_reply("").is_empty());
    }

    #[test]
    fn test_block_serializes_tagged() {
        let json = serde_json::to_value(Block::Bullet("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "bullet", "text": "x"}));
    }
}
