//! Line-oriented tokenizer. Each input line becomes exactly one `Block`.

/// Inline span within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`, `##` or `###` at column 0.
    Heading { level: u8, content: Vec<Inline> },
    /// `- ` or `* ` after optional indentation.
    ListItem(Vec<Inline>),
    Text(Vec<Inline>),
    /// Empty or whitespace-only line.
    Blank,
}

impl Block {
    /// Headings and list items render as block elements with their own spacing.
    pub fn is_structural(&self) -> bool {
        matches!(self, Block::Heading { .. } | Block::ListItem(_))
    }
}

const HEADING_PREFIXES: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

pub fn tokenize(input: &str) -> Vec<Block> {
    input.split('\n').map(tokenize_line).collect()
}

fn tokenize_line(raw: &str) -> Block {
    let line = raw.strip_suffix('\r').unwrap_or(raw);

    if line.trim().is_empty() {
        return Block::Blank;
    }

    for (prefix, level) in HEADING_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Block::Heading {
                level,
                content: parse_inline(rest),
            };
        }
    }

    let indented = line.trim_start();
    if let Some(rest) = indented
        .strip_prefix("- ")
        .or_else(|| indented.strip_prefix("* "))
    {
        return Block::ListItem(parse_inline(rest));
    }

    Block::Text(parse_inline(line))
}

/// Splits a line into text and bold spans. `**` pairs match left to right,
/// shortest first; an unpaired `**` stays literal.
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            break;
        };
        if open > 0 {
            spans.push(Inline::Text(rest[..open].to_string()));
        }
        spans.push(Inline::Bold(after[..close].to_string()));
        rest = &after[close + 2..];
    }

    if !rest.is_empty() {
        spans.push(Inline::Text(rest.to_string()));
    }

    spans
}
