//! HTML renderer over the token stream produced by `lexer`.
//!
//! Spacing rules:
//! - consecutive inline lines (text or blank) are joined with `<br />`
//! - headings and lists never get a `<br />` on either side
//! - blank lines bordering a heading or list are dropped
//! - list items separated only by blank lines share one `<ul>`

use crate::markdown::lexer::{Block, Inline};

const H1_CLASS: &str = "text-3xl font-bold mt-8 mb-4 border-b-2 pb-2";
const H2_CLASS: &str = "text-2xl font-bold mt-6 mb-3 border-b pb-2";
const H3_CLASS: &str = "text-xl font-semibold mt-4 mb-2";
const STRONG_OPEN: &str = r#"<strong class="font-semibold text-slate-800 dark:text-slate-100">"#;
const UL_OPEN: &str = r#"<ul class="list-disc pl-5 my-4">"#;
const LI_OPEN: &str = r#"<li class="ml-6 mb-1">"#;
const LINE_BREAK: &str = "<br />";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Nothing,
    Inline,
    Structural,
}

pub fn render_blocks(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut last = Last::Nothing;
    let mut i = 0;

    while i < blocks.len() {
        match &blocks[i] {
            Block::Heading { level, content } => {
                push_heading(&mut html, *level, content);
                last = Last::Structural;
                i += 1;
            }
            Block::ListItem(_) => {
                i = push_list(&mut html, blocks, i);
                last = Last::Structural;
            }
            Block::Blank => {
                let run_end = next_non_blank(blocks, i);
                let borders_structure = last == Last::Structural
                    || blocks.get(run_end).is_some_and(Block::is_structural);
                if !borders_structure {
                    for _ in i..run_end {
                        push_inline_line(&mut html, &mut last, &[]);
                    }
                }
                i = run_end;
            }
            Block::Text(content) => {
                push_inline_line(&mut html, &mut last, content);
                i += 1;
            }
        }
    }

    html
}

fn next_non_blank(blocks: &[Block], from: usize) -> usize {
    blocks[from..]
        .iter()
        .position(|b| *b != Block::Blank)
        .map_or(blocks.len(), |offset| from + offset)
}

fn push_inline_line(html: &mut String, last: &mut Last, content: &[Inline]) {
    if *last == Last::Inline {
        html.push_str(LINE_BREAK);
    }
    push_inlines(html, content);
    *last = Last::Inline;
}

fn push_heading(html: &mut String, level: u8, content: &[Inline]) {
    let class = match level {
        1 => H1_CLASS,
        2 => H2_CLASS,
        _ => H3_CLASS,
    };
    html.push_str(&format!(r#"<h{level} class="{class}">"#));
    push_inlines(html, content);
    html.push_str(&format!("</h{level}>"));
}

/// Emits one `<ul>` starting at `start`; returns the index of the first block after it.
fn push_list(html: &mut String, blocks: &[Block], start: usize) -> usize {
    html.push_str(UL_OPEN);

    let mut i = start;
    while let Some(Block::ListItem(content)) = blocks.get(i) {
        html.push_str(LI_OPEN);
        push_inlines(html, content);
        html.push_str("</li>");

        i += 1;
        let next = next_non_blank(blocks, i);
        if matches!(blocks.get(next), Some(Block::ListItem(_))) {
            i = next;
        }
    }

    html.push_str("</ul>");
    i
}

fn push_inlines(html: &mut String, content: &[Inline]) {
    for span in content {
        match span {
            Inline::Text(text) => html.push_str(text),
            Inline::Bold(text) => {
                html.push_str(STRONG_OPEN);
                html.push_str(text);
                html.push_str("</strong>");
            }
        }
    }
}
