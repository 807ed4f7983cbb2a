//! Markdown-subset renderer for model summaries.
//!
//! Supports `#`/`##`/`###` headings, `**bold**`, `-`/`*` bullet lists and line breaks.
//! Nested or ordered lists, code, links, tables and escaping are not supported;
//! output is trusted markup and must only be fed trusted input.

pub mod handlers;
pub mod lexer;
pub mod renderer;

use lexer::tokenize;
use renderer::render_blocks;

/// Renders Markdown-subset text to HTML. Never fails; malformed input renders best-effort.
pub fn render(input: &str) -> String {
    render_blocks(&tokenize(input))
}
