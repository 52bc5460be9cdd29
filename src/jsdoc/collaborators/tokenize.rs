//! Comment body segmentation
//!
//! Splits the body of one comment into description, tag lines, examples and
//! footer. A line-based state machine:
//!
//! ```text
//!   Description ──@tag──▶ Tags ──blank──▶ Footer
//!        ▲                 │ ▲              │
//!        │                 └─┘ @tag         └──@tag──▶ Tags
//!        │
//!   @example opens an Example state that runs until the next @tag
//! ```
//!
//! Fenced code blocks outside `@example` become examples wherever they appear.

use crate::jsdoc::ast::{Example, ExampleKind};

/// The pieces of one comment body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segments {
    pub description: String,
    /// Each entry starts with `@title`; continuation lines are joined with `\n`
    pub tag_lines: Vec<String>,
    pub examples: Vec<Example>,
    pub footer: Option<String>,
}

/// Strip `/**`, `*/` and the ` * ` gutter, returning the body lines.
pub fn strip_delimiters(raw: &str) -> Vec<String> {
    let body = raw.trim();
    let body = body
        .strip_prefix("/**")
        .or_else(|| body.strip_prefix("/*!"))
        .or_else(|| body.strip_prefix("/*"))
        .unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.lines()
        .enumerate()
        .map(|(n, line)| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end().to_string(),
                // Text sharing the line with `/**`
                None if n == 0 => trimmed.trim_end().to_string(),
                None => line.trim_end().to_string(),
            }
        })
        .collect()
}

enum State {
    Description,
    Tag(String),
    Example { first: String, lines: Vec<String> },
    Footer,
}

struct Fence {
    language: Option<String>,
    lines: Vec<String>,
}

/// Segment one raw comment.
pub fn tokenize(raw: &str) -> Segments {
    let mut segments = Segments::default();
    let mut description: Vec<String> = Vec::new();
    let mut footer: Vec<String> = Vec::new();
    let mut state = State::Description;
    let mut fence: Option<Fence> = None;

    for line in strip_delimiters(raw) {
        let trimmed = line.trim();

        if let Some(open) = fence.as_mut() {
            if trimmed.starts_with("```") {
                if let Some(done) = fence.take() {
                    segments.examples.push(Example {
                        kind: ExampleKind::Fenced,
                        language: done.language,
                        caption: None,
                        code: done.lines.join("\n"),
                    });
                }
            } else {
                open.lines.push(line);
            }
            continue;
        }

        if let State::Example { lines, .. } = &mut state {
            if !trimmed.starts_with('@') {
                lines.push(line);
                continue;
            }
        } else if let Some(info) = trimmed.strip_prefix("```") {
            let info = info.trim();
            fence = Some(Fence {
                language: (!info.is_empty()).then(|| info.to_string()),
                lines: Vec::new(),
            });
            continue;
        }

        if trimmed.starts_with('@') {
            flush(&mut state, &mut segments);
            state = match trimmed.strip_prefix("@example") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => State::Example {
                    first: rest.trim().to_string(),
                    lines: Vec::new(),
                },
                _ => State::Tag(trimmed.to_string()),
            };
            continue;
        }

        if trimmed.is_empty() && matches!(state, State::Tag(_)) {
            // flush leaves the state at Footer
            flush(&mut state, &mut segments);
            continue;
        }

        match &mut state {
            State::Description => description.push(line),
            State::Tag(current) => {
                current.push('\n');
                current.push_str(trimmed);
            }
            State::Footer => footer.push(line),
            // Handled above
            State::Example { .. } => {}
        }
    }

    // An unclosed fence still counts as an example
    if let Some(open) = fence {
        segments.examples.push(Example {
            kind: ExampleKind::Fenced,
            language: open.language,
            caption: None,
            code: open.lines.join("\n"),
        });
    }
    flush(&mut state, &mut segments);

    segments.description = description.join("\n").trim().to_string();
    let footer = footer.join("\n").trim().to_string();
    segments.footer = (!footer.is_empty()).then_some(footer);
    segments
}

fn flush(state: &mut State, segments: &mut Segments) {
    match std::mem::replace(state, State::Footer) {
        State::Tag(line) => segments.tag_lines.push(line),
        State::Example { first, lines } => segments.examples.push(example_tag(first, lines)),
        other => *state = other,
    }
}

fn example_tag(first: String, lines: Vec<String>) -> Example {
    let (caption, first) = match first
        .strip_prefix("<caption>")
        .and_then(|rest| rest.split_once("</caption>"))
    {
        Some((caption, rest)) => (Some(caption.trim().to_string()), rest.trim().to_string()),
        None => (None, first),
    };

    let mut code: Vec<String> = Vec::with_capacity(lines.len() + 1);
    if !first.is_empty() {
        code.push(first);
    }
    code.extend(lines);
    while code.last().is_some_and(|line| line.trim().is_empty()) {
        code.pop();
    }
    let start = code
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(code.len());

    Example {
        kind: ExampleKind::Tag,
        language: None,
        caption,
        code: code[start..].join("\n"),
    }
}
