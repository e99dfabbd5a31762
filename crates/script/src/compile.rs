use crate::{CompileError, Node, Script};
use serde::Deserialize;
use std::collections::HashSet;

/// Node as stored in JSON exports: tags are one space-separated string.
#[derive(Debug, Deserialize)]
struct JsonNode {
    #[serde(default)]
    title: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    body: String,
}

#[derive(Debug)]
struct Header {
    start_line: usize,
    title: Option<String>,
    tags: Vec<String>,
}

impl Header {
    fn new(start_line: usize) -> Self {
        Self {
            start_line,
            title: None,
            tags: Vec::new(),
        }
    }

    fn read(&mut self, line: &str, line_no: usize, errors: &mut Vec<CompileError>) {
        let Some((key, value)) = line.split_once(':') else {
            errors.push(CompileError::MalformedHeader {
                line: line_no,
                text: line.to_string(),
            });
            return;
        };

        let value = value.trim();
        match key.trim() {
            "title" if !value.is_empty() => self.title = Some(value.to_string()),
            "tags" => self.tags = value.split_whitespace().map(str::to_string).collect(),
            // position, colorID and friends are editor metadata
            _ => {}
        }
    }

    fn label(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("<untitled at line {}>", self.start_line))
    }
}

enum State {
    Between,
    Header(Header),
    Body(Header, Vec<String>),
}

/// Compile a script, picking the format from its content.
///
/// Content that opens with `[` is treated as a JSON export, everything else
/// as the plain-text node format.
pub fn compile(name: &str, text: &str) -> Result<Script, Vec<CompileError>> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim_start().starts_with('[') {
        compile_json(name, text)
    } else {
        compile_text(name, text)
    }
}

pub fn compile_json(name: &str, text: &str) -> Result<Script, Vec<CompileError>> {
    let raw: Vec<JsonNode> =
        serde_json::from_str(text).map_err(|e| vec![CompileError::Json(e.to_string())])?;

    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(raw.len());

    for (index, json_node) in raw.into_iter().enumerate() {
        let title = json_node.title.trim().to_string();
        if title.is_empty() {
            errors.push(CompileError::Json(format!("node #{index} has no title")));
            continue;
        }
        if !seen.insert(title.clone()) {
            errors.push(CompileError::DuplicateNode { title });
            continue;
        }
        nodes.push(Node {
            title,
            tags: json_node
                .tags
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            lines: json_node.body.lines().map(str::to_string).collect(),
        });
    }

    if errors.is_empty() {
        Ok(Script::new(name, nodes))
    } else {
        Err(errors)
    }
}

pub fn compile_text(name: &str, text: &str) -> Result<Script, Vec<CompileError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    let mut state = State::Between;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        state = match state {
            State::Between if trimmed.is_empty() => State::Between,
            State::Between => {
                let mut header = Header::new(line_no);
                header.read(trimmed, line_no, &mut errors);
                State::Header(header)
            }
            State::Header(header) if trimmed == "---" => State::Body(header, Vec::new()),
            State::Header(header) if trimmed == "===" => {
                errors.push(CompileError::MissingSeparator {
                    title: header.label(),
                });
                State::Between
            }
            State::Header(header) if trimmed.is_empty() => State::Header(header),
            State::Header(mut header) => {
                header.read(trimmed, line_no, &mut errors);
                State::Header(header)
            }
            State::Body(header, lines) if trimmed == "===" => {
                finish_node(header, lines, &mut seen, &mut nodes, &mut errors);
                State::Between
            }
            State::Body(header, mut lines) => {
                lines.push(raw.trim_end().to_string());
                State::Body(header, lines)
            }
        };
    }

    match state {
        State::Between => {}
        State::Header(header) => errors.push(CompileError::MissingSeparator {
            title: header.label(),
        }),
        State::Body(header, _) => errors.push(CompileError::Unterminated {
            title: header.label(),
        }),
    }

    if errors.is_empty() {
        Ok(Script::new(name, nodes))
    } else {
        Err(errors)
    }
}

fn finish_node(
    header: Header,
    lines: Vec<String>,
    seen: &mut HashSet<String>,
    nodes: &mut Vec<Node>,
    errors: &mut Vec<CompileError>,
) {
    let Some(title) = header.title else {
        errors.push(CompileError::MissingTitle {
            line: header.start_line,
        });
        return;
    };

    if !seen.insert(title.clone()) {
        errors.push(CompileError::DuplicateNode { title });
        return;
    }

    nodes.push(Node {
        title,
        tags: header.tags,
        lines,
    });
}
