//! Indentation-based attribute tree.
//!
//! Each non-blank line is `name value`; the value is the rest of the line
//! after the first run of whitespace. Lines indented deeper than the line
//! above become its children. `#` starts a comment unless it appears inside
//! a double-quoted name or value.
use crate::error::{Error, Result};

const INDENT: &str = "  ";

/// A node of the attribute tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub children: Vec<Attribute>,
    /// 1-based source line, zero for nodes built in memory.
    pub line: usize,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
            line: 0,
        }
    }

    /// Node with an empty value.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn push(&mut self, child: Attribute) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn with_child(mut self, child: Attribute) -> Self {
        self.children.push(child);
        self
    }

    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Parses `text` into its top-level nodes.
pub fn parse(text: &str) -> Result<Vec<Attribute>> {
    // (indent, node) pairs; the bottom entry is a synthetic root.
    let mut stack: Vec<(isize, Attribute)> = vec![(-1, Attribute::default())];

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let content = strip_comment(raw);
        let trimmed = content.trim_start();
        if trimmed.trim().is_empty() {
            continue;
        }
        let indent = (content.len() - trimmed.len()) as isize;
        let (name, rest) =
            split_name(trimmed.trim_end()).map_err(|m| Error::parse(line_no, m))?;
        let value = unquote(rest).map_err(|m| Error::parse(line_no, m))?;

        while stack.len() > 1 && stack[stack.len() - 1].0 >= indent {
            fold_top(&mut stack);
        }
        let mut node = Attribute::new(name, value);
        node.line = line_no;
        stack.push((indent, node));
    }

    while stack.len() > 1 {
        fold_top(&mut stack);
    }
    Ok(stack.pop().map(|(_, root)| root.children).unwrap_or_default())
}

fn fold_top(stack: &mut Vec<(isize, Attribute)>) {
    if let Some((_, node)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.children.push(node);
        }
    }
}

/// Writes `nodes` with two spaces of indentation per level.
pub fn write(nodes: &[Attribute]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(out: &mut String, node: &Attribute, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(&quote_name(&node.name));
    if !node.value.is_empty() {
        out.push(' ');
        out.push_str(&quote(&node.value));
    }
    out.push('\n');
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

fn needs_quotes(value: &str) -> bool {
    value.starts_with('"')
        || value.contains('#')
        || value.contains('\n')
        || value.trim() != value
}

fn quote(value: &str) -> String {
    if needs_quotes(value) {
        escaped(value)
    } else {
        value.to_owned()
    }
}

fn quote_name(name: &str) -> String {
    if name.is_empty() || name.contains(char::is_whitespace) || needs_quotes(name) {
        escaped(name)
    } else {
        name.to_owned()
    }
}

fn escaped(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Splits a line into its name and the remaining text. A name opening with
/// `"` runs to the matching close quote.
fn split_name(line: &str) -> std::result::Result<(String, &str), String> {
    let Some(body) = line.strip_prefix('"') else {
        return Ok(match line.find(char::is_whitespace) {
            Some(pos) => (line[..pos].to_owned(), line[pos..].trim()),
            None => (line.to_owned(), ""),
        });
    };
    let mut escaped = false;
    for (i, ch) in body.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                let name = unquote(&line[..i + 2])?;
                let rest = &body[i + 1..];
                if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                    return Err(format!("expected whitespace after quoted name, got '{rest}'"));
                }
                return Ok((name, rest.trim()));
            }
            _ => {}
        }
    }
    Err("unterminated quoted name".into())
}

fn unquote(value: &str) -> std::result::Result<String, String> {
    let Some(body) = value.strip_prefix('"') else {
        return Ok(value.to_owned());
    };
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                let tail = chars.as_str().trim();
                if !tail.is_empty() {
                    return Err(format!("unexpected text after quoted value: '{tail}'"));
                }
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some(other) => out.push(other),
                None => break,
            },
            _ => out.push(ch),
        }
    }
    Err("unterminated quoted value".into())
}

/// Reads a boolean flag. An empty value counts as true.
pub fn parse_bool(attr: &Attribute) -> Result<bool> {
    match attr.value.to_ascii_lowercase().as_str() {
        "" | "yes" | "true" | "on" | "1" => Ok(true),
        "no" | "false" | "off" | "0" => Ok(false),
        other => Err(Error::parse(
            attr.line,
            format!("'{}' expects yes or no, got '{other}'", attr.name),
        )),
    }
}

pub fn parse_f64(attr: &Attribute) -> Result<f64> {
    attr.value.trim().parse::<f64>().map_err(|_| {
        Error::parse(
            attr.line,
            format!("'{}' expects a number, got '{}'", attr.name, attr.value),
        )
    })
}

pub fn parse_i64(attr: &Attribute) -> Result<i64> {
    attr.value.trim().parse::<i64>().map_err(|_| {
        Error::parse(
            attr.line,
            format!("'{}' expects an integer, got '{}'", attr.name, attr.value),
        )
    })
}

/// Reads `x,y`.
pub fn parse_pair(text: &str, line: usize) -> Result<[f64; 2]> {
    let mut parts = text.split(',').map(str::trim);
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::parse(line, format!("expected 'x,y', got '{text}'")));
    };
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(x), Ok(y)) => Ok([x, y]),
        _ => Err(Error::parse(line, format!("expected 'x,y', got '{text}'"))),
    }
}

pub fn format_pair(x: f64, y: f64) -> String {
    format!("{x},{y}")
}
