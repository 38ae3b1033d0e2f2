//! Path pattern parsing
//!
//! Turns a framework path pattern (`/users/:id(.:format)`) into an ordered
//! list of [`Segment`]s. Literal text is wrapped with slash delimiters and
//! adjacent literals are merged, so `/users/new` becomes a single
//! `Literal("/users/new/")`. Malformed optional groups degrade to literal
//! text instead of failing.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Segment {
    Literal(String),
    /// `:name`
    Param(String),
    /// `*name`
    Glob(String),
    /// `( ... )`
    Optional(Vec<Segment>),
}

impl Segment {
    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// Parse a full path pattern into normalized segments
pub fn parse_path(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for component in split_components(pattern) {
        match classify_component(component) {
            Some(parsed) => segments.extend(parsed),
            None => {
                log::debug!("Malformed path component '{}' in '{}', using it as literal text", component, pattern);
                segments.push(Segment::Literal(format!("/{}/", component)));
            }
        }
    }

    normalize(segments)
}

/// Split on `/` outside of parentheses, dropping empty components.
/// Unbalanced parentheses fall back to a plain split.
fn split_components(pattern: &str) -> Vec<&str> {
    let mut components = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, c) in pattern.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '/' if depth == 0 => {
                components.push(&pattern[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            break;
        }
    }

    if depth != 0 {
        return pattern.split('/').filter(|c| !c.is_empty()).collect();
    }

    components.push(&pattern[start..]);
    components.into_iter().filter(|c| !c.is_empty()).collect()
}

fn classify_component(component: &str) -> Option<Vec<Segment>> {
    let parts = parse_fragment(component)?;

    if let [Segment::Literal(text)] = parts.as_slice() {
        return Some(vec![Segment::Literal(format!("/{}/", text))]);
    }

    let mut segments = Vec::with_capacity(parts.len() + 1);
    segments.push(Segment::Literal("/".to_string()));
    segments.extend(parts);
    Some(segments)
}

/// Parse text without a leading slash, handling `prefix(group)rest`
fn parse_fragment(text: &str) -> Option<Vec<Segment>> {
    let open = match text.find('(') {
        Some(open) => open,
        None => return Some(scan_plain(text)),
    };
    let close = matching_paren(text, open)?;

    let mut segments = scan_plain(&text[..open]);
    segments.push(Segment::Optional(parse_group(&text[open + 1..close])?));
    segments.extend(parse_fragment(&text[close + 1..])?);
    Some(segments)
}

/// Contents of an optional group: either a nested sub-path (`/:locale`) or a
/// fragment such as `.:format`
fn parse_group(inner: &str) -> Option<Vec<Segment>> {
    if split_components(inner).len() > 1 || inner.starts_with('/') {
        return Some(parse_path(inner));
    }
    parse_fragment(inner).map(normalize)
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scan text free of `/` and parentheses into literal, param and glob runs
fn scan_plain(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let starts_name = (c == ':' || c == '*')
            && chars.peek().map(|&(_, next)| is_name_char(next)).unwrap_or(false);

        if !starts_name {
            literal.push(c);
            continue;
        }

        let name_start = i + 1;
        let mut name_end = name_start;
        while let Some(&(j, next)) = chars.peek() {
            if !is_name_char(next) {
                break;
            }
            name_end = j + next.len_utf8();
            chars.next();
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        let name = text[name_start..name_end].to_string();
        segments.push(if c == ':' {
            Segment::Param(name)
        } else {
            Segment::Glob(name)
        });
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Merge adjacent literals and collapse repeated slashes inside them
fn normalize(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result: Vec<Segment> = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(previous)) = result.last_mut() {
                    previous.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    for segment in result.iter_mut() {
        if let Segment::Literal(text) = segment {
            *text = collapse_slashes(text);
        }
    }

    result
}

fn collapse_slashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}
