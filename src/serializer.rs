//! Segment serializer
//!
//! Converts parsed [`Segment`]s into the compact tree the JavaScript runtime
//! evaluates at call time. The JSON shape is a fixed wire format:
//!
//! ```text
//! literal  -> "text"
//! param    -> ["param", "name"]
//! glob     -> ["glob", "name"]
//! optional -> ["optional", [ ...nodes ]]
//! ```

use crate::error::Result;
use crate::route::Route;
use crate::segment::Segment;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedNode {
    Literal(String),
    Param(String),
    Glob(String),
    Optional(Vec<SerializedNode>),
}

impl Serialize for SerializedNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SerializedNode::Literal(text) => serializer.serialize_str(text),
            SerializedNode::Param(name) => ("param", name).serialize(serializer),
            SerializedNode::Glob(name) => ("glob", name).serialize(serializer),
            SerializedNode::Optional(children) => ("optional", children).serialize(serializer),
        }
    }
}

impl From<&Segment> for SerializedNode {
    fn from(segment: &Segment) -> Self {
        match segment {
            Segment::Literal(text) => SerializedNode::Literal(text.clone()),
            Segment::Param(name) => SerializedNode::Param(name.clone()),
            Segment::Glob(name) => SerializedNode::Glob(name.clone()),
            Segment::Optional(children) => SerializedNode::Optional(serialize(children)),
        }
    }
}

pub fn serialize(segments: &[Segment]) -> Vec<SerializedNode> {
    segments.iter().map(SerializedNode::from).collect()
}

/// Serialized tree as a JSON array literal, ready to embed in generated code
pub fn to_json(nodes: &[SerializedNode]) -> Result<String> {
    Ok(serde_json::to_string(nodes)?)
}

/// Per-parameter metadata: `{"required": true}`, `{"default": "en"}` or `{}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamMeta {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Ordered parameter metadata map, required entries first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMetadata {
    entries: Vec<(String, ParamMeta)>,
}

impl ParamMetadata {
    pub fn entries(&self) -> &[(String, ParamMeta)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ParamMeta> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, meta)| meta)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ParamMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, meta) in &self.entries {
            map.serialize_entry(name, meta)?;
        }
        map.end()
    }
}

/// Build the metadata map for a route. A name listed both as required and
/// optional keeps its required entry.
pub fn param_metadata(route: &Route) -> ParamMetadata {
    let mut entries: Vec<(String, ParamMeta)> = route
        .required_params
        .iter()
        .map(|name| {
            let meta = ParamMeta {
                required: true,
                default: None,
            };
            (name.clone(), meta)
        })
        .collect();

    for name in &route.optional_params {
        if entries.iter().any(|(existing, _)| existing == name) {
            log::warn!(
                "Parameter '{}' of {} is both required and optional; treating it as required",
                name,
                route.describe()
            );
            continue;
        }
        let meta = ParamMeta {
            required: false,
            default: route.defaults.get(name).cloned(),
        };
        entries.push((name.clone(), meta));
    }

    ParamMetadata { entries }
}

/// Build a path from a serialized tree the way the generated runtime does.
///
/// Returns `None` when a required parameter is missing. Optional groups are
/// dropped when one of their parameters is missing or equals its default.
pub fn evaluate(
    nodes: &[SerializedNode],
    meta: &ParamMetadata,
    params: &BTreeMap<String, String>,
) -> Option<String> {
    let raw = build(nodes, meta, params, false).ok()??;
    Some(finish_path(&raw))
}

/// `Err` aborts the whole evaluation, `Ok(None)` drops the enclosing optional group
fn build(
    nodes: &[SerializedNode],
    meta: &ParamMetadata,
    params: &BTreeMap<String, String>,
    optional: bool,
) -> std::result::Result<Option<String>, ()> {
    let mut out = String::new();

    for node in nodes {
        match node {
            SerializedNode::Literal(text) => out.push_str(text),
            SerializedNode::Optional(children) => {
                if let Some(part) = build(children, meta, params, true)? {
                    out.push_str(&part);
                }
            }
            SerializedNode::Param(name) | SerializedNode::Glob(name) => {
                let value = match params.get(name).filter(|v| !v.is_empty()) {
                    Some(value) => value,
                    None if optional => return Ok(None),
                    None => return Err(()),
                };
                let default = meta.get(name).and_then(|m| m.default.as_ref());
                if optional && default == Some(value) {
                    return Ok(None);
                }
                match node {
                    SerializedNode::Glob(_) => out.push_str(&encode_glob(value)),
                    _ => out.push_str(&urlencoding::encode(value)),
                }
            }
        }
    }

    Ok(Some(out))
}

/// Globs keep their slashes; each piece is encoded on its own
fn encode_glob(value: &str) -> String {
    value
        .split('/')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collapse repeated slashes, drop the trailing slash, render empty as `/`
fn finish_path(raw: &str) -> String {
    let mut path = String::with_capacity(raw.len() + 1);
    if !raw.starts_with('/') {
        path.push('/');
    }
    for c in raw.chars() {
        if c == '/' && path.ends_with('/') {
            continue;
        }
        path.push(c);
    }
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}
