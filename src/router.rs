//! Route record input
//!
//! The generator never talks to a framework directly. It reads a route dump
//! (JSON or the text table printed by `mix phx.routes` / `rails routes`) and
//! sees every entry through the [`RouteRecord`] capability trait, so strict
//! records, loosely keyed maps and table lines all feed the same pipeline.

use crate::error::{GeneratorError, Result};
use crate::types::HttpVerb;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional route dump locations searched when no router is configured
pub const ROUTER_CANDIDATES: &[&str] = &[
    "routes.json",
    "priv/routes.json",
    "config/routes.json",
    "tmp/routes.json",
    "routes.txt",
];

const LIVE_VIEW_PLUG: &str = "Phoenix.LiveView.Plug";

/// What the pipeline needs to know about one framework route
pub trait RouteRecord {
    /// Helper name (`user`), `None` or empty when the route has no helper
    fn helper(&self) -> Option<&str>;
    /// Verb as the framework prints it (`GET`, `patch`, `GET|POST`)
    fn verb(&self) -> &str;
    fn path(&self) -> &str;
    /// Controller action identifier (`:show`), used for disambiguation only
    fn action(&self) -> Option<&str>;

    fn defaults(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn is_live(&self) -> bool {
        false
    }
}

impl<T: RouteRecord + ?Sized> RouteRecord for Box<T> {
    fn helper(&self) -> Option<&str> {
        (**self).helper()
    }

    fn verb(&self) -> &str {
        (**self).verb()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn action(&self) -> Option<&str> {
        (**self).action()
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        (**self).defaults()
    }

    fn is_live(&self) -> bool {
        (**self).is_live()
    }
}

/// Strict record shape
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    pub helper: Option<String>,
    pub verb: String,
    pub path: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
    #[serde(default)]
    pub live: bool,
}

impl RawRoute {
    pub fn new(helper: &str, verb: &str, path: &str, action: &str) -> Self {
        Self {
            helper: Some(helper.to_string()).filter(|h| !h.is_empty()),
            verb: verb.to_string(),
            path: path.to_string(),
            action: Some(action.to_string()).filter(|a| !a.is_empty()),
            defaults: BTreeMap::new(),
            live: false,
        }
    }
}

impl RouteRecord for RawRoute {
    fn helper(&self) -> Option<&str> {
        self.helper.as_deref()
    }

    fn verb(&self) -> &str {
        &self.verb
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        stringify_defaults(&self.defaults)
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// Loosely keyed record, as produced by ad-hoc framework dumps
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRoute {
    fields: Map<String, Value>,
}

impl MappedRoute {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
    }
}

impl RouteRecord for MappedRoute {
    fn helper(&self) -> Option<&str> {
        self.first_str(&["helper", "name", "as", "helper_name"])
    }

    fn verb(&self) -> &str {
        self.first_str(&["verb", "method", "http_method"]).unwrap_or("")
    }

    fn path(&self) -> &str {
        self.first_str(&["path", "uri", "pattern"]).unwrap_or("")
    }

    fn action(&self) -> Option<&str> {
        self.first_str(&["action", "plug_opts"])
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.fields
            .get("defaults")
            .and_then(Value::as_object)
            .map(|map| stringify_defaults(map.iter()))
            .unwrap_or_default()
    }

    fn is_live(&self) -> bool {
        if let Some(live) = self.fields.get("live").and_then(Value::as_bool) {
            return live;
        }
        self.first_str(&["plug", "controller"]) == Some(LIVE_VIEW_PLUG)
    }
}

/// One line of a `mix phx.routes` / `rails routes` table:
/// `[helper] VERB /path Controller :action`
#[derive(Debug, Clone, PartialEq)]
pub struct TableRoute {
    pub helper: Option<String>,
    pub verb: String,
    pub path: String,
    pub controller: Option<String>,
    pub action: Option<String>,
    /// Target printed as `controller#action`, the `rails routes` layout
    pub rails_style: bool,
}

impl TableRoute {
    /// Parse one table line; returns `None` for headers, blank lines and noise
    pub fn parse_line(line: &str) -> Option<Self> {
        let columns: Vec<&str> = line.split_whitespace().collect();
        let verb_index = (0..columns.len()).find(|&i| {
            columns[i].len() > 1
                && HttpVerb::parse(columns[i]).is_some()
                && columns.get(i + 1).map_or(false, |p| p.starts_with('/'))
        })?;
        let path = columns[verb_index + 1];

        let helper = match verb_index {
            0 => None,
            1 => Some(columns[0].to_string()),
            _ => return None,
        };

        let mut rest = columns[verb_index + 2..].iter();
        let (controller, action, rails_style) = match (rest.next(), rest.next()) {
            (Some(controller), Some(action)) => (Some(controller.to_string()), Some(action.to_string()), false),
            // Rails prints `users#show`
            (Some(target), None) => match target.split_once('#') {
                Some((controller, action)) => (Some(controller.to_string()), Some(action.to_string()), true),
                None => (Some(target.to_string()), None, false),
            },
            _ => (None, None, false),
        };

        Some(Self {
            helper: helper.map(|h| h.trim_end_matches("_path").to_string()),
            verb: columns[verb_index].to_string(),
            path: path.to_string(),
            controller,
            action,
            rails_style,
        })
    }
}

impl RouteRecord for TableRoute {
    fn helper(&self) -> Option<&str> {
        self.helper.as_deref()
    }

    fn verb(&self) -> &str {
        &self.verb
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn is_live(&self) -> bool {
        self.controller.as_deref() == Some(LIVE_VIEW_PLUG)
    }
}

fn stringify_defaults<'a>(values: impl IntoIterator<Item = (&'a String, &'a Value)>) -> BTreeMap<String, String> {
    values
        .into_iter()
        .filter_map(|(name, value)| {
            let literal = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((name.clone(), literal))
        })
        .collect()
}

/// Parse route records from a route dump's contents.
///
/// A JSON array is read record by record: objects carrying the strict
/// `helper`/`verb`/`path` keys become [`RawRoute`]s, anything else a
/// [`MappedRoute`]. Non-JSON input is read as a route table.
pub fn parse_routes(contents: &str) -> Result<Vec<Box<dyn RouteRecord>>> {
    let trimmed = contents.trim_start();

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| GeneratorError::invalid_format(format!("Invalid route JSON: {}", e)))?;
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove("routes") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(not_a_route_list()),
            },
            _ => return Err(not_a_route_list()),
        };
        return entries.into_iter().map(record_from_value).collect();
    }

    // Rails prints the prefix only on the first row of a helper
    let mut previous_helper: Option<String> = None;
    let mut records: Vec<Box<dyn RouteRecord>> = Vec::new();
    for mut route in contents.lines().filter_map(TableRoute::parse_line) {
        if route.helper.is_some() {
            previous_helper = route.helper.clone();
        } else if route.rails_style {
            route.helper = previous_helper.clone();
        }
        records.push(Box::new(route));
    }

    if records.is_empty() && !contents.trim().is_empty() {
        return Err(GeneratorError::invalid_format(
            "No routes found in route table. Expected lines like 'user_path  GET  /users/:id  UserController :show'",
        ));
    }
    Ok(records)
}

fn not_a_route_list() -> GeneratorError {
    GeneratorError::invalid_format("Route JSON must be an array or an object with a \"routes\" array")
}

fn record_from_value(value: Value) -> Result<Box<dyn RouteRecord>> {
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(GeneratorError::invalid_format(format!(
                "Route entry must be an object, got {}",
                other
            )))
        }
    };

    let strict = fields.contains_key("verb") && fields.contains_key("path");
    if strict {
        if let Ok(raw) = serde_json::from_value::<RawRoute>(Value::Object(fields.clone())) {
            return Ok(Box::new(raw));
        }
    }
    Ok(Box::new(MappedRoute::new(fields)))
}

/// Read and parse a route dump from disk
pub fn load_routes(path: &Path) -> Result<Vec<Box<dyn RouteRecord>>> {
    let contents = fs::read_to_string(path).map_err(|e| GeneratorError::FileNotFound {
        path: format!("{}: {}", path.display(), e),
    })?;
    let records = parse_routes(&contents)?;
    log::info!("Loaded {} route records from {}", records.len(), path.display());
    Ok(records)
}

/// Use the configured router dump, or find one in a conventional location
pub fn resolve_router(explicit: Option<&Path>, search_root: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(GeneratorError::router(format!(
            "Router '{}' does not exist. Check the --router flag or the `router` config entry.",
            path.display()
        )));
    }

    for candidate in ROUTER_CANDIDATES {
        let path = search_root.join(candidate);
        if path.is_file() {
            log::debug!("Auto-detected router at {}", path.display());
            return Ok(path);
        }
    }

    Err(GeneratorError::router(format!(
        "No router found under {}. Export your routes (for example `mix phx.routes > routes.txt`) \
         and pass --router <FILE>, or set `router` in the config file. Searched: {}",
        search_root.display(),
        ROUTER_CANDIDATES.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strict_json_records() {
        let json = r#"[
            {"helper": "user", "verb": "GET", "path": "/users/:id", "action": ":show"},
            {"helper": "user", "verb": "PATCH", "path": "/users/:id", "action": "update",
             "defaults": {"format": "json", "page": 1}}
        ]"#;
        let records = parse_routes(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].helper(), Some("user"));
        assert_eq!(records[0].action(), Some(":show"));
        assert_eq!(records[1].verb(), "PATCH");
        let defaults = records[1].defaults();
        assert_eq!(defaults.get("format").map(String::as_str), Some("json"));
        assert_eq!(defaults.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_loose_json_records() {
        let json = r#"{"routes": [
            {"name": "user", "method": "get", "uri": "/users/:id", "plug_opts": "show"},
            {"as": "live_user", "http_method": "GET", "pattern": "/live/users", "plug": "Phoenix.LiveView.Plug"}
        ]}"#;
        let records = parse_routes(json).unwrap();
        assert_eq!(records[0].helper(), Some("user"));
        assert_eq!(records[0].verb(), "get");
        assert_eq!(records[0].path(), "/users/:id");
        assert_eq!(records[0].action(), Some("show"));
        assert!(!records[0].is_live());
        assert!(records[1].is_live());
    }

    #[test]
    fn test_table_lines() {
        let table = "\
  user_path  GET     /users/:id       MyAppWeb.UserController :show
             POST    /users           MyAppWeb.UserController :create
  live_path  GET     /dashboard       Phoenix.LiveView.Plug :index
      Prefix Verb   URI Pattern
";
        let records = parse_routes(table).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].helper(), Some("user"));
        assert_eq!(records[0].action(), Some(":show"));
        assert_eq!(records[1].helper(), None);
        assert_eq!(records[1].verb(), "POST");
        assert!(records[2].is_live());
    }

    #[test]
    fn test_rails_table_line() {
        let route = TableRoute::parse_line("edit_user GET /users/:id/edit(.:format) users#edit").unwrap();
        assert_eq!(route.helper.as_deref(), Some("edit_user"));
        assert_eq!(route.controller.as_deref(), Some("users"));
        assert_eq!(route.action.as_deref(), Some("edit"));
    }

    #[test]
    fn test_rails_table_inherits_prefix() {
        let table = "\
   Prefix Verb   URI Pattern          Controller#Action
    users GET    /users(.:format)     users#index
          POST   /users(.:format)     users#create
     user GET    /users/:id(.:format) users#show
          PATCH  /users/:id(.:format) users#update
          PUT    /users/:id(.:format) users#update
          DELETE /users/:id(.:format) users#destroy
";
        let records = parse_routes(table).unwrap();
        assert_eq!(records.len(), 6);
        let helpers: Vec<Option<&str>> = records.iter().map(|r| r.helper()).collect();
        assert_eq!(
            helpers,
            vec![Some("users"), Some("users"), Some("user"), Some("user"), Some("user"), Some("user")]
        );

        let extraction = crate::extract_routes(&records, &crate::GeneratorOptions::default()).unwrap();
        let names: Vec<String> = extraction
            .routes
            .iter()
            .map(|r| format!("{} {}", r.path_name, r.verb))
            .collect();
        assert_eq!(
            names,
            vec![
                "users_index_path GET",
                "users_create_path POST",
                "user_show_path GET",
                "user_update_path PATCH",
                "user_destroy_path DELETE",
            ]
        );
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn test_invalid_json() {
        match parse_routes("[{\"helper\": ") {
            Err(GeneratorError::InvalidFormat { message }) => assert!(message.contains("Invalid route JSON")),
            _ => panic!("Expected invalid format error"),
        }
        assert!(parse_routes("[1, 2]").is_err());
    }

    #[test]
    fn test_unrecognized_table() {
        assert!(parse_routes("hello world").is_err());
        assert!(parse_routes("").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_router_explicit_and_auto() {
        let temp_dir = TempDir::new().unwrap();

        match resolve_router(None, temp_dir.path()) {
            Err(GeneratorError::RouterResolution { message }) => assert!(message.contains("--router")),
            _ => panic!("Expected router resolution error"),
        }

        let priv_dir = temp_dir.path().join("priv");
        fs::create_dir(&priv_dir).unwrap();
        fs::write(priv_dir.join("routes.json"), "[]").unwrap();
        let found = resolve_router(None, temp_dir.path()).unwrap();
        assert!(found.ends_with("priv/routes.json"));

        let missing = temp_dir.path().join("nope.json");
        assert!(resolve_router(Some(&missing), temp_dir.path()).is_err());
        let explicit = resolve_router(Some(&found), temp_dir.path()).unwrap();
        assert_eq!(explicit, found);
    }

    #[test]
    fn test_load_routes_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("routes.json");
        fs::write(&path, r#"[{"helper": "users", "verb": "GET", "path": "/users"}]"#).unwrap();
        let records = load_routes(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path(), "/users");

        match load_routes(&temp_dir.path().join("missing.json")) {
            Err(GeneratorError::FileNotFound { .. }) => {}
            _ => panic!("Expected file not found"),
        }
    }
}
