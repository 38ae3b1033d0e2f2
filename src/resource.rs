//! Resource grouping and CRUD action inference
//!
//! Resource mode clusters routes into resources keyed by a hierarchical
//! identifier list (`[admin, users]`). Keys come from naming conventions:
//! well-known path prefixes give the scope, the helper name (stripped of
//! action verbs and pluralized) gives the resource name.

use crate::route::Route;
use crate::serializer::param_metadata;
use crate::types::{GroupBy, HttpVerb, RESOURCE_EXTENSION, ROOT_RESOURCE_KEY};
use crate::utils::{identifier_token, safe_identifier};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

const LEADING_ACTIONS: &[(&str, ActionTag)] = &[
    ("new_", ActionTag::New),
    ("edit_", ActionTag::Edit),
    ("create_", ActionTag::Create),
    ("update_", ActionTag::Update),
    ("delete_", ActionTag::Delete),
    ("restore_", ActionTag::Restore),
];

// longest first: `_confirm_email` must win over `_confirm`
const TRAILING_ACTIONS: &[&str] = &[
    "_confirm_email",
    "_confirm",
    "_restore",
    "_create",
    "_update",
    "_delete",
    "_index",
    "_show",
    "_edit",
    "_new",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ActionTag {
    Index,
    New,
    Create,
    Show,
    Edit,
    Update,
    Delete,
    Restore,
    Confirm,
    Other(String),
}

impl ActionTag {
    pub fn as_str(&self) -> &str {
        match self {
            ActionTag::Index => "index",
            ActionTag::New => "new",
            ActionTag::Create => "create",
            ActionTag::Show => "show",
            ActionTag::Edit => "edit",
            ActionTag::Update => "update",
            ActionTag::Delete => "delete",
            ActionTag::Restore => "restore",
            ActionTag::Confirm => "confirm",
            ActionTag::Other(name) => name,
        }
    }

    /// Position in the canonical emission order; unknown actions come last
    pub fn rank(&self) -> usize {
        match self {
            ActionTag::Index => 0,
            ActionTag::New => 1,
            ActionTag::Create => 2,
            ActionTag::Show => 3,
            ActionTag::Edit => 4,
            ActionTag::Update => 5,
            ActionTag::Delete => 6,
            ActionTag::Restore => 7,
            ActionTag::Confirm => 8,
            ActionTag::Other(_) => 9,
        }
    }

    /// JavaScript binding for the action (`new` -> `new_`)
    pub fn binding_name(&self) -> String {
        safe_identifier(self.as_str())
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ActionTag> for String {
    fn from(tag: ActionTag) -> Self {
        tag.as_str().to_string()
    }
}

/// Infer the CRUD action of a route.
///
/// Helper prefixes beat helper suffixes, which beat the path shape, which
/// beats the HTTP verb: a GET alone cannot tell `new` from `index`.
pub fn infer_action_name(route: &Route) -> ActionTag {
    let helper = route.source_helper.as_str();
    let full_name = if helper.ends_with("_path") || helper.ends_with("_url") {
        helper.to_string()
    } else {
        route.snake_path_name()
    };

    for (prefix, tag) in LEADING_ACTIONS {
        if helper.starts_with(prefix) {
            return tag.clone();
        }
    }

    if let Some(tag) = action_from_suffix(&full_name) {
        return tag;
    }

    if let Some(tag) = action_from_path(route) {
        return tag;
    }

    match route.verb {
        HttpVerb::Post => ActionTag::Create,
        HttpVerb::Patch | HttpVerb::Put => ActionTag::Update,
        HttpVerb::Delete => ActionTag::Delete,
        HttpVerb::Get | HttpVerb::Head if route.ends_with_param() => ActionTag::Show,
        HttpVerb::Get | HttpVerb::Head => ActionTag::Index,
        HttpVerb::Options => ActionTag::Other("options".to_string()),
    }
}

fn action_from_suffix(full_name: &str) -> Option<ActionTag> {
    let stem = full_name
        .strip_suffix("_path")
        .or_else(|| full_name.strip_suffix("_url"))?;

    if stem.ends_with("_restore") {
        Some(ActionTag::Restore)
    } else if stem.ends_with("_confirm") || stem.contains("_confirm_") {
        Some(ActionTag::Confirm)
    } else if stem.ends_with("_new") {
        Some(ActionTag::New)
    } else if stem.ends_with("_index") {
        Some(ActionTag::Index)
    } else if stem.ends_with("_show") {
        Some(ActionTag::Show)
    } else {
        None
    }
}

fn action_from_path(route: &Route) -> Option<ActionTag> {
    let components = route.path_components();
    let last = components.last()?.as_str();
    let follows_param = components.len() >= 2 && components[components.len() - 2].starts_with(':');

    match last {
        "new" => Some(ActionTag::New),
        "create" if route.verb == HttpVerb::Get => Some(ActionTag::New),
        "edit" if follows_param => Some(ActionTag::Edit),
        "restore" if follows_param => Some(ActionTag::Restore),
        "confirm" if follows_param => Some(ActionTag::Confirm),
        _ => None,
    }
}

/// Scope from well-known path prefixes: `/admin`, `/api/v{N}`, `/api`
pub fn detect_scope(route: &Route) -> Vec<String> {
    let components = route.path_components();
    match components.first().map(String::as_str) {
        Some("admin") => vec!["admin".to_string()],
        Some("api") => match components.get(1) {
            Some(version) if is_version_segment(version) => {
                vec!["api".to_string(), version.to_string()]
            }
            _ => vec!["api".to_string()],
        },
        _ => Vec::new(),
    }
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .map_or(false, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// `user` -> `users`, `category` -> `categories`, `news` -> `news`
pub fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        name.to_string()
    } else if let Some(stem) = name.strip_suffix('y') {
        format!("{}ies", stem)
    } else {
        format!("{}s", name)
    }
}

/// Hierarchical key of the resource a route belongs to
pub fn resource_key(route: &Route, group_by: GroupBy) -> Vec<String> {
    match group_by {
        GroupBy::Scope => scope_key(route),
        GroupBy::Resource => name_key(route),
        GroupBy::Controller => {
            log::debug!("No controller metadata for {}, grouping by resource name", route.describe());
            name_key(route)
        }
    }
}

fn scope_key(route: &Route) -> Vec<String> {
    let key: Vec<String> = route
        .static_components()
        .iter()
        .filter_map(|c| identifier_token(c))
        .collect();
    if key.is_empty() {
        vec![ROOT_RESOURCE_KEY.to_string()]
    } else {
        key
    }
}

/// Apply `step` unless it would leave nothing behind
fn keep_non_empty(name: String, step: impl FnOnce(&str) -> Option<String>) -> String {
    match step(&name) {
        Some(next) if !next.is_empty() => next,
        _ => name,
    }
}

fn name_key(route: &Route) -> Vec<String> {
    let scope = detect_scope(route);
    let helper = route.source_helper.as_str();

    let mut name = helper
        .strip_suffix("_path")
        .or_else(|| helper.strip_suffix("_url"))
        .unwrap_or(helper)
        .to_string();

    name = keep_non_empty(name, |n| {
        LEADING_ACTIONS
            .iter()
            .find_map(|(prefix, _)| n.strip_prefix(prefix))
            .map(str::to_string)
    });

    name = keep_non_empty(name, |n| {
        TRAILING_ACTIONS
            .iter()
            .find_map(|suffix| n.strip_suffix(suffix))
            .map(str::to_string)
    });

    name = collapse_repeated(&name);

    if !scope.is_empty() {
        let prefix = format!("{}_", scope.join("_"));
        name = keep_non_empty(name, |n| n.strip_prefix(&prefix).map(str::to_string));
    }

    let token = identifier_token(&pluralize(&name)).unwrap_or_else(|| ROOT_RESOURCE_KEY.to_string());
    let mut key = scope;
    key.push(token);
    key
}

/// `contacts_contacts` -> `contacts`
fn collapse_repeated(name: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for token in name.split('_') {
        if tokens.last() != Some(&token) {
            tokens.push(token);
        }
    }
    tokens.join("_")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub tag: ActionTag,
    pub route: Route,
    pub params: Vec<ParamDescriptor>,
}

impl Action {
    pub fn new(tag: ActionTag, route: Route) -> Self {
        let params = param_metadata(&route)
            .entries()
            .iter()
            .map(|(name, meta)| ParamDescriptor {
                name: name.clone(),
                required: meta.required,
            })
            .collect();
        Self { tag, route, params }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub key: Vec<String>,
    pub name: String,
    /// Path relative to the output directory, `/`-separated (`admin/users.ts`)
    pub file_path: String,
    pub actions: Vec<Action>,
}

impl Resource {
    /// Key tokens leading up to the resource name (`[admin]` for `[admin, users]`)
    pub fn scope(&self) -> &[String] {
        &self.key[..self.key.len().saturating_sub(1)]
    }
}

/// Cluster routes into resources, one action per tag, canonical action order,
/// resources sorted by name
pub fn group_resources(routes: &[Route], group_by: GroupBy) -> Vec<Resource> {
    let mut order: Vec<Vec<String>> = Vec::new();
    let mut members: HashMap<Vec<String>, Vec<Action>> = HashMap::new();

    for route in routes {
        let key = resource_key(route, group_by);
        let tag = infer_action_name(route);
        let actions = members.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Vec::new()
        });

        if actions.iter().any(|a| a.tag == tag) {
            log::debug!(
                "Dropping {} from resource '{}': action '{}' already defined",
                route.describe(),
                key.join("/"),
                tag
            );
            continue;
        }
        actions.push(Action::new(tag, route.clone()));
    }

    let mut resources: Vec<Resource> = order
        .into_iter()
        .map(|key| {
            let mut actions = members.remove(&key).unwrap_or_default();
            actions.sort_by_key(|a| a.tag.rank());
            Resource {
                name: key.last().cloned().unwrap_or_default(),
                file_path: format!("{}.{}", key.join("/"), RESOURCE_EXTENSION),
                key,
                actions,
            }
        })
        .collect();

    resources.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::NamingOptions;
    use std::collections::BTreeMap;

    fn route(helper: &str, verb: HttpVerb, path: &str) -> Route {
        Route::new(helper, verb, path, None, BTreeMap::new(), NamingOptions::default())
    }

    fn key(helper: &str, path: &str) -> Vec<String> {
        resource_key(&route(helper, HttpVerb::Get, path), GroupBy::Resource)
    }

    #[test]
    fn test_action_from_helper_prefix() {
        assert_eq!(infer_action_name(&route("new_user", HttpVerb::Get, "/users/new")), ActionTag::New);
        assert_eq!(infer_action_name(&route("edit_user", HttpVerb::Get, "/users/:id/edit")), ActionTag::Edit);
        // prefix wins over the verb default
        assert_eq!(infer_action_name(&route("restore_user", HttpVerb::Patch, "/users/:id")), ActionTag::Restore);
    }

    #[test]
    fn test_action_from_helper_suffix() {
        assert_eq!(infer_action_name(&route("user_restore", HttpVerb::Post, "/users/:id/r")), ActionTag::Restore);
        assert_eq!(infer_action_name(&route("user_confirm_email", HttpVerb::Get, "/u/:token")), ActionTag::Confirm);
        assert_eq!(infer_action_name(&route("user_new", HttpVerb::Get, "/users/build")), ActionTag::New);
        assert_eq!(infer_action_name(&route("user_index", HttpVerb::Get, "/users/:id")), ActionTag::Index);
        assert_eq!(infer_action_name(&route("user_show", HttpVerb::Get, "/users")), ActionTag::Show);
    }

    #[test]
    fn test_action_from_path_shape() {
        assert_eq!(infer_action_name(&route("user", HttpVerb::Get, "/users/new")), ActionTag::New);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Get, "/users/create")), ActionTag::New);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Get, "/users/:id/edit")), ActionTag::Edit);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Post, "/users/:id/restore")), ActionTag::Restore);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Get, "/users/:id/confirm")), ActionTag::Confirm);
    }

    #[test]
    fn test_action_from_verb() {
        assert_eq!(infer_action_name(&route("user", HttpVerb::Post, "/users")), ActionTag::Create);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Patch, "/users/:id")), ActionTag::Update);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Put, "/users/:id")), ActionTag::Update);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Delete, "/users/:id")), ActionTag::Delete);
        assert_eq!(infer_action_name(&route("user", HttpVerb::Get, "/users/:id(.:format)")), ActionTag::Show);
        assert_eq!(infer_action_name(&route("users", HttpVerb::Get, "/users")), ActionTag::Index);
        assert_eq!(
            infer_action_name(&route("users", HttpVerb::Options, "/users")),
            ActionTag::Other("options".to_string())
        );
    }

    #[test]
    fn test_resource_keys() {
        assert_eq!(key("users", "/users"), vec!["users"]);
        assert_eq!(key("user", "/users/:id"), vec!["users"]);
        assert_eq!(key("new_user", "/users/new"), vec!["users"]);
        assert_eq!(key("user_confirm_email", "/users/confirm"), vec!["users"]);
        assert_eq!(key("contacts_contacts", "/contacts"), vec!["contacts"]);
        assert_eq!(key("category", "/categories"), vec!["categories"]);
    }

    #[test]
    fn test_scoped_resource_keys() {
        assert_eq!(key("admin_users", "/admin/users"), vec!["admin", "users"]);
        assert_eq!(key("api_v1_products", "/api/v1/products"), vec!["api", "v1", "products"]);
        assert_eq!(key("api_orders", "/api/orders"), vec!["api", "orders"]);
        assert_eq!(key("admin", "/admin"), vec!["admin", "admins"]);
        assert_ne!(key("admin_users", "/admin/users"), key("users", "/users"));
    }

    #[test]
    fn test_scope_strategy() {
        let r = route("user_posts", HttpVerb::Get, "/users/:user_id/posts(.:format)");
        assert_eq!(resource_key(&r, GroupBy::Scope), vec!["users", "posts"]);
        let root = route("root", HttpVerb::Get, "/");
        assert_eq!(resource_key(&root, GroupBy::Scope), vec!["root"]);
    }

    #[test]
    fn test_controller_strategy_falls_back() {
        let r = route("admin_users", HttpVerb::Get, "/admin/users");
        assert_eq!(resource_key(&r, GroupBy::Controller), resource_key(&r, GroupBy::Resource));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("news"), "news");
        assert_eq!(pluralize("category"), "categories");
    }

    #[test]
    fn test_grouping_orders_actions_canonically() {
        let routes = vec![
            route("user", HttpVerb::Get, "/users/:id"),
            route("new_user", HttpVerb::Get, "/users/new"),
            route("users", HttpVerb::Get, "/users"),
        ];
        let resources = group_resources(&routes, GroupBy::Resource);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].key, vec!["users"]);
        assert_eq!(resources[0].file_path, "users.ts");
        let tags: Vec<&str> = resources[0].actions.iter().map(|a| a.tag.as_str()).collect();
        assert_eq!(tags, vec!["index", "new", "show"]);
    }

    #[test]
    fn test_grouping_collapses_duplicate_tags() {
        let routes = vec![
            route("user", HttpVerb::Patch, "/users/:id"),
            route("user", HttpVerb::Put, "/users/:id"),
        ];
        let resources = group_resources(&routes, GroupBy::Resource);
        assert_eq!(resources[0].actions.len(), 1);
        assert_eq!(resources[0].actions[0].route.verb, HttpVerb::Patch);
    }

    #[test]
    fn test_resources_sorted_by_name() {
        let routes = vec![
            route("admin_users", HttpVerb::Get, "/admin/users"),
            route("posts", HttpVerb::Get, "/posts"),
            route("users", HttpVerb::Get, "/users"),
            route("comments", HttpVerb::Get, "/comments"),
        ];
        let resources = group_resources(&routes, GroupBy::Resource);
        let keys: Vec<String> = resources.iter().map(|r| r.key.join("/")).collect();
        assert_eq!(keys, vec!["comments", "posts", "admin/users", "users"]);
        assert_eq!(resources[2].scope(), &["admin".to_string()]);
        assert_eq!(resources[2].file_path, "admin/users.ts");
    }

    #[test]
    fn test_action_params() {
        let action = Action::new(ActionTag::Show, route("user", HttpVerb::Get, "/users/:id(.:format)"));
        assert_eq!(
            action.params,
            vec![
                ParamDescriptor { name: "id".to_string(), required: true },
                ParamDescriptor { name: "format".to_string(), required: false },
            ]
        );
        assert_eq!(ActionTag::New.binding_name(), "new_");
        assert_eq!(ActionTag::Show.binding_name(), "show");
    }
}
