//! Normalized route model

use crate::segment::{parse_path, Segment};
use crate::types::HttpVerb;
use crate::utils::snake_to_camel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Naming switches applied when turning a helper into generated names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingOptions {
    pub camel_case: bool,
    pub compact: bool,
}

/// `{helper}_path`, `{helper}` when compact, camel-cased on request
pub fn path_helper_name(helper: &str, naming: NamingOptions) -> String {
    let name = if naming.compact {
        helper.to_string()
    } else {
        format!("{}_path", helper)
    };
    if naming.camel_case {
        snake_to_camel(&name)
    } else {
        name
    }
}

/// `{helper}_url`, camel-cased on request. Compact mode does not apply to URL helpers.
pub fn url_helper_name(helper: &str, naming: NamingOptions) -> String {
    let name = format!("{}_url", helper);
    if naming.camel_case {
        snake_to_camel(&name)
    } else {
        name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Helper base name after disambiguation (`user`, `help_index`)
    pub helper: String,
    /// Helper as registered by the framework
    pub source_helper: String,
    pub verb: HttpVerb,
    pub path: String,
    /// Normalized action identifier from the route record, if any
    pub action: Option<String>,
    pub segments: Vec<Segment>,
    pub required_params: Vec<String>,
    pub optional_params: Vec<String>,
    pub defaults: BTreeMap<String, String>,
    pub live: bool,
    pub path_name: String,
    pub url_name: String,
}

impl Route {
    pub fn new(
        helper: &str,
        verb: HttpVerb,
        path: &str,
        action: Option<String>,
        defaults: BTreeMap<String, String>,
        naming: NamingOptions,
    ) -> Self {
        let segments = parse_path(path);
        let (required_params, optional_params) = collect_params(&segments);

        Self {
            helper: helper.to_string(),
            source_helper: helper.to_string(),
            verb,
            path: path.to_string(),
            action,
            segments,
            required_params,
            optional_params,
            defaults,
            live: false,
            path_name: path_helper_name(helper, naming),
            url_name: url_helper_name(helper, naming),
        }
    }

    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Same route under a new helper base name; the framework helper is kept
    pub fn renamed(&self, helper: &str, naming: NamingOptions) -> Self {
        let mut route = self.clone();
        route.helper = helper.to_string();
        route.path_name = path_helper_name(helper, naming);
        route.url_name = url_helper_name(helper, naming);
        route
    }

    /// Helper name with the `_path` suffix, regardless of naming options
    pub fn snake_path_name(&self) -> String {
        format!("{}_path", self.source_helper)
    }

    /// `VERB /path`, used in diagnostics
    pub fn describe(&self) -> String {
        format!("{} {}", self.verb, self.path)
    }

    /// True when the last non-optional segment is a parameter or glob
    pub fn ends_with_param(&self) -> bool {
        matches!(
            self.segments.iter().rev().find(|s| !matches!(s, Segment::Optional(_))),
            Some(Segment::Param(_)) | Some(Segment::Glob(_))
        )
    }

    /// Path components with the optional groups removed (`/users/:id/edit` -> `["users", ":id", "edit"]`)
    pub fn path_components(&self) -> Vec<String> {
        let mut required = String::with_capacity(self.path.len());
        let mut depth = 0usize;
        for c in self.path.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if depth == 0 => required.push(c),
                _ => {}
            }
        }
        required
            .split('/')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Static (non-parameter) path components in order
    pub fn static_components(&self) -> Vec<String> {
        self.path_components()
            .into_iter()
            .filter(|c| !c.starts_with(':') && !c.starts_with('*'))
            .collect()
    }
}

/// Required params come from bare `Param`/`Glob` segments, optional params from
/// anything nested in an `Optional` group
pub fn collect_params(segments: &[Segment]) -> (Vec<String>, Vec<String>) {
    let mut required = Vec::new();
    let mut optional = Vec::new();

    for segment in segments {
        match segment {
            Segment::Param(name) | Segment::Glob(name) => push_unique(&mut required, name),
            Segment::Optional(children) => collect_optional(children, &mut optional),
            Segment::Literal(_) => {}
        }
    }

    (required, optional)
}

fn collect_optional(segments: &[Segment], optional: &mut Vec<String>) {
    for segment in segments {
        match segment {
            Segment::Param(name) | Segment::Glob(name) => push_unique(optional, name),
            Segment::Optional(children) => collect_optional(children, optional),
            Segment::Literal(_) => {}
        }
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|existing| existing == name) {
        list.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(helper: &str, verb: HttpVerb, path: &str) -> Route {
        Route::new(helper, verb, path, None, BTreeMap::new(), NamingOptions::default())
    }

    #[test]
    fn test_helper_names() {
        let plain = NamingOptions::default();
        let camel = NamingOptions { camel_case: true, compact: false };
        let compact = NamingOptions { camel_case: false, compact: true };
        let both = NamingOptions { camel_case: true, compact: true };

        assert_eq!(path_helper_name("admin_user", plain), "admin_user_path");
        assert_eq!(path_helper_name("admin_user", camel), "adminUserPath");
        assert_eq!(path_helper_name("admin_user", compact), "admin_user");
        assert_eq!(path_helper_name("admin_user", both), "adminUser");

        assert_eq!(url_helper_name("admin_user", plain), "admin_user_url");
        assert_eq!(url_helper_name("admin_user", camel), "adminUserUrl");
        assert_eq!(url_helper_name("admin_user", compact), "admin_user_url");
    }

    #[test]
    fn test_param_extraction() {
        let r = route("user_post", HttpVerb::Get, "/users/:user_id/posts/:id(.:format)");
        assert_eq!(r.required_params, vec!["user_id", "id"]);
        assert_eq!(r.optional_params, vec!["format"]);
        assert_eq!(r.path_name, "user_post_path");
    }

    #[test]
    fn test_literal_route_has_no_params() {
        let r = route("users", HttpVerb::Get, "/users");
        assert!(r.required_params.is_empty());
        assert!(r.optional_params.is_empty());
        assert!(!r.ends_with_param());
    }

    #[test]
    fn test_glob_is_required() {
        let r = route("file", HttpVerb::Get, "/files/*path");
        assert_eq!(r.required_params, vec!["path"]);
        assert!(r.ends_with_param());
    }

    #[test]
    fn test_ends_with_param_ignores_format() {
        assert!(route("user", HttpVerb::Get, "/users/:id(.:format)").ends_with_param());
        assert!(!route("edit_user", HttpVerb::Get, "/users/:id/edit").ends_with_param());
    }

    #[test]
    fn test_renamed_keeps_source_helper() {
        let r = route("help", HttpVerb::Get, "/help").renamed("help_index", NamingOptions::default());
        assert_eq!(r.helper, "help_index");
        assert_eq!(r.source_helper, "help");
        assert_eq!(r.path_name, "help_index_path");
        assert_eq!(r.url_name, "help_index_url");
    }

    #[test]
    fn test_components() {
        let r = route("edit_admin_user", HttpVerb::Get, "/admin/users/:id/edit(.:format)");
        assert_eq!(r.path_components(), vec!["admin", "users", ":id", "edit"]);
        assert_eq!(r.static_components(), vec!["admin", "users", "edit"]);
    }
}
