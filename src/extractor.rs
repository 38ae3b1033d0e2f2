//! Route extraction and helper-name disambiguation

use crate::error::{GeneratorError, Result};
use crate::resource::infer_action_name;
use crate::route::{NamingOptions, Route};
use crate::router::RouteRecord;
use crate::types::HttpVerb;
use crate::utils::{identifier_token, normalize_action};
use crate::GeneratorOptions;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Include/exclude patterns matched against helper names
#[derive(Debug, Clone, Default)]
pub struct RouteFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl RouteFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile_patterns("include", include)?,
            exclude: compile_patterns("exclude", exclude)?,
        })
    }

    /// Passes when no include pattern is set or one matches, and no exclude pattern matches
    pub fn matches(&self, helper: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|re| re.is_match(helper));
        included && !self.exclude.iter().any(|re| re.is_match(helper))
    }
}

fn compile_patterns(option: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                GeneratorError::config(format!("Invalid {} pattern '{}': {}", option, pattern, e))
            })
        })
        .collect()
}

/// Normalized, uniquely named routes plus how many records were dropped
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub routes: Vec<Route>,
    pub skipped: usize,
}

/// Build one [`Route`] per usable record, then disambiguate shared helpers
pub fn extract_routes<R: RouteRecord>(records: &[R], options: &GeneratorOptions) -> Result<Extraction> {
    let filter = RouteFilter::new(&options.include, &options.exclude)?;
    let naming = options.naming();
    let mut extraction = Extraction::default();

    for record in records {
        let helper = match record.helper().map(str::trim).filter(|h| !h.is_empty()) {
            Some(helper) => helper,
            None => {
                log::debug!("Skipping {} {}: no helper name", record.verb(), record.path());
                extraction.skipped += 1;
                continue;
            }
        };

        if !filter.matches(helper) {
            log::debug!("Skipping '{}': filtered by include/exclude patterns", helper);
            extraction.skipped += 1;
            continue;
        }

        let verb = match HttpVerb::parse(record.verb()) {
            Some(verb) => verb,
            None => {
                log::warn!(
                    "Skipping '{}': unsupported HTTP verb '{}' for {}",
                    helper,
                    record.verb(),
                    record.path()
                );
                extraction.skipped += 1;
                continue;
            }
        };

        if record.is_live() && !options.include_live {
            log::info!("Skipping live route '{}' ({})", helper, record.path());
            extraction.skipped += 1;
            continue;
        }

        let route = Route::new(
            helper,
            verb,
            record.path(),
            record.action().and_then(normalize_action),
            record.defaults(),
            naming,
        )
        .with_live(record.is_live());
        extraction.routes.push(route);
    }

    extraction.routes = disambiguate(extraction.routes, naming)?;
    ensure_unique(&extraction.routes, options.url_helpers)?;

    if options.debug_mode {
        log::debug!(
            "Extracted {} routes, skipped {} records",
            extraction.routes.len(),
            extraction.skipped
        );
    }

    Ok(extraction)
}

/// Group by helper, preserving first-occurrence order
fn group_by_helper(routes: Vec<Route>) -> Vec<(String, Vec<Route>)> {
    let mut groups: Vec<(String, Vec<Route>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for route in routes {
        match index.get(&route.helper) {
            Some(&i) => groups[i].1.push(route),
            None => {
                index.insert(route.helper.clone(), groups.len());
                groups.push((route.helper.clone(), vec![route]));
            }
        }
    }

    groups
}

/// Shared helpers get `{helper}_{action}`; when that still collides the
/// route's leading static path segments are prepended.
pub fn disambiguate(routes: Vec<Route>, naming: NamingOptions) -> Result<Vec<Route>> {
    let mut result = Vec::with_capacity(routes.len());

    for (helper, group) in group_by_helper(routes) {
        if group.len() == 1 {
            result.extend(group);
            continue;
        }

        let renamed: Vec<Route> = group
            .iter()
            .map(|route| {
                let action = route
                    .action
                    .clone()
                    .unwrap_or_else(|| infer_action_name(route).to_string());
                let name = format!("{}_{}", helper, action);
                log::debug!("Disambiguated '{}' ({}) as '{}'", helper, route.describe(), name);
                route.renamed(&name, naming)
            })
            .collect();

        for (_, mut colliding) in group_by_helper(dedupe_same_path(renamed)) {
            if colliding.len() > 1 {
                colliding = prefix_with_scope(colliding, naming)?;
            }
            result.extend(colliding);
        }
    }

    Ok(result)
}

/// PUT and PATCH to the same path under the same action build the same URL;
/// the first record wins. Any other shared name is left for scope prefixing.
fn dedupe_same_path(routes: Vec<Route>) -> Vec<Route> {
    let mut seen: HashSet<(String, String, HttpVerb)> = HashSet::new();
    routes
        .into_iter()
        .filter(|route| {
            let fresh = seen.insert((route.helper.clone(), route.path.clone(), update_verb(route.verb)));
            if !fresh {
                log::debug!("Merging {} into existing helper '{}'", route.describe(), route.helper);
            }
            fresh
        })
        .collect()
}

/// PUT and PATCH both update a resource
fn update_verb(verb: HttpVerb) -> HttpVerb {
    match verb {
        HttpVerb::Put => HttpVerb::Patch,
        other => other,
    }
}

fn prefix_with_scope(routes: Vec<Route>, naming: NamingOptions) -> Result<Vec<Route>> {
    let max_depth = routes
        .iter()
        .map(|r| r.static_components().len())
        .max()
        .unwrap_or(0);

    for depth in 1..=max_depth {
        let candidates: Vec<Route> = routes
            .iter()
            .map(|route| {
                let statics = route.static_components();
                let taken = &statics[..depth.min(statics.len())];
                let scope = identifier_token(&taken.join("_"));
                match scope {
                    Some(scope) if !route.helper.starts_with(&scope) => {
                        route.renamed(&format!("{}_{}", scope, route.helper), naming)
                    }
                    _ => route.clone(),
                }
            })
            .collect();

        let names: HashSet<&str> = candidates.iter().map(|r| r.helper.as_str()).collect();
        if names.len() == candidates.len() {
            return Ok(candidates);
        }
    }

    Err(GeneratorError::collision(
        routes[0].path_name.clone(),
        routes.iter().map(Route::describe).collect(),
    ))
}

/// Every generated name must be unique across the whole run
fn ensure_unique(routes: &[Route], url_helpers: bool) -> Result<()> {
    let mut owners: HashMap<&str, &Route> = HashMap::new();

    for route in routes {
        let mut names = vec![route.path_name.as_str()];
        if url_helpers {
            names.push(route.url_name.as_str());
        }
        for name in names {
            if let Some(previous) = owners.insert(name, route) {
                return Err(GeneratorError::collision(
                    name,
                    vec![previous.describe(), route.describe()],
                ));
            }
        }
    }

    Ok(())
}
