//! Resource-mode code generation
//!
//! Emits the shared `lib/wayfinder.ts` runtime, one TypeScript module per
//! resource and barrel files for the root and every scope level.

use crate::error::Result;
use crate::resource::{Action, Resource};
use crate::runtime::resource_runtime;
use crate::typegen::param_type;
use crate::types::{ModuleType, RESOURCE_EXTENSION, RESOURCE_RUNTIME_MODULE};
use crate::utils::{doc_safe, js_string, safe_identifier};
use crate::{GeneratedFile, GeneratorOptions, NAME};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::path::Path;

pub struct ResourceCodeGenerator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> ResourceCodeGenerator<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    /// Every file of the resource tree, paths rooted at `output_dir`
    pub fn generate(&self, resources: &[Resource]) -> Result<Vec<GeneratedFile>> {
        if self.options.module_type != ModuleType::Esm {
            log::warn!(
                "Resource mode always emits TypeScript modules; ignoring module type '{}'",
                self.options.module_type
            );
        }

        let root = Path::new(&self.options.output_dir);
        let mut files = Vec::with_capacity(resources.len() + 2);

        files.push(GeneratedFile::new(
            root.join(format!("{}.{}", RESOURCE_RUNTIME_MODULE, RESOURCE_EXTENSION)),
            format!("{}\n{}", self.header(), resource_runtime(self.options.with_forms)),
        ));

        for resource in resources {
            files.push(GeneratedFile::new(
                root.join(&resource.file_path),
                self.resource_file(resource)?,
            ));
        }

        if self.options.include_index {
            for scope in scope_prefixes(resources) {
                let mut relative = scope.join("/");
                if !relative.is_empty() {
                    relative.push('/');
                }
                relative.push_str(&format!("index.{}", RESOURCE_EXTENSION));
                files.push(GeneratedFile::new(root.join(relative), self.barrel(&scope, resources)?));
            }
        }

        if self.options.debug_mode {
            log::debug!(
                "Resource generator emitted {} files for {} resources",
                files.len(),
                resources.len()
            );
        }

        Ok(files)
    }

    fn header(&self) -> String {
        format!("// Generated by {}. Do not edit.\n", NAME)
    }

    pub fn resource_file(&self, resource: &Resource) -> Result<String> {
        let mut out = self.header();
        let depth = resource.scope().len();
        let runtime = if depth == 0 {
            format!("./{}", RESOURCE_RUNTIME_MODULE)
        } else {
            format!("{}{}", "../".repeat(depth), RESOURCE_RUNTIME_MODULE)
        };

        writeln!(out)?;
        writeln!(out, "import {{ route }} from {};", js_string(&runtime))?;
        if resource.actions.iter().any(|a| !a.params.is_empty()) {
            writeln!(out, "import type {{ Param }} from {};", js_string(&runtime))?;
        }

        for action in &resource.actions {
            writeln!(out)?;
            self.write_action(&mut out, action)?;
        }

        let renamed: Vec<&Action> = resource
            .actions
            .iter()
            .filter(|a| a.tag.binding_name() != a.tag.as_str())
            .collect();
        if !renamed.is_empty() {
            let aliases: Vec<String> = renamed
                .iter()
                .map(|a| format!("{} as {}", a.tag.binding_name(), a.tag.as_str()))
                .collect();
            writeln!(out)?;
            writeln!(out, "export {{ {} }};", aliases.join(", "))?;
        }

        let aggregate = aggregate_name(resource);
        writeln!(out)?;
        writeln!(out, "const {} = {{", aggregate)?;
        for action in &resource.actions {
            let binding = action.tag.binding_name();
            if binding == action.tag.as_str() {
                writeln!(out, "  {},", binding)?;
            } else {
                writeln!(out, "  {}: {},", action.tag.as_str(), binding)?;
            }
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
        writeln!(out, "export {{ {} }};", aggregate)?;
        writeln!(out, "export default {};", aggregate)?;

        Ok(out)
    }

    fn write_action(&self, out: &mut String, action: &Action) -> Result<()> {
        let route = &action.route;
        if self.options.documentation {
            writeln!(out, "/**")?;
            writeln!(out, " * {} {}", route.verb, doc_safe(&route.path))?;
            writeln!(out, " * Helper: {}", route.snake_path_name())?;
            writeln!(out, " */")?;
        }
        let pattern = if route.path.is_empty() { "/" } else { route.path.as_str() };
        writeln!(
            out,
            "export const {} = route<{}>({}, \"{}\");",
            action.tag.binding_name(),
            param_type(&action.params),
            js_string(pattern),
            route.verb.js_name()
        )?;
        Ok(())
    }

    /// `index.ts` for `scope` (empty for the root barrel)
    pub fn barrel(&self, scope: &[String], resources: &[Resource]) -> Result<String> {
        let children: BTreeSet<&String> = resources
            .iter()
            .filter(|r| r.scope().len() > scope.len() && r.scope().starts_with(scope))
            .map(|r| &r.scope()[scope.len()])
            .collect();

        let mut entries: BTreeMap<String, String> = BTreeMap::new();
        for child in &children {
            let name = safe_identifier(child);
            entries.insert(
                name.clone(),
                format!("export * as {} from {};", name, js_string(&format!("./{}/index", child))),
            );
        }
        for resource in resources.iter().filter(|r| r.scope() == scope) {
            let mut name = safe_identifier(&resource.name);
            if children.contains(&resource.name) {
                name = format!("{}_resource", resource.name);
                log::debug!(
                    "Resource '{}' shares its name with a scope, exporting it as '{}'",
                    resource.key.join("/"),
                    name
                );
            }
            entries.insert(
                name.clone(),
                format!(
                    "export {{ default as {} }} from {};",
                    name,
                    js_string(&format!("./{}", resource.name))
                ),
            );
        }

        let mut out = self.header();
        writeln!(out)?;
        for line in entries.values() {
            writeln!(out, "{}", line)?;
        }
        Ok(out)
    }
}

/// Binding of the aggregate object, kept clear of the action bindings
fn aggregate_name(resource: &Resource) -> String {
    let name = safe_identifier(&resource.name);
    if resource.actions.iter().any(|a| a.tag.binding_name() == name) {
        format!("{}_resource", resource.name)
    } else {
        name
    }
}

/// Root plus every scope prefix level, in sorted order
fn scope_prefixes(resources: &[Resource]) -> BTreeSet<Vec<String>> {
    let mut prefixes = BTreeSet::new();
    prefixes.insert(Vec::new());
    for resource in resources {
        let scope = resource.scope();
        for depth in 1..=scope.len() {
            prefixes.insert(scope[..depth].to_vec());
        }
    }
    prefixes
}
