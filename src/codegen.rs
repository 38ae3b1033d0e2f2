//! Classic-mode code generation
//!
//! Emits a single JavaScript file with one helper per route. The simple
//! variant compiles each route to a call into the embedded tree evaluator;
//! the rich variant substitutes the literal pattern through `_buildUrl` and
//! returns `{ url, method }` objects.

use crate::error::Result;
use crate::route::Route;
use crate::runtime::{form_runtime, RICH_RUNTIME, SHARED_HELPERS, SIMPLE_RUNTIME};
use crate::serializer::{param_metadata, serialize, to_json};
use crate::types::{HttpVerb, ModuleType, OutputVariant};
use crate::utils::{doc_safe, js_string, safe_identifier};
use crate::{GeneratorOptions, NAME};
use std::fmt::Write;

/// Verbs a rich form helper can be switched to
const FORM_OVERRIDES: &[HttpVerb] = &[HttpVerb::Patch, HttpVerb::Put, HttpVerb::Delete];

/// One emitted binding: the JavaScript name plus whether it builds absolute URLs
struct Binding<'r> {
    name: String,
    route: &'r Route,
    absolute: bool,
}

pub struct CodeGenerator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn generate(&self, routes: &[Route]) -> Result<String> {
        let bindings = self.bindings(routes);
        let mut out = String::new();

        self.write_header(&mut out, routes.len())?;
        self.write_prologue(&mut out)?;
        self.write_runtime(&mut out)?;

        for binding in &bindings {
            out.push('\n');
            self.write_helper(&mut out, binding)?;
        }

        out.push('\n');
        self.write_exports(&mut out, &bindings)?;
        self.write_epilogue(&mut out)?;

        if self.options.debug_mode {
            log::debug!(
                "Classic generator emitted {} helpers ({} bytes)",
                bindings.len(),
                out.len()
            );
        }

        Ok(out)
    }

    fn bindings<'r>(&self, routes: &'r [Route]) -> Vec<Binding<'r>> {
        let mut bindings = Vec::with_capacity(routes.len() * 2);
        for route in routes {
            bindings.push(Binding {
                name: safe_identifier(&route.path_name),
                route,
                absolute: false,
            });
            if self.options.url_helpers {
                bindings.push(Binding {
                    name: safe_identifier(&route.url_name),
                    route,
                    absolute: true,
                });
            }
        }
        bindings
    }

    fn write_header(&self, out: &mut String, route_count: usize) -> Result<()> {
        writeln!(out, "/**")?;
        writeln!(out, " * File generated by {}. Do not edit.", NAME)?;
        writeln!(out, " *")?;
        writeln!(out, " * Routes: {}", route_count)?;
        writeln!(
            out,
            " * Variant: {}, module: {}",
            self.options.variant, self.options.module_type
        )?;
        writeln!(out, " */")?;
        Ok(())
    }

    fn write_prologue(&self, out: &mut String) -> Result<()> {
        match self.options.module_type {
            ModuleType::Umd => {
                writeln!(out, "(function (root, factory) {{")?;
                writeln!(out, "  if (typeof define === \"function\" && define.amd) {{")?;
                writeln!(out, "    define([], factory);")?;
                writeln!(out, "  }} else if (typeof module === \"object\" && module.exports) {{")?;
                writeln!(out, "    module.exports = factory();")?;
                writeln!(out, "  }} else {{")?;
                writeln!(out, "    root[{}] = factory();", js_string(&self.options.namespace))?;
                writeln!(out, "  }}")?;
                writeln!(out, "}})(typeof self !== \"undefined\" ? self : this, function () {{")?;
                writeln!(out, "\"use strict\";")?;
            }
            ModuleType::None => {
                writeln!(out, "(function (root) {{")?;
                writeln!(out, "\"use strict\";")?;
            }
            ModuleType::Cjs => writeln!(out, "\"use strict\";")?,
            ModuleType::Esm => {}
        }

        let defaults = serde_json::to_string(&self.options.default_url_options)?;
        writeln!(out)?;
        writeln!(out, "const __defaultUrlOptions = {};", defaults)?;
        Ok(())
    }

    fn write_runtime(&self, out: &mut String) -> Result<()> {
        out.push('\n');
        out.push_str(SHARED_HELPERS);
        out.push('\n');
        match self.options.variant {
            OutputVariant::Simple => out.push_str(SIMPLE_RUNTIME),
            OutputVariant::Rich => {
                out.push_str(RICH_RUNTIME);
                if self.options.with_forms {
                    out.push('\n');
                    out.push_str(&form_runtime());
                }
            }
        }
        Ok(())
    }

    fn write_helper(&self, out: &mut String, binding: &Binding) -> Result<()> {
        if self.options.documentation {
            self.write_doc(out, binding)?;
        }

        let keyword = match self.options.module_type {
            ModuleType::Esm => "export const",
            _ => "const",
        };

        match self.options.variant {
            OutputVariant::Simple => {
                let route = binding.route;
                let meta = param_metadata(route).to_json()?;
                let tree = to_json(&serialize(&route.segments))?;
                writeln!(
                    out,
                    "{} {} = __route({}, {}, {});",
                    keyword, binding.name, meta, tree, binding.absolute
                )?;
            }
            OutputVariant::Rich => self.write_rich_helper(out, binding, keyword)?,
        }
        Ok(())
    }

    fn write_rich_helper(&self, out: &mut String, binding: &Binding, keyword: &str) -> Result<()> {
        let route = binding.route;
        let name = &binding.name;
        let verb = route.verb;
        let pattern = js_string(if route.path.is_empty() { "/" } else { &route.path });
        let required = serde_json::to_string(&route.required_params)?;
        let params = format!("__params({}, args)", required);
        let options = if binding.absolute {
            "Object.assign({}, options, { absolute: true })"
        } else {
            "options"
        };
        let url = format!("_buildUrl({}, {}, {})", pattern, params, options);

        writeln!(out, "{} {} = (args, options) => ({{", keyword, name)?;
        writeln!(out, "  url: {},", url)?;
        writeln!(out, "  method: \"{}\",", verb.js_name())?;
        writeln!(out, "}});")?;

        if self.options.with_methods {
            writeln!(out, "{}.url = (args, options) => {};", name, url)?;
            let mut variants = vec![HttpVerb::Get, HttpVerb::Head];
            if verb.is_mutation() {
                variants.push(verb);
            }
            for variant in variants {
                writeln!(
                    out,
                    "{}.{} = (args, options) => ({{ url: {}.url(args, options), method: \"{}\" }});",
                    name,
                    variant.js_name(),
                    name,
                    variant.js_name()
                )?;
            }
        }

        if self.options.with_forms && verb.is_mutation() {
            let form = |method: HttpVerb| {
                format!(
                    "(args, options) => _buildFormAction({}, {}, \"{}\", {})",
                    pattern,
                    params,
                    method.js_name(),
                    options
                )
            };
            writeln!(out, "{}.form = {};", name, form(verb))?;
            for method in FORM_OVERRIDES {
                writeln!(out, "{}.form.{} = {};", name, method.js_name(), form(*method))?;
            }
        }

        Ok(())
    }

    fn write_doc(&self, out: &mut String, binding: &Binding) -> Result<()> {
        let route = binding.route;
        writeln!(out, "/**")?;
        writeln!(out, " * {} {}", route.verb, doc_safe(&route.path))?;
        if binding.absolute {
            writeln!(out, " * Builds an absolute URL.")?;
        }

        match self.options.variant {
            OutputVariant::Simple => {
                for param in &route.required_params {
                    writeln!(out, " * @param {{any}} {}", safe_identifier(param))?;
                }
                writeln!(out, " * @param {{object}} [options]")?;
                writeln!(out, " * @returns {{string}}")?;
            }
            OutputVariant::Rich => {
                if route.required_params.is_empty() {
                    writeln!(out, " * @param {{object}} [args]")?;
                } else {
                    let fields: Vec<String> = route
                        .required_params
                        .iter()
                        .map(|p| format!("{}: any", p))
                        .collect();
                    writeln!(out, " * @param {{{{ {} }} | any}} args", fields.join(", "))?;
                }
                writeln!(out, " * @param {{object}} [options]")?;
                writeln!(out, " * @returns {{{{ url: string, method: string }}}}")?;
            }
        }
        writeln!(out, " */")?;
        Ok(())
    }

    fn exported_names(&self, bindings: &[Binding]) -> Vec<String> {
        let mut names: Vec<String> = bindings.iter().map(|b| b.name.clone()).collect();
        if self.options.variant == OutputVariant::Rich {
            names.push("_buildUrl".to_string());
            if self.options.with_forms {
                names.push("_buildFormAction".to_string());
            }
        }
        names
    }

    fn write_exports(&self, out: &mut String, bindings: &[Binding]) -> Result<()> {
        match self.options.module_type {
            ModuleType::Esm => {
                if self.options.variant == OutputVariant::Rich {
                    let helpers = if self.options.with_forms {
                        "_buildUrl, _buildFormAction"
                    } else {
                        "_buildUrl"
                    };
                    writeln!(out, "export {{ {} }};", helpers)?;
                }
            }
            ModuleType::Cjs => {
                let names: Vec<String> = bindings.iter().map(|b| b.name.clone()).collect();
                write_object(out, "module.exports = ", &names, ";")?;
            }
            ModuleType::Umd => write_object(out, "return ", &self.exported_names(bindings), ";")?,
            ModuleType::None => {
                let target = format!("root[{}] = ", js_string(&self.options.namespace));
                write_object(out, &target, &self.exported_names(bindings), ";")?;
            }
        }
        Ok(())
    }

    fn write_epilogue(&self, out: &mut String) -> Result<()> {
        match self.options.module_type {
            ModuleType::Umd => writeln!(out, "}});")?,
            ModuleType::None => writeln!(
                out,
                "}})(typeof globalThis !== \"undefined\" ? globalThis : window);"
            )?,
            ModuleType::Esm | ModuleType::Cjs => {}
        }
        Ok(())
    }
}

fn write_object(out: &mut String, prefix: &str, names: &[String], suffix: &str) -> Result<()> {
    if names.is_empty() {
        writeln!(out, "{}{{}}{}", prefix, suffix)?;
        return Ok(());
    }
    writeln!(out, "{}{{", prefix)?;
    for name in names {
        writeln!(out, "  {},", name)?;
    }
    writeln!(out, "}}{}", suffix)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::NamingOptions;
    use std::collections::BTreeMap;

    fn route(helper: &str, verb: HttpVerb, path: &str) -> Route {
        Route::new(helper, verb, path, None, BTreeMap::new(), NamingOptions::default())
    }

    fn rich_options() -> GeneratorOptions {
        let mut options = GeneratorOptions::default();
        options.variant = OutputVariant::Rich;
        options.with_methods = true;
        options
    }

    #[test]
    fn test_simple_helper() {
        let options = GeneratorOptions::default();
        let output = CodeGenerator::new(&options)
            .generate(&[route("user", HttpVerb::Get, "/users/:id")])
            .unwrap();
        assert!(output.contains(
            r#"export const user_path = __route({"id":{"required":true}}, ["/users/",["param","id"]], false);"#
        ));
        assert!(output.contains("function __route("));
        assert!(!output.contains("_buildUrl"));
    }

    #[test]
    fn test_root_route_renders_slash() {
        let options = rich_options();
        let output = CodeGenerator::new(&options)
            .generate(&[route("root", HttpVerb::Get, "")])
            .unwrap();
        assert!(output.contains(r#"_buildUrl("/", __params([], args), options)"#));
    }

    #[test]
    fn test_rich_helper_with_methods() {
        let options = rich_options();
        let output = CodeGenerator::new(&options)
            .generate(&[route("user", HttpVerb::Get, "/users/:id")])
            .unwrap();
        assert!(output.contains("export const user_path = (args, options) => ({"));
        assert!(output.contains(r#"  url: _buildUrl("/users/:id", __params(["id"], args), options),"#));
        assert!(output.contains(r#"  method: "get","#));
        assert!(output.contains("user_path.url = (args, options) =>"));
        assert!(output.contains("user_path.get = "));
        assert!(output.contains("user_path.head = "));
        assert!(!output.contains("user_path.patch"));
        assert!(output.contains("export { _buildUrl };"));
    }

    #[test]
    fn test_rich_mutation_gets_own_method_and_forms() {
        let mut options = rich_options();
        options.with_forms = true;
        let output = CodeGenerator::new(&options)
            .generate(&[route("user", HttpVerb::Patch, "/users/:id")])
            .unwrap();
        assert!(output.contains(r#"user_path.patch = (args, options) => ({ url: user_path.url(args, options), method: "patch" });"#));
        assert!(output.contains(r#"user_path.form = (args, options) => _buildFormAction("/users/:id", __params(["id"], args), "patch", options);"#));
        assert!(output.contains("user_path.form.put = "));
        assert!(output.contains("user_path.form.delete = "));
        assert!(output.contains("function _buildFormAction("));
        assert!(output.contains(r#"const __methodParam = "_method";"#));
        assert!(output.contains("export { _buildUrl, _buildFormAction };"));
    }

    #[test]
    fn test_get_routes_never_get_forms() {
        let mut options = rich_options();
        options.with_forms = true;
        let output = CodeGenerator::new(&options)
            .generate(&[route("users", HttpVerb::Get, "/users")])
            .unwrap();
        assert!(!output.contains("users_path.form"));
    }

    #[test]
    fn test_forms_runtime_only_with_forms() {
        let options = rich_options();
        let output = CodeGenerator::new(&options)
            .generate(&[route("user", HttpVerb::Patch, "/users/:id")])
            .unwrap();
        assert!(!output.contains("_buildFormAction"));
    }

    #[test]
    fn test_url_helpers() {
        let mut options = GeneratorOptions::default();
        options.url_helpers = true;
        options.default_url_options.host = Some("example.com".to_string());
        let output = CodeGenerator::new(&options)
            .generate(&[route("users", HttpVerb::Get, "/users")])
            .unwrap();
        assert!(output.contains(r#"export const users_url = __route({}, ["/users/"], true);"#));
        assert!(output.contains(r#"const __defaultUrlOptions = {"host":"example.com"};"#));
    }

    #[test]
    fn test_cjs_exports() {
        let mut options = GeneratorOptions::default();
        options.module_type = ModuleType::Cjs;
        let output = CodeGenerator::new(&options)
            .generate(&[route("users", HttpVerb::Get, "/users")])
            .unwrap();
        assert!(output.contains("const users_path = __route("));
        assert!(!output.contains("export const"));
        assert!(output.contains("module.exports = {\n  users_path,\n};"));
    }

    #[test]
    fn test_umd_and_global_wrappers() {
        let mut options = GeneratorOptions::default();
        options.module_type = ModuleType::Umd;
        let output = CodeGenerator::new(&options)
            .generate(&[route("users", HttpVerb::Get, "/users")])
            .unwrap();
        assert!(output.contains("define([], factory);"));
        assert!(output.contains(r#"root["Routes"] = factory();"#));
        assert!(output.trim_end().ends_with("});"));

        options.module_type = ModuleType::None;
        options.namespace = "AppRoutes".to_string();
        let output = CodeGenerator::new(&options)
            .generate(&[route("users", HttpVerb::Get, "/users")])
            .unwrap();
        assert!(output.contains(r#"root["AppRoutes"] = {"#));
        assert!(output.contains("globalThis"));
    }

    #[test]
    fn test_documentation_toggle() {
        let mut options = GeneratorOptions::default();
        let routes = [route("user", HttpVerb::Get, "/users/:id")];
        let output = CodeGenerator::new(&options).generate(&routes).unwrap();
        assert!(output.contains(" * GET /users/:id\n * @param {any} id\n"));

        options.documentation = false;
        let output = CodeGenerator::new(&options).generate(&routes).unwrap();
        assert!(!output.contains(" * GET /users/:id"));
    }

    #[test]
    fn test_reserved_helper_name_is_escaped() {
        let mut options = GeneratorOptions::default();
        options.compact = true;
        let naming = options.naming();
        let r = Route::new("new", HttpVerb::Get, "/new", None, BTreeMap::new(), naming);
        let output = CodeGenerator::new(&options).generate(&[r]).unwrap();
        assert!(output.contains("export const new_ = __route("));
    }

    #[test]
    fn test_output_is_deterministic() {
        let options = rich_options();
        let routes = vec![
            route("users", HttpVerb::Get, "/users"),
            route("user", HttpVerb::Delete, "/users/:id"),
        ];
        let first = CodeGenerator::new(&options).generate(&routes).unwrap();
        let second = CodeGenerator::new(&options).generate(&routes).unwrap();
        assert_eq!(first, second);
    }
}
