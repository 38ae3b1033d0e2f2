//! Type declaration generation
//!
//! Classic mode gets a `.d.ts` companion mirroring the helper signatures of
//! the chosen variant and module format. Resource mode inlines parameter
//! types into each `route<...>()` call, see [`param_type`].

use crate::error::Result;
use crate::resource::ParamDescriptor;
use crate::route::Route;
use crate::types::{HttpVerb, ModuleType, OutputVariant};
use crate::utils::{doc_safe, js_property_key, safe_identifier};
use crate::{GeneratorOptions, NAME};
use std::fmt::Write;

const SIMPLE_TYPES: &str = r#"type Param = string | number | { id: string | number };

type RouteOptions = {
  anchor?: string;
  trailing_slash?: boolean;
  host?: string;
  protocol?: string;
  port?: number | string;
  [key: string]: unknown;
};
"#;

const RICH_TYPES: &str = r#"type Param = string | number | { id: string | number };

type Method = "get" | "post" | "put" | "patch" | "delete" | "head" | "options";

type RouteOptions = {
  query?: Record<string, unknown>;
  anchor?: string;
  trailing_slash?: boolean;
  absolute?: boolean;
  host?: string;
  protocol?: string;
  port?: number | string;
  [key: string]: unknown;
};

type RouteDefinition<M extends Method = Method> = {
  url: string;
  method: M;
};

type FormDefinition = {
  action: string;
  method: "get" | "post";
};
"#;

/// `{ id: Param; format?: Param }`, or `{}` for a parameterless route
pub fn param_type(params: &[ParamDescriptor]) -> String {
    if params.is_empty() {
        return "{}".to_string();
    }
    let fields: Vec<String> = params
        .iter()
        .map(|p| {
            let marker = if p.required { "" } else { "?" };
            format!("{}{}: Param", js_property_key(&p.name), marker)
        })
        .collect();
    format!("{{ {} }}", fields.join("; "))
}

fn route_params(route: &Route) -> Vec<ParamDescriptor> {
    let required = route.required_params.iter().map(|name| ParamDescriptor {
        name: name.clone(),
        required: true,
    });
    let optional = route
        .optional_params
        .iter()
        .filter(|name| !route.required_params.contains(name))
        .map(|name| ParamDescriptor {
            name: name.clone(),
            required: false,
        });
    required.chain(optional).collect()
}

pub struct TypeGenerator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> TypeGenerator<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn generate(&self, routes: &[Route]) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "// Type declarations generated by {}. Do not edit.", NAME)?;
        writeln!(out)?;

        let global = self.options.module_type == ModuleType::None;
        let (indent, declare) = if global {
            writeln!(out, "declare namespace {} {{", self.options.namespace)?;
            ("  ", "const")
        } else {
            ("", "export declare const")
        };

        let shared = match self.options.variant {
            OutputVariant::Simple => SIMPLE_TYPES,
            OutputVariant::Rich => RICH_TYPES,
        };
        for line in shared.lines() {
            if line.is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, "{}{}", indent, line)?;
            }
        }

        for route in routes {
            let mut names = vec![(safe_identifier(&route.path_name), false)];
            if self.options.url_helpers {
                names.push((safe_identifier(&route.url_name), true));
            }
            for (name, absolute) in names {
                writeln!(out)?;
                if self.options.documentation {
                    let kind = if absolute { " (absolute URL)" } else { "" };
                    writeln!(out, "{}/** {} {}{} */", indent, route.verb, doc_safe(&route.path), kind)?;
                }
                let signature = match self.options.variant {
                    OutputVariant::Simple => self.simple_signature(route),
                    OutputVariant::Rich => self.rich_signature(route),
                };
                writeln!(out, "{}{} {}: {};", indent, declare, name, signature)?;
            }
        }

        if self.options.variant == OutputVariant::Rich && self.options.module_type != ModuleType::Cjs {
            let declare_fn = if global { "function" } else { "export declare function" };
            writeln!(out)?;
            writeln!(
                out,
                "{}{} _buildUrl(pattern: string, params?: Record<string, unknown>, options?: RouteOptions): string;",
                indent, declare_fn
            )?;
            if self.options.with_forms {
                writeln!(
                    out,
                    "{}{} _buildFormAction(pattern: string, params: Record<string, unknown>, method: Method, options?: RouteOptions): FormDefinition;",
                    indent, declare_fn
                )?;
            }
        }

        match self.options.module_type {
            ModuleType::None => writeln!(out, "}}")?,
            ModuleType::Umd => {
                writeln!(out)?;
                writeln!(out, "export as namespace {};", self.options.namespace)?;
            }
            ModuleType::Esm | ModuleType::Cjs => {}
        }

        Ok(out)
    }

    fn simple_signature(&self, route: &Route) -> String {
        let mut args: Vec<String> = route
            .required_params
            .iter()
            .map(|p| format!("{}: Param", safe_identifier(p)))
            .collect();

        let optional: Vec<ParamDescriptor> = route_params(route)
            .into_iter()
            .filter(|p| !p.required)
            .collect();
        if optional.is_empty() {
            args.push("options?: RouteOptions".to_string());
        } else {
            args.push(format!("options?: RouteOptions & {}", param_type(&optional)));
        }

        format!("({}) => string", args.join(", "))
    }

    fn rich_signature(&self, route: &Route) -> String {
        let params = route_params(route);
        let args = if route.required_params.is_empty() {
            format!("args?: {}", param_type(&params))
        } else {
            format!("args: {} | Param", param_type(&params))
        };
        let call = |result: &str| format!("({}, options?: RouteOptions) => {}", args, result);
        let verb = route.verb.js_name();

        let base = call(&format!("RouteDefinition<\"{}\">", verb));
        let mut members: Vec<String> = Vec::new();

        if self.options.with_methods {
            members.push(format!("url: {}", call("string")));
            let mut variants = vec![HttpVerb::Get, HttpVerb::Head];
            if route.verb.is_mutation() {
                variants.push(route.verb);
            }
            for variant in variants {
                members.push(format!(
                    "{}: {}",
                    variant.js_name(),
                    call(&format!("RouteDefinition<\"{}\">", variant.js_name()))
                ));
            }
        }

        if self.options.with_forms && route.verb.is_mutation() {
            let form = call("FormDefinition");
            members.push(format!(
                "form: ({}) & {{ patch: {}; put: {}; delete: {} }}",
                form, form, form, form
            ));
        }

        if members.is_empty() {
            base
        } else {
            format!("({}) & {{ {} }}", base, members.join("; "))
        }
    }
}
