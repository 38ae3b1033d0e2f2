//! JavaScript and TypeScript runtime sources embedded in generated output
//!
//! Classic files embed the evaluator inline; resource mode writes
//! [`resource_runtime`] to `lib/wayfinder.ts` once and every resource file
//! imports `route` from it. Path normalization in all runtimes matches
//! [`crate::serializer::evaluate`]: repeated slashes collapse, the trailing
//! slash is dropped unless `trailing_slash` is set, an empty path is `/`.

use crate::types::METHOD_OVERRIDE_PARAM;
use crate::utils::js_string;

/// Helpers shared by the simple and rich classic runtimes
pub const SHARED_HELPERS: &str = r##"function __isObject(value) {
  return value !== null && typeof value === "object" && !Array.isArray(value);
}

function __present(value) {
  return value !== undefined && value !== null && value !== "";
}

function __toParam(value) {
  if (__isObject(value) && "id" in value) return value.id;
  return value;
}

function __encodeQuery(prefix, value, pairs) {
  if (value === undefined || value === null) return;
  if (Array.isArray(value)) {
    value.forEach((item) => __encodeQuery(prefix + "[]", item, pairs));
    return;
  }
  if (__isObject(value)) {
    Object.keys(value).forEach((key) => __encodeQuery(prefix + "[" + encodeURIComponent(key) + "]", value[key], pairs));
    return;
  }
  pairs.push(prefix + "=" + encodeURIComponent(String(value)));
}

function __origin(options) {
  const protocol = String(options.protocol || __defaultUrlOptions.protocol || "http").replace(/:?\/*$/, "");
  const host = options.host || __defaultUrlOptions.host || (typeof window !== "undefined" ? window.location.host : "");
  const port = options.port || __defaultUrlOptions.port;
  if (!host) return "";
  return protocol + "://" + host + (port ? ":" + port : "");
}

function __finish(path, query, options, absolute) {
  let url = ("/" + path).replace(/\/{2,}/g, "/");
  if (options.trailing_slash) {
    if (!url.endsWith("/")) url += "/";
  } else if (url.length > 1 && url.endsWith("/")) {
    url = url.slice(0, -1);
  }
  const pairs = [];
  Object.keys(query).forEach((key) => __encodeQuery(encodeURIComponent(key), query[key], pairs));
  if (pairs.length > 0) url += "?" + pairs.join("&");
  if (__present(options.anchor)) url += "#" + options.anchor;
  return absolute ? __origin(options) + url : url;
}

function __encodeValue(kind, value) {
  const text = String(__toParam(value));
  return kind === "glob" || kind === "*"
    ? text.split("/").map(encodeURIComponent).join("/")
    : encodeURIComponent(text);
}
"##;

/// Tree evaluator behind every simple-variant helper
pub const SIMPLE_RUNTIME: &str = r##"const __reservedOptions = ["anchor", "trailing_slash", "host", "protocol", "port"];

function __build(parts, meta, params, optional) {
  let result = "";
  for (const part of parts) {
    if (typeof part === "string") {
      result += part;
      continue;
    }
    const [kind, name] = part;
    if (kind === "optional") {
      const nested = __build(name, meta, params, true);
      if (nested !== null) result += nested;
      continue;
    }
    const value = params[name];
    if (!__present(value)) {
      if (optional) return null;
      throw new Error("Route parameter missing: " + name);
    }
    const spec = meta[name] || {};
    if (optional && spec.default !== undefined && String(__toParam(value)) === String(spec.default)) {
      return null;
    }
    result += __encodeValue(kind, value);
  }
  return result;
}

function __route(meta, parts, absolute) {
  const required = Object.keys(meta).filter((name) => meta[name].required);
  return function (...args) {
    let options = {};
    let named = null;
    if (args.length === required.length + 1 && __isObject(args[args.length - 1])) {
      options = args.pop();
    } else if (args.length === 1 && required.length > 0 && __isObject(args[0]) && required.every((name) => name in args[0])) {
      // a named-params object (or a model carrying `id`): only route params and `query` are read
      named = args.pop();
      options = named;
    }
    const params = {};
    required.forEach((name, index) => {
      if (index < args.length) params[name] = args[index];
    });
    const query = {};
    if (named !== null) {
      Object.keys(meta).forEach((name) => {
        if (name in named) params[name] = named[name];
      });
      if (__isObject(named.query)) Object.assign(query, named.query);
    } else {
      Object.keys(options).forEach((key) => {
        if (__reservedOptions.includes(key)) return;
        if (key === "query" && __isObject(options.query)) Object.assign(query, options.query);
        else if (key in meta) params[key] = options[key];
        else query[key] = options[key];
      });
    }
    return __finish(__build(parts, meta, params, false) || "", query, options, absolute);
  };
}
"##;

/// `_buildUrl`, the pattern-substitution builder behind rich helpers
pub const RICH_RUNTIME: &str = r##"function __params(required, args) {
  if (args === undefined || args === null) return {};
  if (Array.isArray(args)) {
    const params = {};
    required.forEach((name, index) => {
      if (index < args.length) params[name] = args[index];
    });
    return params;
  }
  if (__isObject(args) && (required.length === 0 || required.some((name) => name in args))) return args;
  return required.length > 0 ? { [required[0]]: args } : {};
}

function _buildUrl(pattern, params = {}, options = {}) {
  const lookup = (name) => (name in params ? params[name] : options[name]);
  const group = /\(([^()]*)\)/;
  let path = pattern;
  let match;
  while ((match = group.exec(path)) !== null) {
    const names = (match[1].match(/[:*][A-Za-z0-9_]+/g) || []).map((token) => token.slice(1));
    const keep = names.every((name) => __present(lookup(name)));
    path = path.slice(0, match.index) + (keep ? match[1] : "") + path.slice(match.index + match[0].length);
  }
  path = path.replace(/([:*])([A-Za-z0-9_]+)/g, (token, kind, name) => {
    const value = lookup(name);
    if (!__present(value)) throw new Error("Route parameter missing: " + name);
    return __encodeValue(kind, value);
  });
  return __finish(path, options.query || {}, options, Boolean(options.absolute));
}
"##;

const FORM_RUNTIME: &str = r##"function _buildFormAction(pattern, params, method, options = {}) {
  const verb = String(method || "get").toLowerCase();
  if (verb === "get" || verb === "post") {
    return { action: _buildUrl(pattern, params, options), method: verb };
  }
  const query = Object.assign({}, options.query, { [__methodParam]: verb.toUpperCase() });
  return { action: _buildUrl(pattern, params, Object.assign({}, options, { query })), method: "post" };
}
"##;

const RESOURCE_CORE: &str = r##"export type Method = "get" | "post" | "put" | "patch" | "delete" | "head";

// a parameter value, or any object carrying an `id`
export type Param = string | number | { id: string | number };

export type RouteOptions = {
  query?: Record<string, unknown>;
  anchor?: string;
  trailing_slash?: boolean;
};

export type RouteDefinition<M extends Method = Method> = {
  url: string;
  method: M;
};

export type CallArgs<P> = {} extends P
  ? [args?: P, options?: RouteOptions]
  : [args: P | Param, options?: RouteOptions];

const TOKEN = /[:*][A-Za-z0-9_]+/g;
const GROUP = /\(([^()]*)\)/;

const isObject = (value: unknown): value is Record<string, unknown> =>
  value !== null && typeof value === "object" && !Array.isArray(value);

const present = (value: unknown): boolean =>
  value !== undefined && value !== null && value !== "";

const toParam = (value: unknown): string =>
  String(isObject(value) && "id" in value ? value.id : value);

function requiredNames(pattern: string): string[] {
  let stripped = pattern;
  while (GROUP.test(stripped)) stripped = stripped.replace(GROUP, "");
  return (stripped.match(TOKEN) ?? []).map((token) => token.slice(1));
}

function normalize(pattern: string, args: unknown): Record<string, unknown> {
  if (args === undefined || args === null) return {};
  const names = (pattern.match(TOKEN) ?? []).map((token) => token.slice(1));
  if (isObject(args) && names.some((name) => name in args)) return args;
  const required = requiredNames(pattern);
  return required.length > 0 ? { [required[0]]: args } : {};
}

function encodeQuery(prefix: string, value: unknown, pairs: string[]): void {
  if (value === undefined || value === null) return;
  if (Array.isArray(value)) {
    value.forEach((item) => encodeQuery(`${prefix}[]`, item, pairs));
    return;
  }
  if (isObject(value)) {
    Object.keys(value).forEach((key) => encodeQuery(`${prefix}[${encodeURIComponent(key)}]`, value[key], pairs));
    return;
  }
  pairs.push(`${prefix}=${encodeURIComponent(String(value))}`);
}

export function buildUrl(pattern: string, params: Record<string, unknown>, options: RouteOptions = {}): string {
  let path = pattern;
  let match: RegExpExecArray | null;
  while ((match = GROUP.exec(path)) !== null) {
    const names = (match[1].match(TOKEN) ?? []).map((token) => token.slice(1));
    const keep = names.every((name) => present(params[name]));
    path = path.slice(0, match.index) + (keep ? match[1] : "") + path.slice(match.index + match[0].length);
  }
  path = path.replace(/([:*])([A-Za-z0-9_]+)/g, (_token, kind: string, name: string) => {
    const value = params[name];
    if (!present(value)) throw new Error(`Route parameter missing: ${name}`);
    const text = toParam(value);
    return kind === "*" ? text.split("/").map(encodeURIComponent).join("/") : encodeURIComponent(text);
  });

  let url = `/${path}`.replace(/\/{2,}/g, "/");
  if (options.trailing_slash) {
    if (!url.endsWith("/")) url += "/";
  } else if (url.length > 1 && url.endsWith("/")) {
    url = url.slice(0, -1);
  }
  const pairs: string[] = [];
  Object.keys(options.query ?? {}).forEach((key) => encodeQuery(encodeURIComponent(key), options.query?.[key], pairs));
  if (pairs.length > 0) url += `?${pairs.join("&")}`;
  if (present(options.anchor)) url += `#${options.anchor}`;
  return url;
}
"##;

const RESOURCE_FORMS: &str = r##"
export type FormDefinition = {
  action: string;
  method: "get" | "post";
};

export function buildFormAction(
  pattern: string,
  params: Record<string, unknown>,
  method: Method,
  options: RouteOptions = {},
): FormDefinition {
  if (method === "get" || method === "post") {
    return { action: buildUrl(pattern, params, options), method };
  }
  const query = { ...options.query, [METHOD_PARAM]: method.toUpperCase() };
  return { action: buildUrl(pattern, params, { ...options, query }), method: "post" };
}
"##;

const RESOURCE_FACTORY: &str = r##"
export function route<P extends object = {}>(pattern: string, method: Method) {
  const url = (...[args, options]: CallArgs<P>): string => buildUrl(pattern, normalize(pattern, args), options);
  const as =
    <M extends Method>(verb: M) =>
    (...call: CallArgs<P>): RouteDefinition<M> => ({ url: url(...call), method: verb });

  return Object.assign((...call: CallArgs<P>): RouteDefinition => ({ url: url(...call), method }), {
    url,
    get: as("get"),
    post: as("post"),
    put: as("put"),
    patch: as("patch"),
    delete: as("delete"),
    head: as("head"),
  });
}
"##;

const RESOURCE_FACTORY_WITH_FORMS: &str = r##"
export function route<P extends object = {}>(pattern: string, method: Method) {
  const url = (...[args, options]: CallArgs<P>): string => buildUrl(pattern, normalize(pattern, args), options);
  const as =
    <M extends Method>(verb: M) =>
    (...call: CallArgs<P>): RouteDefinition<M> => ({ url: url(...call), method: verb });
  const formAs =
    (verb: Method) =>
    (...[args, options]: CallArgs<P>): FormDefinition =>
      buildFormAction(pattern, normalize(pattern, args), verb, options);

  const form = Object.assign(formAs(method), {
    get: formAs("get"),
    post: formAs("post"),
    put: formAs("put"),
    patch: formAs("patch"),
    delete: formAs("delete"),
  });

  return Object.assign((...call: CallArgs<P>): RouteDefinition => ({ url: url(...call), method }), {
    url,
    get: as("get"),
    post: as("post"),
    put: as("put"),
    patch: as("patch"),
    delete: as("delete"),
    head: as("head"),
    form,
  });
}
"##;

/// `_buildFormAction`, emitted only when form helpers are enabled
pub fn form_runtime() -> String {
    format!(
        "const __methodParam = {};\n\n{}",
        js_string(METHOD_OVERRIDE_PARAM),
        FORM_RUNTIME
    )
}

/// Contents of `lib/wayfinder.ts`
pub fn resource_runtime(with_forms: bool) -> String {
    let mut source = String::from(RESOURCE_CORE);
    if with_forms {
        source.push_str(&format!("\nconst METHOD_PARAM = {};\n", js_string(METHOD_OVERRIDE_PARAM)));
        source.push_str(RESOURCE_FORMS);
        source.push_str(RESOURCE_FACTORY_WITH_FORMS);
    } else {
        source.push_str(RESOURCE_FACTORY);
    }
    source
}
