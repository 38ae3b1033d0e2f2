//! Core types shared by every generation phase

use crate::error::{GeneratorError, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name of the runtime module emitted in resource mode, relative to the output directory
pub const RESOURCE_RUNTIME_MODULE: &str = "lib/wayfinder";
/// Extension used for every resource-mode file
pub const RESOURCE_EXTENSION: &str = "ts";
/// Key used for a scope-grouped route that has no static path segment
pub const ROOT_RESOURCE_KEY: &str = "root";
/// Query parameter carrying the spoofed HTTP method of a form submission
pub const METHOD_OVERRIDE_PARAM: &str = "_method";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpVerb {
    /// Uppercase wire name (`GET`, `PATCH`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
        }
    }

    /// Lowercase name as used in generated JavaScript (`method: "get"`)
    pub fn js_name(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Patch => "patch",
            HttpVerb::Delete => "delete",
            HttpVerb::Head => "head",
            HttpVerb::Options => "options",
        }
    }

    /// POST, PUT, PATCH and DELETE change server state and get form helpers
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            HttpVerb::Post | HttpVerb::Put | HttpVerb::Patch | HttpVerb::Delete
        )
    }

    /// Parses a verb as printed by framework route dumps.
    ///
    /// Multi-verb strings (`GET|POST`) resolve to their first verb and the
    /// catch-all spellings (`*`, `ANY`, `MATCH`) resolve to GET.
    pub fn parse(raw: &str) -> Option<Self> {
        let first = raw.split('|').next().unwrap_or("").trim();
        match first.to_ascii_uppercase().as_str() {
            "GET" | "*" | "ANY" | "MATCH" => Some(HttpVerb::Get),
            "POST" => Some(HttpVerb::Post),
            "PUT" => Some(HttpVerb::Put),
            "PATCH" => Some(HttpVerb::Patch),
            "DELETE" => Some(HttpVerb::Delete),
            "HEAD" => Some(HttpVerb::Head),
            "OPTIONS" => Some(HttpVerb::Options),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Module format of the classic-mode output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Esm,
    Cjs,
    Umd,
    /// No module system: helpers are attached to a global namespace object
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputVariant {
    /// Helpers return URL strings
    Simple,
    /// Helpers return `{ url, method }` objects
    Rich,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// One monolithic helper file
    Classic,
    /// One file per resource plus runtime and barrels
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Resource,
    Scope,
    Controller,
}

macro_rules! option_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_names!(ModuleType { Esm => "esm", Cjs => "cjs", Umd => "umd", None => "none" });
option_names!(OutputVariant { Simple => "simple", Rich => "rich" });
option_names!(OutputStyle { Classic => "classic", Resource => "resource" });
option_names!(GroupBy { Resource => "resource", Scope => "scope", Controller => "controller" });

fn unknown_value(option: &str, value: &str, expected: &[&str]) -> GeneratorError {
    GeneratorError::config(format!(
        "Invalid {} '{}'. Expected one of: {}",
        option,
        value,
        expected.join(", ")
    ))
}

impl FromStr for ModuleType {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "esm" => Ok(ModuleType::Esm),
            "cjs" => Ok(ModuleType::Cjs),
            "umd" => Ok(ModuleType::Umd),
            "none" | "nil" | "global" | "" => Ok(ModuleType::None),
            _ => Err(unknown_value("module_type", s, &["esm", "cjs", "umd", "none"])),
        }
    }
}

impl FromStr for OutputVariant {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(OutputVariant::Simple),
            "rich" => Ok(OutputVariant::Rich),
            _ => Err(unknown_value("variant", s, &["simple", "rich"])),
        }
    }
}

impl FromStr for OutputStyle {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(OutputStyle::Classic),
            "resource" => Ok(OutputStyle::Resource),
            _ => Err(unknown_value("style", s, &["classic", "resource"])),
        }
    }
}

impl FromStr for GroupBy {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resource" => Ok(GroupBy::Resource),
            "scope" => Ok(GroupBy::Scope),
            "controller" => Ok(GroupBy::Controller),
            _ => Err(unknown_value("group_by", s, &["resource", "scope", "controller"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_parsing() {
        assert_eq!(HttpVerb::parse("get"), Some(HttpVerb::Get));
        assert_eq!(HttpVerb::parse("PATCH"), Some(HttpVerb::Patch));
        assert_eq!(HttpVerb::parse("GET|POST"), Some(HttpVerb::Get));
        assert_eq!(HttpVerb::parse("*"), Some(HttpVerb::Get));
        assert_eq!(HttpVerb::parse("CONNECT"), None);
        assert_eq!(HttpVerb::parse(""), None);
    }

    #[test]
    fn test_mutations() {
        assert!(HttpVerb::Post.is_mutation());
        assert!(HttpVerb::Delete.is_mutation());
        assert!(!HttpVerb::Get.is_mutation());
        assert!(!HttpVerb::Head.is_mutation());
    }

    #[test]
    fn test_enum_options_from_str() {
        assert_eq!("esm".parse::<ModuleType>().unwrap(), ModuleType::Esm);
        assert_eq!("none".parse::<ModuleType>().unwrap(), ModuleType::None);
        assert_eq!("Rich".parse::<OutputVariant>().unwrap(), OutputVariant::Rich);
        assert_eq!("resource".parse::<OutputStyle>().unwrap(), OutputStyle::Resource);
        assert_eq!("scope".parse::<GroupBy>().unwrap(), GroupBy::Scope);
    }

    #[test]
    fn test_option_names_round_trip() {
        for module in [ModuleType::Esm, ModuleType::Cjs, ModuleType::Umd, ModuleType::None] {
            assert_eq!(module.to_string().parse::<ModuleType>().unwrap(), module);
        }
        assert_eq!(GroupBy::Controller.to_string(), "controller");
    }

    #[test]
    fn test_invalid_enum_is_config_error() {
        match "amd".parse::<ModuleType>() {
            Err(GeneratorError::Config { message }) => {
                assert!(message.contains("module_type"));
                assert!(message.contains("amd"));
            }
            _ => panic!("Expected configuration error"),
        }
        assert!("fancy".parse::<OutputVariant>().is_err());
        assert!("flat".parse::<OutputStyle>().is_err());
        assert!("module".parse::<GroupBy>().is_err());
    }
}
