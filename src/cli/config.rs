// FILE: src/cli/config.rs

use crate::error::{GeneratorError, Result};
use crate::{DefaultUrlOptions, GeneratorOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub module_type: Option<String>,
    pub output_file: Option<String>,
    pub types_file: Option<String>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub camel_case: Option<bool>,
    pub url_helpers: Option<bool>,
    pub compact: Option<bool>,
    pub default_url_options: Option<DefaultUrlOptions>,
    pub documentation: Option<bool>,
    pub router: Option<String>,
    pub variant: Option<String>,
    pub with_methods: Option<bool>,
    pub with_forms: Option<bool>,
    pub style: Option<String>,
    pub output_dir: Option<String>,
    pub group_by: Option<String>,
    pub include_index: Option<bool>,
    pub include_live: Option<bool>,
    pub namespace: Option<String>,
    pub debug_mode: Option<bool>,
}

impl ConfigFile {
    /// Overlay every value present in the file onto `options`
    pub fn apply_to(&self, options: &mut GeneratorOptions) -> Result<()> {
        if let Some(module_type) = &self.module_type {
            options.module_type = module_type.parse()?;
        }
        if let Some(variant) = &self.variant {
            options.variant = variant.parse()?;
        }
        if let Some(style) = &self.style {
            options.style = style.parse()?;
        }
        if let Some(group_by) = &self.group_by {
            options.group_by = group_by.parse()?;
        }

        if let Some(output_file) = &self.output_file {
            options.output_file = output_file.clone();
        }
        if self.types_file.is_some() {
            options.types_file = self.types_file.clone();
        }
        if let Some(router) = &self.router {
            options.router = Some(PathBuf::from(router));
        }
        if let Some(output_dir) = &self.output_dir {
            options.output_dir = output_dir.clone();
        }
        if let Some(namespace) = &self.namespace {
            options.namespace = namespace.clone();
        }
        if let Some(include) = &self.include {
            options.include = include.clone();
        }
        if let Some(exclude) = &self.exclude {
            options.exclude = exclude.clone();
        }
        if let Some(default_url_options) = &self.default_url_options {
            options.default_url_options = default_url_options.clone();
        }

        let flags = [
            (self.camel_case, &mut options.camel_case),
            (self.url_helpers, &mut options.url_helpers),
            (self.compact, &mut options.compact),
            (self.documentation, &mut options.documentation),
            (self.with_methods, &mut options.with_methods),
            (self.with_forms, &mut options.with_forms),
            (self.include_index, &mut options.include_index),
            (self.include_live, &mut options.include_live),
            (self.debug_mode, &mut options.debug_mode),
        ];
        for (value, target) in flags {
            if let Some(value) = value {
                *target = value;
            }
        }

        Ok(())
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| GeneratorError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(GeneratorError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}
