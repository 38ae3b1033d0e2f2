//! Routegen - Route Helper Compiler
//!
//! Compiles a web framework's route table into JavaScript/TypeScript helpers
//! that build URLs (and optionally HTTP method and form metadata) on the
//! client.
//!
//! # Basic Usage
//!
//! ```rust
//! use routegen::{generate, GeneratorOptions, RawRoute, Result};
//!
//! fn main() -> Result<()> {
//!     let routes = vec![RawRoute::new("user", "GET", "/users/:id", "show")];
//!     let generation = generate(&routes, &GeneratorOptions::default())?;
//!     assert!(generation.files[0].contents.contains("user_path"));
//!     Ok(())
//! }
//! ```
//!
//! # Generation Pipeline
//!
//! 1. **Extraction**: route records are filtered, parsed into segments and
//!    given unique helper names
//! 2. **Classic style**: segments are serialized and emitted as one helper
//!    file plus a `.d.ts` companion
//! 3. **Resource style**: routes are grouped into resources and emitted as
//!    one TypeScript module per resource, a shared runtime and barrels

pub mod cli;
pub mod codegen;
pub mod error;
pub mod extractor;
pub mod resource;
pub mod resource_codegen;
pub mod route;
pub mod router;
pub mod runtime;
pub mod segment;
pub mod serializer;
pub mod typegen;
pub mod types;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

// Re-export commonly used types and functions
pub use cli::EnhancedCli;
pub use codegen::CodeGenerator;
pub use error::{GeneratorError, Result};
pub use extractor::{extract_routes, Extraction, RouteFilter};
pub use resource::{group_resources, infer_action_name, Action, ActionTag, Resource};
pub use resource_codegen::ResourceCodeGenerator;
pub use route::{NamingOptions, Route};
pub use router::{load_routes, resolve_router, MappedRoute, RawRoute, RouteRecord, TableRoute};
pub use segment::{parse_path, Segment};
pub use serializer::{serialize, SerializedNode};
pub use typegen::TypeGenerator;
pub use types::*;

/// Generator version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Origin used by absolute (`_url`) helpers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultUrlOptions {
    #[serde(default, alias = "scheme", skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Generation options and settings
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Module format of the classic output file
    pub module_type: ModuleType,

    /// Classic output file
    pub output_file: String,

    /// Type declarations file; derived from `output_file` when unset
    pub types_file: Option<String>,

    /// Regex patterns a helper name must match (any of)
    pub include: Vec<String>,

    /// Regex patterns that drop a helper name
    pub exclude: Vec<String>,

    pub camel_case: bool,

    /// Also emit absolute `_url` helpers
    pub url_helpers: bool,

    /// Drop the `_path` suffix from helper names
    pub compact: bool,

    pub default_url_options: DefaultUrlOptions,

    /// Emit JSDoc blocks
    pub documentation: bool,

    /// Route dump to read; auto-detected when unset
    pub router: Option<PathBuf>,

    pub variant: OutputVariant,
    pub with_methods: bool,
    pub with_forms: bool,
    pub style: OutputStyle,

    /// Root of the resource-mode file tree
    pub output_dir: String,

    pub group_by: GroupBy,

    /// Emit `index.ts` barrels in resource mode
    pub include_index: bool,

    /// Keep LiveView routes
    pub include_live: bool,

    /// Global object name for UMD and `none` module output
    pub namespace: String,

    /// Enable debug logging for every phase
    pub debug_mode: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            module_type: ModuleType::Esm,
            output_file: "app/javascript/routes.js".to_string(),
            types_file: None,
            include: Vec::new(),
            exclude: Vec::new(),
            camel_case: false,
            url_helpers: false,
            compact: false,
            default_url_options: DefaultUrlOptions::default(),
            documentation: true,
            router: None,
            variant: OutputVariant::Simple,
            with_methods: false,
            with_forms: false,
            style: OutputStyle::Classic,
            output_dir: "assets/js/routes".to_string(),
            group_by: GroupBy::Resource,
            include_index: true,
            include_live: true,
            namespace: "Routes".to_string(),
            debug_mode: false,
        }
    }
}

impl GeneratorOptions {
    pub fn naming(&self) -> NamingOptions {
        NamingOptions {
            camel_case: self.camel_case,
            compact: self.compact,
        }
    }

    /// `types_file`, or `output_file` with its extension swapped for `.d.ts`
    pub fn types_path(&self) -> PathBuf {
        match &self.types_file {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.output_file).with_extension("d.ts"),
        }
    }

    /// Reject option combinations that cannot produce output
    pub fn validate(&self) -> Result<()> {
        RouteFilter::new(&self.include, &self.exclude)?;

        if !utils::is_valid_identifier(&self.namespace) {
            return Err(GeneratorError::config(format!(
                "Invalid namespace '{}': must be a JavaScript identifier",
                self.namespace
            )));
        }

        match self.style {
            OutputStyle::Classic if self.output_file.trim().is_empty() => {
                Err(GeneratorError::config("output_file must not be empty"))
            }
            OutputStyle::Resource if self.output_dir.trim().is_empty() => {
                Err(GeneratorError::config("output_dir must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

/// One output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: PathBuf, contents: String) -> Self {
        Self { path, contents }
    }
}

/// Generation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Helpers generated (one per normalized route)
    pub route_count: usize,

    /// Route records dropped during extraction
    pub skipped_count: usize,

    /// Resources emitted (resource style only)
    pub resource_count: usize,

    /// Files produced
    pub file_count: usize,

    /// Total size of all produced files in bytes
    pub output_bytes: u64,

    /// Generation time in milliseconds
    pub generate_time_ms: u64,
}

/// Result of an in-memory generation run
#[derive(Debug, Clone)]
pub struct Generation {
    pub files: Vec<GeneratedFile>,
    pub routes: Vec<Route>,
    pub resources: Vec<Resource>,
    pub stats: GenerationStats,
}

/// Summary of a run written to disk, handed to the post-generation hook
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub router: PathBuf,
    pub files: Vec<PathBuf>,
    pub stats: GenerationStats,
}

/// Callbacks the host application registers around a generation run
#[derive(Default)]
pub struct GenerationHooks {
    on_generated: Option<Box<dyn Fn(&GenerationReport)>>,
}

impl GenerationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` after every file of a successful run has been written
    pub fn on_generated(mut self, hook: impl Fn(&GenerationReport) + 'static) -> Self {
        self.on_generated = Some(Box::new(hook));
        self
    }

    fn fire(&self, report: &GenerationReport) {
        if let Some(hook) = &self.on_generated {
            hook(report);
        }
    }
}

/// Generate every output file in memory
pub fn generate<R: RouteRecord>(records: &[R], options: &GeneratorOptions) -> Result<Generation> {
    let start_time = Instant::now();
    options.validate()?;

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::debug!("Generator options: {:?}", options);
        log::debug!("Phase 1: Extracting {} route records...", records.len());
    }

    let extraction = extract_routes(records, options)?;
    let mut stats = GenerationStats {
        route_count: extraction.routes.len(),
        skipped_count: extraction.skipped,
        ..GenerationStats::default()
    };

    let mut resources = Vec::new();
    let files = match options.style {
        OutputStyle::Classic => {
            if options.debug_mode {
                log::debug!("Phase 2: Emitting classic helpers...");
            }
            let code = CodeGenerator::new(options).generate(&extraction.routes)?;
            let types = TypeGenerator::new(options).generate(&extraction.routes)?;
            vec![
                GeneratedFile::new(PathBuf::from(&options.output_file), code),
                GeneratedFile::new(options.types_path(), types),
            ]
        }
        OutputStyle::Resource => {
            if options.debug_mode {
                log::debug!("Phase 2: Grouping routes by {}...", options.group_by);
            }
            resources = group_resources(&extraction.routes, options.group_by);
            stats.resource_count = resources.len();
            if options.debug_mode {
                log::debug!("Phase 3: Emitting {} resources...", resources.len());
            }
            ResourceCodeGenerator::new(options).generate(&resources)?
        }
    };

    stats.file_count = files.len();
    stats.output_bytes = files.iter().map(|f| f.contents.len() as u64).sum();
    stats.generate_time_ms = start_time.elapsed().as_millis() as u64;

    if options.debug_mode {
        log::debug!("Generation complete: {:?}", stats);
    }

    Ok(Generation {
        files,
        routes: extraction.routes,
        resources,
        stats,
    })
}

/// Write files, creating parent directories. Each file is written in one call.
pub fn write_files(files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&file.path, &file.contents)?;
        log::debug!("Wrote {} ({} bytes)", file.path.display(), file.contents.len());
    }
    Ok(())
}

/// Resolve the router, generate, write every file and fire the hooks
pub fn generate_to_disk(options: &GeneratorOptions, hooks: &GenerationHooks) -> Result<GenerationReport> {
    let router = resolve_router(options.router.as_deref(), Path::new("."))?;
    let records = load_routes(&router)?;
    let generation = generate(&records, options)?;

    write_files(&generation.files)?;

    let report = GenerationReport {
        router,
        files: generation.files.iter().map(|f| f.path.clone()).collect(),
        stats: generation.stats,
    };
    hooks.fire(&report);

    Ok(report)
}
