// FILE: src/cli/mod.rs

mod config;
mod handlers;

pub use config::ConfigFile;

use crate::error::Result;
use crate::types::{GroupBy, ModuleType, OutputStyle, OutputVariant};
use crate::GeneratorOptions;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Instant;

pub struct EnhancedCli {
    config: ConfigFile,
    start_time: Instant,
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        match matches.subcommand() {
            Some(("generate", sub_matches)) => handlers::handle_generate_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            Some(("inspect", sub_matches)) => handlers::handle_inspect_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Routegen Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.toml or .json)")
                    .global(true)
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .global(true)
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("generate")
                    .about("Generate route helpers from a route dump")
                    .args(generation_args())
                    .arg(Arg::new("stats").long("stats").help("Show detailed generation statistics").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Load and normalize routes, reporting skipped routes and name collisions")
                    .args(generation_args()),
            )
            .subcommand(
                Command::new("inspect")
                    .about("Print normalized routes (and resources in resource style) as JSON")
                    .args(generation_args())
                    .arg(Arg::new("inspect-output").long("inspect-output").value_name("FILE").help("Write the JSON to a file instead of stdout")),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    /// Defaults, then the config file, then command line flags
    pub fn build_generator_options(&self, matches: &ArgMatches) -> Result<GeneratorOptions> {
        let mut options = GeneratorOptions::default();
        self.config.apply_to(&mut options)?;
        apply_matches(&mut options, matches);
        options.validate()?;
        Ok(options)
    }
}

/// Flags shared by every subcommand that reads routes
fn generation_args() -> Vec<Arg> {
    vec![
        Arg::new("router").short('r').long("router").value_name("FILE").help("Route dump (JSON or route table); auto-detected when omitted"),
        Arg::new("output").short('o').long("output").value_name("FILE").help("Classic output file"),
        Arg::new("types-file").long("types-file").value_name("FILE").help("Type declarations file (default: output with .d.ts)"),
        Arg::new("module-type").short('m').long("module-type").value_parser(clap::value_parser!(ModuleType)).help("Module format of the classic output"),
        Arg::new("variant").long("variant").value_parser(clap::value_parser!(OutputVariant)).help("Helper output shape"),
        Arg::new("with-methods").long("with-methods").help("Add .url/.get/.head and verb variants to rich helpers").action(ArgAction::SetTrue),
        Arg::new("with-forms").long("with-forms").help("Add .form helpers to rich mutation helpers").action(ArgAction::SetTrue),
        Arg::new("include").short('i').long("include").value_name("REGEX").help("Only keep helpers matching this pattern (repeatable)").action(ArgAction::Append),
        Arg::new("exclude").short('e').long("exclude").value_name("REGEX").help("Drop helpers matching this pattern (repeatable)").action(ArgAction::Append),
        Arg::new("camel-case").long("camel-case").help("camelCase helper names").action(ArgAction::SetTrue),
        Arg::new("compact").long("compact").help("Drop the _path suffix").action(ArgAction::SetTrue),
        Arg::new("url-helpers").long("url-helpers").help("Also generate absolute _url helpers").action(ArgAction::SetTrue),
        Arg::new("no-documentation").long("no-documentation").help("Skip JSDoc comments").action(ArgAction::SetTrue),
        Arg::new("style").short('s').long("style").value_parser(clap::value_parser!(OutputStyle)).help("Single file (classic) or one file per resource"),
        Arg::new("output-dir").long("output-dir").value_name("DIR").help("Resource style output directory"),
        Arg::new("group-by").long("group-by").value_parser(clap::value_parser!(GroupBy)).help("Resource grouping strategy"),
        Arg::new("no-index").long("no-index").help("Skip index barrels in resource style").action(ArgAction::SetTrue),
        Arg::new("no-live").long("no-live").help("Skip LiveView routes").action(ArgAction::SetTrue),
        Arg::new("namespace").long("namespace").value_name("NAME").help("Global object name for umd/none output"),
        Arg::new("debug").short('d').long("debug").help("Enable debug logging for every phase").action(ArgAction::SetTrue),
    ]
}

fn apply_matches(options: &mut GeneratorOptions, matches: &ArgMatches) {
    if let Some(router) = matches.get_one::<String>("router") {
        options.router = Some(PathBuf::from(router));
    }
    if let Some(output) = matches.get_one::<String>("output") {
        options.output_file = output.clone();
    }
    if let Some(types_file) = matches.get_one::<String>("types-file") {
        options.types_file = Some(types_file.clone());
    }
    if let Some(module_type) = matches.get_one::<ModuleType>("module-type") {
        options.module_type = *module_type;
    }
    if let Some(variant) = matches.get_one::<OutputVariant>("variant") {
        options.variant = *variant;
    }
    if let Some(style) = matches.get_one::<OutputStyle>("style") {
        options.style = *style;
    }
    if let Some(group_by) = matches.get_one::<GroupBy>("group-by") {
        options.group_by = *group_by;
    }
    if let Some(output_dir) = matches.get_one::<String>("output-dir") {
        options.output_dir = output_dir.clone();
    }
    if let Some(namespace) = matches.get_one::<String>("namespace") {
        options.namespace = namespace.clone();
    }
    if let Some(include) = matches.get_many::<String>("include") {
        options.include = include.cloned().collect();
    }
    if let Some(exclude) = matches.get_many::<String>("exclude") {
        options.exclude = exclude.cloned().collect();
    }

    options.with_methods |= matches.get_flag("with-methods");
    options.with_forms |= matches.get_flag("with-forms");
    options.camel_case |= matches.get_flag("camel-case");
    options.compact |= matches.get_flag("compact");
    options.url_helpers |= matches.get_flag("url-helpers");
    options.debug_mode |= matches.get_flag("debug");

    if matches.get_flag("no-documentation") {
        options.documentation = false;
    }
    if matches.get_flag("no-index") {
        options.include_index = false;
    }
    if matches.get_flag("no-live") {
        options.include_live = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<GeneratorOptions> {
        let cli = EnhancedCli::new();
        let matches = cli.build_cli().get_matches_from(args);
        let (_, sub_matches) = matches.subcommand().unwrap();
        cli.build_generator_options(sub_matches)
    }

    #[test]
    fn test_defaults_without_flags() {
        let options = parse(&["routegen", "generate"]).unwrap();
        assert_eq!(options.module_type, ModuleType::Esm);
        assert!(options.documentation);
        assert!(options.router.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let options = parse(&[
            "routegen", "generate", "--router", "routes.txt", "--module-type", "cjs", "--variant", "rich",
            "--with-methods", "--with-forms", "-i", "^admin_", "-i", "^api_", "--camel-case", "--no-documentation",
            "--style", "resource", "--group-by", "scope", "--no-index", "--no-live",
        ])
        .unwrap();
        assert_eq!(options.router, Some(PathBuf::from("routes.txt")));
        assert_eq!(options.module_type, ModuleType::Cjs);
        assert_eq!(options.variant, OutputVariant::Rich);
        assert!(options.with_methods && options.with_forms && options.camel_case);
        assert_eq!(options.include, vec!["^admin_", "^api_"]);
        assert!(!options.documentation);
        assert_eq!(options.style, OutputStyle::Resource);
        assert_eq!(options.group_by, GroupBy::Scope);
        assert!(!options.include_index && !options.include_live);
    }

    #[test]
    fn test_invalid_pattern_flag() {
        assert!(parse(&["routegen", "check", "--exclude", "("]).is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut cli = EnhancedCli::new();
        cli.config.module_type = Some("umd".to_string());
        cli.config.namespace = Some("AppRoutes".to_string());
        cli.config.url_helpers = Some(true);
        let matches = cli.build_cli().get_matches_from(["routegen", "generate", "--module-type", "esm"]);
        let (_, sub_matches) = matches.subcommand().unwrap();
        let options = cli.build_generator_options(sub_matches).unwrap();
        assert_eq!(options.module_type, ModuleType::Esm);
        assert_eq!(options.namespace, "AppRoutes");
        assert!(options.url_helpers);
    }
}
