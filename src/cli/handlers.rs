// FILE: src/cli/handlers.rs
use crate::{
    extract_routes, generate, generate_to_disk, group_resources, load_routes, resolve_router,
    GenerationHooks, GenerationStats, GeneratorError, OutputStyle, Result,
};

use serde::Serialize;
use std::fs;
use std::path::Path;

// --- GENERATE ---
pub fn handle_generate_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let options = cli.build_generator_options(matches)?;
    let hooks = GenerationHooks::new().on_generated(|report| {
        log::debug!("Post-generation hook: {} files from {}", report.files.len(), report.router.display());
    });

    println!("🔨 Generating {} route helpers...", options.style);
    let report = generate_to_disk(&options, &hooks)?;

    println!("✅ Generation successful!");
    println!("   Router: {}", report.router.display());
    for file in &report.files {
        println!("   {}", file.display());
    }
    println!("   Routes: {}", report.stats.route_count);
    println!("   Time: {}ms", cli.elapsed_ms());

    if matches.get_flag("stats") {
        print_detailed_stats(&report.stats);
    }

    Ok(())
}

// --- CHECK ---
pub fn handle_check_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let options = cli.build_generator_options(matches)?;
    let router = resolve_router(options.router.as_deref(), Path::new("."))?;
    println!("🔍 Checking {}", router.display());

    let records = load_routes(&router)?;
    match extract_routes(&records, &options) {
        Ok(extraction) => {
            println!("✅ {} - No issues found", router.display());
            println!("\n📊 Check Summary:");
            println!("   Route records: {}", records.len());
            println!("   Helpers: {}", extraction.routes.len());
            println!("   Skipped: {}", extraction.skipped);
            if options.style == OutputStyle::Resource {
                let resources = group_resources(&extraction.routes, options.group_by);
                println!("   Resources: {}", resources.len());
            }
            Ok(())
        }
        Err(e @ GeneratorError::NameCollision { .. }) => {
            println!("❌ {} - {}", router.display(), e);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

// --- INSPECT ---
#[derive(Serialize)]
struct Inspection<'a> {
    routes: &'a [crate::Route],
    resources: &'a [crate::Resource],
    stats: &'a GenerationStats,
}

pub fn handle_inspect_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let options = cli.build_generator_options(matches)?;
    let router = resolve_router(options.router.as_deref(), Path::new("."))?;
    let records = load_routes(&router)?;
    let generation = generate(&records, &options)?;

    let inspection = Inspection {
        routes: &generation.routes,
        resources: &generation.resources,
        stats: &generation.stats,
    };
    let json = serde_json::to_string_pretty(&inspection)?;

    if let Some(output_file) = matches.get_one::<String>("inspect-output") {
        fs::write(output_file, &json)?;
        println!("✅ Inspection saved to {}", output_file);
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_detailed_stats(stats: &GenerationStats) {
    println!("\n📊 Detailed Generation Statistics:");
    println!("   Helpers: {}", stats.route_count);
    println!("   Skipped records: {}", stats.skipped_count);
    if stats.resource_count > 0 {
        println!("   Resources: {}", stats.resource_count);
    }
    println!("   Files: {}", stats.file_count);
    println!("   Output size: {} bytes", stats.output_bytes);
    println!("   Generation time: {}ms", stats.generate_time_ms);
}
