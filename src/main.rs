// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use std::env;
use tracing_subscriber::EnvFilter;

use oldest_businesses::{
    export_all, run, Charts, DataQualityEngine, Dataset, PipelineConfig, PipelineOutput,
};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the run summary and JSON reports
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = PipelineConfig::from_env()?;

    tracing::debug!(?config, "configuration");

    match args.get(1).map(String::as_str) {
        None | Some("run") => {
            let output = run_export(&config)?;
            run_charts(&output, &config)?;
        }
        Some("export") => {
            run_export(&config)?;
        }
        Some("charts") => {
            let dataset = Dataset::load(&config)?;
            run_charts(&run(&dataset), &config)?;
        }
        Some("quality") => run_quality(&config)?,
        Some(other) => bail!(
            "Unknown command '{}' (expected: run, export, charts, quality)",
            other
        ),
    }

    Ok(())
}

fn run_export(config: &PipelineConfig) -> Result<PipelineOutput> {
    println!("🏢 Oldest Businesses v{}", oldest_businesses::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load inputs (any failure aborts before writing)
    println!("\n📂 Loading data from {}...", config.data_dir.display());
    let dataset = Dataset::load(config)?;
    println!(
        "✓ {} businesses, {} new businesses, {} countries, {} categories",
        dataset.businesses.len(),
        dataset.new_businesses.len(),
        dataset.countries.len(),
        dataset.categories.len()
    );

    // 2. Surface rows the inner joins will drop
    let report = DataQualityEngine::new(config.reference_year).check(&dataset);
    report.log();
    println!("✓ {}", report.summary());

    // 3. Compute
    println!("\n🔗 Joining and aggregating...");
    let output = run(&dataset);
    println!(
        "✓ {} oldest businesses, {} continents with missing countries ({} countries), {} continent/category pairs",
        output.oldest_business_continent.len(),
        output.count_missing.len(),
        output.total_missing(),
        output.oldest_by_continent_category.len()
    );

    // 4. Export
    println!("\n💾 Writing results to {}...", config.output_dir.display());
    for file in export_all(&output, config)? {
        println!(
            "✓ {} ({} rows, sha256 {})",
            file.path.display(),
            file.rows,
            &file.sha256[..12]
        );
    }

    Ok(output)
}

fn run_quality(config: &PipelineConfig) -> Result<()> {
    let dataset = Dataset::load(config)?;
    let report = DataQualityEngine::new(config.reference_year).check(&dataset);
    println!("{}", report.to_json()?);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_charts(output: &PipelineOutput, config: &PipelineConfig) -> Result<()> {
    let charts = Charts::build(&output.oldest_by_continent_category, config.reference_year);

    println!("\n📈 Starting charts... (Press 'q' to quit)\n");

    let mut app = ui::App::new(charts);
    ui::run_ui(&mut app)?;

    println!("✅ Charts closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_charts(output: &PipelineOutput, config: &PipelineConfig) -> Result<()> {
    let charts = Charts::build(&output.oldest_by_continent_category, config.reference_year);

    eprintln!("❌ Chart display not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!(
        "   ({} continents, {} categories computed)",
        charts.pie.slices.len(),
        charts.line.categories.len()
    );

    Ok(())
}
