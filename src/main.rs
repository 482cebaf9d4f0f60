use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use cost_analysis::utils::logging::format_preview;
use cost_analysis::{AnalysisConfig, ExportFormat, export_tables, run_pipeline};
use log::info;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: cost-analysis <input.csv> [output_dir]");
    };
    let output_dir = args.next().map(PathBuf::from);

    let config = AnalysisConfig::from_env();
    let start = Instant::now();

    let outcome = run_pipeline(&input, &config)
        .with_context(|| format!("Analysis of {} failed", input.display()))?;

    outcome.report.log_summary();
    info!(
        "Costed cities (first 10):\n{}",
        format_preview(&outcome.tables.costed, 10)?
    );

    if std::env::var("COST_ANALYSIS_JSON").is_ok_and(|v| v == "1") {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    }

    if let Some(dir) = output_dir {
        let format = match std::env::var("COST_ANALYSIS_EXPORT_FORMAT") {
            Ok(name) => ExportFormat::from_name(&name)
                .with_context(|| format!("Unknown export format '{name}'"))?,
            Err(_) => ExportFormat::Csv,
        };
        export(&outcome.tables.named(), &dir, format)?;
    }

    info!("Completed in {:?}", start.elapsed());
    Ok(())
}

fn export(
    tables: &[(&str, &cost_analysis::Dataset)],
    dir: &Path,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let paths = export_tables(tables, dir, format)
        .with_context(|| format!("Export to {} failed", dir.display()))?;
    info!("Exported {} tables to {}", paths.len(), dir.display());
    Ok(())
}
