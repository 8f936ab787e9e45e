use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mspconvert::aggregate::GroupingMode;
use mspconvert::converter::LibraryConverter;
use mspconvert::msp::destination_notice;

use super::config::Config;

/// Convert a transition table to an MSP spectral library
pub fn run(
    input: PathBuf,
    output: PathBuf,
    keep_decoys: bool,
    grouping: Option<GroupingMode>,
    config_path: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    // Validate input file exists
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let file_config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let config = file_config.conversion.resolve(keep_decoys, grouping);

    info!("assay2msp - Assay library to MSP");
    info!("================================");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Remove decoys: {}", config.remove_decoys);
    info!("Grouping: {:?}", config.grouping);

    let stats = LibraryConverter::with_config(config)
        .convert(&input, &output)
        .context("Conversion failed")?;

    info!("Conversion complete!");
    info!("  Transitions read: {}", stats.rows_read);
    info!("  Decoys removed: {}", stats.decoys_removed);
    info!("  Entries written: {}", stats.entries_written);
    info!("  Peaks written: {}", stats.peaks_written);

    let notice = destination_notice(&output, stats.appended_to_existing);
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", console::style(&notice).cyan());
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", notice);
    }

    if let Some(report) = report {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize report")?;
        std::fs::write(&report, json)
            .with_context(|| format!("Failed to write report: {}", report.display()))?;
        info!("Report written to {}", report.display());
    }

    println!("Export successful");
    Ok(())
}
