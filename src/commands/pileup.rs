use crate::config::Config;
use crate::export::formats::pileup::{PileupExport, PolymorphicExport};
use crate::export::{DiversityReport, ReportData, ReportMetadata};
use crate::pileup::{PileupDiversityEngine, PolymorphicPositionSet};
use crate::types::{CutoffMetric, DegeneratePolicy};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn write_sites(set: &PolymorphicPositionSet, output_file: &str) -> Result<()> {
    let file = File::create(output_file)
        .with_context(|| format!("Failed to create output file {}", output_file))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "REF\tPOS\tREF_BASE\tDEPTH\tA\tC\tG\tT")?;
    for tally in &set.positions {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            tally.reference,
            tally.position,
            tally.reference_base,
            tally.depth,
            tally.counts.a,
            tally.counts.c,
            tally.counts.g,
            tally.counts.t
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &Config,
    input_file: String,
    min_depth_normalize: Option<u64>,
    metric: Option<CutoffMetric>,
    cutoff: Option<f64>,
    degenerate: Option<DegeneratePolicy>,
    sites_output: Option<String>,
    json: Option<String>,
    sample_id: Option<String>,
) -> Result<()> {
    let min_depth = min_depth_normalize.unwrap_or(config.min_depth_for_normalization);
    let metric = metric.unwrap_or(config.polymorphic_metric);
    let cutoff = cutoff.unwrap_or(config.polymorphic_cutoff);
    let policy = degenerate.unwrap_or(config.degenerate_policy);

    let progress = ProgressBarBuilder::new(format!("Loading pileup from {}...", input_file))
        .with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        .build()?;
    let engine = PileupDiversityEngine::from_path(Path::new(&input_file), min_depth)
        .with_context(|| format!("Failed to load pileup from {}", input_file))?;
    progress.finish_with_message(format!("Loaded {} positions", engine.len()));

    let diversity = match engine.nucleotide_diversity_with_policy(policy) {
        Ok(value) => {
            println!("Nucleotide diversity: {}", value);
            Some(value)
        }
        Err(e) if policy == DegeneratePolicy::Abort => {
            return Err(e).context("Nucleotide diversity aborted");
        }
        Err(e) => {
            log::warn!("Nucleotide diversity is undefined: {}", e);
            println!("Nucleotide diversity: undefined ({})", e);
            None
        }
    };

    let sites = engine.polymorphic_sites(metric, cutoff)?;
    println!(
        "Polymorphic sites: {} of {} positions ({} > {})",
        sites.count(),
        engine.len(),
        metric.name(),
        cutoff
    );

    if let Some(path) = sites_output {
        write_sites(&sites, &path)?;
        log::info!("Wrote {} polymorphic positions to {}", sites.count(), path);
    }

    if let Some(json_path) = json {
        let report = DiversityReport::new(
            ReportData::Pileup(PileupExport {
                positions: engine.len(),
                min_depth_for_normalization: min_depth,
                nucleotide_diversity: diversity,
                polymorphic_sites: PolymorphicExport::from(&sites),
            }),
            ReportMetadata {
                sample_id,
                input_file,
            },
        );
        report.write_json(Path::new(&json_path))?;
        log::info!("Wrote report to {}", json_path);
    }

    Ok(())
}
