use crate::clusters::{renormalize_percentages, write_clusters, ClusterDiversityEngine, ClusterRecord};
use crate::config::Config;
use crate::convert::expand_clusters;
use crate::error::Result as DiversityResult;
use crate::export::formats::clusters::ClusterExport;
use crate::export::{DiversityReport, ReportData, ReportMetadata};
use crate::types::CutoffMetric;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn load(input_file: &str) -> Result<ClusterDiversityEngine> {
    let progress = ProgressBarBuilder::new(format!("Loading clusters from {}...", input_file)).build()?;
    let engine = ClusterDiversityEngine::from_path(Path::new(input_file))
        .with_context(|| format!("Failed to load clusters from {}", input_file))?;
    progress.finish_with_message(format!(
        "Loaded {} clusters ({} reads)",
        engine.len(),
        engine.total_reads()
    ));
    Ok(engine)
}

fn write_output(records: &[ClusterRecord], output_file: &str) -> Result<()> {
    let file = File::create(output_file)
        .with_context(|| format!("Failed to create output file {}", output_file))?;
    write_clusters(records, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", output_file))?;
    Ok(())
}

fn format_index(label: &str, value: DiversityResult<f64>) -> String {
    match value {
        Ok(v) => format!("{}: {}", label, v),
        Err(e) => {
            log::warn!("{} is undefined: {}", label, e);
            format!("{}: undefined ({})", label, e)
        }
    }
}

pub fn run(
    config: &Config,
    input_file: String,
    min_percentage: Option<f64>,
    haplotype_metric: Option<CutoffMetric>,
    haplotype_cutoff: Option<f64>,
    json: Option<String>,
    sample_id: Option<String>,
) -> Result<()> {
    let min_percentage = min_percentage.unwrap_or(config.min_entropy_percentage);
    let metric = haplotype_metric.unwrap_or(config.haplotype_metric);
    let cutoff = haplotype_cutoff.unwrap_or(config.haplotype_cutoff);

    let engine = load(&input_file)?;
    let haplotypes = engine.count_haplotypes_above_cutoff(metric, cutoff)?;

    println!("Clusters: {} ({} reads)", engine.len(), engine.total_reads());
    println!(
        "{}",
        format_index(
            &format!("Shannon entropy (clusters >= {}%)", min_percentage),
            engine.shannon_entropy(min_percentage)
        )
    );
    println!("{}", format_index("Simpson's index", engine.simpsons_index()));
    println!(
        "{}",
        format_index(
            "Simpson's index of diversity",
            engine.simpsons_index_of_diversity()
        )
    );
    println!(
        "{}",
        format_index(
            "Simpson's reciprocal index",
            engine.simpsons_reciprocal_index()
        )
    );
    println!("{} ({} >= {})", haplotypes, metric.name(), cutoff);

    if let Some(json_path) = json {
        let report = DiversityReport::new(
            ReportData::Clusters(ClusterExport::new(
                &engine,
                min_percentage,
                metric,
                cutoff,
                haplotypes,
            )),
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

pub fn run_filter(
    input_file: String,
    output_file: String,
    min_fraction: f64,
    renormalize: bool,
) -> Result<()> {
    let engine = load(&input_file)?;
    let kept = engine.filter_by_relative_abundance(min_fraction)?;

    let stamped = if renormalize {
        renormalize_percentages(&kept)?
    } else {
        engine.restamp_percentages(&kept)?
    };
    write_output(&stamped, &output_file)?;

    println!(
        "Kept {} of {} clusters (>= {} of {} reads)",
        stamped.len(),
        engine.len(),
        min_fraction,
        engine.total_reads()
    );
    Ok(())
}

pub fn run_normalize(input_file: String, output_file: String) -> Result<()> {
    let engine = load(&input_file)?;
    let normalized = renormalize_percentages(engine.records())?;
    write_output(&normalized, &output_file)?;
    println!("Normalized {} clusters", normalized.len());
    Ok(())
}

pub fn run_expand(input_file: String, output_file: String) -> Result<()> {
    let engine = load(&input_file)?;
    let file = File::create(&output_file)
        .with_context(|| format!("Failed to create output file {}", output_file))?;
    let written = expand_clusters(engine.records(), BufWriter::new(file))?;
    println!("Wrote {} reads from {} clusters", written, engine.len());
    Ok(())
}
