use crate::convert;
use crate::utils::input::open_input;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn create_output(output_file: &str) -> Result<BufWriter<File>> {
    let file = File::create(output_file)
        .with_context(|| format!("Failed to create output file {}", output_file))?;
    Ok(BufWriter::new(file))
}

pub fn run_sam_to_fasta(input_file: String, output_file: String) -> Result<()> {
    let progress = ProgressBarBuilder::new(format!("Converting {}...", input_file)).build()?;
    let written = convert::sam_to_fasta(Path::new(&input_file), create_output(&output_file)?)?;
    progress.finish_with_message(format!("Wrote {} records to {}", written, output_file));
    Ok(())
}

pub fn run_fastq_to_fasta(input_file: String, output_file: String) -> Result<()> {
    let progress = ProgressBarBuilder::new(format!("Converting {}...", input_file)).build()?;
    let reader = open_input(Path::new(&input_file))
        .with_context(|| format!("Failed to open {}", input_file))?;
    let written = convert::fastq_to_fasta(reader, create_output(&output_file)?)?;
    progress.finish_with_message(format!("Wrote {} reads to {}", written, output_file));
    Ok(())
}

pub fn run_unwrap_fasta(input_file: String, output_file: String) -> Result<()> {
    let progress = ProgressBarBuilder::new(format!("Unwrapping {}...", input_file)).build()?;
    let reader = open_input(Path::new(&input_file))
        .with_context(|| format!("Failed to open {}", input_file))?;
    let written = convert::unwrap_fasta(reader, create_output(&output_file)?)?;
    progress.finish_with_message(format!("Wrote {} records to {}", written, output_file));
    Ok(())
}
