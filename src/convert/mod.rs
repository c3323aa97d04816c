//! Format conversions feeding the diversity engines: alignments and raw reads
//! to FASTA, multi-line FASTA to single-line FASTA, and clusters back to reads.

use crate::clusters::ClusterRecord;
use anyhow::{Context, Result};
use bio::io::{fasta, fastq};
use rust_htslib::bam::{self, Read as BamRead};
use std::io::{BufRead, Write};
use std::path::Path;

/// Writes every SAM/BAM/CRAM record as `>qname` plus its stored sequence.
/// Returns the number of records written.
pub fn sam_to_fasta<W: Write>(input: &Path, writer: W) -> Result<u64> {
    let mut reader = bam::Reader::from_path(input)
        .with_context(|| format!("Failed to open alignment file {}", input.display()))?;
    let mut fasta_writer = fasta::Writer::new(writer);
    let mut written = 0u64;

    for record in reader.records() {
        let record = record.context("Failed to read alignment record")?;
        let name = String::from_utf8_lossy(record.qname()).into_owned();
        fasta_writer.write(&name, None, &record.seq().as_bytes())?;
        written += 1;
    }

    fasta_writer.flush()?;
    Ok(written)
}

/// Drops qualities from FASTQ reads. Returns the number of reads written.
pub fn fastq_to_fasta<R: BufRead, W: Write>(reader: R, writer: W) -> Result<u64> {
    let mut fasta_writer = fasta::Writer::new(writer);
    let mut written = 0u64;

    for record in fastq::Reader::from_bufread(reader).records() {
        let record = record.context("Failed to read FASTQ record")?;
        fasta_writer.write(record.id(), record.desc(), record.seq())?;
        written += 1;
    }

    fasta_writer.flush()?;
    Ok(written)
}

/// Joins wrapped sequence lines so each record occupies two lines.
pub fn unwrap_fasta<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<u64> {
    let mut written = 0u64;

    for record in fasta::Reader::from_bufread(reader).records() {
        let record = record.context("Failed to read FASTA record")?;
        match record.desc() {
            Some(desc) => writeln!(writer, ">{} {}", record.id(), desc)?,
            None => writeln!(writer, ">{}", record.id())?,
        }
        writer.write_all(record.seq())?;
        writer.write_all(b"\n")?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Emits `read_count` copies of each cluster, named `<name>_<i>`.
pub fn expand_clusters<W: Write>(records: &[ClusterRecord], writer: W) -> Result<u64> {
    let mut fasta_writer = fasta::Writer::new(writer);
    let mut written = 0u64;

    for record in records {
        for i in 0..record.read_count {
            let name = format!("{}_{}", record.name, i);
            fasta_writer.write(&name, None, record.sequence.as_bytes())?;
            written += 1;
        }
    }

    fasta_writer.flush()?;
    Ok(written)
}
