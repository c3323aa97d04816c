use crate::types::{CutoffMetric, DegeneratePolicy};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Diversity indices of a clustered FASTA (reads in ";size=", percentage in the trailing "%")
    Clusters {
        /// Annotated cluster FASTA
        input_file: String,
        /// Only clusters at or above this percentage (0-100) enter Shannon entropy
        #[arg(long)]
        min_percentage: Option<f64>,
        /// Attribute the haplotype cutoff applies to
        #[arg(long, value_enum)]
        haplotype_metric: Option<CutoffMetric>,
        /// Haplotype cutoff: percentage (0-100) or absolute read count
        #[arg(long)]
        haplotype_cutoff: Option<f64>,
        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<String>,
        /// Sample identifier recorded in the JSON report
        #[arg(long)]
        sample_id: Option<String>,
    },

    /// Keep clusters holding at least a fraction of all reads
    FilterClusters {
        /// Annotated cluster FASTA
        input_file: String,
        /// Output FASTA
        output_file: String,
        /// Minimum fraction (0-1) of the total reads
        #[arg(long)]
        min_fraction: f64,
        /// Recompute percentages over the kept clusters so they sum to 100
        #[arg(long)]
        renormalize: bool,
    },

    /// Recompute cluster percentages from their read counts
    NormalizeClusters {
        /// Annotated cluster FASTA
        input_file: String,
        /// Output FASTA
        output_file: String,
    },

    /// Write each cluster once per supporting read
    ExpandClusters {
        /// Annotated cluster FASTA
        input_file: String,
        /// Output FASTA
        output_file: String,
    },

    /// Nucleotide diversity and polymorphic sites of a samtools mpileup
    Pileup {
        /// mpileup file (plain or compressed)
        input_file: String,
        /// Replace match symbols with the reference base only from this depth on
        #[arg(long)]
        min_depth_normalize: Option<u64>,
        /// Attribute the polymorphic-site cutoff applies to
        #[arg(long, value_enum)]
        metric: Option<CutoffMetric>,
        /// Polymorphic-site cutoff: fraction of depth (0-1) or absolute read count
        #[arg(long)]
        cutoff: Option<f64>,
        /// Handling of positions with fewer than two counted bases
        #[arg(long, value_enum)]
        degenerate: Option<DegeneratePolicy>,
        /// Write the polymorphic positions as TSV to this path
        #[arg(long)]
        sites_output: Option<String>,
        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<String>,
        /// Sample identifier recorded in the JSON report
        #[arg(long)]
        sample_id: Option<String>,
    },

    /// Convert SAM/BAM/CRAM records to FASTA
    SamToFasta {
        /// Alignment file
        input_file: String,
        /// Output FASTA
        output_file: String,
    },

    /// Convert FASTQ (optionally compressed) to FASTA
    FastqToFasta {
        /// FASTQ file
        input_file: String,
        /// Output FASTA
        output_file: String,
    },

    /// Rewrite a multi-line FASTA with one sequence line per record
    UnwrapFasta {
        /// Multi-line FASTA
        input_file: String,
        /// Output FASTA
        output_file: String,
    },

    /// Show or initialise the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_pileup_flags() {
        let args = Args::try_parse_from([
            "quasispecies-tools",
            "pileup",
            "sample.mpileup",
            "--metric",
            "number_reads",
            "--cutoff",
            "3",
            "--degenerate",
            "abort",
        ])
        .unwrap();

        match args.command {
            Commands::Pileup {
                metric,
                cutoff,
                degenerate,
                ..
            } => {
                assert_eq!(metric, Some(CutoffMetric::NumberReads));
                assert_eq!(cutoff, Some(3.0));
                assert_eq!(degenerate, Some(DegeneratePolicy::Abort));
            }
            _ => panic!("expected pileup command"),
        }
    }
}
