use clap::Parser;
use quasispecies_tools::cli::{self, Commands};
use quasispecies_tools::commands;
use quasispecies_tools::config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::Args::parse();
    let config = Config::load();

    let result = match args.command {
        Commands::Clusters {
            input_file,
            min_percentage,
            haplotype_metric,
            haplotype_cutoff,
            json,
            sample_id,
        } => commands::clusters::run(
            &config,
            input_file,
            min_percentage,
            haplotype_metric,
            haplotype_cutoff,
            json,
            sample_id,
        ),
        Commands::FilterClusters {
            input_file,
            output_file,
            min_fraction,
            renormalize,
        } => commands::clusters::run_filter(input_file, output_file, min_fraction, renormalize),
        Commands::NormalizeClusters {
            input_file,
            output_file,
        } => commands::clusters::run_normalize(input_file, output_file),
        Commands::ExpandClusters {
            input_file,
            output_file,
        } => commands::clusters::run_expand(input_file, output_file),
        Commands::Pileup {
            input_file,
            min_depth_normalize,
            metric,
            cutoff,
            degenerate,
            sites_output,
            json,
            sample_id,
        } => commands::pileup::run(
            &config,
            input_file,
            min_depth_normalize,
            metric,
            cutoff,
            degenerate,
            sites_output,
            json,
            sample_id,
        ),
        Commands::SamToFasta {
            input_file,
            output_file,
        } => commands::convert::run_sam_to_fasta(input_file, output_file),
        Commands::FastqToFasta {
            input_file,
            output_file,
        } => commands::convert::run_fastq_to_fasta(input_file, output_file),
        Commands::UnwrapFasta {
            input_file,
            output_file,
        } => commands::convert::run_unwrap_fasta(input_file, output_file),
        Commands::Config { action } => commands::config::run(&config, action),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
