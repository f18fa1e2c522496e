use parser::Commands;

use std::process;
use clap::Parser;

#[macro_use]
extern crate log;

fn main() {
    let cli = parser::Cli::parse();
    logger::init_logger(&(cli.verbose + u8::from(!cli.quiet)));

    if let Err(e) = cli.serialize() {
        error!("{}", e);
        process::exit(1);
    }

    let result = match &cli.commands {
        Commands::Index(args) => run_index(args),
        Commands::Markers(args) => run_markers(args),
        Commands::FromYaml { yaml } => match parser::Cli::deserialize(yaml.clone()) {
            Ok(inner_cli) => match &inner_cli.commands {
                Commands::Index(args) => run_index(args),
                Commands::Markers(args) => run_markers(args),
                Commands::FromYaml { .. } => Err(anyhow::anyhow!("a serialized configuration file cannot itself request --from-yaml")),
            },
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn run_index(args: &parser::IndexArgs) -> anyhow::Result<()> {
    info!("Reconstructing pedigree from {}", args.ped.display());
    let outcome = pedigree_core::reconstruct(args)?;
    if !outcome.errors.is_empty() {
        for message in outcome.errors.messages() {
            error!("{message}");
        }
        return Err(anyhow::anyhow!("pedigree reconstruction recorded {} error(s)", outcome.errors.len()))
    }
    for message in outcome.warnings.messages() {
        warn!("{message}");
    }
    info!("Reconstructed {} pedigree(s) across {} individuals", outcome.summaries.len(), outcome.arena.len());
    pedigree_core::write_index_outputs(args, &outcome)
}

fn run_markers(args: &parser::MarkerArgs) -> anyhow::Result<()> {
    info!("Ingesting marker data from {}", args.markers.display());
    let outcome = pedigree_core::reconstruct_markers(args)?;
    if !outcome.errors.is_empty() {
        for message in outcome.errors.messages() {
            error!("{message}");
        }
        return Err(anyhow::anyhow!("marker ingest recorded {} error(s)", outcome.errors.len()))
    }
    for message in outcome.warnings.messages() {
        warn!("{message}");
    }
    info!("Ingested genotypes for {} individuals across {} loci", outcome.table.genotypes.len(), outcome.table.loci.len());
    pedigree_core::write_marker_outputs(args, &outcome)
}
