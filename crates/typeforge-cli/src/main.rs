mod cli;
mod config;
mod error;
mod logging;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, info};
use typeforge::core::forcefield::params::ParameterSet;
use typeforge::core::io::mol2;
use typeforge::typing::diagnostics::DiagnosticsReporter;
use typeforge::workflows;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("🚀 TypeForge CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let (typing_config, output_path) = config::resolve(&cli)?;

    let molecule = mol2::read_file(&cli.input).map_err(|source| CliError::InputParsing {
        path: cli.input.clone(),
        source,
    })?;
    info!(
        atoms = molecule.atom_count(),
        "Loaded molecule from {}",
        cli.input.display()
    );

    let reporter = DiagnosticsReporter::new();
    let result = workflows::typing::run(&molecule, &typing_config, &reporter)?;

    summarize_parameters(&result.parameters);

    mol2::write_file(&output_path, &result.molecule).map_err(|source| {
        CliError::OutputWriting {
            path: output_path.clone(),
            source,
        }
    })?;
    info!("Typed molecule written to {}", output_path.display());

    println!(
        "✅ Typed {} atoms; output written to {}",
        result.molecule.atom_count(),
        output_path.display()
    );
    Ok(())
}

fn summarize_parameters(parameters: &ParameterSet) {
    match parameters {
        ParameterSet::Amber(set) => info!(
            atom_types = set.atom_types.len(),
            bonds = set.bonds.len(),
            angles = set.angles.len(),
            dihedrals = set.dihedrals.len(),
            impropers = set.impropers.len(),
            "AMBER parameter set assembled"
        ),
        ParameterSet::Charmm(set) => info!(
            atom_types = set.atom_types.len(),
            bonds = set.bonds.len(),
            angles = set.angles.len(),
            dihedrals = set.dihedrals.len(),
            impropers = set.impropers.len(),
            "CHARMM parameter set assembled"
        ),
    }
}
