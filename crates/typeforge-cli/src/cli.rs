use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "tforge",
    version,
    about = "Assign force field atom types and parameters to a small molecule"
)]
pub struct Cli {
    /// Input structure in MOL2 format.
    pub input: PathBuf,

    /// Typing method: CGenFF, GAFF, or GAFF2.
    #[arg(long)]
    pub method: Option<String>,

    /// Charge assignment scheme for the GAFF family (e.g. "gas", "bcc").
    #[arg(long)]
    pub charge_scheme: Option<String>,

    /// Net molecular charge; derived from the input charges when omitted.
    #[arg(long, allow_hyphen_values = true)]
    pub net_charge: Option<i32>,

    /// Residue topology file; together with --parameters, parameters are read
    /// directly and no external toolchain runs.
    #[arg(long)]
    pub topology: Option<PathBuf>,

    /// Parameter file; see --topology.
    #[arg(long)]
    pub parameters: Option<PathBuf>,

    /// Run the toolchain in this directory and keep all intermediate files.
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Where to write the typed molecule (default: "<input stem>_typed.mol2").
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence all logging.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_net_charge_is_accepted() {
        let cli = Cli::parse_from(["tforge", "mol.mol2", "--net-charge", "-2"]);
        assert_eq!(cli.net_charge, Some(-2));
    }

    #[test]
    fn flags_default_to_unset() {
        let cli = Cli::parse_from(["tforge", "mol.mol2"]);
        assert!(cli.method.is_none());
        assert!(cli.charge_scheme.is_none());
        assert!(cli.work_dir.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }
}
