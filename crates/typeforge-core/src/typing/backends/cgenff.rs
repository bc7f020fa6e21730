use super::{BackendOutput, TypingBackend, read_charmm_outputs, run_tool};
use crate::core::io::pdb;
use crate::core::models::molecule::Molecule;
use crate::typing::diagnostics::DiagnosticsReporter;
use crate::typing::error::TypingError;
use std::path::Path;

const INPUT_FILE: &str = "mol.pdb";
const TOPOLOGY_OUTPUT: &str = "mol.rtf";
const PARAMETER_OUTPUT: &str = "mol.prm";
const FORCEFIELD_TEMPLATE: &str = "top_all36_cgenff_new";

/// The CGenFF strategy: a single run of the MATCH typer, which emits both the
/// residue topology and the parameter file.
pub struct CgenffBackend;

fn typer_args(net_charge: i32) -> Vec<String> {
    let charge = net_charge.to_string();
    [
        "-charge",
        charge.as_str(),
        "-forcefield",
        FORCEFIELD_TEMPLATE,
        INPUT_FILE,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl TypingBackend for CgenffBackend {
    fn run(
        &self,
        molecule: &Molecule,
        net_charge: i32,
        _charge_scheme: Option<&str>,
        workspace: &Path,
        reporter: &DiagnosticsReporter,
    ) -> Result<BackendOutput, TypingError> {
        pdb::write_file(&workspace.join(INPUT_FILE), molecule)?;

        run_tool("match-typer", &typer_args(net_charge), workspace, reporter)?;

        read_charmm_outputs(
            &workspace.join(TOPOLOGY_OUTPUT),
            &workspace.join(PARAMETER_OUTPUT),
        )
    }
}
