//! Backend strategies driving the external typing toolchains.
//!
//! Each strategy writes the canonicalized molecule into the workspace in the
//! structure format its toolchain expects, runs the toolchain, and parses the
//! resulting files back into a [`BackendOutput`]. The orchestrator picks the
//! strategy and reconciles the output; strategies never touch the caller's
//! molecule.

mod cgenff;
mod direct;
mod gaff;

pub use cgenff::CgenffBackend;
pub use direct::DirectFileBackend;
pub use gaff::GaffBackend;

use crate::core::forcefield::params::{CharmmParameterSet, ParameterSet};
use crate::core::io::rtf;
use crate::core::models::molecule::Molecule;
use crate::typing::config::Method;
use crate::typing::diagnostics::{Diagnostic, DiagnosticsReporter};
use crate::typing::error::TypingError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Everything a backend reports for a molecule: the parameter set and the
/// per-atom tuple in the backend's own atom order.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutput {
    pub parameters: ParameterSet,
    pub names: Vec<String>,
    pub elements: Vec<String>,
    pub atom_types: Vec<String>,
    pub charges: Vec<f64>,
    pub masses: Vec<f64>,
    pub impropers: Vec<[usize; 4]>,
}

/// The contract shared by the process-backed strategies.
pub trait TypingBackend {
    /// Runs the toolchain over the canonicalized molecule inside `workspace`.
    fn run(
        &self,
        molecule: &Molecule,
        net_charge: i32,
        charge_scheme: Option<&str>,
        workspace: &Path,
        reporter: &DiagnosticsReporter,
    ) -> Result<BackendOutput, TypingError>;
}

/// Selects the strategy for a typing method.
pub fn backend_for(method: Method) -> Box<dyn TypingBackend> {
    match method {
        Method::Gaff | Method::Gaff2 => Box::new(GaffBackend::new(method)),
        Method::Cgenff => Box::new(CgenffBackend),
    }
}

/// Runs one external tool to completion inside `dir`, blocking until it
/// exits. Output is captured and forwarded to the debug log; a non-zero exit
/// (or a launch failure, e.g. the executable missing from PATH) aborts with
/// an error naming the tool.
pub(crate) fn run_tool(
    tool: &'static str,
    args: &[String],
    dir: &Path,
    reporter: &DiagnosticsReporter,
) -> Result<(), TypingError> {
    debug!(tool, ?args, "Launching external tool");
    let output = Command::new(tool)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| TypingError::ProcessLaunch { tool, source })?;

    if !output.stdout.is_empty() {
        debug!(tool, "stdout: {}", String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        debug!(tool, "stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    if !output.status.success() {
        return Err(TypingError::ProcessFailed {
            tool,
            code: output.status.code(),
        });
    }

    reporter.report(Diagnostic::ToolCompleted { tool });
    Ok(())
}

/// Builds a [`BackendOutput`] from a CHARMM topology/parameter file pair;
/// shared by the CGenFF strategy (over the typer's output files) and the
/// direct-file strategy (over caller-supplied files).
pub(crate) fn read_charmm_outputs(
    topology: &Path,
    parameters: &Path,
) -> Result<BackendOutput, TypingError> {
    let parameters = CharmmParameterSet::from_files(topology, parameters)?;
    let data = rtf::read_file(topology)?;

    Ok(BackendOutput {
        parameters: ParameterSet::Charmm(parameters),
        names: data.names,
        elements: data.elements,
        atom_types: data.atom_types,
        charges: data.charges,
        masses: data.masses,
        impropers: data.impropers,
    })
}
