use crate::core::forcefield::params::ParameterSet;
use crate::core::models::molecule::Molecule;
use crate::typing::backends::{self, BackendOutput, DirectFileBackend};
use crate::typing::canonical;
use crate::typing::config::{Method, TypingConfig};
use crate::typing::diagnostics::{Diagnostic, DiagnosticsReporter};
use crate::typing::error::TypingError;
use crate::typing::workspace::Workspace;
use tracing::{debug, info, instrument, warn};

/// The outcome of a typing run: the parameter set covering the molecule and
/// a typed copy of the input molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct TypingResult {
    pub parameters: ParameterSet,
    pub molecule: Molecule,
}

/// Assigns force field atom types and parameters to a molecule.
///
/// The input molecule is never mutated. The returned copy carries the
/// backend's atom types, masses, and improper dihedrals; partial charges are
/// replaced only when a charge assignment scheme was requested, otherwise the
/// caller's charges stay untouched.
///
/// When both a topology and a parameter file are supplied the run
/// short-circuits to reading them directly; otherwise the molecule is
/// canonicalized and the method's external toolchain runs inside a scoped
/// workspace, which is removed on every exit path unless the request named a
/// persistent `work_dir`.
#[instrument(skip_all, name = "typing_workflow")]
pub fn run(
    molecule: &Molecule,
    config: &TypingConfig,
    reporter: &DiagnosticsReporter,
) -> Result<TypingResult, TypingError> {
    // Fail fast, before any file or process side effect.
    if config.method == Method::Cgenff {
        if let Some(scheme) = &config.charge_scheme {
            return Err(TypingError::IncompatibleChargeScheme {
                method: config.method,
                scheme: scheme.clone(),
            });
        }
    }

    let net_charge = match config.net_charge {
        Some(charge) => charge,
        None => {
            let derived = molecule.net_charge();
            warn!(
                net_charge = derived,
                "Using atomic charges from the molecule to derive the net charge"
            );
            reporter.report(Diagnostic::NetChargeDerived {
                net_charge: derived,
            });
            derived
        }
    };

    let (output, renamed) = if let Some((topology, parameters)) = config.direct_files() {
        info!(
            topology = %topology.display(),
            parameters = %parameters.display(),
            "Reading force field parameters from user-supplied files"
        );
        let backend = DirectFileBackend::new(topology.to_path_buf(), parameters.to_path_buf());
        (backend.read()?, None)
    } else {
        info!(method = %config.method, "Assigning atom types");
        reporter.report(Diagnostic::BackendSelected {
            method: config.method,
        });

        let renamed = canonical::canonicalize(molecule, reporter);

        let workspace = Workspace::open(config.work_dir.as_deref())?;
        debug!(
            path = %workspace.path().display(),
            persistent = workspace.is_persistent(),
            "Workspace directory"
        );
        reporter.report(Diagnostic::WorkspaceOpened {
            path: workspace.path().to_path_buf(),
            persistent: workspace.is_persistent(),
        });

        let backend = backends::backend_for(config.method);
        let output = backend.run(
            &renamed,
            net_charge,
            config.charge_scheme.as_deref(),
            workspace.path(),
            reporter,
        )?;
        // The workspace handle drops here; owned directories are removed
        // whether or not reconciliation below succeeds.
        (output, Some(renamed))
    };

    reconcile(molecule, renamed.as_ref(), &output)?;

    let BackendOutput {
        parameters,
        atom_types,
        charges,
        masses,
        impropers,
        ..
    } = output;

    let mut typed = molecule.clone();
    typed.atom_types = atom_types;
    typed.masses = masses;
    typed.impropers = impropers;
    if config.charge_scheme.is_some() {
        typed.charges = charges;
    }

    Ok(TypingResult {
        parameters,
        molecule: typed,
    })
}

/// Checks the backend tuple against the molecule it was produced for.
///
/// A name disagreement means the toolchain silently reordered or dropped
/// atoms; an element disagreement means atom identity was corrupted somewhere
/// through the external pipeline. Both are toolchain contract violations and
/// abort the run.
fn reconcile(
    original: &Molecule,
    renamed: Option<&Molecule>,
    output: &BackendOutput,
) -> Result<(), TypingError> {
    if output.names.len() != original.atom_count()
        || output.elements.len() != original.atom_count()
    {
        return Err(TypingError::AtomCountMismatch {
            expected: original.atom_count(),
            actual: output.names.len(),
        });
    }

    if let Some(renamed) = renamed {
        for (index, (expected, actual)) in renamed.names.iter().zip(&output.names).enumerate() {
            if expected != actual {
                return Err(TypingError::NameMismatch {
                    index,
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }
    }

    for (index, (expected, actual)) in original.elements.iter().zip(&output.elements).enumerate() {
        if expected != actual {
            return Err(TypingError::ElementMismatch {
                index,
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
    }

    Ok(())
}
