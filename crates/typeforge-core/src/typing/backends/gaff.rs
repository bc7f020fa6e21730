use super::{BackendOutput, TypingBackend, run_tool};
use crate::core::forcefield::params::{AmberParameterSet, ParameterSet};
use crate::core::io::mol2;
use crate::core::io::prepi;
use crate::core::models::element;
use crate::core::models::molecule::Molecule;
use crate::typing::config::Method;
use crate::typing::diagnostics::DiagnosticsReporter;
use crate::typing::error::TypingError;
use std::path::Path;

const INPUT_FILE: &str = "mol.mol2";
const TYPER_OUTPUT: &str = "mol.prepi";
const COMPLETER_OUTPUT: &str = "mol.frcmod";

/// The GAFF-family strategy: atom typing by `antechamber`, parameter gap
/// filling by `parmchk2`.
///
/// The two steps stay separate because they fail separately; a typing failure
/// and a missing-parameter interpolation failure point at different problems,
/// and the error names whichever tool broke.
pub struct GaffBackend {
    variant: Method,
}

impl GaffBackend {
    pub(crate) fn new(variant: Method) -> Self {
        debug_assert!(variant.is_gaff_family());
        Self { variant }
    }

    /// The toolchain keyword for this GAFF generation.
    fn type_keyword(&self) -> &'static str {
        match self.variant {
            Method::Gaff => "gaff",
            _ => "gaff2",
        }
    }
}

fn typer_args(keyword: &str, net_charge: i32, charge_scheme: Option<&str>) -> Vec<String> {
    let charge = net_charge.to_string();
    let mut args: Vec<String> = [
        "-at",
        keyword,
        "-nc",
        charge.as_str(),
        "-fi",
        "mol2",
        "-i",
        INPUT_FILE,
        "-fo",
        "prepi",
        "-o",
        TYPER_OUTPUT,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if let Some(scheme) = charge_scheme {
        args.push("-c".to_string());
        args.push(scheme.to_string());
    }
    args
}

fn completer_args(keyword: &str) -> Vec<String> {
    [
        "-f",
        "prepi",
        "-s",
        keyword,
        "-i",
        TYPER_OUTPUT,
        "-o",
        COMPLETER_OUTPUT,
        "-a",
        "Y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl TypingBackend for GaffBackend {
    fn run(
        &self,
        molecule: &Molecule,
        net_charge: i32,
        charge_scheme: Option<&str>,
        workspace: &Path,
        reporter: &DiagnosticsReporter,
    ) -> Result<BackendOutput, TypingError> {
        mol2::write_file(&workspace.join(INPUT_FILE), molecule)?;

        let keyword = self.type_keyword();
        run_tool(
            "antechamber",
            &typer_args(keyword, net_charge, charge_scheme),
            workspace,
            reporter,
        )?;
        run_tool("parmchk2", &completer_args(keyword), workspace, reporter)?;

        let parameters = AmberParameterSet::from_frcmod(&workspace.join(COMPLETER_OUTPUT))?;
        let template = prepi::read_file(&workspace.join(TYPER_OUTPUT))?;

        // The PREPI carries names/types/charges; masses live in the FRCMOD
        // MASS table, and element identity is recovered from those masses.
        let mut masses = Vec::with_capacity(template.names.len());
        let mut elements = Vec::with_capacity(template.names.len());
        for (name, atom_type) in template.names.iter().zip(&template.atom_types) {
            let entry = parameters.atom_types.get(atom_type).ok_or_else(|| {
                TypingError::BackendData {
                    detail: format!(
                        "atom '{}' was assigned type '{}' which has no entry in the {} MASS table",
                        name, atom_type, COMPLETER_OUTPUT
                    ),
                }
            })?;
            masses.push(entry.mass);
            let symbol = element::by_mass(entry.mass).ok_or_else(|| TypingError::BackendData {
                detail: format!(
                    "mass {} of atom type '{}' matches no known element",
                    entry.mass, atom_type
                ),
            })?;
            elements.push(symbol.to_string());
        }

        Ok(BackendOutput {
            parameters: ParameterSet::Amber(parameters),
            names: template.names,
            elements,
            atom_types: template.atom_types,
            charges: template.charges,
            masses,
            impropers: template.impropers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typer_args_select_variant_and_charge() {
        let args = typer_args("gaff2", -1, None);
        assert_eq!(args[0..2], ["-at", "gaff2"].map(String::from));
        assert_eq!(args[2..4], ["-nc", "-1"].map(String::from));
        assert!(!args.contains(&"-c".to_string()));
    }

    #[test]
    fn typer_args_append_charge_scheme_when_requested() {
        let args = typer_args("gaff", 0, Some("gas"));
        let pos = args.iter().position(|a| a == "-c").unwrap();
        assert_eq!(args[pos + 1], "gas");
    }

    #[test]
    fn completer_args_reuse_the_variant_keyword() {
        let args = completer_args("gaff2");
        let pos = args.iter().position(|a| a == "-s").unwrap();
        assert_eq!(args[pos + 1], "gaff2");
        assert_eq!(args.last().unwrap(), "Y");
    }

    #[test]
    fn type_keyword_follows_the_variant() {
        assert_eq!(GaffBackend::new(Method::Gaff).type_keyword(), "gaff");
        assert_eq!(GaffBackend::new(Method::Gaff2).type_keyword(), "gaff2");
    }
}
