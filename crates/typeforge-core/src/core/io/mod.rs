//! Provides input/output for the file formats spoken by the typing toolchains.
//!
//! Structure formats ([`mol2`], [`pdb`]) carry molecules into the external
//! typing executables; result formats ([`prepi`], [`frcmod`], [`rtf`], [`prm`])
//! carry atom types, charges, masses, and force field parameters back out.
//! All parsers are line-oriented and report failures with the format and an
//! approximate line number.

pub mod error;
pub mod frcmod;
pub mod mol2;
pub mod pdb;
pub mod prepi;
pub mod prm;
pub mod rtf;

pub use error::Error;

use std::fmt;

/// The file formats handled by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Tripos MOL2 structure format (input to the GAFF-family typer).
    Mol2,
    /// PDB structure format (input to the CGenFF typer).
    Pdb,
    /// AMBER prep-input residue template (typer output).
    Prepi,
    /// AMBER force field modification file (parameter completer output).
    Frcmod,
    /// CHARMM residue topology file (CGenFF typer output).
    Rtf,
    /// CHARMM parameter file (CGenFF typer output).
    Prm,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Mol2 => "MOL2",
            Format::Pdb => "PDB",
            Format::Prepi => "PREPI",
            Format::Frcmod => "FRCMOD",
            Format::Rtf => "RTF",
            Format::Prm => "PRM",
        };
        f.write_str(name)
    }
}
