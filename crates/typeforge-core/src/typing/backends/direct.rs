use super::{BackendOutput, read_charmm_outputs};
use crate::typing::error::TypingError;
use std::path::PathBuf;

/// The direct-file strategy: no canonicalization, no workspace, no external
/// process. The parameter set and the atom tuple come straight from a
/// caller-supplied CHARMM topology/parameter file pair, which is why this
/// strategy reads rather than runs.
pub struct DirectFileBackend {
    topology: PathBuf,
    parameters: PathBuf,
}

impl DirectFileBackend {
    pub fn new(topology: PathBuf, parameters: PathBuf) -> Self {
        Self {
            topology,
            parameters,
        }
    }

    pub fn read(&self) -> Result<BackendOutput, TypingError> {
        read_charmm_outputs(&self.topology, &self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::ParameterSet;
    use std::fs;
    use tempfile::tempdir;

    const RTF: &str = "\
* Topology for a two-atom fragment
*
22 1

MASS 1    CA 12.01100 C
MASS 2    HA 1.00800 H

RESI MOL       0.000
GROUP
ATOM C1    CA   -0.100
ATOM H1    HA    0.100
BOND C1 H1

END
";

    const PRM: &str = "\
* Parameters for a two-atom fragment
*

BONDS
CA  HA   340.00     1.090

NONBONDED
CA     0.0       -0.0700     1.9924
HA     0.0       -0.0300     1.3582

END
";

    #[test]
    fn read_returns_tuple_and_charmm_parameters() {
        let dir = tempdir().unwrap();
        let topology = dir.path().join("user.rtf");
        let parameters = dir.path().join("user.prm");
        fs::write(&topology, RTF).unwrap();
        fs::write(&parameters, PRM).unwrap();

        let output = DirectFileBackend::new(topology, parameters)
            .read()
            .unwrap();

        assert_eq!(output.names, vec!["C1", "H1"]);
        assert_eq!(output.elements, vec!["C", "H"]);
        assert_eq!(output.atom_types, vec!["CA", "HA"]);
        assert_eq!(output.charges, vec![-0.1, 0.1]);
        assert_eq!(output.masses, vec![12.011, 1.008]);
        assert!(output.impropers.is_empty());
        match output.parameters {
            ParameterSet::Charmm(set) => {
                assert_eq!(set.atom_types.len(), 2);
                assert_eq!(set.bonds.len(), 1);
            }
            other => panic!("unexpected parameter family: {other:?}"),
        }
    }

    #[test]
    fn read_fails_for_missing_files() {
        let dir = tempdir().unwrap();
        let backend = DirectFileBackend::new(
            dir.path().join("missing.rtf"),
            dir.path().join("missing.prm"),
        );
        assert!(matches!(
            backend.read(),
            Err(TypingError::Format(_))
        ));
    }
}
