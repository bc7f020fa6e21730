use crate::core::models::molecule::Molecule;
use crate::typing::diagnostics::{Diagnostic, DiagnosticsReporter};
use std::collections::HashMap;
use tracing::debug;

/// Segment identifier given to every canonicalized molecule.
pub const SEGMENT_NAME: &str = "L";
/// Residue name given to every canonicalized molecule.
pub const RESIDUE_NAME: &str = "MOL";

/// Returns a copy of the molecule with canonical segment, residue, and atom
/// names; the input is never touched.
///
/// Atoms are renamed to `<ELEMENT><ordinal>` with the element symbol
/// uppercased and a 1-based counter per element, assigned in the molecule's
/// existing atom order. The external typers derive atom names the same way,
/// so their output files line up with these names; reconciliation depends on
/// that and treats any divergence as fatal.
pub fn canonicalize(mol: &Molecule, reporter: &DiagnosticsReporter) -> Molecule {
    let mut renamed = mol.clone();

    renamed.segid = SEGMENT_NAME.to_string();
    debug!(segid = SEGMENT_NAME, "Renamed segment");
    reporter.report(Diagnostic::SegmentRenamed {
        segid: SEGMENT_NAME,
    });

    renamed.resname = RESIDUE_NAME.to_string();
    debug!(resname = RESIDUE_NAME, "Renamed residue");
    reporter.report(Diagnostic::ResidueRenamed {
        resname: RESIDUE_NAME,
    });

    let mut suffixes: HashMap<String, usize> = HashMap::new();
    for i in 0..renamed.atom_count() {
        let symbol = renamed.elements[i].to_ascii_uppercase();
        let ordinal = suffixes.entry(symbol.clone()).or_insert(0);
        *ordinal += 1;
        let new_name = format!("{}{}", symbol, ordinal);

        debug!(
            index = i,
            old = %renamed.names[i],
            new = %new_name,
            "Renamed atom"
        );
        reporter.report(Diagnostic::AtomRenamed {
            index: i,
            old: renamed.names[i].clone(),
            new: new_name.clone(),
        });
        renamed.names[i] = new_name;
    }

    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn ethanolamine() -> Molecule {
        let mut mol = Molecule::new();
        for (name, element) in [
            ("C", "C"),
            ("CA", "C"),
            ("N", "N"),
            ("HN1", "H"),
            ("HN2", "H"),
            ("HA1", "H"),
            ("HA2", "H"),
            ("HO", "H"),
            ("O", "O"),
        ] {
            mol.push_atom(name, element, Point3::origin(), 0.0);
        }
        mol.segid = "LIG1".to_string();
        mol.resname = "ETA".to_string();
        mol
    }

    #[test]
    fn atoms_get_per_element_ordinals_in_input_order() {
        let reporter = DiagnosticsReporter::new();
        let renamed = canonicalize(&ethanolamine(), &reporter);
        assert_eq!(
            renamed.names,
            vec!["C1", "C2", "N1", "H1", "H2", "H3", "H4", "H5", "O1"]
        );
    }

    #[test]
    fn segment_and_residue_get_fixed_names() {
        let reporter = DiagnosticsReporter::new();
        let renamed = canonicalize(&ethanolamine(), &reporter);
        assert_eq!(renamed.segid, "L");
        assert_eq!(renamed.resname, "MOL");
    }

    #[test]
    fn input_molecule_is_untouched() {
        let mol = ethanolamine();
        let reporter = DiagnosticsReporter::new();
        let _ = canonicalize(&mol, &reporter);
        assert_eq!(mol.names[0], "C");
        assert_eq!(mol.segid, "LIG1");
        assert_eq!(mol.resname, "ETA");
    }

    #[test]
    fn names_are_unique_across_the_molecule() {
        let reporter = DiagnosticsReporter::new();
        let renamed = canonicalize(&ethanolamine(), &reporter);
        let unique: HashSet<_> = renamed.names.iter().collect();
        assert_eq!(unique.len(), renamed.atom_count());
    }

    #[test]
    fn lowercase_element_symbols_are_uppercased_in_names() {
        let mut mol = Molecule::new();
        mol.push_atom("CL", "Cl", Point3::origin(), 0.0);
        mol.push_atom("C", "C", Point3::origin(), 0.0);
        let reporter = DiagnosticsReporter::new();
        let renamed = canonicalize(&mol, &reporter);
        assert_eq!(renamed.names, vec!["CL1", "C1"]);
    }

    #[test]
    fn every_rename_is_reported() {
        let events = Mutex::new(Vec::new());
        let reporter = DiagnosticsReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let _ = canonicalize(&ethanolamine(), &reporter);
        drop(reporter);

        let events = events.into_inner().unwrap();
        let renames = events
            .iter()
            .filter(|e| matches!(e, Diagnostic::AtomRenamed { .. }))
            .count();
        assert_eq!(renames, 9);
        assert!(matches!(events[0], Diagnostic::SegmentRenamed { .. }));
        assert!(matches!(events[1], Diagnostic::ResidueRenamed { .. }));
    }
}
