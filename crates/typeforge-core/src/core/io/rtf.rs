use super::{Error, Format};
use crate::core::forcefield::params::CharmmAtomType;
use crate::core::models::element;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Per-atom data and the atom type table parsed from a CHARMM residue
/// topology file.
///
/// The per-atom arrays follow the residue's ATOM record order; masses and
/// elements are resolved through the MASS table. Impropers are IMPR name
/// quadruples resolved to atom indices.
#[derive(Debug, Clone, PartialEq)]
pub struct RtfData {
    pub names: Vec<String>,
    pub elements: Vec<String>,
    pub atom_types: Vec<String>,
    pub charges: Vec<f64>,
    pub masses: Vec<f64>,
    pub impropers: Vec<[usize; 4]>,
    pub type_table: HashMap<String, CharmmAtomType>,
}

/// Reads a CHARMM RTF residue topology file.
pub fn read<R: BufRead>(reader: R) -> Result<RtfData, Error> {
    let mut type_table = HashMap::new();
    let mut names = Vec::new();
    let mut atom_types = Vec::new();
    let mut charges = Vec::new();
    let mut improper_names: Vec<(usize, [String; 4])> = Vec::new();

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_no = idx + 1;

        // '*' title lines and '!' comments carry no data.
        let code = line.split('!').next().unwrap_or("").trim();
        if code.is_empty() || code.starts_with('*') {
            continue;
        }
        let parts: Vec<_> = code.split_whitespace().collect();

        match parts[0].to_ascii_uppercase().as_str() {
            "MASS" => {
                if parts.len() < 4 {
                    return Err(Error::parse(Format::Rtf, line_no, "invalid MASS record"));
                }
                let mass = parts[2].parse::<f64>().map_err(|_| {
                    Error::parse(Format::Rtf, line_no, "invalid mass in MASS record")
                })?;
                let element = parts
                    .get(3)
                    .and_then(|raw| element::normalize_symbol(raw))
                    .ok_or_else(|| {
                        Error::parse(Format::Rtf, line_no, "invalid element in MASS record")
                    })?;
                type_table.insert(
                    parts[1].to_string(),
                    CharmmAtomType {
                        mass,
                        element: element.to_string(),
                    },
                );
            }
            "ATOM" => {
                if parts.len() < 4 {
                    return Err(Error::parse(Format::Rtf, line_no, "invalid ATOM record"));
                }
                let charge = parts[3].parse::<f64>().map_err(|_| {
                    Error::parse(Format::Rtf, line_no, "invalid charge in ATOM record")
                })?;
                names.push(parts[1].to_string());
                atom_types.push(parts[2].to_string());
                charges.push(charge);
            }
            "IMPR" => {
                // One or more quadruples per record.
                if (parts.len() - 1) % 4 != 0 || parts.len() == 1 {
                    return Err(Error::parse(
                        Format::Rtf,
                        line_no,
                        "IMPR record must name a multiple of four atoms",
                    ));
                }
                for quad in parts[1..].chunks(4) {
                    improper_names.push((
                        line_no,
                        [
                            quad[0].to_string(),
                            quad[1].to_string(),
                            quad[2].to_string(),
                            quad[3].to_string(),
                        ],
                    ));
                }
            }
            _ => {}
        }
    }

    if names.is_empty() {
        return Err(Error::MissingSection {
            format: Format::Rtf,
            section: "RESI atom",
        });
    }

    let index_of: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut elements = Vec::with_capacity(names.len());
    let mut masses = Vec::with_capacity(names.len());
    for (name, atom_type) in names.iter().zip(&atom_types) {
        let entry = type_table.get(atom_type).ok_or_else(|| {
            Error::parse(
                Format::Rtf,
                0,
                format!("atom '{}' uses type '{}' missing from MASS table", name, atom_type),
            )
        })?;
        elements.push(entry.element.clone());
        masses.push(entry.mass);
    }

    let mut impropers = Vec::with_capacity(improper_names.len());
    for (line_no, quad) in improper_names {
        let mut indices = [0usize; 4];
        for (slot, name) in indices.iter_mut().zip(&quad) {
            *slot = *index_of.get(name.as_str()).ok_or_else(|| {
                Error::parse(
                    Format::Rtf,
                    line_no,
                    format!("IMPR references unknown atom '{}'", name),
                )
            })?;
        }
        impropers.push(indices);
    }

    Ok(RtfData {
        names,
        elements,
        atom_types,
        charges,
        masses,
        impropers,
        type_table,
    })
}

pub fn read_file(path: &Path) -> Result<RtfData, Error> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RTF: &str = "\
* Topology generated for a methanamide fragment
*
22 1

MASS 1    CG2O1 12.01100 C
MASS 2    NG2S2 14.00700 N
MASS 3    HGR52 1.00800 H
MASS 4    OG2D1 15.99900 O

AUTO ANGLES DIHE

RESI MOL       0.000
GROUP
ATOM C1    CG2O1   0.420 ! carbonyl carbon
ATOM O1    OG2D1  -0.410
ATOM N1    NG2S2  -0.690
ATOM H1    HGR52   0.340
ATOM H2    HGR52   0.340
BOND C1 O1
BOND C1 N1
BOND N1 H1
BOND N1 H2
IMPR C1 N1 O1 H1 N1 C1 H1 H2

PATCHING FIRS NONE LAST NONE

END
";

    #[test]
    fn read_collects_atoms_in_order() {
        let data = read(RTF.as_bytes()).unwrap();
        assert_eq!(data.names, vec!["C1", "O1", "N1", "H1", "H2"]);
        assert_eq!(data.atom_types[0], "CG2O1");
        assert_eq!(data.charges, vec![0.42, -0.41, -0.69, 0.34, 0.34]);
        assert_eq!(data.elements, vec!["C", "O", "N", "H", "H"]);
        assert_eq!(data.masses[2], 14.007);
    }

    #[test]
    fn read_splits_impr_records_into_quadruples() {
        let data = read(RTF.as_bytes()).unwrap();
        assert_eq!(data.impropers, vec![[0, 2, 1, 3], [2, 0, 3, 4]]);
    }

    #[test]
    fn read_exposes_the_type_table() {
        let data = read(RTF.as_bytes()).unwrap();
        assert_eq!(data.type_table.len(), 4);
        assert_eq!(data.type_table["OG2D1"].element, "O");
    }

    #[test]
    fn read_rejects_atom_with_unknown_type() {
        let broken = RTF.replace("MASS 2    NG2S2 14.00700 N\n", "");
        let result = read(broken.as_bytes());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn read_rejects_impr_with_unknown_atom() {
        let broken = RTF.replace("IMPR C1 N1 O1 H1 N1 C1 H1 H2", "IMPR C1 N1 O1 ZZ");
        let result = read(broken.as_bytes());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn read_requires_resi_atoms() {
        let result = read("* title\nMASS 1 CA 12.011 C\nEND\n".as_bytes());
        assert!(matches!(
            result,
            Err(Error::MissingSection {
                section: "RESI atom",
                ..
            })
        ));
    }
}
