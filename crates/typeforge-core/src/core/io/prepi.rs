use super::{Error, Format};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Atom names, types, charges, and improper dihedrals parsed from an AMBER
/// prep-input residue template.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepiData {
    pub names: Vec<String>,
    pub atom_types: Vec<String>,
    pub charges: Vec<f64>,
    pub impropers: Vec<[usize; 4]>,
}

/// Reads a PREPI residue template as produced by the GAFF-family typer.
///
/// The atom table follows the `CORRECT ... DU BEG` control line and its cut
/// line; the three leading dummy atoms (type `DU`) are skipped. The IMPROPER
/// section lists one name quadruple per line, resolved here to indices into
/// the parsed atom order.
pub fn read<R: BufRead>(reader: R) -> Result<PrepiData, Error> {
    let lines: Vec<(usize, String)> = reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|v| (i + 1, v)).map_err(Error::from))
        .collect::<Result<_, _>>()?;

    let control_idx = lines
        .iter()
        .position(|(_, line)| line.split_whitespace().next() == Some("CORRECT"))
        .ok_or(Error::MissingSection {
            format: Format::Prepi,
            section: "atom table",
        })?;

    let mut names = Vec::new();
    let mut atom_types = Vec::new();
    let mut charges = Vec::new();

    // Control line, then the cut line, then one record per atom until the
    // first blank line.
    for (ln, raw) in lines.iter().skip(control_idx + 2) {
        if raw.trim().is_empty() {
            break;
        }
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 11 || parts[0].parse::<usize>().is_err() {
            return Err(Error::parse(Format::Prepi, *ln, "invalid atom record"));
        }
        if parts[2] == "DU" {
            continue;
        }
        let charge = parts[10]
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Prepi, *ln, "invalid charge in atom record"))?;
        names.push(parts[1].to_string());
        atom_types.push(parts[2].to_string());
        charges.push(charge);
    }

    if names.is_empty() {
        return Err(Error::MissingSection {
            format: Format::Prepi,
            section: "atom table",
        });
    }

    let index_of: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut impropers = Vec::new();
    if let Some(impr_idx) = lines
        .iter()
        .position(|(_, line)| line.trim() == "IMPROPER")
    {
        for (ln, raw) in lines.iter().skip(impr_idx + 1) {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed == "DONE" || trimmed == "LOOP" || trimmed == "STOP" {
                break;
            }
            let quad: Vec<_> = trimmed.split_whitespace().collect();
            if quad.len() != 4 {
                return Err(Error::parse(
                    Format::Prepi,
                    *ln,
                    "IMPROPER record must name four atoms",
                ));
            }
            let mut indices = [0usize; 4];
            for (slot, name) in indices.iter_mut().zip(&quad) {
                *slot = *index_of.get(*name).ok_or_else(|| {
                    Error::parse(
                        Format::Prepi,
                        *ln,
                        format!("IMPROPER references unknown atom '{}'", name),
                    )
                })?;
            }
            impropers.push(indices);
        }
    }

    Ok(PrepiData {
        names,
        atom_types,
        charges,
        impropers,
    })
}

pub fn read_file(path: &Path) -> Result<PrepiData, Error> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHYLAMINE_PREPI: &str = "\
    0    0    2

This is a remark line
molecule.res
MOL   INT  0
CORRECT     OMIT DU   BEG
  0.0000
   1  DUMM  DU    M    0  -1  -2     0.000      0.0       0.0    0.00000
   2  DUMM  DU    M    1   0  -1     1.449      0.0       0.0    0.00000
   3  DUMM  DU    M    2   1   0     1.522    111.1       0.0    0.00000
   4  C1    c3    M    3   2   1     1.540    111.208   180.000 -0.10318
   5  N1    n3    M    4   3   2     1.470    110.500    60.000 -0.92350
   6  H1    hn    E    5   4   3     1.010    109.500   180.000  0.36500

LOOP

IMPROPER
   C1   H1   N1   H1

DONE
STOP
";

    #[test]
    fn read_skips_dummies_and_collects_atoms() {
        let data = read(METHYLAMINE_PREPI.as_bytes()).unwrap();
        assert_eq!(data.names, vec!["C1", "N1", "H1"]);
        assert_eq!(data.atom_types, vec!["c3", "n3", "hn"]);
        assert_eq!(data.charges, vec![-0.10318, -0.9235, 0.365]);
    }

    #[test]
    fn read_resolves_improper_names_to_indices() {
        let data = read(METHYLAMINE_PREPI.as_bytes()).unwrap();
        assert_eq!(data.impropers, vec![[0, 2, 1, 2]]);
    }

    #[test]
    fn read_rejects_improper_with_unknown_atom() {
        let broken = METHYLAMINE_PREPI.replace("   C1   H1   N1   H1", "   C1   H1   N1   ZZ");
        let result = read(broken.as_bytes());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn read_requires_an_atom_table() {
        let result = read("just some text\n\n".as_bytes());
        assert!(matches!(
            result,
            Err(Error::MissingSection {
                section: "atom table",
                ..
            })
        ));
    }

    #[test]
    fn read_without_improper_section_yields_empty_list() {
        let trimmed: String = METHYLAMINE_PREPI
            .lines()
            .take_while(|line| line.trim() != "IMPROPER")
            .map(|line| format!("{}\n", line))
            .collect();
        let data = read(trimmed.as_bytes()).unwrap();
        assert!(data.impropers.is_empty());
    }
}
