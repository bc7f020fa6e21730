use super::{Error, Format};
use crate::core::forcefield::params::{
    AngleParam, BondParam, CharmmDihedral, CharmmImproper, CharmmNonbonded, CharmmParameterSet,
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Bonds,
    Angles,
    Dihedrals,
    Impropers,
    Nonbonded,
}

/// Reads a CHARMM parameter file.
///
/// The returned set carries the bonded and nonbonded tables only; the atom
/// type table lives in the companion RTF and is merged in by
/// [`CharmmParameterSet::from_files`].
pub fn read<R: BufRead>(reader: R) -> Result<CharmmParameterSet, Error> {
    let mut set = CharmmParameterSet::default();
    let mut section = Section::None;
    let mut in_continuation = false;

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_no = idx + 1;

        let code = line.split('!').next().unwrap_or("").trim();
        if code.is_empty() || code.starts_with('*') {
            continue;
        }

        // The NONBONDED header may spread options over continuation lines
        // terminated with '-'; none of them are parameter records.
        if in_continuation {
            in_continuation = code.ends_with('-');
            continue;
        }

        let upper = code.to_ascii_uppercase();
        match upper.split_whitespace().next().unwrap_or("") {
            "BONDS" => {
                section = Section::Bonds;
                continue;
            }
            "ANGLES" => {
                section = Section::Angles;
                continue;
            }
            "DIHEDRALS" => {
                section = Section::Dihedrals;
                continue;
            }
            "IMPROPER" | "IMPHI" => {
                section = Section::Impropers;
                continue;
            }
            "NONBONDED" => {
                section = Section::Nonbonded;
                in_continuation = code.ends_with('-');
                continue;
            }
            "END" | "RETURN" => break,
            "CUTNB" => continue,
            _ => {}
        }

        let parts: Vec<_> = code.split_whitespace().collect();
        match section {
            Section::None => {
                return Err(Error::parse(
                    Format::Prm,
                    line_no,
                    "data before any section header",
                ));
            }
            Section::Bonds => {
                if parts.len() < 4 {
                    return Err(Error::parse(Format::Prm, line_no, "invalid BONDS record"));
                }
                let force_constant = parse_f64(parts[2], line_no, "force constant")?;
                let equilibrium_length = parse_f64(parts[3], line_no, "bond length")?;
                set.bonds.insert(
                    (parts[0].to_string(), parts[1].to_string()),
                    BondParam {
                        force_constant,
                        equilibrium_length,
                    },
                );
            }
            Section::Angles => {
                if parts.len() < 5 {
                    return Err(Error::parse(Format::Prm, line_no, "invalid ANGLES record"));
                }
                let force_constant = parse_f64(parts[3], line_no, "force constant")?;
                let equilibrium_angle = parse_f64(parts[4], line_no, "angle")?;
                let urey_bradley = if parts.len() >= 7 {
                    Some((
                        parse_f64(parts[5], line_no, "Urey-Bradley constant")?,
                        parse_f64(parts[6], line_no, "Urey-Bradley length")?,
                    ))
                } else {
                    None
                };
                set.angles.insert(
                    (
                        parts[0].to_string(),
                        parts[1].to_string(),
                        parts[2].to_string(),
                    ),
                    AngleParam {
                        force_constant,
                        equilibrium_angle,
                        urey_bradley,
                    },
                );
            }
            Section::Dihedrals => {
                if parts.len() < 7 {
                    return Err(Error::parse(
                        Format::Prm,
                        line_no,
                        "invalid DIHEDRALS record",
                    ));
                }
                set.dihedrals.push(CharmmDihedral {
                    types: [
                        parts[0].to_string(),
                        parts[1].to_string(),
                        parts[2].to_string(),
                        parts[3].to_string(),
                    ],
                    force_constant: parse_f64(parts[4], line_no, "force constant")?,
                    multiplicity: parts[5].parse::<i32>().map_err(|_| {
                        Error::parse(Format::Prm, line_no, "invalid multiplicity")
                    })?,
                    phase: parse_f64(parts[6], line_no, "phase")?,
                });
            }
            Section::Impropers => {
                if parts.len() < 7 {
                    return Err(Error::parse(
                        Format::Prm,
                        line_no,
                        "invalid IMPROPER record",
                    ));
                }
                // Field 6 is an unused placeholder in the CHARMM improper
                // format; the phase follows it.
                set.impropers.push(CharmmImproper {
                    types: [
                        parts[0].to_string(),
                        parts[1].to_string(),
                        parts[2].to_string(),
                        parts[3].to_string(),
                    ],
                    force_constant: parse_f64(parts[4], line_no, "force constant")?,
                    phase: parse_f64(parts[6], line_no, "phase")?,
                });
            }
            Section::Nonbonded => {
                if parts.len() < 4 {
                    return Err(Error::parse(
                        Format::Prm,
                        line_no,
                        "invalid NONBONDED record",
                    ));
                }
                let well_depth = -parse_f64(parts[2], line_no, "well depth")?;
                let rmin_half = parse_f64(parts[3], line_no, "Rmin/2")?;
                set.nonbonded.insert(
                    parts[0].to_string(),
                    CharmmNonbonded {
                        well_depth,
                        rmin_half,
                    },
                );
            }
        }
    }

    Ok(set)
}

pub fn read_file(path: &Path) -> Result<CharmmParameterSet, Error> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}

fn parse_f64(raw: &str, line_no: usize, what: &str) -> Result<f64, Error> {
    raw.parse::<f64>()
        .map_err(|_| Error::parse(Format::Prm, line_no, format!("invalid {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRM: &str = "\
* Parameters generated for a methanamide fragment
*

BONDS
CG2O1  OG2D1   620.00     1.230
CG2O1  NG2S2   430.00     1.360

ANGLES
OG2D1  CG2O1  NG2S2   75.00    122.50   50.00   2.37
NG2S2  CG2O1  HGR52   44.00    111.00

DIHEDRALS
HGR52  NG2S2  CG2O1  OG2D1   1.40   2   180.00

IMPROPER
CG2O1  NG2S2  OG2D1  HGR52  45.00   0   0.00

NONBONDED nbxmod  5 atom cdiel fshift vatom vdistance vfswitch -
cutnb 14.0 ctofnb 12.0 ctonnb 10.0 eps 1.0 e14fac 1.0 wmin 1.5
CG2O1    0.0       -0.1100     2.0000
NG2S2    0.0       -0.2000     1.8500

END
";

    #[test]
    fn read_collects_bonded_tables() {
        let set = read(PRM.as_bytes()).unwrap();

        assert_eq!(
            set.bonds[&("CG2O1".to_string(), "OG2D1".to_string())],
            BondParam {
                force_constant: 620.0,
                equilibrium_length: 1.23,
            }
        );

        let ub_angle = &set.angles[&(
            "OG2D1".to_string(),
            "CG2O1".to_string(),
            "NG2S2".to_string(),
        )];
        assert_eq!(ub_angle.urey_bradley, Some((50.0, 2.37)));
        let plain_angle = &set.angles[&(
            "NG2S2".to_string(),
            "CG2O1".to_string(),
            "HGR52".to_string(),
        )];
        assert_eq!(plain_angle.urey_bradley, None);

        assert_eq!(set.dihedrals.len(), 1);
        assert_eq!(set.dihedrals[0].multiplicity, 2);
        assert_eq!(set.dihedrals[0].phase, 180.0);

        assert_eq!(set.impropers.len(), 1);
        assert_eq!(set.impropers[0].force_constant, 45.0);
    }

    #[test]
    fn read_negates_nonbonded_well_depth() {
        let set = read(PRM.as_bytes()).unwrap();
        assert_eq!(set.nonbonded["CG2O1"].well_depth, 0.11);
        assert_eq!(set.nonbonded["NG2S2"].rmin_half, 1.85);
    }

    #[test]
    fn read_skips_nonbonded_header_continuation() {
        // The cutnb line after the NONBONDED header must not be parsed as a
        // parameter record.
        let set = read(PRM.as_bytes()).unwrap();
        assert_eq!(set.nonbonded.len(), 2);
    }

    #[test]
    fn read_rejects_data_before_a_section() {
        let result = read("CG2O1  OG2D1   620.00     1.230\n".as_bytes());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn read_leaves_the_type_table_empty() {
        let set = read(PRM.as_bytes()).unwrap();
        assert!(set.atom_types.is_empty());
    }
}
