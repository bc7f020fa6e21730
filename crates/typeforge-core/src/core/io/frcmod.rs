use super::{Error, Format};
use crate::core::forcefield::params::{
    AmberAtomType, AmberDihedral, AmberImproper, AmberParameterSet, AngleParam, BondParam,
    LennardJonesParam,
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// Atom type fields are fixed-width dash-joined tuples: two characters per
// type, one dash between.
const BOND_TYPES_WIDTH: usize = 5;
const ANGLE_TYPES_WIDTH: usize = 8;
const DIHEDRAL_TYPES_WIDTH: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Mass,
    Bond,
    Angle,
    Dihedral,
    Improper,
    Nonbonded,
}

/// Reads an AMBER force field modification file as produced by the
/// parameter completer.
pub fn read<R: BufRead>(reader: R) -> Result<AmberParameterSet, Error> {
    let mut set = AmberParameterSet::default();
    let mut section = Section::None;
    let mut seen_mass = false;

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_no = idx + 1;

        // The first line of an FRCMOD is always a free-form remark.
        if line_no == 1 {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            "MASS" => {
                section = Section::Mass;
                seen_mass = true;
                continue;
            }
            "BOND" => {
                section = Section::Bond;
                continue;
            }
            "ANGLE" => {
                section = Section::Angle;
                continue;
            }
            "DIHE" => {
                section = Section::Dihedral;
                continue;
            }
            "IMPROPER" => {
                section = Section::Improper;
                continue;
            }
            _ if trimmed.starts_with("NONB") => {
                section = Section::Nonbonded;
                continue;
            }
            _ => {}
        }

        match section {
            Section::None => {
                return Err(Error::parse(
                    Format::Frcmod,
                    line_no,
                    "data before any section header",
                ));
            }
            Section::Mass => {
                let parts: Vec<_> = trimmed.split_whitespace().collect();
                if parts.len() < 2 {
                    return Err(Error::parse(Format::Frcmod, line_no, "invalid MASS record"));
                }
                let mass = parse_f64(parts[1], Format::Frcmod, line_no, "mass")?;
                let polarizability = parts
                    .get(2)
                    .map(|raw| parse_f64(raw, Format::Frcmod, line_no, "polarizability"))
                    .transpose()?;
                set.atom_types.insert(
                    parts[0].to_string(),
                    AmberAtomType {
                        mass,
                        polarizability,
                    },
                );
            }
            Section::Bond => {
                let (types, rest) = split_type_field(&line, BOND_TYPES_WIDTH);
                let types = split_types::<2>(types, Format::Frcmod, line_no)?;
                let nums = parse_floats(rest, 2, Format::Frcmod, line_no, "BOND record")?;
                set.bonds.insert(
                    (types[0].clone(), types[1].clone()),
                    BondParam {
                        force_constant: nums[0],
                        equilibrium_length: nums[1],
                    },
                );
            }
            Section::Angle => {
                let (types, rest) = split_type_field(&line, ANGLE_TYPES_WIDTH);
                let types = split_types::<3>(types, Format::Frcmod, line_no)?;
                let nums = parse_floats(rest, 2, Format::Frcmod, line_no, "ANGLE record")?;
                set.angles.insert(
                    (types[0].clone(), types[1].clone(), types[2].clone()),
                    AngleParam {
                        force_constant: nums[0],
                        equilibrium_angle: nums[1],
                        urey_bradley: None,
                    },
                );
            }
            Section::Dihedral => {
                let (types, rest) = split_type_field(&line, DIHEDRAL_TYPES_WIDTH);
                let types = split_types::<4>(types, Format::Frcmod, line_no)?;
                let nums = parse_floats(rest, 4, Format::Frcmod, line_no, "DIHE record")?;
                set.dihedrals.push(AmberDihedral {
                    types,
                    divider: nums[0],
                    barrier: nums[1],
                    phase: nums[2],
                    periodicity: nums[3],
                });
            }
            Section::Improper => {
                let (types, rest) = split_type_field(&line, DIHEDRAL_TYPES_WIDTH);
                let types = split_types::<4>(types, Format::Frcmod, line_no)?;
                let nums = parse_floats(rest, 3, Format::Frcmod, line_no, "IMPROPER record")?;
                set.impropers.push(AmberImproper {
                    types,
                    barrier: nums[0],
                    phase: nums[1],
                    periodicity: nums[2],
                });
            }
            Section::Nonbonded => {
                let parts: Vec<_> = trimmed.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(Error::parse(
                        Format::Frcmod,
                        line_no,
                        "invalid NONBON record",
                    ));
                }
                let radius = parse_f64(parts[1], Format::Frcmod, line_no, "vdW radius")?;
                let well_depth = parse_f64(parts[2], Format::Frcmod, line_no, "well depth")?;
                set.nonbonded.insert(
                    parts[0].to_string(),
                    LennardJonesParam { radius, well_depth },
                );
            }
        }
    }

    if !seen_mass {
        return Err(Error::MissingSection {
            format: Format::Frcmod,
            section: "MASS",
        });
    }

    Ok(set)
}

pub fn read_file(path: &Path) -> Result<AmberParameterSet, Error> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}

fn split_type_field(line: &str, width: usize) -> (&str, &str) {
    if line.len() <= width {
        (line, "")
    } else {
        line.split_at(width)
    }
}

fn split_types<const N: usize>(
    field: &str,
    format: Format,
    line_no: usize,
) -> Result<[String; N], Error> {
    let parts: Vec<String> = field.split('-').map(|t| t.trim().to_string()).collect();
    parts.try_into().map_err(|_| {
        Error::parse(
            format,
            line_no,
            format!("expected {} dash-separated atom types", N),
        )
    })
}

fn parse_floats(
    raw: &str,
    count: usize,
    format: Format,
    line_no: usize,
    what: &str,
) -> Result<Vec<f64>, Error> {
    let values: Vec<f64> = raw
        .split_whitespace()
        .take(count)
        .map(|tok| tok.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| Error::parse(format, line_no, format!("invalid number in {}", what)))?;
    if values.len() < count {
        return Err(Error::parse(
            format,
            line_no,
            format!("{} is missing numeric fields", what),
        ));
    }
    Ok(values)
}

fn parse_f64(raw: &str, format: Format, line_no: usize, what: &str) -> Result<f64, Error> {
    raw.parse::<f64>()
        .map_err(|_| Error::parse(format, line_no, format!("invalid {}", what)))
}
