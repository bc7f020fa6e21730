use super::{Error, Format};
use crate::core::models::element;
use crate::core::models::molecule::{Bond, BondOrder, Molecule};
use nalgebra::Point3;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let lines = collect_lines(reader)?;

    let mol_idx = find_section(&lines, "@<TRIPOS>MOLECULE")
        .ok_or_else(|| Error::parse(Format::Mol2, 1, "missing @<TRIPOS>MOLECULE section"))?;

    let mut cursor = mol_idx + 1;
    let _name = next_data_line(&lines, &mut cursor);

    let (count_line_no, count_line) = next_data_line(&lines, &mut cursor)
        .ok_or_else(|| Error::parse(Format::Mol2, cursor + 1, "missing counts line"))?;
    let (atom_count, bond_count) = parse_counts(&count_line, count_line_no)?;

    let atom_section = find_section(&lines, "@<TRIPOS>ATOM")
        .ok_or_else(|| Error::parse(Format::Mol2, cursor + 1, "missing @<TRIPOS>ATOM section"))?;
    let bond_section = find_section(&lines, "@<TRIPOS>BOND").unwrap_or(lines.len());

    let (mut mol, id_map) = parse_atoms(&lines, atom_section + 1, bond_section, atom_count)?;
    mol.bonds = parse_bonds(&lines, bond_section + 1, atom_count, bond_count, &id_map)?;

    Ok(mol)
}

pub fn read_file(path: &Path) -> Result<Molecule, Error> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}

pub fn write<W: Write>(mut writer: W, mol: &Molecule) -> Result<(), Error> {
    let resname = if mol.resname.is_empty() {
        "MOL"
    } else {
        mol.resname.as_str()
    };

    writeln!(writer, "@<TRIPOS>MOLECULE")?;
    writeln!(writer, "{}", resname)?;
    writeln!(writer, "{:>5} {:>5} 1 0 0", mol.atom_count(), mol.bonds.len())?;
    writeln!(writer, "SMALL")?;
    writeln!(writer, "USER_CHARGES")?;
    writeln!(writer)?;

    writeln!(writer, "@<TRIPOS>ATOM")?;
    for i in 0..mol.atom_count() {
        writeln!(
            writer,
            "{:>7} {:<8} {:>10.4} {:>10.4} {:>10.4} {:<6} {:>3} {:<8} {:>8.4}",
            i + 1,
            mol.names[i],
            mol.positions[i][0],
            mol.positions[i][1],
            mol.positions[i][2],
            mol.elements[i],
            1,
            resname,
            mol.charges[i],
        )?;
    }

    writeln!(writer, "@<TRIPOS>BOND")?;
    for (i, bond) in mol.bonds.iter().enumerate() {
        writeln!(
            writer,
            "{:>7} {:>4} {:>4} {}",
            i + 1,
            bond.i + 1,
            bond.j + 1,
            bond_order_to_mol2(bond.order),
        )?;
    }

    Ok(())
}

pub fn write_file(path: &Path, mol: &Molecule) -> Result<(), Error> {
    let file = File::create(path)?;
    write(BufWriter::new(file), mol)
}

fn bond_order_to_mol2(order: BondOrder) -> &'static str {
    match order {
        BondOrder::Single => "1",
        BondOrder::Double => "2",
        BondOrder::Triple => "3",
        BondOrder::Aromatic => "ar",
        BondOrder::Amide => "am",
    }
}

fn bond_order_from_mol2(raw: &str) -> Option<BondOrder> {
    match raw {
        "1" => Some(BondOrder::Single),
        "2" => Some(BondOrder::Double),
        "3" => Some(BondOrder::Triple),
        "ar" => Some(BondOrder::Aromatic),
        "am" => Some(BondOrder::Amide),
        // Dummy/unknown bonds are carried as single; connectivity matters,
        // the order does not survive typing anyway.
        "du" | "un" | "nc" => Some(BondOrder::Single),
        _ => None,
    }
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|v| (i + 1, v)).map_err(Error::from))
        .collect()
}

fn find_section(lines: &[(usize, String)], name: &str) -> Option<usize> {
    lines
        .iter()
        .position(|(_, line)| line.trim().eq_ignore_ascii_case(name))
}

fn next_data_line(lines: &[(usize, String)], cursor: &mut usize) -> Option<(usize, String)> {
    while *cursor < lines.len() {
        let (ln, content) = &lines[*cursor];
        *cursor += 1;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Some((*ln, content.clone()));
    }
    None
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let parts: Vec<_> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(Error::parse(
            Format::Mol2,
            line_no,
            "counts line must have at least atom and bond counts",
        ));
    }
    let atoms = parts[0]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Mol2, line_no, "invalid atom count in counts line"))?;
    let bonds = parts[1]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Mol2, line_no, "invalid bond count in counts line"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(
    lines: &[(usize, String)],
    start: usize,
    end: usize,
    expected: usize,
) -> Result<(Molecule, HashMap<usize, usize>), Error> {
    let mut mol = Molecule::new();
    let mut id_map = HashMap::new();

    for idx in 0..expected {
        let line_idx = start + idx;
        if line_idx >= end {
            return Err(Error::parse(
                Format::Mol2,
                lines.last().map(|(ln, _)| *ln).unwrap_or(0),
                "ATOM section ended before expected atom count",
            ));
        }
        let (ln, raw) = &lines[line_idx];
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(Error::parse(Format::Mol2, *ln, "invalid ATOM line"));
        }

        let atom_id = parts[0]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid atom id in ATOM line"))?;
        let x = parts[2]
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid x coordinate in ATOM line"))?;
        let y = parts[3]
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid y coordinate in ATOM line"))?;
        let z = parts[4]
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid z coordinate in ATOM line"))?;

        // The SYBYL type ("C.3", "N.ar") leads with the element; fall back to
        // the atom name for files that put bare element symbols in the name.
        let sybyl_root = parts[5].split('.').next().unwrap_or(parts[5]);
        let element = element::normalize_symbol(sybyl_root)
            .or_else(|| element::normalize_symbol(parts[1].trim_end_matches(|c: char| c.is_ascii_digit())))
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "unable to infer element"))?;

        let charge = if parts.len() >= 9 {
            parts[8].parse::<f64>().map_err(|_| {
                Error::parse(Format::Mol2, *ln, "invalid partial charge in ATOM line")
            })?
        } else {
            0.0
        };

        if parts.len() >= 8 && mol.resname.is_empty() {
            mol.resname = parts[7].to_string();
        }

        id_map.insert(atom_id, mol.atom_count());
        mol.push_atom(parts[1], element, Point3::new(x, y, z), charge);
    }

    Ok((mol, id_map))
}

fn parse_bonds(
    lines: &[(usize, String)],
    start: usize,
    atom_count: usize,
    expected: usize,
    id_map: &HashMap<usize, usize>,
) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(expected);

    for idx in 0..expected {
        let line_idx = start + idx;
        if line_idx >= lines.len() {
            return Err(Error::parse(
                Format::Mol2,
                lines.last().map(|(ln, _)| *ln).unwrap_or(0),
                "BOND section ended before expected bond count",
            ));
        }
        let (ln, raw) = &lines[line_idx];
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(Error::parse(Format::Mol2, *ln, "invalid BOND line"));
        }

        let a1 = parts[1]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid first atom id in BOND line"))?;
        let a2 = parts[2]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid second atom id in BOND line"))?;

        let order = bond_order_from_mol2(parts[3])
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "unsupported bond type in BOND line"))?;

        let i = *id_map
            .get(&a1)
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "bond references unknown atom id"))?;
        let j = *id_map
            .get(&a2)
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "bond references unknown atom id"))?;

        if i >= atom_count || j >= atom_count {
            return Err(Error::parse(
                Format::Mol2,
                *ln,
                "bond references atom beyond declared count",
            ));
        }

        bonds.push(Bond::new(i, j, order));
    }

    Ok(bonds)
}
