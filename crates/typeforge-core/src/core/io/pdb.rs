use super::Error;
use crate::core::models::molecule::Molecule;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes a molecule as fixed-column PDB ATOM records.
///
/// The CGenFF typer reads the atom name, residue name, segment identifier,
/// and element columns; all atoms are emitted as a single residue.
pub fn write<W: Write>(mut writer: W, mol: &Molecule) -> Result<(), Error> {
    let resname = if mol.resname.is_empty() {
        "MOL"
    } else {
        mol.resname.as_str()
    };

    for i in 0..mol.atom_count() {
        writeln!(
            writer,
            "ATOM  {:>5} {} {:<3}  {:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}      {:<4}{:>2}",
            i + 1,
            padded_name(&mol.names[i]),
            resname,
            1,
            mol.positions[i][0],
            mol.positions[i][1],
            mol.positions[i][2],
            1.00,
            0.00,
            mol.segid,
            mol.elements[i],
        )?;
    }
    writeln!(writer, "END")?;

    Ok(())
}

pub fn write_file(path: &Path, mol: &Molecule) -> Result<(), Error> {
    let file = File::create(path)?;
    write(BufWriter::new(file), mol)
}

// Names shorter than four characters start one column in, per PDB convention.
fn padded_name(name: &str) -> String {
    if name.len() >= 4 {
        name[..4].to_string()
    } else {
        format!(" {:<3}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn one_atom() -> Molecule {
        let mut mol = Molecule::new();
        mol.push_atom("C1", "C", Point3::new(1.234, -5.678, 9.0), -0.1);
        mol.segid = "L".to_string();
        mol.resname = "MOL".to_string();
        mol
    }

    #[test]
    fn atom_record_columns_line_up() {
        let mut buffer = Vec::new();
        write(&mut buffer, &one_atom()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let line = text.lines().next().unwrap();

        assert_eq!(&line[0..6], "ATOM  ");
        assert_eq!(line[6..11].trim(), "1");
        assert_eq!(line[12..16].trim(), "C1");
        assert_eq!(line[17..21].trim(), "MOL");
        assert_eq!(line[22..26].trim(), "1");
        assert_eq!(line[30..38].trim(), "1.234");
        assert_eq!(line[38..46].trim(), "-5.678");
        assert_eq!(line[46..54].trim(), "9.000");
        assert_eq!(line[72..76].trim(), "L");
        assert_eq!(line[76..78].trim(), "C");
    }

    #[test]
    fn output_is_terminated_with_end() {
        let mut buffer = Vec::new();
        write(&mut buffer, &one_atom()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().last().unwrap(), "END");
    }

    #[test]
    fn long_names_fill_the_name_column() {
        let mut mol = one_atom();
        mol.names[0] = "H123".to_string();
        let mut buffer = Vec::new();
        write(&mut buffer, &mol).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(&text.lines().next().unwrap()[12..16], "H123");
    }
}
