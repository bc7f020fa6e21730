use nalgebra::Point3;

/// Covalent bond order, as distinguished by the MOL2 format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
    Amide,
}

/// A covalent bond between two atoms, stored with the lower index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self {
                i: idx1,
                j: idx2,
                order,
            }
        } else {
            Self {
                i: idx2,
                j: idx1,
                order,
            }
        }
    }
}

/// A small-molecule structure stored as parallel per-atom arrays.
///
/// Index `i` refers to the same physical atom across every per-atom array,
/// and all per-atom arrays have identical length. The segment identifier and
/// residue name apply to the whole molecule, matching how single-residue
/// ligands are represented in the typing toolchains.
///
/// Improper dihedrals are quadruples of atom indices; their exact selection
/// semantics belong to the backend that produced them and are carried through
/// opaquely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Per-atom names (e.g. "C1", "H12").
    pub names: Vec<String>,
    /// Per-atom element symbols in canonical capitalization (e.g. "C", "Cl").
    pub elements: Vec<String>,
    /// Per-atom partial charges in elementary charge units.
    pub charges: Vec<f64>,
    /// Per-atom masses in amu.
    pub masses: Vec<f64>,
    /// Per-atom force field atom types (e.g. "c3", "CG321").
    pub atom_types: Vec<String>,
    /// Per-atom coordinates in Angstroms.
    pub positions: Vec<Point3<f64>>,
    /// Covalent bonds between atom indices.
    pub bonds: Vec<Bond>,
    /// Improper dihedrals as atom-index quadruples.
    pub impropers: Vec<[usize; 4]>,
    /// Segment identifier shared by all atoms.
    pub segid: String,
    /// Residue name shared by all atoms.
    pub resname: String,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.names.len()
    }

    /// Appends an atom, keeping the per-atom arrays in lockstep.
    ///
    /// The atom type is left empty and the mass zero; both are filled in by a
    /// typing run.
    pub fn push_atom(&mut self, name: &str, element: &str, position: Point3<f64>, charge: f64) {
        self.names.push(name.to_string());
        self.elements.push(element.to_string());
        self.charges.push(charge);
        self.masses.push(0.0);
        self.atom_types.push(String::new());
        self.positions.push(position);
    }

    /// The net molecular charge, as the nearest integer to the sum of the
    /// atomic partial charges.
    pub fn net_charge(&self) -> i32 {
        self.charges.iter().sum::<f64>().round() as i32
    }
}
