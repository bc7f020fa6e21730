use phf::{Map, phf_map};

/// Standard atomic masses (amu) for the elements that occur in small-molecule
/// parameterization. Keys are canonical element symbols.
static ELEMENT_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008,
    "He" => 4.0026,
    "Li" => 6.94,
    "Be" => 9.0122,
    "B" => 10.81,
    "C" => 12.011,
    "N" => 14.007,
    "O" => 15.999,
    "F" => 18.998,
    "Ne" => 20.180,
    "Na" => 22.990,
    "Mg" => 24.305,
    "Al" => 26.982,
    "Si" => 28.085,
    "P" => 30.974,
    "S" => 32.06,
    "Cl" => 35.45,
    "K" => 39.098,
    "Ca" => 40.078,
    "Mn" => 54.938,
    "Fe" => 55.845,
    "Co" => 58.933,
    "Ni" => 58.693,
    "Cu" => 63.546,
    "Zn" => 65.38,
    "Se" => 78.971,
    "Br" => 79.904,
    "I" => 126.90,
};

/// Maximum distance (amu) between a reported mass and a tabulated element
/// mass for the element to be considered recovered.
const MASS_TOLERANCE: f64 = 0.5;

/// Returns the standard atomic mass for a canonical element symbol.
pub fn mass_of(symbol: &str) -> Option<f64> {
    ELEMENT_MASSES.get(symbol).copied()
}

/// Normalizes an element symbol to its canonical capitalization.
///
/// Structure files are inconsistent about element case (`CL`, `cl`, `Cl` all
/// occur in the wild). Returns the canonical symbol from the element table,
/// or `None` if the input is not a known element.
pub fn normalize_symbol(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let first = chars.next()?;
    let candidate: String = first
        .to_ascii_uppercase()
        .to_string()
        .chars()
        .chain(chars.map(|c| c.to_ascii_lowercase()))
        .collect();
    ELEMENT_MASSES.get_entry(candidate.as_str()).map(|(k, _)| *k)
}

/// Recovers an element symbol from an atomic mass.
///
/// The AMBER FRCMOD format records only a mass per atom type, so the element
/// identity of a typed atom has to be reconstructed by nearest-mass lookup.
/// Returns `None` if no tabulated element lies within [`MASS_TOLERANCE`].
pub fn by_mass(mass: f64) -> Option<&'static str> {
    let mut best: Option<(&'static str, f64)> = None;
    for (symbol, table_mass) in ELEMENT_MASSES.entries() {
        let delta = (mass - table_mass).abs();
        if delta <= MASS_TOLERANCE && best.is_none_or(|(_, d)| delta < d) {
            best = Some((*symbol, delta));
        }
    }
    best.map(|(symbol, _)| symbol)
}
