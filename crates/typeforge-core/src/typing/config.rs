use crate::typing::error::TypingError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The atom typing method, selecting both the force field family and the
/// external toolchain that assigns its types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// CHARMM General Force Field, typed by the MATCH toolchain.
    Cgenff,
    /// AMBER General Force Field, first generation.
    Gaff,
    /// AMBER General Force Field, second generation.
    #[default]
    Gaff2,
}

impl Method {
    /// Every recognized method, in the order used for error messages.
    pub const ALL: [Method; 3] = [Method::Cgenff, Method::Gaff, Method::Gaff2];

    /// Whether this method belongs to the GAFF family (and therefore supports
    /// charge assignment schemes).
    pub fn is_gaff_family(&self) -> bool {
        matches!(self, Method::Gaff | Method::Gaff2)
    }

    fn available() -> String {
        let names: Vec<_> = Method::ALL.iter().map(|m| m.to_string()).collect();
        names.join(", ")
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Cgenff => "CGenFF",
            Method::Gaff => "GAFF",
            Method::Gaff2 => "GAFF2",
        };
        f.write_str(name)
    }
}

impl FromStr for Method {
    type Err = TypingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cgenff" => Ok(Method::Cgenff),
            "gaff" => Ok(Method::Gaff),
            "gaff2" => Ok(Method::Gaff2),
            _ => Err(TypingError::InvalidMethod {
                value: s.to_string(),
                available: Method::available(),
            }),
        }
    }
}

/// An immutable typing request.
///
/// Constructed through [`TypingConfig::builder`]; a default-constructed
/// config types with GAFF2, derives the net charge from the molecule's
/// partial charges, and runs in an owned temporary workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypingConfig {
    /// Typing method; ignored when both direct files are supplied.
    pub method: Method,
    /// Net molecular charge; derived from the molecule when absent.
    pub net_charge: Option<i32>,
    /// Charge assignment scheme handed to the GAFF-family typer (e.g. "gas",
    /// "bcc"). Incompatible with [`Method::Cgenff`].
    pub charge_scheme: Option<String>,
    /// Residue topology file for the direct-file path.
    pub topology_file: Option<PathBuf>,
    /// Parameter file for the direct-file path.
    pub parameter_file: Option<PathBuf>,
    /// Persistent workspace directory; kept (with all intermediate files)
    /// after the run when set.
    pub work_dir: Option<PathBuf>,
}

impl TypingConfig {
    pub fn builder() -> TypingConfigBuilder {
        TypingConfigBuilder::default()
    }

    /// The topology/parameter file pair, when both were supplied.
    pub fn direct_files(&self) -> Option<(&Path, &Path)> {
        match (&self.topology_file, &self.parameter_file) {
            (Some(top), Some(par)) => Some((top.as_path(), par.as_path())),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct TypingConfigBuilder {
    method: Option<Method>,
    net_charge: Option<i32>,
    charge_scheme: Option<String>,
    topology_file: Option<PathBuf>,
    parameter_file: Option<PathBuf>,
    work_dir: Option<PathBuf>,
}

impl TypingConfigBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }
    pub fn net_charge(mut self, charge: i32) -> Self {
        self.net_charge = Some(charge);
        self
    }
    pub fn charge_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.charge_scheme = Some(scheme.into());
        self
    }
    pub fn topology_file(mut self, path: PathBuf) -> Self {
        self.topology_file = Some(path);
        self
    }
    pub fn parameter_file(mut self, path: PathBuf) -> Self {
        self.parameter_file = Some(path);
        self
    }
    pub fn work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = Some(path);
        self
    }

    pub fn build(self) -> TypingConfig {
        TypingConfig {
            method: self.method.unwrap_or_default(),
            net_charge: self.net_charge,
            charge_scheme: self.charge_scheme,
            topology_file: self.topology_file,
            parameter_file: self.parameter_file,
            work_dir: self.work_dir,
        }
    }
}
