use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use typeforge::typing::config::{Method, TypingConfig};

/// Typing options read from a TOML file; every field is optional and
/// command-line flags override whatever the file says.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub method: Option<String>,
    pub charge_scheme: Option<String>,
    pub net_charge: Option<i32>,
    pub topology: Option<PathBuf>,
    pub parameters: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("cannot parse '{}': {}", path.display(), e))
        })
    }
}

/// Merges the config file (if any) under the command-line flags and builds
/// the typing request plus the output path.
pub fn resolve(cli: &Cli) -> Result<(TypingConfig, PathBuf)> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let method = match cli.method.clone().or(file.method) {
        Some(name) => name.parse::<Method>()?,
        None => Method::default(),
    };

    let mut builder = TypingConfig::builder().method(method);
    if let Some(charge) = cli.net_charge.or(file.net_charge) {
        builder = builder.net_charge(charge);
    }
    if let Some(scheme) = cli.charge_scheme.clone().or(file.charge_scheme) {
        builder = builder.charge_scheme(scheme);
    }
    if let Some(path) = cli.topology.clone().or(file.topology) {
        builder = builder.topology_file(path);
    }
    if let Some(path) = cli.parameters.clone().or(file.parameters) {
        builder = builder.parameter_file(path);
    }
    if let Some(path) = cli.work_dir.clone().or(file.work_dir) {
        builder = builder.work_dir(path);
    }

    let output = cli
        .output
        .clone()
        .or(file.output)
        .unwrap_or_else(|| default_output(&cli.input));

    Ok((builder.build(), output))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mol");
    input.with_file_name(format!("{}_typed.mol2", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn file_config_parses_a_full_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tforge.toml");
        fs::write(
            &path,
            r#"
            method = "GAFF"
            charge_scheme = "gas"
            net_charge = -1
            work_dir = "scratch"
            "#,
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.method.as_deref(), Some("GAFF"));
        assert_eq!(config.net_charge, Some(-1));
        assert_eq!(config.work_dir.as_deref(), Some(Path::new("scratch")));
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tforge.toml");
        fs::write(&path, "mehtod = \"GAFF\"\n").unwrap();

        assert!(matches!(
            FileConfig::load(&path),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tforge.toml");
        fs::write(&path, "method = \"CGenFF\"\nnet_charge = 2\n").unwrap();

        let cli = Cli::parse_from([
            "tforge",
            "mol.mol2",
            "--config",
            path.to_str().unwrap(),
            "--method",
            "GAFF2",
        ]);
        let (config, _) = resolve(&cli).unwrap();

        assert_eq!(config.method, Method::Gaff2);
        // Untouched file values still apply.
        assert_eq!(config.net_charge, Some(2));
    }

    #[test]
    fn invalid_method_from_file_is_a_typing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tforge.toml");
        fs::write(&path, "method = \"OPLS\"\n").unwrap();

        let cli = Cli::parse_from(["tforge", "mol.mol2", "--config", path.to_str().unwrap()]);
        assert!(matches!(resolve(&cli), Err(CliError::Typing(_))));
    }

    #[test]
    fn output_defaults_next_to_the_input() {
        let cli = Cli::parse_from(["tforge", "structures/lig.mol2"]);
        let (_, output) = resolve(&cli).unwrap();
        assert_eq!(output, PathBuf::from("structures/lig_typed.mol2"));
    }
}
