use crate::config::NetworkSpec;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a network definition from a YAML file
pub fn load_config(config_path: &Path) -> Result<NetworkSpec> {
    info!("Loading network definition from: {:?}", config_path);

    // Open the network file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open '{}'", config_path.display()))?;

    // Parse the YAML content
    let spec: NetworkSpec = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse '{}'", config_path.display()))?;

    // Validate the network definition
    spec.validate()?;

    info!(
        "Loaded '{}' with {} availability zones and {} tiers",
        spec.name,
        spec.azs.len(),
        spec.tiers().count()
    );

    Ok(spec)
}
