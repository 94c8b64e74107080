//! Genesis parameter file loading.

use std::path::Path;

use crate::error::ConfigError;
use crate::v4::V4Params;

/// Load and validate EVM parameters from a YAML file.
///
/// Missing fields take their default values; unknown fields are rejected.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The YAML is invalid
/// - The resulting parameter set fails validation
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<V4Params, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    load_params_from_str(&content, &path_str)
}

/// Load and validate EVM parameters from a YAML string.
pub fn load_params_from_str(content: &str, source_name: &str) -> Result<V4Params, ConfigError> {
    let params: V4Params = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        path: source_name.to_string(),
        source: e,
    })?;

    params.validate().map_err(|e| ConfigError::Validation {
        path: source_name.to_string(),
        source: e,
    })?;

    Ok(params)
}
