//! Persistence keys and file locations

pub struct PersistenceConfig {
    /// Fixed project prefix every stored key is namespaced under
    pub key_prefix: &'static str,
    /// Key (before namespacing) of the statistical band config
    pub band_config_key: &'static str,
    /// Default directory used by the file-backed store
    pub state_directory: &'static str,
    /// Path for saving/loading the viewer's UI state (eframe persistence)
    pub app_state_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    key_prefix: "sigma_bands",
    band_config_key: "statistical_bands",
    state_directory: ".sigma_bands",
    app_state_path: ".states.json",
};

/// Prefix a bare key with the project namespace.
/// Example: "statistical_bands" -> "sigma_bands.statistical_bands"
pub fn namespaced_key(key: &str) -> String {
    format!("{}.{}", PERSISTENCE.key_prefix, key)
}
