use std::env;
use std::path::PathBuf;

pub const DEBUG_MISSING_TARGETS_ENV: &str = "BODYFORM_DEBUG_MISSING_TARGETS";
pub const SCHEMA_PATH_ENV: &str = "BODYFORM_SCHEMA_PATH";

/// Runtime switches for the engine. Nothing here changes rule output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Log every shape key the morph target dictionary does not know about.
    pub debug_missing_targets: bool,
    /// Alternative slider catalogue (YAML) replacing the embedded one.
    pub schema_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(DEBUG_MISSING_TARGETS_ENV).ok().as_deref(),
            env::var(SCHEMA_PATH_ENV).ok().as_deref(),
        )
    }

    fn from_vars(debug: Option<&str>, schema_path: Option<&str>) -> Self {
        let debug_missing_targets = debug.map(parse_flag).unwrap_or(false);
        let schema_path = schema_path
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self { debug_missing_targets, schema_path }
    }

    pub fn with_debug_missing_targets(mut self, enabled: bool) -> Self {
        self.debug_missing_targets = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
