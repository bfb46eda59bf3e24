//! Server configuration.
//!
//! Settings are layered: built-in defaults, then the user config file
//! (`$XDG_CONFIG_HOME/ant-ls/ant-ls.toml`), then LSP initialization options.
//! Later layers override earlier ones; an invalid layer is reported and
//! skipped rather than aborting startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Effective completion settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntSettings {
    /// Maximum number of proposals returned for one request.
    pub max_results: usize,
    /// Whether proposal display strings carry a ` - description` suffix.
    pub include_descriptions: bool,
}

impl Default for AntSettings {
    fn default() -> Self {
        Self {
            max_results: 100,
            include_descriptions: true,
        }
    }
}

/// One settings layer; unset fields fall through to the layer below.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AntSettingsPatch {
    pub max_results: Option<usize>,
    pub include_descriptions: Option<bool>,
}

impl AntSettings {
    fn apply(&mut self, patch: AntSettingsPatch) {
        if let Some(max_results) = patch.max_results {
            self.max_results = max_results;
        }
        if let Some(include_descriptions) = patch.include_descriptions {
            self.include_descriptions = include_descriptions;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

/// A message produced while loading settings, forwarded to the client log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct SettingsLoadOutcome {
    pub settings: AntSettings,
    pub events: Vec<SettingsEvent>,
}

/// Returns the path to the user configuration file.
///
/// `$XDG_CONFIG_HOME/ant-ls/ant-ls.toml` when the variable is set, otherwise
/// the platform config directory. None if neither can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("ant-ls").join("ant-ls.toml"));
    }
    dirs::config_dir().map(|dir| dir.join("ant-ls").join("ant-ls.toml"))
}

/// Load settings from all layers.
pub fn load_settings(initialization_options: Option<&Value>) -> SettingsLoadOutcome {
    let mut events = Vec::new();
    let mut settings = AntSettings::default();

    if let Some(patch) = load_user_config(&mut events) {
        settings.apply(patch);
    }
    if let Some(patch) = parse_initialization_options(initialization_options, &mut events) {
        settings.apply(patch);
    }

    SettingsLoadOutcome { settings, events }
}

fn load_user_config(events: &mut Vec<SettingsEvent>) -> Option<AntSettingsPatch> {
    let path = user_config_path()?;
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read user config {}: {err}",
                path.display()
            )));
            return None;
        }
    };

    match toml::from_str::<AntSettingsPatch>(&contents) {
        Ok(patch) => {
            events.push(SettingsEvent::info(format!(
                "Loaded user config from {}",
                path.display()
            )));
            Some(patch)
        }
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Ignoring invalid user config {}: {err}",
                path.display()
            )));
            None
        }
    }
}

fn parse_initialization_options(
    options: Option<&Value>,
    events: &mut Vec<SettingsEvent>,
) -> Option<AntSettingsPatch> {
    let value = options?;
    match serde_json::from_value::<AntSettingsPatch>(value.clone()) {
        Ok(patch) => Some(patch),
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Ignoring invalid initialization options: {err}"
            )));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let settings = AntSettings::default();
        assert_eq!(settings.max_results, 100);
        assert!(settings.include_descriptions);
    }

    #[test]
    fn test_patch_overrides_only_set_fields() {
        let mut settings = AntSettings::default();
        settings.apply(AntSettingsPatch {
            max_results: Some(10),
            include_descriptions: None,
        });
        assert_eq!(settings.max_results, 10);
        assert!(settings.include_descriptions);
    }

    #[test]
    fn test_initialization_options_layer() {
        let options = json!({ "include_descriptions": false });
        let mut events = Vec::new();
        let patch = parse_initialization_options(Some(&options), &mut events).unwrap();
        assert_eq!(patch.include_descriptions, Some(false));
        assert!(events.is_empty());
    }

    #[test]
    fn test_invalid_initialization_options_warn_and_fall_through() {
        let options = json!({ "max_results": "lots" });
        let mut events = Vec::new();
        assert!(parse_initialization_options(Some(&options), &mut events).is_none());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SettingsEventKind::Warning);
    }

    #[test]
    fn test_toml_patch_parses() {
        let patch: AntSettingsPatch = toml::from_str("max_results = 25\n").unwrap();
        assert_eq!(patch.max_results, Some(25));
        assert_eq!(patch.include_descriptions, None);
    }

    #[test]
    #[serial]
    fn test_user_config_path_uses_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();

        // SAFETY: guarded by #[serial]; no other test mutates the
        // environment concurrently.
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }
        let path = user_config_path();
        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert_eq!(
            path,
            Some(PathBuf::from("/custom/config/ant-ls/ant-ls.toml"))
        );
    }
}
