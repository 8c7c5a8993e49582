//! Startup preferences. Loaded once in `run_cli`, handed to components by
//! value or reference afterwards, never mutated at runtime.

use std::{io::ErrorKind, path::Path};

use anyhow::Result;
use serde::Deserialize;

use crate::locale::Locale;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    /// Overrides the base of generated calendar links. Empty means the
    /// default template endpoint.
    pub template_event_url: String,
    pub locale: Locale,
}

impl Preferences {
    /// Reads `config.toml` from the application directory. A missing file
    /// means defaults.
    pub fn load(application_dir: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(application_dir.join(CONFIG_FILE)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&raw)?)
    }
}
