use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Encoding quality (percent) for convert and image-to-pdf jobs.
    pub quality: u8,
    /// Default quality (percent, 10-90) for compress-pdf jobs.
    pub pdf_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quality: 92,
            pdf_quality: 60,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ImageKbError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
