//! Upload limits configuration.

use serde::{Deserialize, Serialize};

/// Upload acceptance limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted upload size in bytes (default 100 MB).
    #[serde(default = "default_max_size")]
    pub max_size_bytes: i64,
    /// Content types accepted for upload. Empty = accept everything.
    #[serde(default)]
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size(),
            allowed_content_types: Vec::new(),
        }
    }
}

impl UploadConfig {
    /// Whether the given content type passes the allow-list.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.is_empty()
            || self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}

fn default_max_size() -> i64 {
    104_857_600 // 100 MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allow_list_accepts_everything() {
        let config = UploadConfig::default();
        assert!(config.accepts_content_type("application/pdf"));
        assert!(config.accepts_content_type("image/png"));
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let config = UploadConfig {
            allowed_content_types: vec!["application/pdf".to_string()],
            ..UploadConfig::default()
        };
        assert!(config.accepts_content_type("Application/PDF"));
        assert!(!config.accepts_content_type("image/png"));
    }
}
