//! Loading [`FormOptions`] from TOML.
//!
//! ```toml
//! behavior = "byGroup"
//! mark_visited = false
//! ```

use std::fs;
use std::path::Path;

use formnav_model::{FormError, FormOptions, Result};
use tracing::debug;

/// Parses options from a TOML document. Missing keys take their defaults.
pub fn options_from_toml(raw: &str) -> Result<FormOptions> {
    toml::from_str(raw).map_err(|e| FormError::Config(format!("invalid options: {e}")))
}

/// Reads options from a TOML file.
pub fn load_options(path: &Path) -> Result<FormOptions> {
    let raw = fs::read_to_string(path)?;
    let options = options_from_toml(&raw)?;
    debug!(path = %path.display(), behavior = %options.behavior, "loaded options");
    Ok(options)
}

/// Serialises options back to TOML.
pub fn options_to_toml(options: &FormOptions) -> Result<String> {
    toml::to_string_pretty(options).map_err(|e| FormError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use formnav_model::Behavior;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(options_from_toml("").unwrap(), FormOptions::default());
    }

    #[test]
    fn reads_behavior_and_flags() {
        let options = options_from_toml(
            r#"
            form_id = "signup"
            behavior = "bySet"
            mark_visited = false
            "#,
        )
        .unwrap();
        assert_eq!(options.behavior, Behavior::BySet);
        assert_eq!(options.form_id.as_deref(), Some("signup"));
        assert!(!options.mark_visited);
        assert!(options.publish_initial_state);
    }

    #[test]
    fn unknown_behavior_is_a_config_error() {
        let err = options_from_toml(r#"behavior = "byPage""#).unwrap_err();
        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn written_options_read_back() {
        let options = FormOptions::new(Behavior::ByCard).with_mark_visited(false);
        let raw = options_to_toml(&options).unwrap();
        assert_eq!(options_from_toml(&raw).unwrap(), options);
    }

    #[test]
    fn missing_file_is_io() {
        let err = load_options(Path::new("/nonexistent/formnav.toml")).unwrap_err();
        assert!(matches!(err, FormError::Io(_)));
    }
}
