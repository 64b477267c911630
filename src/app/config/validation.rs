use super::{Config, ConfigError, RouterConfig};
use crate::domain::field::{is_reserved_key, is_valid_key};

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.messages.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "At least one message is required".to_string(),
            ));
        }

        for (key, _) in &self.fields {
            if !is_valid_key(key) {
                return Err(ConfigError::InvalidField(key.clone()));
            }
            if is_reserved_key(key) {
                return Err(ConfigError::InvalidConfig(format!(
                    "Field '{key}' is set by the router and cannot be passed with --field"
                )));
            }
        }

        if let Some(program_name) = &self.program_name {
            validate_program_name(program_name)?;
        }

        Ok(())
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(program_name) = &self.program_name {
            validate_program_name(program_name)?;
        }

        if let Some(domain) = self.fatal_masks.keys().find(|domain| domain.chars().any(char::is_whitespace)) {
            return Err(ConfigError::InvalidConfig(format!(
                "Fatal mask domain '{domain}' contains whitespace"
            )));
        }

        Ok(())
    }
}

fn validate_program_name(program_name: &str) -> Result<(), ConfigError> {
    if program_name.is_empty() || program_name.contains(['\n', '\r']) {
        return Err(ConfigError::InvalidConfig(format!(
            "Invalid program name '{}'",
            program_name.escape_debug()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn config_with_message() -> Config {
        Config {
            messages: vec![OsString::from("m")],
            ..Config::default()
        }
    }

    #[test]
    fn test_requires_message() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
        assert!(config_with_message().validate().is_ok());
    }

    #[test]
    fn test_rejects_reserved_and_invalid_fields() {
        let mut config = config_with_message();
        config.fields = vec![("PRIORITY".to_string(), "3".to_string())];
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));

        config.fields = vec![("1BAD".to_string(), "x".to_string())];
        assert!(matches!(config.validate(), Err(ConfigError::InvalidField(_))));

        config.fields = vec![("MESSAGE_ID".to_string(), "x".to_string())];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_program_name() {
        let mut config = config_with_message();
        config.program_name = Some(String::new());
        assert!(config.validate().is_err());

        let file = RouterConfig {
            program_name: Some("two\nlines".to_string()),
            ..RouterConfig::default()
        };
        assert!(file.validate().is_err());
    }
}
