//! `${VAR}` expansion for the config fields that hold deployment values.

use std::env::VarError;

use crate::ConfigError;

/// Config fields that accept environment references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnvField {
    ApiBaseUrl,
    ApiToken,
    VaultName,
}

impl EnvField {
    /// Key of the field in `fns.toml`.
    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::ApiBaseUrl => "api.base_url",
            Self::ApiToken => "api.token",
            Self::VaultName => "vault.name",
        }
    }

    /// Variable the CLI and the sample config use for this field.
    pub(crate) fn conventional_var(self) -> &'static str {
        match self {
            Self::ApiBaseUrl => "FNS_API_URL",
            Self::ApiToken => "FNS_TOKEN",
            Self::VaultName => "FNS_VAULT",
        }
    }

    /// Expand `${VAR}` and `${VAR:-default}` references in `value` in place.
    ///
    /// Values without `${` are left alone, so a token containing a bare `$`
    /// is kept as written.
    pub(crate) fn expand(self, value: &mut String) -> Result<(), ConfigError> {
        if !value.contains("${") {
            return Ok(());
        }

        let expanded = shellexpand::env_with_context(value.as_str(), |var| {
            std::env::var(var).map(Some)
        })
        .map_err(|err| self.error(&err.var_name, &err.cause))?
        .into_owned();

        tracing::trace!(field = self.key(), "Expanded environment references");
        *value = expanded;
        Ok(())
    }

    fn error(self, var: &str, cause: &VarError) -> ConfigError {
        let mut message = match cause {
            VarError::NotPresent => format!("${{{var}}} is not set"),
            VarError::NotUnicode(_) => format!("${{{var}}} is not valid UTF-8"),
        };
        if var != self.conventional_var() {
            message.push_str(&format!(
                " (set it, write ${{{var}:-default}}, or use {})",
                self.conventional_var()
            ));
        }
        ConfigError::EnvVar {
            field: self.key().to_owned(),
            message,
        }
    }
}
