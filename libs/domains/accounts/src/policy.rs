use core_config::{ConfigError, FromEnv, env_parse_or_default};

pub const DEFAULT_MIN_USERNAME_LEN: usize = 2;
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 4;

/// Signup thresholds. Lengths count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicy {
    pub min_username_len: usize,
    pub min_password_len: usize,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            min_username_len: DEFAULT_MIN_USERNAME_LEN,
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }
}

impl FromEnv for AccountPolicy {
    /// Reads `ACCOUNT_MIN_USERNAME_LEN` and `ACCOUNT_MIN_PASSWORD_LEN`; both must be >= 1
    fn from_env() -> Result<Self, ConfigError> {
        let policy = Self {
            min_username_len: env_parse_or_default(
                "ACCOUNT_MIN_USERNAME_LEN",
                DEFAULT_MIN_USERNAME_LEN,
            )?,
            min_password_len: env_parse_or_default(
                "ACCOUNT_MIN_PASSWORD_LEN",
                DEFAULT_MIN_PASSWORD_LEN,
            )?,
        };

        for (key, value) in [
            ("ACCOUNT_MIN_USERNAME_LEN", policy.min_username_len),
            ("ACCOUNT_MIN_PASSWORD_LEN", policy.min_password_len),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    details: "must be at least 1".to_string(),
                });
            }
        }

        Ok(policy)
    }
}
