use core_config::{ConfigError, FromEnv, env_parse_or_default};

pub const DEFAULT_MIN_NAME_LEN: usize = 2;

/// Task name threshold, counted in characters after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPolicy {
    pub min_name_len: usize,
}

impl Default for TaskPolicy {
    fn default() -> Self {
        Self {
            min_name_len: DEFAULT_MIN_NAME_LEN,
        }
    }
}

impl FromEnv for TaskPolicy {
    /// Reads `TASK_MIN_NAME_LEN` (must be >= 1)
    fn from_env() -> Result<Self, ConfigError> {
        let min_name_len = env_parse_or_default("TASK_MIN_NAME_LEN", DEFAULT_MIN_NAME_LEN)?;

        if min_name_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TASK_MIN_NAME_LEN".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self { min_name_len })
    }
}
