use core_config::FromEnv;
use database::postgres::PostgresConfig;
use domain_accounts::AccountPolicy;
use domain_tasks::TaskPolicy;

pub use core_config::Environment;

/// Everything the services read from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub database: PostgresConfig,
    pub accounts: AccountPolicy,
    pub tasks: TaskPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let accounts = AccountPolicy::from_env()?;
        let tasks = TaskPolicy::from_env()?;

        Ok(Self {
            environment,
            database,
            accounts,
            tasks,
        })
    }
}
