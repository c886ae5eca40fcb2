use std::env;

use auth::WorkFactor;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

const DEFAULT_HTTP_PORT: u16 = 3000;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .finish()
    }
}

/// Argon2id cost used for new password hashes
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_cost_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<&HashingConfig> for WorkFactor {
    fn from(config: &HashingConfig) -> Self {
        WorkFactor {
            memory_cost_kib: config.memory_cost_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults for everything except the signing secret
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let work_factor = WorkFactor::default();

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", i64::from(DEFAULT_HTTP_PORT))?
            .set_default("hashing.memory_cost_kib", i64::from(work_factor.memory_cost_kib))?
            .set_default("hashing.iterations", i64::from(work_factor.iterations))?
            .set_default("hashing.parallelism", i64::from(work_factor.parallelism))?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug_output() {
        let config = JwtConfig {
            secret: "super-secret-signing-key".to_string(),
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    // The only test in this crate that touches process environment.
    #[test]
    fn test_environment_overrides_file_values() {
        env::set_var("JWT__SECRET", "secret-from-environment-0123456789abcdef");
        env::set_var("SERVER__HTTP_PORT", "4321");
        env::set_var("HASHING__ITERATIONS", "5");

        let loaded = Config::load();

        env::remove_var("JWT__SECRET");
        env::remove_var("SERVER__HTTP_PORT");
        env::remove_var("HASHING__ITERATIONS");

        let config = loaded.expect("Failed to load configuration");
        assert_eq!(config.jwt.secret, "secret-from-environment-0123456789abcdef");
        assert_eq!(config.server.http_port, 4321);
        assert_eq!(config.hashing.iterations, 5);
        assert_eq!(
            config.hashing.memory_cost_kib,
            WorkFactor::default().memory_cost_kib
        );
    }

    #[test]
    fn test_hashing_config_into_work_factor() {
        let hashing = HashingConfig {
            memory_cost_kib: 4096,
            iterations: 3,
            parallelism: 2,
        };

        assert_eq!(
            WorkFactor::from(&hashing),
            WorkFactor {
                memory_cost_kib: 4096,
                iterations: 3,
                parallelism: 2,
            }
        );
    }
}
