use std::{
    env,
    net::{AddrParseError, SocketAddr},
};

use runtime::{FeedMode, RuntimeOptions};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MODE: FeedMode = FeedMode::Sim;
const DEFAULT_TICK_MS: u64 = 2_000;
const DEFAULT_LOG_LEVEL: &str = "info";

const ENV_ADDR: &str = "DASHBOARD_ADDR";
const ENV_MODE: &str = "DASHBOARD_MODE";
const ENV_TICK_MS: &str = "DASHBOARD_TICK_MS";
const ENV_SEED: &str = "DASHBOARD_SEED";
const ENV_LOG: &str = "DASHBOARD_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub mode: FeedMode,
    pub tick_interval_ms: u64,
    pub seed: Option<u64>,
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DASHBOARD_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("DASHBOARD_MODE must be one of: sim, live, hybrid")]
    InvalidMode,
    #[error("DASHBOARD_TICK_MS must be a positive integer number of milliseconds")]
    InvalidTickInterval,
    #[error("DASHBOARD_SEED must be an unsigned 64-bit integer")]
    InvalidSeed,
    #[error("DASHBOARD_LOG is not a valid log filter")]
    InvalidLogLevel,
    #[error("{key} contains non-unicode data")]
    NonUnicode { key: &'static str },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
        };

        let mode = match read_env(ENV_MODE)? {
            Some(value) => FeedMode::parse(value.trim()).ok_or(ConfigError::InvalidMode)?,
            None => DEFAULT_MODE,
        };

        let tick_interval_ms = match read_env(ENV_TICK_MS)? {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .ok_or(ConfigError::InvalidTickInterval)?,
            None => DEFAULT_TICK_MS,
        };

        let seed = read_env(ENV_SEED)?
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)
            })
            .transpose()?;

        let log_level = match read_env(ENV_LOG)? {
            Some(value) => {
                EnvFilter::try_new(&value).map_err(|_| ConfigError::InvalidLogLevel)?;
                value
            }
            None => DEFAULT_LOG_LEVEL.to_owned(),
        };

        Ok(Self {
            listen_addr,
            mode,
            tick_interval_ms,
            seed,
            log_level,
        })
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            mode: self.mode,
            ..RuntimeOptions::default()
        }
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode { key }),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex};

    use runtime::FeedMode;

    use super::{Config, ConfigError, ENV_ADDR, ENV_LOG, ENV_MODE, ENV_SEED, ENV_TICK_MS};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> [EnvVarGuard; 5] {
        [
            EnvVarGuard::unset(ENV_ADDR),
            EnvVarGuard::unset(ENV_MODE),
            EnvVarGuard::unset(ENV_TICK_MS),
            EnvVarGuard::unset(ENV_SEED),
            EnvVarGuard::unset(ENV_LOG),
        ]
    }

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.mode, FeedMode::Sim);
        assert_eq!(config.tick_interval_ms, 2_000);
        assert_eq!(config.seed, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn uses_overrides_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _addr = EnvVarGuard::set(ENV_ADDR, "127.0.0.1:9090");
        let _mode = EnvVarGuard::set(ENV_MODE, "hybrid");
        let _tick = EnvVarGuard::set(ENV_TICK_MS, "500");
        let _seed = EnvVarGuard::set(ENV_SEED, "42");
        let _log = EnvVarGuard::set(ENV_LOG, "runtime=debug,info");

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.mode, FeedMode::Hybrid);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_level, "runtime=debug,info");
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.runtime_options().mode, FeedMode::Hybrid);
    }

    #[test]
    fn returns_error_for_invalid_listen_address_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_ADDR, "not-an-addr");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));
    }

    #[test]
    fn returns_error_for_invalid_mode_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_MODE, "paper-live");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidMode));
    }

    #[test]
    fn returns_error_for_zero_tick_interval() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_TICK_MS, "0");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTickInterval));
    }

    #[test]
    fn returns_error_for_negative_seed() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_SEED, "-1");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSeed));
    }

    #[test]
    fn returns_error_for_invalid_log_filter() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ENV_LOG, "runtime=[");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidLogLevel));
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_mode_env_var() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set_os(
            ENV_MODE,
            std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::NonUnicode { key: "DASHBOARD_MODE" }));
    }
}
