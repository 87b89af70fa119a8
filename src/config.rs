//! Startup configuration.
//!
//! The external interface is two positional arguments: `<port> <password>`.
//! Port validation is a policy: the binary restricts ports to the ephemeral
//! range like the historical servers it descends from, while embedders and
//! tests may accept any port.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Ports the `Ephemeral` policy accepts.
pub const EPHEMERAL_PORTS: RangeInclusive<u16> = 49152..=65535;

/// Usage line printed on argument errors.
pub const USAGE: &str = "Usage: picoircd <port> (49152-65535) <password>";

/// Port validation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortPolicy {
    /// Any valid TCP port.
    Any,
    /// Only ports in [`EPHEMERAL_PORTS`].
    Ephemeral,
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("expected exactly two arguments: <port> <password>")]
    BadArity,

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("port {0} is outside the ephemeral range (49152-65535)")]
    PortOutOfRange(u16),

    #[error("password must not be empty")]
    EmptyPassword,
}

impl Config {
    /// Build a configuration from the program arguments (binary name
    /// already stripped).
    pub fn from_args<I>(args: I, policy: PortPolicy) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let [port_arg, password] = args.as_slice() else {
            return Err(ConfigError::BadArity);
        };

        let port: u16 = port_arg
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_arg.clone()))?;

        if policy == PortPolicy::Ephemeral && !EPHEMERAL_PORTS.contains(&port) {
            return Err(ConfigError::PortOutOfRange(port));
        }

        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }

        Ok(Self {
            port,
            password: password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_valid_arguments() {
        let config = Config::from_args(args(&["54321", "hunter2"]), PortPolicy::Ephemeral).unwrap();
        assert_eq!(config.port, 54321);
        assert_eq!(config.password, "hunter2");
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(matches!(
            Config::from_args(args(&["54321"]), PortPolicy::Any),
            Err(ConfigError::BadArity)
        ));
        assert!(matches!(
            Config::from_args(args(&["54321", "pw", "extra"]), PortPolicy::Any),
            Err(ConfigError::BadArity)
        ));
    }

    #[test]
    fn rejects_unparsable_port() {
        assert!(matches!(
            Config::from_args(args(&["not-a-port", "pw"]), PortPolicy::Any),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn ephemeral_policy_bounds_port() {
        assert!(matches!(
            Config::from_args(args(&["6667", "pw"]), PortPolicy::Ephemeral),
            Err(ConfigError::PortOutOfRange(6667))
        ));
        assert!(Config::from_args(args(&["49152", "pw"]), PortPolicy::Ephemeral).is_ok());
        assert!(Config::from_args(args(&["65535", "pw"]), PortPolicy::Ephemeral).is_ok());
    }

    #[test]
    fn any_policy_allows_low_ports() {
        assert!(Config::from_args(args(&["6667", "pw"]), PortPolicy::Any).is_ok());
    }

    #[test]
    fn rejects_empty_password() {
        assert!(matches!(
            Config::from_args(args(&["54321", ""]), PortPolicy::Any),
            Err(ConfigError::EmptyPassword)
        ));
    }
}
