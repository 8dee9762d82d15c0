use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Publisher,
    Light,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{0} could not be parsed: {1}")]
    Malformed(&'static str, String),
    #[error("NODE_ROLE must be 'publisher' or 'light', got '{0}'")]
    InvalidRole(String),
    #[error("PORT must be in [8000,9000), got {0}")]
    PortOutOfRange(u16),
    #[error("CHAIN_DIFFICULTY must be < 10, got {0}")]
    DifficultyTooHigh(usize),
    #[error("RSA_PUBLIC_EXP must be 65537 (the only exponent this node's RSA library supports), got {0}")]
    UnsupportedExponent(u32),
    #[error("KEY_SIZE must be >= 2048, got {0}")]
    KeySizeTooSmall(usize),
    #[error("NONCE_EXP_S must be < 60, got {0}")]
    NonceExpSecondsTooLarge(i64),
}

/// Node configuration loaded from the environment (spec §6). Every
/// field is validated at load time so a misconfigured node fails fast
/// at startup rather than mid-request.
#[derive(Debug, Clone)]
pub struct Config {
    pub node_role: NodeRole,
    pub port: u16,
    pub chain_difficulty: usize,
    pub peers: Vec<String>,
    pub rsa_public_exp: u32,
    pub key_size: usize,
    pub nonce_exp_min: i64,
    pub nonce_exp_s: i64,
    pub nonce_size: usize,
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>()
        .map_err(|_| ConfigError::Malformed(name, raw.to_string()))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let node_role = match env_var("NODE_ROLE")?.as_str() {
            "publisher" => NodeRole::Publisher,
            "light" => NodeRole::Light,
            other => return Err(ConfigError::InvalidRole(other.to_string())),
        };

        let port: u16 = parse("PORT", &env_var("PORT")?)?;
        if !(8000..9000).contains(&port) {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let chain_difficulty: usize = parse("CHAIN_DIFFICULTY", &env_var("CHAIN_DIFFICULTY")?)?;
        if chain_difficulty >= 10 {
            return Err(ConfigError::DifficultyTooHigh(chain_difficulty));
        }

        let peers = env_var("PEERS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let rsa_public_exp: u32 = parse("RSA_PUBLIC_EXP", &env_var("RSA_PUBLIC_EXP")?)?;
        if rsa_public_exp != 65537 {
            return Err(ConfigError::UnsupportedExponent(rsa_public_exp));
        }

        let key_size: usize = parse("KEY_SIZE", &env_var("KEY_SIZE")?)?;
        if key_size < 2048 {
            return Err(ConfigError::KeySizeTooSmall(key_size));
        }

        let nonce_exp_min: i64 = parse("NONCE_EXP_MIN", &env_var("NONCE_EXP_MIN")?)?;
        let nonce_exp_s: i64 = parse("NONCE_EXP_S", &env_var("NONCE_EXP_S")?)?;
        if nonce_exp_s >= 60 {
            return Err(ConfigError::NonceExpSecondsTooLarge(nonce_exp_s));
        }

        let nonce_size: usize = parse("NONCE_SIZE", &env_var("NONCE_SIZE")?)?;

        Ok(Config {
            node_role,
            port,
            chain_difficulty,
            peers,
            rsa_public_exp,
            key_size,
            nonce_exp_min,
            nonce_exp_s,
            nonce_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(vars: &[(&str, &str)]) {
        for (k, v) in vars {
            std::env::set_var(k, v);
        }
    }

    #[test]
    fn rejects_unsupported_public_exponent() {
        set(&[
            ("NODE_ROLE", "publisher"),
            ("PORT", "8001"),
            ("CHAIN_DIFFICULTY", "2"),
            ("PEERS", ""),
            ("RSA_PUBLIC_EXP", "3"),
            ("KEY_SIZE", "2048"),
            ("NONCE_EXP_MIN", "5"),
            ("NONCE_EXP_S", "0"),
            ("NONCE_SIZE", "16"),
        ]);
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::UnsupportedExponent(3))
        ));
    }

    #[test]
    fn rejects_out_of_range_port() {
        set(&[
            ("NODE_ROLE", "publisher"),
            ("PORT", "80"),
            ("CHAIN_DIFFICULTY", "2"),
            ("PEERS", ""),
            ("RSA_PUBLIC_EXP", "65537"),
            ("KEY_SIZE", "2048"),
            ("NONCE_EXP_MIN", "5"),
            ("NONCE_EXP_S", "0"),
            ("NONCE_SIZE", "16"),
        ]);
        assert!(matches!(Config::from_env(), Err(ConfigError::PortOutOfRange(80))));
    }
}
