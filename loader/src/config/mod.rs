//! Connection settings for the PeopleSoft HR database.
//!
//! Settings come from one of two places:
//!
//! - an INI file passed with `--config`, section `[connection]`:
//!
//! ```ini
//! [connection]
//! host = hrdb.example.edu
//! port = 1521
//! user = sysadm
//! password = secret
//! service_name = HRPRD
//! ```
//!
//! - otherwise, `PS_`-prefixed environment variables
//!   (`PS_DATABASE_HOST`, `PS_DATABASE_USER`, `PS_DATABASE_PASSWORD`,
//!   `PS_DATABASE_SID`, `PS_DATABASE_SERVICE_NAME`, `PS_DATABASE_PORT`).
//!
//! Both resolve to the same [`ConnectionDescriptor`].

use ini::Ini;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Prefix for connection environment variables.
pub const ENV_PREFIX: &str = "PS_";

/// INI section holding the connection settings.
pub const CONFIG_SECTION: &str = "connection";

/// Oracle listener default.
pub const DEFAULT_PORT: u16 = 1521;

/// How the database instance is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceTarget {
    Sid(String),
    ServiceName(String),
}

/// Session privilege requested at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privilege {
    #[default]
    Normal,
    Sysdba,
}

/// Normalized connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub target: ServiceTarget,
    pub privilege: Privilege,
}

// Keeps the password out of logs and panics.
impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("target", &self.target)
            .field("privilege", &self.privilege)
            .finish()
    }
}

impl ConnectionDescriptor {
    /// Build a descriptor from raw settings looked up by key
    /// (`host`, `port`, `user`, `password`, `sid`, `service_name`).
    ///
    /// Empty values count as absent. A service name wins over a SID.
    pub fn from_lookup<F>(lookup: F, privilege: Privilege) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingKey(key.to_string()));

        let host = require("host")?;
        let user = require("user")?;
        let password =
            lookup("password").ok_or_else(|| ConfigError::MissingKey("password".into()))?;

        let port = match get("port") {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidPort(p))?,
            None => DEFAULT_PORT,
        };

        let target = match (get("service_name"), get("sid")) {
            (Some(name), _) => ServiceTarget::ServiceName(name),
            (None, Some(sid)) => ServiceTarget::Sid(sid),
            (None, None) => return Err(ConfigError::MissingTarget),
        };

        Ok(Self { host, port, user, password, target, privilege })
    }

    /// TNS connect descriptor for the driver.
    pub fn connect_string(&self) -> String {
        let data = match &self.target {
            ServiceTarget::Sid(sid) => format!("SID={}", sid),
            ServiceTarget::ServiceName(name) => format!("SERVICE_NAME={}", name),
        };
        format!(
            "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST={})(PORT={}))(CONNECT_DATA=({})))",
            self.host, self.port, data
        )
    }
}

/// Resolve connection settings from the config file if one is given,
/// otherwise from the environment.
pub fn resolve(
    config_path: Option<&Path>,
    privilege: Privilege,
) -> ConfigResult<ConnectionDescriptor> {
    match config_path {
        Some(path) => from_file(path, privilege),
        None => from_env(ENV_PREFIX, privilege),
    }
}

/// Read the `[connection]` section of an INI file.
pub fn from_file(path: &Path, privilege: Privilege) -> ConfigResult<ConnectionDescriptor> {
    let ini = Ini::load_from_file(path).map_err(|source| ConfigError::File {
        path: path.display().to_string(),
        source,
    })?;
    from_ini(&ini, privilege)
}

/// Read the `[connection]` section of parsed INI contents.
pub fn from_ini(ini: &Ini, privilege: Privilege) -> ConfigResult<ConnectionDescriptor> {
    let section = ini
        .section(Some(CONFIG_SECTION))
        .ok_or_else(|| ConfigError::MissingSection(CONFIG_SECTION.to_string()))?;
    ConnectionDescriptor::from_lookup(|key| section.get(key).map(str::to_string), privilege)
}

/// Read `<prefix>DATABASE_*` environment variables.
pub fn from_env(prefix: &str, privilege: Privilege) -> ConfigResult<ConnectionDescriptor> {
    ConnectionDescriptor::from_lookup(
        |key| std::env::var(env_key(prefix, key)).ok(),
        privilege,
    )
}

/// `("PS_", "service_name")` -> `PS_DATABASE_SERVICE_NAME`
fn env_key(prefix: &str, key: &str) -> String {
    format!("{}DATABASE_{}", prefix, key.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_service_name_preferred_over_sid() {
        let desc = ConnectionDescriptor::from_lookup(
            lookup(&[
                ("host", "db"),
                ("user", "sysadm"),
                ("password", "pw"),
                ("sid", "HR92"),
                ("service_name", "HRPRD"),
            ]),
            Privilege::Normal,
        )
        .unwrap();

        assert_eq!(desc.target, ServiceTarget::ServiceName("HRPRD".into()));
        assert_eq!(desc.port, DEFAULT_PORT);
    }

    #[test]
    fn test_sid_connect_string() {
        let desc = ConnectionDescriptor::from_lookup(
            lookup(&[
                ("host", "db"),
                ("port", "1600"),
                ("user", "u"),
                ("password", "p"),
                ("sid", "HR92"),
            ]),
            Privilege::Sysdba,
        )
        .unwrap();

        assert_eq!(
            desc.connect_string(),
            "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=db)(PORT=1600))(CONNECT_DATA=(SID=HR92)))"
        );
        assert_eq!(desc.privilege, Privilege::Sysdba);
    }

    #[test]
    fn test_missing_target() {
        let err = ConnectionDescriptor::from_lookup(
            lookup(&[("host", "db"), ("user", "u"), ("password", "p"), ("sid", "  ")]),
            Privilege::Normal,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingTarget));
    }

    #[test]
    fn test_missing_host_and_bad_port() {
        let err = ConnectionDescriptor::from_lookup(
            lookup(&[("user", "u"), ("password", "p"), ("sid", "X")]),
            Privilege::Normal,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "host"));

        let err = ConnectionDescriptor::from_lookup(
            lookup(&[
                ("host", "db"),
                ("port", "abc"),
                ("user", "u"),
                ("password", "p"),
                ("sid", "X"),
            ]),
            Privilege::Normal,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref p) if p == "abc"));
    }

    #[test]
    fn test_from_ini_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[connection]\nhost = hrdb\nport = 1522\nuser = sysadm\n\
             password = s3cret\nservice_name = HRPRD"
        )
        .unwrap();

        let desc = resolve(Some(file.path()), Privilege::Normal).unwrap();
        assert_eq!(desc.host, "hrdb");
        assert_eq!(desc.port, 1522);
        assert_eq!(desc.password, "s3cret");
        assert_eq!(desc.target, ServiceTarget::ServiceName("HRPRD".into()));
    }

    #[test]
    fn test_missing_section() {
        let ini = Ini::load_from_str("[other]\nhost = x\n").unwrap();
        let err = from_ini(&ini, Privilege::Normal).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = from_file(Path::new("/nonexistent/paysheet.ini"), Privilege::Normal).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/paysheet.ini"));
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("PS_", "service_name"), "PS_DATABASE_SERVICE_NAME");
        assert_eq!(env_key("", "host"), "DATABASE_HOST");
    }

    #[test]
    fn test_from_env() {
        let prefix = "PAYSHEET_TEST_FROM_ENV_";
        for (key, value) in [
            ("HOST", "hrdb"),
            ("USER", "sysadm"),
            ("PASSWORD", "pw"),
            ("SID", "HR92"),
            ("PORT", "1600"),
        ] {
            std::env::set_var(format!("{}DATABASE_{}", prefix, key), value);
        }

        let desc = from_env(prefix, Privilege::Normal).unwrap();
        assert_eq!(desc.host, "hrdb");
        assert_eq!(desc.port, 1600);
        assert_eq!(desc.user, "sysadm");
        assert_eq!(desc.target, ServiceTarget::Sid("HR92".into()));

        std::env::set_var(format!("{}DATABASE_SERVICE_NAME", prefix), "HRPRD");
        let desc = from_env(prefix, Privilege::Normal).unwrap();
        assert_eq!(desc.target, ServiceTarget::ServiceName("HRPRD".into()));
    }

    #[test]
    fn test_from_env_missing_host() {
        let prefix = "PAYSHEET_TEST_EMPTY_ENV_";
        std::env::set_var(format!("{}DATABASE_USER", prefix), "sysadm");

        let err = from_env(prefix, Privilege::Normal).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "host"));
    }

    #[test]
    fn test_debug_hides_password() {
        let desc = ConnectionDescriptor::from_lookup(
            lookup(&[("host", "db"), ("user", "u"), ("password", "hunter2"), ("sid", "X")]),
            Privilege::Normal,
        )
        .unwrap();
        assert!(!format!("{:?}", desc).contains("hunter2"));
    }
}
