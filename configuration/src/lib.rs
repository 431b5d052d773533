use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;
use mdns::PointerMode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const MDNS_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_PORT: u16 = 5353;

/// Loads `config_path` (TOML) and then `DISCOVER__SECTION__KEY` environment
/// variables on top. A missing file is not an error; every field has a default.
pub fn get_config<T: DeserializeOwned>(config_path: PathBuf) -> Result<T, config::ConfigError> {
    let f = config::File::from(config_path).required(false);
    let env = config::Environment::with_prefix("DISCOVER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true);
    let config = config::Config::builder()
        .add_source(f)
        .add_source(env)
        .build()?;
    config.try_deserialize::<T>()
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoverConfiguration {
    pub mdns: MdnsConfiguration,
    pub browse: BrowseConfiguration,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MdnsConfiguration {
    pub group: Ipv4Addr,
    pub port: u16,
    /// Local interface used to join the group, `0.0.0.0` lets the OS pick.
    pub interface: Ipv4Addr,
    pub receive_timeout_ms: u64,
}

impl Default for MdnsConfiguration {
    fn default() -> Self {
        Self {
            group: MDNS_GROUP,
            port: MDNS_PORT,
            interface: Ipv4Addr::UNSPECIFIED,
            receive_timeout_ms: 1000,
        }
    }
}

impl MdnsConfiguration {
    pub fn group_address(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.group, self.port)
    }

    pub fn bind_address(&self) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.port)
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointerModeSetting {
    Legacy,
    Absolute,
}

impl From<PointerModeSetting> for PointerMode {
    fn from(setting: PointerModeSetting) -> Self {
        match setting {
            PointerModeSetting::Legacy => PointerMode::Legacy,
            PointerModeSetting::Absolute => PointerMode::Absolute,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowseConfiguration {
    /// Service type whose instances are looked up, e.g. `_googlecast._tcp.local`.
    pub service: String,
    /// How many times the first PTR query is sent.
    pub initial_queries: u32,
    /// Receive rounds without progress before browsing stops.
    pub idle_rounds: u32,
    pub pointer_mode: PointerModeSetting,
}

impl Default for BrowseConfiguration {
    fn default() -> Self {
        Self {
            service: String::from("_googlecast._tcp.local"),
            initial_queries: 3,
            idle_rounds: 15,
            pointer_mode: PointerModeSetting::Legacy,
        }
    }
}

impl BrowseConfiguration {
    pub fn pointer_mode(&self) -> PointerMode {
        PointerMode::from(self.pointer_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(file_name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", file_name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("no-such-discover-config.toml");
        let config: DiscoverConfiguration = get_config(path).unwrap();

        assert_eq!(config, DiscoverConfiguration::default());
        assert_eq!(config.mdns.group_address().to_string(), "224.0.0.251:5353");
        assert_eq!(config.mdns.receive_timeout(), Duration::from_secs(1));
        assert_eq!(config.browse.pointer_mode(), PointerMode::Legacy);
    }

    #[test]
    fn file_overrides_some_fields() {
        let path = write_config(
            "discover-partial",
            r#"
[mdns]
receive_timeout_ms = 250

[browse]
service = "_airplay._tcp.local"
pointer_mode = "absolute"
"#,
        );

        let config: DiscoverConfiguration = get_config(path.clone()).unwrap();
        let _ = fs::remove_file(path);

        assert_eq!(config.mdns.port, MDNS_PORT);
        assert_eq!(config.mdns.receive_timeout(), Duration::from_millis(250));
        assert_eq!(config.browse.service, "_airplay._tcp.local");
        assert_eq!(config.browse.idle_rounds, 15);
        assert_eq!(config.browse.pointer_mode(), PointerMode::Absolute);
    }

    #[test]
    fn bad_value_is_an_error() {
        let path = write_config("discover-bad", "[mdns]\ngroup = \"not-an-address\"\n");

        let result: Result<DiscoverConfiguration, _> = get_config(path.clone());
        let _ = fs::remove_file(path);

        assert!(result.is_err());
    }
}
