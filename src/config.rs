use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
pub const DEFAULT_LEASE_SECONDS: u32 = 86400;
pub const DEFAULT_LISTEN_PORT: u16 = 67;
pub const DEFAULT_SEND_PORT: u16 = 68;

/// Parameters the reply builders copy into outgoing packets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_id: Ipv4Addr,
    #[serde(default = "default_netmask")]
    pub netmask: Ipv4Addr,
    #[serde(default = "default_lease_seconds")]
    pub lease_seconds: u32,
    #[serde(default)]
    pub gateways: Vec<Ipv4Addr>,
    #[serde(default)]
    pub domain_servers: Vec<Ipv4Addr>,
    #[serde(default)]
    pub pool: AddressPool,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default = "default_send_port")]
    pub send_port: u16,
}

/// Last-octet bounds of the addresses handed out by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPool {
    pub min: u8,
    pub max: u8,
}

impl Default for AddressPool {
    fn default() -> Self {
        Self { min: 10, max: 244 }
    }
}

fn default_netmask() -> Ipv4Addr {
    DEFAULT_NETMASK
}

fn default_lease_seconds() -> u32 {
    DEFAULT_LEASE_SECONDS
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

fn default_send_port() -> u16 {
    DEFAULT_SEND_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::new(192, 168, 1, 1))
    }
}

impl ServerConfig {
    pub fn new(server_id: Ipv4Addr) -> Self {
        Self {
            server_id,
            netmask: DEFAULT_NETMASK,
            lease_seconds: DEFAULT_LEASE_SECONDS,
            gateways: Vec::new(),
            domain_servers: Vec::new(),
            pool: AddressPool::default(),
            listen_port: DEFAULT_LISTEN_PORT,
            send_port: DEFAULT_SEND_PORT,
        }
    }

    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: ServerConfig = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = ServerConfig::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_id.is_unspecified() {
            return Err(Error::InvalidConfig(
                "server_id must be a concrete address".to_string(),
            ));
        }

        if self.pool.min > self.pool.max {
            return Err(Error::InvalidConfig(
                "pool.min must be less than or equal to pool.max".to_string(),
            ));
        }

        if self.lease_seconds == 0 {
            return Err(Error::InvalidConfig(
                "lease_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The address with last octet `octet` in the server's network.
    pub fn pool_address(&self, octet: u8) -> Ipv4Addr {
        let network = u32::from(self.server_id) & u32::from(self.netmask);
        Ipv4Addr::from(network | u32::from(octet))
    }

    pub fn pool_size(&self) -> u32 {
        if self.pool.min > self.pool.max {
            return 0;
        }
        u32::from(self.pool.max) - u32::from(self.pool.min) + 1
    }
}
