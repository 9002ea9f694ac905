//! In-memory address allocation for the bundled server.
//!
//! Bindings map a client hardware address (`chaddr` text) to one address in
//! the configured last-octet pool. Nothing is persisted and bindings never
//! expire; a client keeps its address until it sends RELEASE or DECLINE.
//!
//! # Thread Safety
//!
//! The binding table sits behind a tokio [`Mutex`], so one allocator can be
//! shared by every per-datagram task.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Hands out pool addresses keyed by client hardware address.
pub struct AddressAllocator {
    config: Arc<ServerConfig>,
    bindings: Mutex<HashMap<String, Ipv4Addr>>,
}

impl AddressAllocator {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the client's existing binding or binds the lowest free pool address.
    ///
    /// The server's own address is never handed out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] when every pool address is bound.
    pub async fn allocate(&self, chaddr: &str) -> Result<Ipv4Addr> {
        let mut bindings = self.bindings.lock().await;

        if let Some(ip) = bindings.get(chaddr) {
            debug!("Reusing {} for {}", ip, chaddr);
            return Ok(*ip);
        }

        let in_use: HashSet<Ipv4Addr> = bindings.values().copied().collect();
        let ip = (self.config.pool.min..=self.config.pool.max)
            .map(|octet| self.config.pool_address(octet))
            .find(|ip| *ip != self.config.server_id && !in_use.contains(ip))
            .ok_or(Error::PoolExhausted)?;

        bindings.insert(chaddr.to_string(), ip);
        info!("Bound {} to {}", ip, chaddr);
        Ok(ip)
    }

    pub async fn lookup(&self, chaddr: &str) -> Option<Ipv4Addr> {
        self.bindings.lock().await.get(chaddr).copied()
    }

    /// Drops the client's binding, returning the address it held.
    pub async fn release(&self, chaddr: &str) -> Option<Ipv4Addr> {
        let released = self.bindings.lock().await.remove(chaddr);
        if let Some(ip) = released {
            info!("Released {} from {}", ip, chaddr);
        }
        released
    }

    /// Snapshot of all current bindings.
    pub async fn bindings(&self) -> HashMap<String, Ipv4Addr> {
        self.bindings.lock().await.clone()
    }
}
