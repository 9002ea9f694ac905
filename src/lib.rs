//! # dhcpwire
//!
//! A DHCP/BOOTP wire codec implementing RFC 2131 (DHCP) and RFC 2132 (DHCP Options).
//!
//! ## Features
//!
//! - Byte-exact packet decoding and encoding, capped at 512 bytes
//! - Typed options for the common RFC 2132 tags, raw passthrough for the rest
//! - OFFER, ACK and NAK construction from a request and a server config
//! - A small async server with an in-memory allocator built on the codec
//!
//! ## Quick Start
//!
//! ```no_run
//! use dhcpwire::{DhcpPacket, ServerConfig, message::create_offer};
//!
//! fn reply(datagram: &[u8], config: &ServerConfig) -> dhcpwire::Result<Vec<u8>> {
//!     let request = DhcpPacket::parse(datagram)?;
//!     create_offer(&request, config).encode()
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`address`] - IPv4 and hardware address text/byte conversions
//! - [`DhcpOption`] - DHCP option types per RFC 2132
//! - [`DhcpPacket`] - DHCP packet parsing and encoding
//! - [`message`] - Reply builders (OFFER, ACK, NAK)
//! - [`ServerConfig`] - Values copied into replies, plus the server's pool
//! - [`AddressAllocator`] - Thread-safe in-memory address bindings
//! - [`DhcpServer`] - UDP listener dispatching requests to the builders

pub mod address;
pub mod config;
pub mod error;
pub mod lease;
pub mod message;
pub mod options;
pub mod packet;
pub mod server;

pub use config::{AddressPool, ServerConfig};
pub use error::{Error, Result};
pub use lease::AddressAllocator;
pub use options::{ClientIdentifier, DhcpOption, MessageType, OptionCode, OptionValue, WireKind};
pub use packet::DhcpPacket;
pub use server::{DhcpServer, Transport};
