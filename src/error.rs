//! Error types for the DHCP codec and server.
//!
//! All fallible operations in this crate return [`Result<T>`], which uses
//! the [`Error`] enum for error variants.

/// Errors that can occur while encoding, decoding or serving DHCP packets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File system or network I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (config file or packet dump).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed address text.
    ///
    /// Raised when an IPv4 string is not four decimal octets, or when a MAC
    /// string does not match the hex-group pattern required by `hlen`.
    #[error("Format error: {0}")]
    Format(String),

    /// An option's TLV runs past the end of the buffer.
    ///
    /// `needed` counts the tag and length bytes plus the declared payload;
    /// `available` is what the buffer holds from the tag byte onwards.
    #[error("Option {tag} truncated: needs {needed} bytes, {available} available")]
    TruncatedOption {
        tag: u8,
        needed: usize,
        available: usize,
    },

    /// Malformed DHCP packet received.
    ///
    /// This includes packets that are too short, have invalid magic cookies,
    /// or carry options whose length does not fit their type.
    #[error("Invalid DHCP packet: {0}")]
    InvalidPacket(String),

    /// The encoded packet would exceed the 512-byte DHCP message limit.
    #[error("Encoded packet is {0} bytes (maximum 512)")]
    PacketTooLarge(usize),

    /// The allocator has no free address left in its pool.
    #[error("No available IP addresses in pool")]
    PoolExhausted,

    /// Invalid server configuration.
    ///
    /// Returned by [`ServerConfig::validate`](crate::ServerConfig::validate).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Socket creation or configuration error.
    ///
    /// Typically occurs when binding to port 67 without administrator privileges.
    #[error("Socket error: {0}")]
    Socket(String),
}

/// A specialized Result type for DHCP operations.
pub type Result<T> = std::result::Result<T, Error>;
