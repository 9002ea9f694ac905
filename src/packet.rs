//! DHCP packet parsing and encoding per RFC 2131.
//!
//! A DHCP packet consists of a fixed 236-byte header followed by a 4-byte
//! magic cookie and variable-length options. This module handles parsing
//! incoming packets and encoding outgoing ones.
//!
//! # Packet Structure
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     op (1)    |   htype (1)   |   hlen (1)    |   hops (1)    |
//! +---------------+---------------+---------------+---------------+
//! |                            xid (4)                            |
//! +-------------------------------+-------------------------------+
//! |           secs (2)            |           flags (2)           |
//! +-------------------------------+-------------------------------+
//! |                          ciaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          yiaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          siaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          giaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          chaddr (16)                          |
//! +---------------------------------------------------------------+
//! |                          sname (64)                           |
//! +---------------------------------------------------------------+
//! |                          file (128)                           |
//! +---------------------------------------------------------------+
//! |                    magic cookie (4) = 99.130.83.99            |
//! +---------------------------------------------------------------+
//! |                          options (variable)                   |
//! +---------------------------------------------------------------+
//! ```
//!
//! # References
//!
//! - RFC 2131: Dynamic Host Configuration Protocol

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use crate::address::{DEFAULT_MAC, decode_mac, encode_mac};
use crate::error::{Error, Result};
use crate::options::{
    ClientIdentifier, DhcpOption, END_TAG, MessageType, OptionCode,
};

/// DHCP magic cookie that identifies the RFC 2132 option area.
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

const DHCP_CIADDR_OFFSET: usize = 12;
const DHCP_YIADDR_OFFSET: usize = 16;
const DHCP_SIADDR_OFFSET: usize = 20;
const DHCP_GIADDR_OFFSET: usize = 24;
const DHCP_CHADDR_OFFSET: usize = 28;
const DHCP_CHADDR_SIZE: usize = 16;
const DHCP_SNAME_OFFSET: usize = DHCP_CHADDR_OFFSET + DHCP_CHADDR_SIZE;
const DHCP_SNAME_SIZE: usize = 64;
const DHCP_FILE_OFFSET: usize = DHCP_SNAME_OFFSET + DHCP_SNAME_SIZE;
const DHCP_FILE_SIZE: usize = 128;
const DHCP_MAGIC_COOKIE_OFFSET: usize = DHCP_FILE_OFFSET + DHCP_FILE_SIZE;

/// Size of the fixed header portion including magic cookie.
pub const DHCP_FIXED_HEADER_SIZE: usize = DHCP_MAGIC_COOKIE_OFFSET + DHCP_MAGIC_COOKIE.len();

/// Largest packet this codec will encode.
pub const DHCP_MAX_PACKET_SIZE: usize = 512;

/// BOOTP/DHCP operation code for client requests.
pub const BOOTREQUEST: u8 = 1;

/// BOOTP/DHCP operation code for server replies.
pub const BOOTREPLY: u8 = 2;

/// Hardware address type for Ethernet (most common).
pub const HTYPE_ETHERNET: u8 = 1;

/// Hardware address length for Ethernet (6 bytes).
pub const HLEN_ETHERNET: u8 = 6;

/// A DHCP packet.
///
/// This struct represents both client requests and server replies. Use
/// [`parse`](Self::parse) for incoming datagrams and [`encode`](Self::encode)
/// for outgoing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpPacket {
    /// Operation code: [`BOOTREQUEST`] (1) or [`BOOTREPLY`] (2).
    pub op: u8,

    /// Hardware address type. [`HTYPE_ETHERNET`] (1) for Ethernet.
    pub htype: u8,

    /// Hardware address length; the number of `chaddr` groups on the wire.
    pub hlen: u8,

    /// Hop count, incremented by relay agents.
    pub hops: u8,

    /// Transaction ID chosen by client, echoed in replies.
    pub xid: u32,

    /// Seconds elapsed since client began address acquisition.
    pub secs: u16,

    /// Flags. Bit 15 (0x8000) = broadcast flag.
    pub flags: u16,

    /// Client IP address (set by client in RENEWING/REBINDING states).
    pub ciaddr: Ipv4Addr,

    /// "Your" IP address - the address being assigned to the client.
    pub yiaddr: Ipv4Addr,

    /// Server IP address (next server in BOOTP, or DHCP server).
    pub siaddr: Ipv4Addr,

    /// Gateway IP address - set by relay agents.
    pub giaddr: Ipv4Addr,

    /// Client hardware address as upper-case `AA:BB:...` text, `hlen` groups.
    pub chaddr: String,

    /// Server host name, ASCII, at most 64 bytes.
    pub sname: String,

    /// Boot file name, ASCII, at most 128 bytes.
    pub file: String,

    /// Options in wire order. Parsed packets always end with End.
    pub options: Vec<DhcpOption>,

    /// Where the datagram came from. Not part of the wire format.
    pub source: Option<SocketAddr>,
}

impl Default for DhcpPacket {
    fn default() -> Self {
        Self {
            op: BOOTREQUEST,
            htype: HTYPE_ETHERNET,
            hlen: HLEN_ETHERNET,
            hops: 0,
            xid: 0,
            secs: 0,
            flags: 0,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr: DEFAULT_MAC.to_string(),
            sname: String::new(),
            file: String::new(),
            options: Vec::new(),
            source: None,
        }
    }
}

impl DhcpPacket {
    /// A fresh reply packet: [`BOOTREPLY`] with every other field at its default.
    pub fn reply() -> Self {
        Self {
            op: BOOTREPLY,
            ..Self::default()
        }
    }

    /// Parses a DHCP packet from raw bytes.
    ///
    /// Every tag other than End, including 0, is read as a TLV. The walk stops
    /// at End or at the end of the buffer; either way the returned option list
    /// ends with End.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPacket`] if:
    /// - Packet is shorter than 240 bytes (fixed header + magic cookie)
    /// - Magic cookie is invalid (not 99.130.83.99)
    /// - Hardware length exceeds the 16-byte chaddr field
    /// - An option payload does not fit its type
    ///
    /// Returns [`Error::TruncatedOption`] if an option runs past the buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < DHCP_FIXED_HEADER_SIZE {
            return Err(Error::InvalidPacket(format!(
                "Packet too short: {} bytes (minimum {})",
                data.len(),
                DHCP_FIXED_HEADER_SIZE
            )));
        }

        let magic_cookie = &data[DHCP_MAGIC_COOKIE_OFFSET..DHCP_FIXED_HEADER_SIZE];
        if magic_cookie != DHCP_MAGIC_COOKIE {
            return Err(Error::InvalidPacket("Invalid magic cookie".to_string()));
        }

        let hlen = data[2];
        if hlen as usize > DHCP_CHADDR_SIZE {
            return Err(Error::InvalidPacket(format!(
                "Hardware address length {} exceeds {}",
                hlen, DHCP_CHADDR_SIZE
            )));
        }

        let chaddr_end = DHCP_CHADDR_OFFSET + hlen as usize;

        Ok(Self {
            op: data[0],
            htype: data[1],
            hlen,
            hops: data[3],
            xid: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            secs: u16::from_be_bytes([data[8], data[9]]),
            flags: u16::from_be_bytes([data[10], data[11]]),
            ciaddr: read_ipv4(data, DHCP_CIADDR_OFFSET),
            yiaddr: read_ipv4(data, DHCP_YIADDR_OFFSET),
            siaddr: read_ipv4(data, DHCP_SIADDR_OFFSET),
            giaddr: read_ipv4(data, DHCP_GIADDR_OFFSET),
            chaddr: decode_mac(&data[DHCP_CHADDR_OFFSET..chaddr_end], None),
            sname: read_ascii(&data[DHCP_SNAME_OFFSET..DHCP_SNAME_OFFSET + DHCP_SNAME_SIZE]),
            file: read_ascii(&data[DHCP_FILE_OFFSET..DHCP_FILE_OFFSET + DHCP_FILE_SIZE]),
            options: Self::parse_options(&data[DHCP_FIXED_HEADER_SIZE..])?,
            source: None,
        })
    }

    fn parse_options(data: &[u8]) -> Result<Vec<DhcpOption>> {
        let mut options = Vec::new();
        let mut index = 0;

        while index < data.len() {
            let (option, consumed) = DhcpOption::from_buffer(&data[index..])?;
            let is_end = option.is_end();
            options.push(option);

            if is_end {
                return Ok(options);
            }

            index += consumed;
        }

        options.push(DhcpOption::end());
        Ok(options)
    }

    /// Encodes the packet to bytes for transmission.
    ///
    /// The result is exactly `240 + options` bytes. An End marker is
    /// written after the options unless the list already ends with one.
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] if `chaddr` does not have `hlen` hex groups or does
    ///   not fit the 16-byte field, or a client identifier is malformed
    /// - [`Error::PacketTooLarge`] if the result would exceed 512 bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut packet = vec![0u8; DHCP_MAX_PACKET_SIZE];

        packet[0] = self.op;
        packet[1] = self.htype;
        packet[2] = self.hlen;
        packet[3] = self.hops;

        packet[4..8].copy_from_slice(&self.xid.to_be_bytes());
        packet[8..10].copy_from_slice(&self.secs.to_be_bytes());
        packet[10..12].copy_from_slice(&self.flags.to_be_bytes());

        write_ipv4(&mut packet, DHCP_CIADDR_OFFSET, self.ciaddr);
        write_ipv4(&mut packet, DHCP_YIADDR_OFFSET, self.yiaddr);
        write_ipv4(&mut packet, DHCP_SIADDR_OFFSET, self.siaddr);
        write_ipv4(&mut packet, DHCP_GIADDR_OFFSET, self.giaddr);

        let chaddr = encode_mac(&self.chaddr, Some(self.hlen as usize))?;
        if chaddr.len() > DHCP_CHADDR_SIZE {
            return Err(Error::Format(format!(
                "Hardware address {:?} does not fit in {} bytes",
                self.chaddr, DHCP_CHADDR_SIZE
            )));
        }
        packet[DHCP_CHADDR_OFFSET..DHCP_CHADDR_OFFSET + chaddr.len()].copy_from_slice(&chaddr);

        write_ascii(
            &mut packet[DHCP_SNAME_OFFSET..DHCP_SNAME_OFFSET + DHCP_SNAME_SIZE],
            &self.sname,
        );
        write_ascii(
            &mut packet[DHCP_FILE_OFFSET..DHCP_FILE_OFFSET + DHCP_FILE_SIZE],
            &self.file,
        );

        packet[DHCP_MAGIC_COOKIE_OFFSET..DHCP_FIXED_HEADER_SIZE].copy_from_slice(&DHCP_MAGIC_COOKIE);

        let mut options = Vec::new();
        for option in &self.options {
            options.extend_from_slice(&option.to_buffer()?);
        }
        if !self.options.last().is_some_and(DhcpOption::is_end) {
            options.push(END_TAG);
        }

        let total = DHCP_FIXED_HEADER_SIZE + options.len();
        if total > DHCP_MAX_PACKET_SIZE {
            return Err(Error::PacketTooLarge(total));
        }

        packet[DHCP_FIXED_HEADER_SIZE..total].copy_from_slice(&options);
        packet.truncate(total);

        Ok(packet)
    }

    /// Appends an End option unless the list already ends with one.
    pub fn ensure_end(&mut self) {
        if !self.options.last().is_some_and(DhcpOption::is_end) {
            self.options.push(DhcpOption::end());
        }
    }

    /// Attaches the sender address reported by the transport.
    pub fn with_source(mut self, source: SocketAddr) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the first option with the given tag, in wire order.
    pub fn find(&self, tag: u8) -> Option<&DhcpOption> {
        self.options.iter().find(|option| option.tag == tag)
    }

    /// Returns the DHCP message type (Option 53) value, or 0 if absent.
    pub fn message_type(&self) -> u8 {
        self.find(OptionCode::DhcpMessageType as u8)
            .and_then(|option| option.value.as_u8())
            .unwrap_or(0)
    }

    /// Returns the DHCP message type as a [`MessageType`] if present and known.
    ///
    /// Returns `None` for BOOTP packets which don't have this option.
    pub fn parsed_message_type(&self) -> Option<MessageType> {
        MessageType::try_from(self.message_type()).ok()
    }

    /// Returns the requested IP address (Option 50) if present.
    pub fn requested_ip(&self) -> Option<Ipv4Addr> {
        self.find(OptionCode::AddressRequest as u8)
            .and_then(|option| option.value.as_ipv4())
    }

    /// Returns the server identifier (Option 54) if present.
    ///
    /// Clients include this in REQUEST to indicate which server's
    /// offer they are accepting.
    pub fn server_identifier(&self) -> Option<Ipv4Addr> {
        self.find(OptionCode::DhcpServerId as u8)
            .and_then(|option| option.value.as_ipv4())
    }

    /// Returns the client hostname (Option 12) if present.
    pub fn hostname(&self) -> Option<&str> {
        self.find(OptionCode::Hostname as u8)
            .and_then(|option| option.value.as_text())
    }

    /// Returns the parameter request list (Option 55) if present.
    pub fn parameter_request_list(&self) -> Option<&[u8]> {
        self.find(OptionCode::ParameterList as u8)
            .and_then(|option| option.value.as_bytes())
    }

    /// Returns the client identifier (Option 61) if present.
    pub fn client_identifier(&self) -> Option<&ClientIdentifier> {
        self.find(OptionCode::ClientId as u8)
            .and_then(|option| option.value.as_client_id())
    }

    /// Returns true if the broadcast flag (bit 15) is set.
    pub fn is_broadcast(&self) -> bool {
        (self.flags & 0x8000) != 0
    }

    fn op_name(&self) -> &'static str {
        match self.op {
            BOOTREQUEST => "BOOTREQUEST",
            BOOTREPLY => "BOOTREPLY",
            _ => "UNKNOWN",
        }
    }
}

/// Human-readable dump of every header field and option, for diagnostics.
impl fmt::Display for DhcpPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parsed_message_type() {
            Some(message_type) => writeln!(f, "DHCP: {}", message_type)?,
            None => writeln!(f, "DHCP: UNKNOWN")?,
        }
        writeln!(f, "=====================================")?;
        writeln!(f, "Message type (op): {}", self.op_name())?;
        writeln!(f, "Hardware address type (htype): {}", self.htype)?;
        writeln!(f, "Hardware address length (hlen): {}", self.hlen)?;
        writeln!(f, "hops: {}", self.hops)?;
        writeln!(f, "Transaction ID (xid): {:#010x}", self.xid)?;
        writeln!(f, "Seconds (secs): {}", self.secs)?;
        writeln!(f, "Flags: {:#06x}", self.flags)?;
        writeln!(f, "Client IP (ciaddr): {}", self.ciaddr)?;
        writeln!(f, "Your IP (yiaddr): {}", self.yiaddr)?;
        writeln!(f, "Server IP (siaddr): {}", self.siaddr)?;
        writeln!(f, "Relay agent IP (giaddr): {}", self.giaddr)?;
        writeln!(f, "Client hardware address (chaddr): {}", self.chaddr)?;
        writeln!(f, "Server host name (sname): {}", self.sname)?;
        writeln!(f, "Boot file name (file): {}", self.file)?;
        write!(f, "Options:")?;
        for option in &self.options {
            write!(f, "\n  {}({}): {}", option.name(), option.tag, option.value)?;
        }
        Ok(())
    }
}

fn read_ipv4(data: &[u8], offset: usize) -> Ipv4Addr {
    Ipv4Addr::new(
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    )
}

fn write_ipv4(packet: &mut [u8], offset: usize, addr: Ipv4Addr) {
    packet[offset..offset + 4].copy_from_slice(&addr.octets());
}

/// Reads a NUL-terminated ASCII field. Non-ASCII bytes become `?`.
fn read_ascii(field: &[u8]) -> String {
    field
        .iter()
        .take_while(|byte| **byte != 0)
        .map(|byte| if byte.is_ascii() { char::from(*byte) } else { '?' })
        .collect()
}

/// Writes text into a zero-filled fixed field, truncating at the field size.
fn write_ascii(field: &mut [u8], text: &str) {
    for (slot, c) in field.iter_mut().zip(text.chars()) {
        *slot = if c.is_ascii() { c as u8 } else { b'?' };
    }
}
