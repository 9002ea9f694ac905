//! DHCP options as defined in RFC 2132.
//!
//! DHCP uses options to convey configuration parameters between servers and clients.
//! Each option has a code (1 byte), length (1 byte), and variable-length data.
//!
//! Every recognized tag maps to a [`WireKind`] through a single lookup table;
//! the wire kind alone decides how the payload is encoded and decoded. Tags
//! missing from the table decode as [`WireKind::Raw`] and keep their payload
//! bytes verbatim, so unmodeled options survive a decode/encode cycle.
//!
//! # References
//!
//! - RFC 2132: DHCP Options and BOOTP Vendor Extensions

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::address::{decode_mac, encode_mac, to_hex};
use crate::error::{Error, Result};

/// Maximum payload length of a single option (1-byte length field).
pub const MAX_OPTION_LENGTH: usize = 255;

/// Maximum number of IP addresses in an address-list option.
///
/// With 4 bytes per IPv4 address, 255 payload bytes hold 63 addresses.
const MAX_ADDRESSES_PER_OPTION: usize = 63;

/// End-of-options tag.
pub const END_TAG: u8 = 255;

/// DHCP option codes modeled by this crate.
///
/// Codes outside this set are handled through [`WireKind::Raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OptionCode {
    /// Subnet mask (RFC 2132 §3.3).
    SubnetMask = 1,
    /// Router/gateway addresses (RFC 2132 §3.5).
    Gateways = 3,
    /// DNS server addresses (RFC 2132 §3.8).
    DomainServer = 6,
    /// Client hostname (RFC 2132 §3.14).
    Hostname = 12,
    /// Domain name for DNS resolution (RFC 2132 §3.17).
    DomainName = 15,
    /// Requested IP address (RFC 2132 §9.1).
    AddressRequest = 50,
    /// IP address lease time in seconds (RFC 2132 §9.2).
    AddressTime = 51,
    /// DHCP message type (RFC 2132 §9.6).
    DhcpMessageType = 53,
    /// Server identifier (RFC 2132 §9.7).
    DhcpServerId = 54,
    /// Parameter request list (RFC 2132 §9.8).
    ParameterList = 55,
    /// Error message text (RFC 2132 §9.9).
    DhcpMessage = 56,
    /// Maximum DHCP message size (RFC 2132 §9.10).
    DhcpMaxMsgSize = 57,
    /// Renewal time T1 (RFC 2132 §9.11).
    RenewalTime = 58,
    /// Rebinding time T2 (RFC 2132 §9.12).
    RebindingTime = 59,
    /// Vendor class identifier (RFC 2132 §9.13).
    ClassId = 60,
    /// Client identifier (RFC 2132 §9.14).
    ClientId = 61,
    /// TFTP server name (RFC 2132 §9.4).
    TftpServer = 66,
    /// Bootfile name (RFC 2132 §9.5).
    BootFile = 67,
    /// End of options marker.
    End = 255,
}

/// How an option's payload is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    /// One unsigned byte.
    Scalar8,
    /// Two bytes, big-endian.
    Scalar16,
    /// Four bytes, big-endian.
    Scalar32,
    /// One IPv4 address.
    Ipv4,
    /// N × 4 bytes of IPv4 addresses.
    Ipv4List,
    /// UTF-8 text.
    Utf8,
    /// Opaque bytes of a known option.
    Bytes,
    /// List of one-byte numbers.
    NumberList,
    /// Hardware type byte followed by a hardware address.
    ClientId,
    /// Single 0xFF byte, no length.
    End,
    /// Unrecognized tag; payload kept verbatim.
    Raw,
}

static OPTION_TABLE: [(OptionCode, WireKind, &str); 19] = [
    (OptionCode::SubnetMask, WireKind::Ipv4, "SubnetMask"),
    (OptionCode::Gateways, WireKind::Ipv4List, "Gateways"),
    (OptionCode::DomainServer, WireKind::Ipv4List, "DomainServer"),
    (OptionCode::Hostname, WireKind::Utf8, "Hostname"),
    (OptionCode::DomainName, WireKind::Utf8, "DomainName"),
    (OptionCode::AddressRequest, WireKind::Ipv4, "AddressRequest"),
    (OptionCode::AddressTime, WireKind::Scalar32, "AddressTime"),
    (OptionCode::DhcpMessageType, WireKind::Scalar8, "DhcpMessageType"),
    (OptionCode::DhcpServerId, WireKind::Ipv4, "DhcpServerId"),
    (OptionCode::ParameterList, WireKind::NumberList, "ParameterList"),
    (OptionCode::DhcpMessage, WireKind::Bytes, "DhcpMessage"),
    (OptionCode::DhcpMaxMsgSize, WireKind::Scalar16, "DhcpMaxMsgSize"),
    (OptionCode::RenewalTime, WireKind::Scalar32, "RenewalTime"),
    (OptionCode::RebindingTime, WireKind::Scalar32, "RebindingTime"),
    (OptionCode::ClassId, WireKind::Bytes, "ClassId"),
    (OptionCode::ClientId, WireKind::ClientId, "ClientId"),
    (OptionCode::TftpServer, WireKind::Utf8, "TftpServer"),
    (OptionCode::BootFile, WireKind::Utf8, "BootFile"),
    (OptionCode::End, WireKind::End, "End"),
];

impl TryFrom<u8> for OptionCode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        OPTION_TABLE
            .iter()
            .find(|(code, _, _)| *code as u8 == value)
            .map(|(code, _, _)| *code)
            .ok_or(value)
    }
}

/// Codec descriptor for one tag, as returned by [`DhcpOption::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub tag: u8,
    pub kind: WireKind,
    pub name: &'static str,
}

impl OptionSpec {
    /// Decodes an option payload (the bytes after tag and length).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPacket`] if the payload length does not fit
    /// the wire kind (e.g. a subnet mask must be exactly 4 bytes).
    pub fn decode(&self, data: &[u8]) -> Result<DhcpOption> {
        let value = match self.kind {
            WireKind::Scalar8 => OptionValue::U8(self.fixed::<1>(data)?[0]),
            WireKind::Scalar16 => OptionValue::U16(u16::from_be_bytes(self.fixed::<2>(data)?)),
            WireKind::Scalar32 => OptionValue::U32(u32::from_be_bytes(self.fixed::<4>(data)?)),
            WireKind::Ipv4 => OptionValue::Ipv4(Ipv4Addr::from(self.fixed::<4>(data)?)),
            WireKind::Ipv4List => {
                if !data.len().is_multiple_of(4) || data.is_empty() {
                    return Err(Error::InvalidPacket(format!(
                        "Invalid {} option length {}",
                        self.name,
                        data.len()
                    )));
                }
                let addresses = data
                    .chunks_exact(4)
                    .map(|chunk| Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]))
                    .collect();
                OptionValue::Ipv4List(addresses)
            }
            WireKind::Utf8 => OptionValue::Text(String::from_utf8_lossy(data).to_string()),
            WireKind::Bytes | WireKind::Raw => OptionValue::Bytes(data.to_vec()),
            WireKind::NumberList => OptionValue::NumberList(data.to_vec()),
            WireKind::ClientId => {
                let Some((&htype, hw_address)) = data.split_first() else {
                    return Err(Error::InvalidPacket(
                        "Empty client identifier".to_string(),
                    ));
                };
                OptionValue::ClientId(ClientIdentifier {
                    htype,
                    hw_address: decode_mac(hw_address, None),
                })
            }
            WireKind::End => OptionValue::End,
        };

        Ok(DhcpOption {
            tag: self.tag,
            value,
        })
    }

    fn fixed<const N: usize>(&self, data: &[u8]) -> Result<[u8; N]> {
        data.try_into().map_err(|_| {
            Error::InvalidPacket(format!(
                "Invalid {} length {} (expected {})",
                self.name,
                data.len(),
                N
            ))
        })
    }
}

/// DHCP message types (Option 53) as defined in RFC 2132 §9.6.
///
/// These values indicate the purpose of a DHCP message in the protocol exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Client broadcast to locate servers.
    Discover = 1,
    /// Server response to DISCOVER with IP offer.
    Offer = 2,
    /// Client request for offered parameters.
    Request = 3,
    /// Client indicates address is already in use.
    Decline = 4,
    /// Server acknowledgement with configuration.
    Ack = 5,
    /// Server negative acknowledgement.
    Nak = 6,
    /// Client releases IP address.
    Release = 7,
    /// Client requests config without IP allocation.
    Inform = 8,
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Offer),
            3 => Ok(Self::Request),
            4 => Ok(Self::Decline),
            5 => Ok(Self::Ack),
            6 => Ok(Self::Nak),
            7 => Ok(Self::Release),
            8 => Ok(Self::Inform),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover => write!(f, "DISCOVER"),
            Self::Offer => write!(f, "OFFER"),
            Self::Request => write!(f, "REQUEST"),
            Self::Decline => write!(f, "DECLINE"),
            Self::Ack => write!(f, "ACK"),
            Self::Nak => write!(f, "NAK"),
            Self::Release => write!(f, "RELEASE"),
            Self::Inform => write!(f, "INFORM"),
        }
    }
}

/// Client identifier payload (Option 61): hardware type plus address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientIdentifier {
    pub htype: u8,
    pub hw_address: String,
}

/// Decoded value of an option, one variant per [`WireKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    U8(u8),
    U16(u16),
    U32(u32),
    Ipv4(Ipv4Addr),
    Ipv4List(Vec<Ipv4Addr>),
    Text(String),
    Bytes(Vec<u8>),
    NumberList(Vec<u8>),
    ClientId(ClientIdentifier),
    End,
}

impl OptionValue {
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            Self::Ipv4(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_ipv4_list(&self) -> Option<&[Ipv4Addr]> {
        match self {
            Self::Ipv4List(addrs) => Some(addrs),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the payload of byte-oriented values (raw bytes and number lists).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) | Self::NumberList(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_client_id(&self) -> Option<&ClientIdentifier> {
        match self {
            Self::ClientId(id) => Some(id),
            _ => None,
        }
    }

    fn payload(&self) -> Result<Vec<u8>> {
        let mut payload = match self {
            Self::U8(value) => vec![*value],
            Self::U16(value) => value.to_be_bytes().to_vec(),
            Self::U32(value) => value.to_be_bytes().to_vec(),
            Self::Ipv4(addr) => addr.octets().to_vec(),
            Self::Ipv4List(addrs) => addrs
                .iter()
                .take(MAX_ADDRESSES_PER_OPTION)
                .flat_map(|addr| addr.octets())
                .collect(),
            Self::Text(text) => text.as_bytes().to_vec(),
            Self::Bytes(bytes) | Self::NumberList(bytes) => bytes.clone(),
            Self::ClientId(id) => {
                let mut payload = vec![id.htype];
                if !id.hw_address.is_empty() {
                    payload.extend(encode_mac(&id.hw_address, None)?);
                }
                payload
            }
            Self::End => Vec::new(),
        };
        payload.truncate(MAX_OPTION_LENGTH);
        Ok(payload)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(value) => write!(f, "{}", value),
            Self::U16(value) => write!(f, "{}", value),
            Self::U32(value) => write!(f, "{}", value),
            Self::Ipv4(addr) => write!(f, "{}", addr),
            Self::Ipv4List(addrs) => {
                let items: Vec<String> = addrs.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Self::Text(text) => write!(f, "{}", text),
            Self::Bytes(bytes) => write!(f, "{}", to_hex(bytes)),
            Self::NumberList(values) => {
                let items: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Self::ClientId(id) => {
                let json = serde_json::to_string(id).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
            Self::End => write!(f, "null"),
        }
    }
}

/// A single DHCP option: its tag and typed value.
///
/// Options with the same tag may appear more than once in a packet; the
/// option list keeps them all in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpOption {
    pub tag: u8,
    pub value: OptionValue,
}

impl DhcpOption {
    /// Returns the codec descriptor for `tag`.
    ///
    /// Unrecognized tags get [`WireKind::Raw`] and the name `"Unknown"`.
    pub fn create(tag: u8) -> OptionSpec {
        OPTION_TABLE
            .iter()
            .find(|(code, _, _)| *code as u8 == tag)
            .map(|(_, kind, name)| OptionSpec {
                tag,
                kind: *kind,
                name: *name,
            })
            .unwrap_or(OptionSpec {
                tag,
                kind: WireKind::Raw,
                name: "Unknown",
            })
    }

    pub fn new(tag: u8, value: OptionValue) -> Self {
        Self { tag, value }
    }

    /// Display name derived from the tag table.
    pub fn name(&self) -> &'static str {
        Self::create(self.tag).name
    }

    pub fn kind(&self) -> WireKind {
        Self::create(self.tag).kind
    }

    pub fn is_end(&self) -> bool {
        self.tag == END_TAG
    }

    /// Parses one option from a buffer that begins at the option's tag byte.
    ///
    /// Returns the option and the number of bytes it occupied: 1 for End,
    /// otherwise `2 + length`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedOption`] if the length byte is missing or the
    /// declared payload runs past the end of `raw`, and
    /// [`Error::InvalidPacket`] if the payload does not fit the option's kind.
    pub fn from_buffer(raw: &[u8]) -> Result<(Self, usize)> {
        let Some(&tag) = raw.first() else {
            return Err(Error::InvalidPacket("Empty option buffer".to_string()));
        };

        if tag == END_TAG {
            return Ok((Self::end(), 1));
        }

        let Some(&length) = raw.get(1) else {
            return Err(Error::TruncatedOption {
                tag,
                needed: 2,
                available: raw.len(),
            });
        };

        let end = 2 + length as usize;
        if end > raw.len() {
            return Err(Error::TruncatedOption {
                tag,
                needed: end,
                available: raw.len(),
            });
        }

        let option = Self::create(tag).decode(&raw[2..end])?;
        Ok((option, end))
    }

    /// Encodes the option to its wire format (tag + length + payload).
    ///
    /// The length byte is computed from the encoded payload; text, byte and
    /// list payloads longer than 255 bytes are truncated to fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if a client identifier's hardware address
    /// is not valid hex text.
    pub fn to_buffer(&self) -> Result<Vec<u8>> {
        if self.is_end() {
            return Ok(vec![END_TAG]);
        }

        let payload = self.value.payload()?;
        let mut result = Vec::with_capacity(payload.len() + 2);
        result.push(self.tag);
        result.push(payload.len() as u8);
        result.extend_from_slice(&payload);
        Ok(result)
    }

    pub fn subnet_mask(addr: Ipv4Addr) -> Self {
        Self::new(OptionCode::SubnetMask as u8, OptionValue::Ipv4(addr))
    }

    pub fn gateways(addrs: Vec<Ipv4Addr>) -> Self {
        Self::new(OptionCode::Gateways as u8, OptionValue::Ipv4List(addrs))
    }

    pub fn domain_server(addrs: Vec<Ipv4Addr>) -> Self {
        Self::new(OptionCode::DomainServer as u8, OptionValue::Ipv4List(addrs))
    }

    pub fn hostname(name: impl Into<String>) -> Self {
        Self::new(OptionCode::Hostname as u8, OptionValue::Text(name.into()))
    }

    pub fn domain_name(name: impl Into<String>) -> Self {
        Self::new(OptionCode::DomainName as u8, OptionValue::Text(name.into()))
    }

    pub fn address_request(addr: Ipv4Addr) -> Self {
        Self::new(OptionCode::AddressRequest as u8, OptionValue::Ipv4(addr))
    }

    pub fn address_time(seconds: u32) -> Self {
        Self::new(OptionCode::AddressTime as u8, OptionValue::U32(seconds))
    }

    pub fn message_type(message_type: MessageType) -> Self {
        Self::new(
            OptionCode::DhcpMessageType as u8,
            OptionValue::U8(message_type as u8),
        )
    }

    pub fn server_id(addr: Ipv4Addr) -> Self {
        Self::new(OptionCode::DhcpServerId as u8, OptionValue::Ipv4(addr))
    }

    pub fn parameter_list(codes: Vec<u8>) -> Self {
        Self::new(OptionCode::ParameterList as u8, OptionValue::NumberList(codes))
    }

    pub fn dhcp_message(message: Vec<u8>) -> Self {
        Self::new(OptionCode::DhcpMessage as u8, OptionValue::Bytes(message))
    }

    pub fn max_message_size(size: u16) -> Self {
        Self::new(OptionCode::DhcpMaxMsgSize as u8, OptionValue::U16(size))
    }

    pub fn renewal_time(seconds: u32) -> Self {
        Self::new(OptionCode::RenewalTime as u8, OptionValue::U32(seconds))
    }

    pub fn rebinding_time(seconds: u32) -> Self {
        Self::new(OptionCode::RebindingTime as u8, OptionValue::U32(seconds))
    }

    pub fn class_id(class: Vec<u8>) -> Self {
        Self::new(OptionCode::ClassId as u8, OptionValue::Bytes(class))
    }

    pub fn client_id(htype: u8, hw_address: impl Into<String>) -> Self {
        Self::new(
            OptionCode::ClientId as u8,
            OptionValue::ClientId(ClientIdentifier {
                htype,
                hw_address: hw_address.into(),
            }),
        )
    }

    pub fn tftp_server(name: impl Into<String>) -> Self {
        Self::new(OptionCode::TftpServer as u8, OptionValue::Text(name.into()))
    }

    pub fn boot_file(name: impl Into<String>) -> Self {
        Self::new(OptionCode::BootFile as u8, OptionValue::Text(name.into()))
    }

    pub fn end() -> Self {
        Self::new(END_TAG, OptionValue::End)
    }

    /// An option for a tag this crate does not model, carrying raw bytes.
    pub fn unknown(tag: u8, data: Vec<u8>) -> Self {
        Self::new(tag, OptionValue::Bytes(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(option: &DhcpOption) -> DhcpOption {
        let encoded = option.to_buffer().unwrap();
        let (decoded, consumed) = DhcpOption::from_buffer(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        decoded
    }

    #[test]
    fn test_message_type_conversions() {
        for value in 1..=8u8 {
            let msg_type = MessageType::try_from(value).unwrap();
            assert_eq!(msg_type as u8, value);
        }
        assert!(MessageType::try_from(0).is_err());
        assert!(MessageType::try_from(9).is_err());
    }

    #[test]
    fn test_message_type_display() {
        assert_eq!(format!("{}", MessageType::Discover), "DISCOVER");
        assert_eq!(format!("{}", MessageType::Offer), "OFFER");
        assert_eq!(format!("{}", MessageType::Request), "REQUEST");
        assert_eq!(format!("{}", MessageType::Decline), "DECLINE");
        assert_eq!(format!("{}", MessageType::Ack), "ACK");
        assert_eq!(format!("{}", MessageType::Nak), "NAK");
        assert_eq!(format!("{}", MessageType::Release), "RELEASE");
        assert_eq!(format!("{}", MessageType::Inform), "INFORM");
    }

    #[test]
    fn test_option_code_table() {
        assert_eq!(OptionCode::try_from(53), Ok(OptionCode::DhcpMessageType));
        assert_eq!(OptionCode::try_from(67), Ok(OptionCode::BootFile));
        assert_eq!(OptionCode::try_from(99), Err(99));

        let descriptor = DhcpOption::create(OptionCode::Gateways as u8);
        assert_eq!(descriptor.kind, WireKind::Ipv4List);
        assert_eq!(descriptor.name, "Gateways");
        assert_eq!(DhcpOption::create(57).kind, WireKind::Scalar16);
        assert_eq!(DhcpOption::create(61).kind, WireKind::ClientId);
        assert_eq!(DhcpOption::create(255).kind, WireKind::End);
    }

    #[test]
    fn test_unknown_tag_dispatch() {
        let descriptor = DhcpOption::create(99);
        assert_eq!(descriptor.kind, WireKind::Raw);
        assert_eq!(descriptor.name, "Unknown");

        let raw = [99, 4, 0xde, 0xad, 0xbe, 0xef];
        let (option, consumed) = DhcpOption::from_buffer(&raw).unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(option, DhcpOption::unknown(99, vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(option.to_buffer().unwrap(), raw);
    }

    #[test]
    fn test_option_encode_decode_roundtrip() {
        let options = vec![
            DhcpOption::subnet_mask(Ipv4Addr::new(255, 255, 255, 0)),
            DhcpOption::gateways(vec![Ipv4Addr::new(192, 168, 1, 1)]),
            DhcpOption::domain_server(vec![
                Ipv4Addr::new(8, 8, 8, 8),
                Ipv4Addr::new(8, 8, 4, 4),
            ]),
            DhcpOption::hostname("test-host"),
            DhcpOption::domain_name("example.local"),
            DhcpOption::address_request(Ipv4Addr::new(192, 168, 1, 100)),
            DhcpOption::address_time(86400),
            DhcpOption::message_type(MessageType::Discover),
            DhcpOption::server_id(Ipv4Addr::new(192, 168, 1, 1)),
            DhcpOption::parameter_list(vec![1, 3, 6, 15]),
            DhcpOption::dhcp_message(b"address in use".to_vec()),
            DhcpOption::max_message_size(1500),
            DhcpOption::renewal_time(43200),
            DhcpOption::rebinding_time(75600),
            DhcpOption::class_id(b"MSFT 5.0".to_vec()),
            DhcpOption::client_id(1, "AA:BB:CC:DD:EE:FF"),
            DhcpOption::tftp_server("tftp.local"),
            DhcpOption::boot_file("pxelinux.0"),
        ];

        for original in options {
            assert_eq!(roundtrip(&original), original);
        }
    }

    #[test]
    fn test_scalar_wire_layout() {
        assert_eq!(
            DhcpOption::address_time(86400).to_buffer().unwrap(),
            vec![51, 4, 0x00, 0x01, 0x51, 0x80]
        );
        assert_eq!(
            DhcpOption::max_message_size(576).to_buffer().unwrap(),
            vec![57, 2, 0x02, 0x40]
        );
        assert_eq!(
            DhcpOption::message_type(MessageType::Offer).to_buffer().unwrap(),
            vec![53, 1, 2]
        );
    }

    #[test]
    fn test_end_is_single_byte() {
        assert_eq!(DhcpOption::end().to_buffer().unwrap(), vec![255]);
        let (option, consumed) = DhcpOption::from_buffer(&[255, 7, 7]).unwrap();
        assert!(option.is_end());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_client_id_wire_layout() {
        let option = DhcpOption::client_id(1, "54:a0:50:e7:df:d7");
        assert_eq!(
            option.to_buffer().unwrap(),
            vec![61, 7, 1, 0x54, 0xa0, 0x50, 0xe7, 0xdf, 0xd7]
        );

        let decoded = roundtrip(&option);
        assert_eq!(
            decoded.value.as_client_id(),
            Some(&ClientIdentifier {
                htype: 1,
                hw_address: "54:A0:50:E7:DF:D7".to_string(),
            })
        );
    }

    #[test]
    fn test_client_id_without_hardware_address() {
        let raw = [61, 1, 1];
        let (option, consumed) = DhcpOption::from_buffer(&raw).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(option, DhcpOption::client_id(1, ""));
        assert_eq!(option.to_buffer().unwrap(), raw);
    }

    #[test]
    fn test_client_id_bad_hex_fails() {
        let option = DhcpOption::client_id(1, "not-a-mac");
        assert!(matches!(option.to_buffer(), Err(Error::Format(_))));
    }

    #[test]
    fn test_option_invalid_lengths() {
        assert!(DhcpOption::create(1).decode(&[255, 255, 255]).is_err());
        assert!(DhcpOption::create(3).decode(&[]).is_err());
        assert!(DhcpOption::create(6).decode(&[1, 2, 3, 4, 5]).is_err());
        assert!(DhcpOption::create(51).decode(&[0, 0, 0]).is_err());
        assert!(DhcpOption::create(53).decode(&[1, 2]).is_err());
        assert!(DhcpOption::create(57).decode(&[1]).is_err());
        assert!(DhcpOption::create(61).decode(&[]).is_err());
    }

    #[test]
    fn test_truncated_option_rejected() {
        let result = DhcpOption::from_buffer(&[51, 4, 0, 0]);
        assert!(matches!(
            result,
            Err(Error::TruncatedOption {
                tag: 51,
                needed: 6,
                available: 4
            })
        ));

        let result = DhcpOption::from_buffer(&[12]);
        assert!(matches!(result, Err(Error::TruncatedOption { tag: 12, .. })));
    }

    #[test]
    fn test_long_payloads_truncated_to_length_byte() {
        let encoded = DhcpOption::hostname("a".repeat(300)).to_buffer().unwrap();
        assert_eq!(encoded[1], 255);
        assert_eq!(encoded.len(), 257);

        let addrs = vec![Ipv4Addr::new(10, 0, 0, 1); 80];
        let encoded = DhcpOption::gateways(addrs).to_buffer().unwrap();
        assert_eq!(encoded[1] as usize, MAX_ADDRESSES_PER_OPTION * 4);
        assert_eq!(encoded.len(), 2 + MAX_ADDRESSES_PER_OPTION * 4);
    }

    #[test]
    fn test_option_names() {
        assert_eq!(DhcpOption::server_id(Ipv4Addr::LOCALHOST).name(), "DhcpServerId");
        assert_eq!(DhcpOption::unknown(81, vec![]).name(), "Unknown");
        assert_eq!(DhcpOption::end().name(), "End");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(
            OptionValue::Ipv4List(vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)])
                .to_string(),
            "[10.0.0.1, 10.0.0.2]"
        );
        assert_eq!(OptionValue::Bytes(vec![0x4d, 0x53]).to_string(), "4d53");
        assert_eq!(OptionValue::NumberList(vec![1, 3, 6]).to_string(), "[1, 3, 6]");
        assert_eq!(
            OptionValue::ClientId(ClientIdentifier {
                htype: 1,
                hw_address: "AA:BB".to_string(),
            })
            .to_string(),
            r#"{"htype":1,"hw_address":"AA:BB"}"#
        );
    }
}
