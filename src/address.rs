//! Text/byte conversions for IPv4 and hardware addresses.
//!
//! Packet fields and options carry IPv4 addresses as [`Ipv4Addr`], while
//! hardware addresses stay in their colon-separated text form (`chaddr` and
//! the client identifier). These helpers convert between the text forms and
//! the fixed-width wire bytes.

use std::fmt::Write;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Address used when an IPv4 field is left unset.
pub const DEFAULT_IPV4: &str = "0.0.0.0";

/// Hardware address used when `chaddr` is left unset.
pub const DEFAULT_MAC: &str = "00:00:00:00:00:00";

const IPV4_SEPARATOR: char = '.';
const MAC_SEPARATOR: &str = ":";

/// Hex pairs joined by `:` or `-`, any group count.
static MAC_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-f]{2}([:-][0-9a-f]{2})*$"));

/// Encodes dotted-quad text to its four wire bytes.
///
/// Empty input encodes as [`DEFAULT_IPV4`].
///
/// # Errors
///
/// Returns [`Error::Format`] unless the text is exactly four decimal octets.
pub fn encode_ipv4(text: &str) -> Result<[u8; 4]> {
    let text = if text.is_empty() { DEFAULT_IPV4 } else { text };

    let mut octets = [0u8; 4];
    let mut count = 0;
    for part in text.split(IPV4_SEPARATOR) {
        if count == octets.len() {
            return Err(Error::Format(format!("Too many octets in IPv4 address {:?}", text)));
        }
        octets[count] = part
            .parse::<u8>()
            .map_err(|_| Error::Format(format!("Invalid octet {:?} in {:?}", part, text)))?;
        count += 1;
    }

    if count != octets.len() {
        return Err(Error::Format(format!("Too few octets in IPv4 address {:?}", text)));
    }

    Ok(octets)
}

/// Decodes four wire bytes to dotted-quad text.
///
/// # Errors
///
/// Returns [`Error::Format`] if `bytes` is not exactly four bytes long.
pub fn decode_ipv4(bytes: &[u8]) -> Result<String> {
    let octets: [u8; 4] = bytes.try_into().map_err(|_| {
        Error::Format(format!("IPv4 address needs 4 bytes, got {}", bytes.len()))
    })?;
    Ok(Ipv4Addr::from(octets).to_string())
}

/// Parses dotted-quad text into an [`Ipv4Addr`] using [`encode_ipv4`] rules.
pub fn parse_ipv4(text: &str) -> Result<Ipv4Addr> {
    encode_ipv4(text).map(Ipv4Addr::from)
}

/// Encodes hardware-address text (`aa:bb:cc:dd:ee:ff`) to bytes.
///
/// When `expected_groups` is given, the text must consist of exactly that
/// many hex pairs separated by `:` or `-`. Empty input encodes as
/// [`DEFAULT_MAC`].
///
/// # Errors
///
/// Returns [`Error::Format`] if the pattern check fails or the remaining
/// text is not valid hex.
pub fn encode_mac(text: &str, expected_groups: Option<usize>) -> Result<Vec<u8>> {
    let text = if text.is_empty() { DEFAULT_MAC } else { text };

    if let Some(groups) = expected_groups.filter(|groups| *groups > 0) {
        let pattern = MAC_PATTERN
            .as_ref()
            .map_err(|error| Error::Format(format!("Bad MAC pattern: {}", error)))?;
        if !pattern.is_match(text) || text.split([':', '-']).count() != groups {
            return Err(Error::Format(format!(
                "MAC address {:?} does not have {} groups",
                text, groups
            )));
        }
    }

    let stripped: String = text.chars().filter(|c| *c != ':' && *c != '-').collect();
    from_hex(&stripped)
}

/// Decodes hardware-address bytes to upper-case colon-separated text.
///
/// `truncate_groups` keeps only the first N groups.
pub fn decode_mac(bytes: &[u8], truncate_groups: Option<usize>) -> String {
    let count = truncate_groups.map_or(bytes.len(), |groups| groups.min(bytes.len()));
    bytes[..count]
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(MAC_SEPARATOR)
}

/// Formats bytes as lower-case hex without separators.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(result, "{:02x}", byte);
    }
    result
}

/// Parses a hex string without separators.
///
/// # Errors
///
/// Returns [`Error::Format`] on odd length or non-hex characters.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    if !text.len().is_multiple_of(2) {
        return Err(Error::Format(format!("Odd-length hex string {:?}", text)));
    }

    (0..text.len())
        .step_by(2)
        .map(|index| {
            text.get(index..index + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Error::Format(format!("Invalid hex in {:?}", text)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_roundtrip() {
        for text in ["0.0.0.0", "192.168.1.1", "255.255.255.0", "10.0.0.254"] {
            let bytes = encode_ipv4(text).unwrap();
            assert_eq!(decode_ipv4(&bytes).unwrap(), text);
        }
    }

    #[test]
    fn test_empty_ipv4_is_default() {
        assert_eq!(encode_ipv4("").unwrap(), encode_ipv4(DEFAULT_IPV4).unwrap());
        assert_eq!(encode_ipv4("").unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_invalid_ipv4_rejected() {
        assert!(matches!(encode_ipv4("192.168.1"), Err(Error::Format(_))));
        assert!(matches!(encode_ipv4("192.168.1.1.1"), Err(Error::Format(_))));
        assert!(matches!(encode_ipv4("192.168.1.256"), Err(Error::Format(_))));
        assert!(matches!(encode_ipv4("a.b.c.d"), Err(Error::Format(_))));
        assert!(decode_ipv4(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_mac_roundtrip_uppercases() {
        let bytes = encode_mac("54:a0:50:e7:df:d7", Some(6)).unwrap();
        assert_eq!(bytes, vec![0x54, 0xa0, 0x50, 0xe7, 0xdf, 0xd7]);
        assert_eq!(decode_mac(&bytes, None), "54:A0:50:E7:DF:D7");
    }

    #[test]
    fn test_mac_accepts_dash_separator() {
        let bytes = encode_mac("AA-BB-CC-DD-EE-FF", Some(6)).unwrap();
        assert_eq!(bytes, vec![0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn test_mac_group_count_mismatch() {
        assert!(matches!(
            encode_mac("aa:bb:cc:dd:ee", Some(6)),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            encode_mac("aa:bb:cc:dd:ee:ff:00", Some(6)),
            Err(Error::Format(_))
        ));
        assert!(matches!(encode_mac("zz:bb:cc:dd:ee:ff", Some(6)), Err(Error::Format(_))));
    }

    #[test]
    fn test_mac_group_count_other_than_six() {
        assert_eq!(encode_mac("de:ad:be:ef", Some(4)).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(encode_mac("7f", Some(1)).unwrap(), vec![0x7f]);
        assert!(encode_mac("de:ad:be:ef", Some(6)).is_err());
        assert!(encode_mac("de:ad:be:ef:00", Some(4)).is_err());
    }

    #[test]
    fn test_mac_without_group_count() {
        assert_eq!(encode_mac("01:02:03", None).unwrap(), vec![1, 2, 3]);
        assert!(encode_mac("0:1:2", None).is_err());
    }

    #[test]
    fn test_empty_mac_is_default() {
        assert_eq!(encode_mac("", Some(6)).unwrap(), vec![0; 6]);
    }

    #[test]
    fn test_decode_mac_truncates() {
        let bytes = [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01];
        assert_eq!(decode_mac(&bytes, Some(4)), "DE:AD:BE:EF");
        assert_eq!(decode_mac(&bytes, Some(10)), "DE:AD:BE:EF:00:01");
        assert_eq!(decode_mac(&[], None), "");
    }

    #[test]
    fn test_hex_helpers() {
        assert_eq!(to_hex(&[0x63, 0x82, 0x53, 0x63]), "63825363");
        assert_eq!(from_hex("63825363").unwrap(), vec![0x63, 0x82, 0x53, 0x63]);
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }
}
