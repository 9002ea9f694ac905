//! Server reply construction.
//!
//! Each builder starts from [`DhcpPacket::reply`] and copies the request
//! fields a client needs to match the reply to its transaction. The address
//! being offered (`yiaddr`) is left for the caller, which owns allocation.

use crate::config::ServerConfig;
use crate::options::{DhcpOption, MessageType};
use crate::packet::DhcpPacket;

/// Builds a DHCPOFFER for a DISCOVER.
///
/// # Preserved Fields
///
/// - `xid` (transaction ID)
/// - `flags` (broadcast flag)
/// - `giaddr` (relay agent address)
/// - `chaddr` (client hardware address)
///
/// `htype` and `hlen` keep their Ethernet defaults.
pub fn create_offer(request: &DhcpPacket, config: &ServerConfig) -> DhcpPacket {
    let mut reply = echo_client(request);

    reply.options.push(DhcpOption::message_type(MessageType::Offer));
    push_network_options(&mut reply.options, config);
    reply.options.push(DhcpOption::address_time(config.lease_seconds));
    reply.options.push(DhcpOption::server_id(config.server_id));

    reply
}

/// Builds a DHCPACK for a REQUEST or an INFORM.
///
/// Preserves the same fields as [`create_offer`] and additionally sets
/// `ciaddr` from the request's `giaddr`. The lease time is only included
/// when answering a REQUEST; an INFORM client already has its address.
pub fn create_ack(request: &DhcpPacket, config: &ServerConfig) -> DhcpPacket {
    let mut reply = echo_client(request);
    reply.ciaddr = request.giaddr;

    reply.options.push(DhcpOption::message_type(MessageType::Ack));
    push_network_options(&mut reply.options, config);
    if request.parsed_message_type() == Some(MessageType::Request) {
        reply.options.push(DhcpOption::address_time(config.lease_seconds));
    }
    reply.options.push(DhcpOption::server_id(config.server_id));

    reply
}

/// Builds a DHCPNAK.
///
/// Only `xid` and `giaddr` are copied; the reply carries nothing but the
/// message type and server identifier.
pub fn create_nak(request: &DhcpPacket, config: &ServerConfig) -> DhcpPacket {
    let mut reply = DhcpPacket::reply();
    reply.xid = request.xid;
    reply.giaddr = request.giaddr;

    reply.options.push(DhcpOption::message_type(MessageType::Nak));
    reply.options.push(DhcpOption::server_id(config.server_id));

    reply
}

fn echo_client(request: &DhcpPacket) -> DhcpPacket {
    DhcpPacket {
        xid: request.xid,
        flags: request.flags,
        giaddr: request.giaddr,
        chaddr: request.chaddr.clone(),
        ..DhcpPacket::reply()
    }
}

fn push_network_options(options: &mut Vec<DhcpOption>, config: &ServerConfig) {
    options.push(DhcpOption::subnet_mask(config.netmask));

    if !config.gateways.is_empty() {
        options.push(DhcpOption::gateways(config.gateways.clone()));
    }

    if !config.domain_servers.is_empty() {
        options.push(DhcpOption::domain_server(config.domain_servers.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::DEFAULT_MAC;
    use crate::options::OptionCode;
    use crate::packet::{BOOTREPLY, HLEN_ETHERNET, HTYPE_ETHERNET};
    use std::net::Ipv4Addr;

    fn request(message_type: MessageType) -> DhcpPacket {
        DhcpPacket {
            xid: 0xCAFEBABE,
            flags: 0x8000,
            giaddr: Ipv4Addr::new(10, 1, 0, 1),
            chaddr: "AA:BB:CC:DD:EE:FF".to_string(),
            options: vec![
                DhcpOption::message_type(message_type),
                DhcpOption::end(),
            ],
            ..DhcpPacket::default()
        }
    }

    fn tags(packet: &DhcpPacket) -> Vec<u8> {
        packet.options.iter().map(|option| option.tag).collect()
    }

    #[test]
    fn test_offer_minimal_options() {
        let config = ServerConfig::new(Ipv4Addr::new(10, 1, 0, 2));
        let offer = create_offer(&request(MessageType::Discover), &config);

        assert_eq!(offer.op, BOOTREPLY);
        assert_eq!(offer.xid, 0xCAFEBABE);
        assert_eq!(offer.flags, 0x8000);
        assert_eq!(offer.giaddr, Ipv4Addr::new(10, 1, 0, 1));
        assert_eq!(offer.chaddr, "AA:BB:CC:DD:EE:FF");
        assert_eq!(offer.yiaddr, Ipv4Addr::UNSPECIFIED);
        assert_eq!(offer.parsed_message_type(), Some(MessageType::Offer));
        assert_eq!(tags(&offer), vec![53, 1, 51, 54]);
    }

    #[test]
    fn test_replies_use_default_hardware_type() {
        let config = ServerConfig::new(Ipv4Addr::new(10, 1, 0, 2));
        let mut token_ring = request(MessageType::Request);
        token_ring.htype = 6;

        for reply in [
            create_offer(&token_ring, &config),
            create_ack(&token_ring, &config),
            create_nak(&token_ring, &config),
        ] {
            assert_eq!(reply.htype, HTYPE_ETHERNET);
            assert_eq!(reply.hlen, HLEN_ETHERNET);
        }

        let offer = create_offer(&token_ring, &config);
        assert_eq!(offer.chaddr, token_ring.chaddr);
    }

    #[test]
    fn test_offer_with_gateways_and_dns() {
        let config = ServerConfig {
            gateways: vec![Ipv4Addr::new(10, 1, 0, 254)],
            domain_servers: vec![Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(8, 8, 8, 8)],
            ..ServerConfig::new(Ipv4Addr::new(10, 1, 0, 2))
        };
        let offer = create_offer(&request(MessageType::Discover), &config);

        assert_eq!(tags(&offer), vec![53, 1, 3, 6, 51, 54]);
        assert_eq!(
            offer.find(OptionCode::DomainServer as u8).unwrap().value.as_ipv4_list(),
            Some(&config.domain_servers[..])
        );
        assert_eq!(
            offer.find(OptionCode::AddressTime as u8).unwrap().value.as_u32(),
            Some(86400)
        );
        assert_eq!(offer.server_identifier(), Some(Ipv4Addr::new(10, 1, 0, 2)));
    }

    #[test]
    fn test_ack_for_request_includes_lease_time() {
        let config = ServerConfig::new(Ipv4Addr::new(10, 1, 0, 2));
        let ack = create_ack(&request(MessageType::Request), &config);

        assert_eq!(ack.parsed_message_type(), Some(MessageType::Ack));
        assert_eq!(ack.ciaddr, Ipv4Addr::new(10, 1, 0, 1));
        assert_eq!(ack.chaddr, "AA:BB:CC:DD:EE:FF");
        assert_eq!(tags(&ack), vec![53, 1, 51, 54]);
    }

    #[test]
    fn test_ack_for_inform_omits_lease_time() {
        let config = ServerConfig {
            gateways: vec![Ipv4Addr::new(10, 1, 0, 254)],
            ..ServerConfig::new(Ipv4Addr::new(10, 1, 0, 2))
        };
        let ack = create_ack(&request(MessageType::Inform), &config);

        assert_eq!(tags(&ack), vec![53, 1, 3, 54]);
        assert!(ack.find(OptionCode::AddressTime as u8).is_none());
    }

    #[test]
    fn test_nak_carries_only_type_and_server() {
        let config = ServerConfig {
            gateways: vec![Ipv4Addr::new(10, 1, 0, 254)],
            ..ServerConfig::new(Ipv4Addr::new(10, 1, 0, 2))
        };
        let nak = create_nak(&request(MessageType::Request), &config);

        assert_eq!(nak.xid, 0xCAFEBABE);
        assert_eq!(nak.giaddr, Ipv4Addr::new(10, 1, 0, 1));
        assert_eq!(nak.flags, 0);
        assert_eq!(nak.chaddr, DEFAULT_MAC);
        assert_eq!(nak.ciaddr, Ipv4Addr::UNSPECIFIED);
        assert_eq!(nak.yiaddr, Ipv4Addr::UNSPECIFIED);
        assert_eq!(
            nak.options,
            vec![
                DhcpOption::message_type(MessageType::Nak),
                DhcpOption::server_id(Ipv4Addr::new(10, 1, 0, 2)),
            ]
        );
    }

    #[test]
    fn test_replies_encode() {
        let config = ServerConfig::default();
        let discover = request(MessageType::Discover);

        for reply in [
            create_offer(&discover, &config),
            create_ack(&discover, &config),
            create_nak(&discover, &config),
        ] {
            let encoded = reply.encode().unwrap();
            let decoded = DhcpPacket::parse(&encoded).unwrap();
            assert_eq!(decoded.xid, discover.xid);
            assert!(decoded.options.last().unwrap().is_end());
        }
    }
}
