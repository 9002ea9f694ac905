use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::lease::AddressAllocator;
use crate::message::{create_ack, create_nak, create_offer};
use crate::options::MessageType;
use crate::packet::{BOOTREQUEST, DhcpPacket};

const RECV_BUFFER_SIZE: usize = 1500;

/// UDP endpoint that yields raw datagrams and sends encoded replies.
pub struct Transport {
    socket: UdpSocket,
}

impl Transport {
    /// Binds `0.0.0.0:listen_port` with broadcast enabled.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        Self::bind_addr(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.listen_port))
    }

    pub fn bind_addr(bind_addr: SocketAddrV4) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|error| Error::Socket(format!("Failed to create socket: {}", error)))?;

        socket
            .set_reuse_address(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_REUSEADDR: {}", error)))?;

        socket
            .set_broadcast(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_BROADCAST: {}", error)))?;

        socket
            .set_nonblocking(true)
            .map_err(|error| Error::Socket(format!("Failed to set non-blocking: {}", error)))?;

        socket.bind(&bind_addr.into()).map_err(|error| {
            Error::Socket(format!("Failed to bind to {}: {}", bind_addr, error))
        })?;

        let std_socket: std::net::UdpSocket = socket.into();
        let socket = UdpSocket::from_std(std_socket).map_err(|error| {
            Error::Socket(format!("Failed to convert to tokio socket: {}", error))
        })?;

        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Waits for one datagram and returns it with its sender.
    pub async fn recv(&self) -> Result<(Vec<u8>, SocketAddr)> {
        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        let (size, source) = self.socket.recv_from(&mut buffer).await?;
        Ok((buffer[..size].to_vec(), source))
    }

    pub async fn send(&self, bytes: &[u8], destination: Ipv4Addr, port: u16) -> Result<()> {
        let target = SocketAddr::new(IpAddr::V4(destination), port);
        self.socket.send_to(bytes, target).await?;
        Ok(())
    }
}

pub struct DhcpServer {
    config: Arc<ServerConfig>,
    allocator: Arc<AddressAllocator>,
    transport: Arc<Transport>,
}

impl DhcpServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let transport = Transport::bind(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: ServerConfig, transport: Transport) -> Self {
        let config = Arc::new(config);
        let allocator = Arc::new(AddressAllocator::new(Arc::clone(&config)));

        info!(
            "DHCP server {} listening on port {}",
            config.server_id, config.listen_port
        );
        info!(
            "Address pool: {} - {} ({} addresses)",
            config.pool_address(config.pool.min),
            config.pool_address(config.pool.max),
            config.pool_size()
        );

        Self {
            config,
            allocator,
            transport: Arc::new(transport),
        }
    }

    pub async fn run(&self) -> Result<()> {
        info!("DHCP server ready and listening");

        loop {
            match self.transport.recv().await {
                Ok((data, source)) => {
                    let handler = PacketHandler {
                        config: Arc::clone(&self.config),
                        allocator: Arc::clone(&self.allocator),
                        transport: Arc::clone(&self.transport),
                    };

                    tokio::spawn(async move {
                        if let Err(error) = handler.handle_packet(&data, source).await {
                            warn!("Error handling packet from {}: {}", source, error);
                        }
                    });
                }
                Err(error) => {
                    error!("Error receiving packet: {}", error);
                }
            }
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn allocator(&self) -> &AddressAllocator {
        &self.allocator
    }
}

struct PacketHandler {
    config: Arc<ServerConfig>,
    allocator: Arc<AddressAllocator>,
    transport: Arc<Transport>,
}

impl PacketHandler {
    async fn handle_packet(&self, data: &[u8], source: SocketAddr) -> Result<()> {
        let packet = DhcpPacket::parse(data)?.with_source(source);

        let Some(reply) = self.respond(&packet).await? else {
            return Ok(());
        };

        self.send_reply(&reply, &packet).await
    }

    /// Runs the request through the allocator and builds the reply, if any.
    async fn respond(&self, packet: &DhcpPacket) -> Result<Option<DhcpPacket>> {
        if packet.op != BOOTREQUEST {
            debug!("Ignoring non-request packet (op={})", packet.op);
            return Ok(None);
        }

        let Some(message_type) = packet.parsed_message_type() else {
            debug!(
                "Ignoring packet without a known message type from {}",
                packet.chaddr
            );
            return Ok(None);
        };

        debug!("{} from {} (xid={:#010x})", message_type, packet.chaddr, packet.xid);

        match message_type {
            MessageType::Discover => {
                let ip = self.allocator.allocate(&packet.chaddr).await?;
                let mut offer = create_offer(packet, &self.config);
                offer.yiaddr = ip;
                info!("OFFER {} to {}", ip, packet.chaddr);
                Ok(Some(offer))
            }
            MessageType::Request => {
                if let Some(server) = packet.server_identifier()
                    && server != self.config.server_id
                {
                    debug!("{} selected server {}, ignoring", packet.chaddr, server);
                    return Ok(None);
                }

                match self.allocator.lookup(&packet.chaddr).await {
                    Some(ip) => {
                        let mut ack = create_ack(packet, &self.config);
                        ack.yiaddr = ip;
                        info!("ACK {} to {}", ip, packet.chaddr);
                        Ok(Some(ack))
                    }
                    None => {
                        warn!("NAK to {}: no binding", packet.chaddr);
                        Ok(Some(create_nak(packet, &self.config)))
                    }
                }
            }
            MessageType::Inform => {
                info!("ACK (inform) to {}", packet.chaddr);
                Ok(Some(create_ack(packet, &self.config)))
            }
            MessageType::Release => {
                self.allocator.release(&packet.chaddr).await;
                Ok(None)
            }
            MessageType::Decline => {
                if let Some(ip) = self.allocator.release(&packet.chaddr).await {
                    warn!("{} declined {}", packet.chaddr, ip);
                }
                Ok(None)
            }
            MessageType::Offer | MessageType::Ack | MessageType::Nak => {
                debug!("Ignoring server message {} from {}", message_type, packet.chaddr);
                Ok(None)
            }
        }
    }

    async fn send_reply(&self, reply: &DhcpPacket, request: &DhcpPacket) -> Result<()> {
        let encoded = reply.encode()?;

        if request.giaddr != Ipv4Addr::UNSPECIFIED {
            self.transport
                .send(&encoded, request.giaddr, self.config.listen_port)
                .await
        } else {
            self.transport
                .send(&encoded, Ipv4Addr::BROADCAST, self.config.send_port)
                .await
        }
    }
}
