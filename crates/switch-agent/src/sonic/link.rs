//! MAC address lookup for kernel network links.

use async_trait::async_trait;

/// Resolves the hardware address of a network link by name.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// The link's MAC address, or `None` if it has none.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the link does not exist.
    async fn mac_address(&self, name: &str) -> std::io::Result<Option<String>>;
}

/// Asks the kernel for a link by name over an `rtnetlink` socket.
///
/// Each lookup sends one `RTM_GETLINK` request carrying `IFLA_IFNAME` and
/// reads `IFLA_ADDRESS` from the reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetlinkLinkResolver;

impl NetlinkLinkResolver {
    /// Create a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LinkResolver for NetlinkLinkResolver {
    async fn mac_address(&self, name: &str) -> std::io::Result<Option<String>> {
        let name = name.to_string();
        tokio::task::spawn_blocking(move || linux::lookup(&name))
            .await
            .map_err(std::io::Error::other)?
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use std::io;

    use netlink_packet_core::{NetlinkHeader, NetlinkMessage, NetlinkPayload, NLM_F_REQUEST};
    use netlink_packet_route::link::{LinkAttribute, LinkMessage};
    use netlink_packet_route::RouteNetlinkMessage;
    use netlink_sys::{protocols::NETLINK_ROUTE, Socket, SocketAddr};
    use tracing::trace;

    const RECV_BUFFER_SIZE: usize = 16 * 1024;
    const REQUEST_SEQUENCE: u32 = 1;

    pub(super) fn lookup(name: &str) -> io::Result<Option<String>> {
        let mut socket = Socket::new(NETLINK_ROUTE)?;
        socket.bind_auto()?;
        socket.connect(&SocketAddr::new(0, 0))?;
        socket.send(&link_request(name), 0)?;

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let len = socket.recv(&mut &mut buf[..], 0)?;
            if len == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("no netlink reply for link {name}"),
                ));
            }
            if let Some(reply) = parse_reply(&buf[..len]) {
                trace!(link = name, "Resolved link over netlink");
                return reply;
            }
        }
    }

    /// Serialized `RTM_GETLINK` request for one link name.
    pub(super) fn link_request(name: &str) -> Vec<u8> {
        let mut header = NetlinkHeader::default();
        header.flags = NLM_F_REQUEST;
        header.sequence_number = REQUEST_SEQUENCE;

        let mut link = LinkMessage::default();
        link.attributes.push(LinkAttribute::IfName(name.to_string()));

        let mut packet = NetlinkMessage::new(
            header,
            NetlinkPayload::InnerMessage(RouteNetlinkMessage::GetLink(link)),
        );
        packet.finalize();

        let mut buf = vec![0u8; packet.buffer_len()];
        packet.serialize(&mut buf);
        buf
    }

    /// The MAC address carried by a reply datagram.
    ///
    /// `None` when the datagram holds no link or error message.
    pub(super) fn parse_reply(buf: &[u8]) -> Option<io::Result<Option<String>>> {
        let mut offset = 0;
        while offset < buf.len() {
            let msg = match NetlinkMessage::<RouteNetlinkMessage>::deserialize(&buf[offset..]) {
                Ok(msg) => msg,
                Err(e) => {
                    return Some(Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("failed to parse netlink message: {e}"),
                    )))
                }
            };

            let length = msg.header.length as usize;
            if length == 0 {
                break;
            }
            offset += (length + 3) & !3;

            match msg.payload {
                NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewLink(link)) => {
                    return Some(Ok(hardware_address(&link)));
                }
                NetlinkPayload::Error(err) => {
                    if let Some(code) = err.code {
                        return Some(Err(io::Error::from_raw_os_error(-code.get())));
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn hardware_address(link: &LinkMessage) -> Option<String> {
        link.attributes.iter().find_map(|attr| match attr {
            LinkAttribute::Address(bytes) if !bytes.is_empty() => Some(
                bytes
                    .iter()
                    .map(|b| format!("{b:02x}"))
                    .collect::<Vec<_>>()
                    .join(":"),
            ),
            _ => None,
        })
    }

}

#[cfg(not(target_os = "linux"))]
mod linux {
    pub(super) fn lookup(name: &str) -> std::io::Result<Option<String>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("link lookup for {name} needs netlink"),
        ))
    }
}

/// Fixed link table for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Default)]
pub struct StaticLinkResolver {
    links: std::collections::HashMap<String, Option<String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticLinkResolver {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link with an optional MAC address.
    #[must_use]
    pub fn with_link(mut self, name: &str, mac: Option<&str>) -> Self {
        self.links.insert(name.to_string(), mac.map(str::to_string));
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl LinkResolver for StaticLinkResolver {
    async fn mac_address(&self, name: &str) -> std::io::Result<Option<String>> {
        self.links.get(name).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("link {name} not found"))
        })
    }
}
