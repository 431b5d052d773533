use std::net::SocketAddr;
use std::time::Duration;
use bytes::{Bytes, BytesMut};
use configuration::MdnsConfiguration;
use mdns::{Message, PointerMode};
use mdns_query_types::NameQuery;
use rand::Rng;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::ClientError;

// https://datatracker.ietf.org/doc/html/rfc6762#section-17
//
// Even when fragmentation is used, a Multicast DNS packet, including IP and
// UDP headers, MUST NOT exceed 9000 bytes.
const MAX_DATAGRAM_SIZE: usize = 9000;

/// A UDP socket joined to the mDNS group, plus the last query sent on it.
///
/// Not meant to be shared between tasks: `query` takes `&mut self` to update
/// the cached query, so concurrent users have to synchronize access.
pub struct MdnsSocket {
    socket: UdpSocket,
    destination: SocketAddr,
    receive_timeout: Duration,
    last_query: Option<Bytes>,
}

impl MdnsSocket {
    /// Binds `0.0.0.0:<port>` with address reuse and joins the group.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &MdnsConfiguration) -> std::io::Result<Self> {
        let sock2 = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        sock2.set_reuse_address(true)?;
        #[cfg(unix)]
        sock2.set_reuse_port(true)?;
        sock2.bind(&SocketAddr::V4(config.bind_address()).into())?;
        sock2.join_multicast_v4(&config.group, &config.interface)?;
        sock2.set_nonblocking(true)?;

        let socket = UdpSocket::from_std(sock2.into())?;
        tracing::debug!(
            "joined {} on interface {}, bound to {}",
            config.group,
            config.interface,
            config.bind_address()
        );

        Ok(Self::from_parts(
            socket,
            SocketAddr::V4(config.group_address()),
            config.receive_timeout(),
        ))
    }

    pub(crate) fn from_parts(socket: UdpSocket, destination: SocketAddr, receive_timeout: Duration) -> Self {
        Self {
            socket,
            destination,
            receive_timeout,
            last_query: None,
        }
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub async fn send_datagram(&self, bytes: &[u8]) -> std::io::Result<()> {
        let sent = self.socket.send_to(bytes, self.destination).await?;
        tracing::trace!("sent {} bytes to {}", sent, self.destination);

        Ok(())
    }

    /// Waits up to the receive timeout for one datagram.
    pub async fn receive_datagram(&self) -> std::io::Result<Option<Bytes>> {
        let mut buf = BytesMut::with_capacity(MAX_DATAGRAM_SIZE);
        let received = tokio::time::timeout(self.receive_timeout, self.socket.recv_buf_from(&mut buf)).await;

        match received {
            Err(_) => Ok(None),
            Ok(result) => {
                let (size, from) = result?;
                tracing::debug!("received {} bytes from {}", size, from);
                Ok(Some(buf.freeze()))
            }
        }
    }

    /// Sends a one-question query with a random transaction id and keeps
    /// its bytes for [`MdnsSocket::requery`].
    pub async fn query(&mut self, query: &NameQuery) -> Result<(), ClientError> {
        let transaction_id: u16 = rand::thread_rng().gen_range(1..=32767);
        let bytes = mdns::encode_query(transaction_id, &query.name, u16::from(query.q_type), query.q_class)?;
        let bytes = Bytes::from(bytes);

        tracing::debug!("query {} (id {})", query, transaction_id);
        self.last_query = Some(bytes.clone());
        self.send_datagram(&bytes).await?;

        Ok(())
    }

    /// Resends the last query. Returns `false` when nothing was sent yet.
    pub async fn requery(&self) -> std::io::Result<bool> {
        match &self.last_query {
            None => {
                tracing::debug!("requery before any query, nothing sent");
                Ok(false)
            }
            Some(bytes) => {
                self.send_datagram(bytes).await?;
                Ok(true)
            }
        }
    }

    /// Receives and decodes one packet; `Ok(None)` when the timeout elapsed.
    pub async fn read_incoming(&self, mode: PointerMode) -> Result<Option<Message>, ClientError> {
        match self.receive_datagram().await? {
            None => Ok(None),
            Some(bytes) => {
                let message = Message::decode_with(&bytes, mode)?;
                Ok(Some(message))
            }
        }
    }
}
