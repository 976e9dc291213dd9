use std::{
	io::ErrorKind,
	net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket},
	time::Duration,
};

use log::*;
use socket2::{Domain, Protocol, Socket, Type};

use crate::{
	constants::DNS_UDP_MAX,
	error::{Error, Result},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
const MIN_TIMEOUT: Duration = Duration::from_micros(1);

fn unspecified(server: &SocketAddr) -> SocketAddr {
	match server {
		SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
		SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
	}
}

fn connect(server: SocketAddr, timeout: Duration) -> Result<UdpSocket> {
	let s = Socket::new(Domain::for_address(server), Type::DGRAM, Some(Protocol::UDP))?;
	s.set_read_timeout(Some(timeout))?;
	s.bind(&unspecified(&server).into())?;
	// filters out datagrams from anyone but the server
	s.connect(&server.into())?;
	Ok(s.into())
}

/// Sends one query datagram to `server` and waits for one reply.
///
/// The socket only lives for this call, it's closed on every return path.
pub fn send(query: &[u8], server: SocketAddr, timeout: Duration) -> Result<Vec<u8>> {
	// SO_RCVTIMEO has microsecond resolution and a zero timeval means wait forever
	if timeout < MIN_TIMEOUT {
		debug!("timeout {:?} to {} expires before anything can arrive", timeout, server);
		return Err(Error::Timeout(timeout));
	}
	let s = connect(server, timeout)?;
	let len = s.send(query)?;
	trace!("udp send {} bytes to {}", len, server);

	let mut buf = vec![0u8; DNS_UDP_MAX];
	let len = match s.recv(&mut buf) {
		Ok(len) => len,
		// unix reports an expired SO_RCVTIMEO as EAGAIN, windows as WSAETIMEDOUT
		Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
			debug!("no reply from {} within {:?}", server, timeout);
			return Err(Error::Timeout(timeout));
		}
		Err(e) => return Err(e.into()),
	};
	trace!("udp recv {} bytes from {}", len, server);
	buf.truncate(len);
	Ok(buf)
}

/// Same as [`send`], on the tokio reactor.
pub async fn send_async(query: &[u8], server: SocketAddr, timeout: Duration) -> Result<Vec<u8>> {
	let s = tokio::net::UdpSocket::bind(unspecified(&server)).await?;
	s.connect(server).await?;
	let len = s.send(query).await?;
	trace!("udp send {} bytes to {}", len, server);

	let mut buf = vec![0u8; DNS_UDP_MAX];
	let Ok(r) = tokio::time::timeout(timeout, s.recv(&mut buf)).await else {
		debug!("no reply from {} within {:?}", server, timeout);
		return Err(Error::Timeout(timeout));
	};
	let len = r?;
	trace!("udp recv {} bytes from {}", len, server);
	buf.truncate(len);
	Ok(buf)
}
