use std::{net::SocketAddr, time::Duration};

use log::*;

use crate::{
	error::{Error, Result},
	header::Header,
	query::{self, RecordType},
	response::{self, ParseOptions, Response},
	transport::{self, DEFAULT_TIMEOUT},
};

pub const DEFAULT_SERVER: &str = "8.8.8.8:53";

/// One query, one datagram, one answer. No retries and nothing kept between calls.
#[derive(Debug, Clone)]
pub struct Resolver {
	pub server: SocketAddr,
	pub timeout: Duration,
	pub strict: bool,
}

impl Resolver {
	pub fn new(server: SocketAddr) -> Self {
		Resolver {
			server,
			timeout: DEFAULT_TIMEOUT,
			strict: false,
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	/// Like [`Resolver::resolve`], taking the record type as text, e.g. `"MX"`.
	///
	/// Unsupported types fail before anything is sent.
	pub fn lookup(&self, domain: &str, rtype: &str) -> Result<Response> {
		self.resolve(domain, rtype.parse()?)
	}

	pub fn resolve(&self, domain: &str, rtype: RecordType) -> Result<Response> {
		let (q, id) = query::build(domain, rtype)?;
		let raw = transport::send(&q, self.server, self.timeout)?;
		self.finish(domain, rtype, id, &raw)
	}

	pub async fn resolve_async(&self, domain: &str, rtype: RecordType) -> Result<Response> {
		let (q, id) = query::build(domain, rtype)?;
		let raw = transport::send_async(&q, self.server, self.timeout).await?;
		self.finish(domain, rtype, id, &raw)
	}

	fn finish(&self, domain: &str, rtype: RecordType, id: u16, raw: &[u8]) -> Result<Response> {
		// a stale or spoofed reply is reported as such, whatever its body looks like
		let got = Header::unpack(raw)?.id;
		if got != id {
			warn!("dropping response with id {}, expecting {}", got, id);
			return Err(Error::IdMismatch { expected: id, got });
		}
		let resp = response::parse(
			raw,
			ParseOptions {
				expected: rtype,
				strict: self.strict,
			},
		)?;
		if resp.header.flags.tc {
			warn!("response for {} is truncated, no tcp fallback", domain);
		}
		info!(
			"{} {}: {} answers from {}",
			domain,
			rtype,
			resp.answers.len(),
			self.server
		);
		Ok(resp)
	}
}
