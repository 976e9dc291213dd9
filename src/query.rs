use std::{fmt::Display, str::FromStr};

use log::*;

use crate::{
	constants::*,
	error::{Error, Result},
	header::{Flags, Header},
	name,
};

/// Record types this resolver knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
	A,
	MX,
}

impl RecordType {
	pub fn code(self) -> u16 {
		match self {
			RecordType::A => TYPE_A,
			RecordType::MX => TYPE_MX,
		}
	}

	pub fn from_code(c: u16) -> Option<Self> {
		match c {
			TYPE_A => Some(RecordType::A),
			TYPE_MX => Some(RecordType::MX),
			_ => None,
		}
	}
}

impl FromStr for RecordType {
	type Err = Error;
	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"A" => Ok(RecordType::A),
			"MX" => Ok(RecordType::MX),
			_ => Err(Error::UnsupportedRecordType(s.to_owned())),
		}
	}
}

impl Display for RecordType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", type2str(self.code()))
	}
}

/// Builds a recursive query for `domain` with a fresh random transaction id.
pub fn build(domain: &str, qtype: RecordType) -> Result<(Vec<u8>, u16)> {
	let id = fastrand::u16(..);
	Ok((build_with_id(domain, qtype, id)?, id))
}

pub fn build_with_id(domain: &str, qtype: RecordType, id: u16) -> Result<Vec<u8>> {
	let header = Header {
		id,
		flags: Flags::from(FLAGS_QUERY_RD),
		qd_count: 1,
		..Default::default()
	};
	let mut msg = Vec::with_capacity(DNS_HEADER_LEN + domain.len() + 6);
	msg.extend_from_slice(&header.pack());
	name::encode_into(domain, &mut msg)?;
	msg.extend_from_slice(&qtype.code().to_be_bytes());
	msg.extend_from_slice(&CLASS_IN.to_be_bytes());
	trace!("built {} query for {} id {}, {} bytes", qtype, domain, id, msg.len());
	Ok(msg)
}
