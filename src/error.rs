use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("invalid domain name {name:?}: {reason}")]
	InvalidName { name: String, reason: &'static str },

	#[error("no response within {0:?}")]
	Timeout(Duration),

	#[error("message truncated: need {need} bytes at offset {offset}, have {len}")]
	Truncated {
		offset: usize,
		need: usize,
		len: usize,
	},

	#[error("unsupported record type: {0}")]
	UnsupportedRecordType(String),

	// compression pointers and the reserved 01/10 label kinds
	#[error("unsupported name encoding 0x{byte:02x} at offset {offset}")]
	UnsupportedNameEncoding { offset: usize, byte: u8 },

	#[error("malformed {rtype} record: {reason}")]
	MalformedRecord {
		rtype: &'static str,
		reason: String,
	},

	#[error("response id {got:#06x} does not match query id {expected:#06x}")]
	IdMismatch { expected: u16, got: u16 },

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
