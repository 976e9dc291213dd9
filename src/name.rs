// domain name <-> label sequence, rfc1035 3.1
// compression pointers (4.1.4) are recognized but never followed

use crate::{
	constants::*,
	error::{Error, Result},
	wire::peek,
};

/// Encodes `name` as length prefixed labels followed by the zero length root label.
///
/// A single trailing dot is accepted, `"."` alone is the root name.
pub fn encode(name: &str) -> Result<Vec<u8>> {
	let mut out = Vec::with_capacity(name.len() + 2);
	encode_into(name, &mut out)?;
	Ok(out)
}

pub fn encode_into(name: &str, out: &mut Vec<u8>) -> Result<()> {
	let invalid = |reason| Error::InvalidName {
		name: name.to_owned(),
		reason,
	};
	let start = out.len();
	let trimmed = if name == "." {
		""
	} else {
		name.strip_suffix('.').unwrap_or(name)
	};
	if trimmed.is_empty() && name != "." {
		return Err(invalid("empty name"));
	}
	if !trimmed.is_empty() {
		for label in trimmed.split('.') {
			if label.is_empty() {
				out.truncate(start);
				return Err(invalid("empty label"));
			}
			if label.len() > MAX_LABEL_LEN {
				out.truncate(start);
				return Err(invalid("label longer than 63 bytes"));
			}
			out.push(label.len() as u8);
			out.extend_from_slice(label.as_bytes());
		}
	}
	out.push(0);
	if out.len() - start > MAX_NAME_LEN {
		out.truncate(start);
		return Err(invalid("name longer than 255 bytes"));
	}
	Ok(())
}

/// Decodes the label sequence starting at `offset`.
///
/// Returns the dotted name (empty for the root) and the offset right after
/// the terminating zero length label.
pub fn decode(buf: &[u8], offset: usize) -> Result<(String, usize)> {
	let mut name = String::new();
	let mut offset = offset;
	loop {
		let label_len = peek(buf, offset, 1)?[0];
		if label_len & LABEL_KIND_MASK != 0 {
			return Err(Error::UnsupportedNameEncoding {
				offset,
				byte: label_len,
			});
		}
		if label_len == 0 {
			offset += 1;
			break;
		}
		let label = peek(buf, offset + 1, label_len as usize)?;
		if !name.is_empty() {
			name.push('.');
		}
		name.push_str(&String::from_utf8_lossy(label));
		offset += 1 + label_len as usize;
	}
	Ok((name, offset))
}

pub fn is_pointer(b: u8) -> bool {
	b & LABEL_KIND_MASK == LABEL_KIND_POINTER
}
