use crate::error::{Error, Result};

/// Bounds checked read cursor over a received message.
///
/// Every read either yields the requested bytes or fails with
/// [`Error::Truncated`], the position is left untouched on failure.
pub struct Reader<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Reader { buf, pos: 0 }
	}

	pub fn pos(&self) -> usize {
		self.pos
	}

	pub fn buf(&self) -> &'a [u8] {
		self.buf
	}

	pub fn set_pos(&mut self, pos: usize) {
		self.pos = pos;
	}

	pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
		let b = peek(self.buf, self.pos, n)?;
		self.pos += n;
		Ok(b)
	}

	pub fn u16(&mut self) -> Result<u16> {
		Ok(u16be(self.take(2)?))
	}

	pub fn u32(&mut self) -> Result<u32> {
		let b = self.take(4)?;
		Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
	}
}

pub fn peek(buf: &[u8], offset: usize, n: usize) -> Result<&[u8]> {
	offset
		.checked_add(n)
		.and_then(|end| buf.get(offset..end))
		.ok_or(Error::Truncated {
			offset,
			need: n,
			len: buf.len(),
		})
}

pub fn u16be(bytes: &[u8]) -> u16 {
	u16::from_be_bytes([bytes[0], bytes[1]])
}
