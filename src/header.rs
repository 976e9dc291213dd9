use std::fmt::Display;

use crate::{constants::*, error::Result, wire::Reader};

/// The 16 bit flags word of a DNS header, decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
	pub qr: bool,
	pub opcode: u8,
	pub aa: bool,
	pub tc: bool,
	pub rd: bool,
	pub ra: bool,
	pub z: bool,
	pub ad: bool,
	pub cd: bool,
	pub rcode: u8,
}

impl From<u16> for Flags {
	fn from(v: u16) -> Self {
		Flags {
			qr: get_bit(v, 15),
			opcode: get_bits(v, 11, 4),
			aa: get_bit(v, 10),
			tc: get_bit(v, 9),
			rd: get_bit(v, 8),
			ra: get_bit(v, 7),
			z: get_bit(v, 6),
			ad: get_bit(v, 5),
			cd: get_bit(v, 4),
			rcode: get_bits(v, 0, 4),
		}
	}
}

impl From<Flags> for u16 {
	fn from(f: Flags) -> Self {
		let mut v = 0;
		set_bit(&mut v, 15, f.qr);
		set_bits(&mut v, 11, 4, f.opcode);
		set_bit(&mut v, 10, f.aa);
		set_bit(&mut v, 9, f.tc);
		set_bit(&mut v, 8, f.rd);
		set_bit(&mut v, 7, f.ra);
		set_bit(&mut v, 6, f.z);
		set_bit(&mut v, 5, f.ad);
		set_bit(&mut v, 4, f.cd);
		set_bits(&mut v, 0, 4, f.rcode);
		v
	}
}

impl Flags {
	// by bit offset, matches FLAGS
	fn get(&self, o: u8) -> bool {
		get_bit(u16::from(*self), o)
	}
}

impl Display for Flags {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut first = true;
		for &(o, name) in FLAGS {
			if self.get(o) {
				if !first {
					write!(f, " ")?;
				}
				write!(f, "{name}")?;
				first = false;
			}
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
	pub id: u16,
	pub flags: Flags,
	pub qd_count: u16,
	pub an_count: u16,
	pub ns_count: u16,
	pub ar_count: u16,
}

impl Header {
	pub fn pack(&self) -> [u8; DNS_HEADER_LEN] {
		let mut b = [0; DNS_HEADER_LEN];
		b[0..2].copy_from_slice(&self.id.to_be_bytes());
		b[2..4].copy_from_slice(&u16::from(self.flags).to_be_bytes());
		b[4..6].copy_from_slice(&self.qd_count.to_be_bytes());
		b[6..8].copy_from_slice(&self.an_count.to_be_bytes());
		b[8..10].copy_from_slice(&self.ns_count.to_be_bytes());
		b[10..12].copy_from_slice(&self.ar_count.to_be_bytes());
		b
	}

	pub(crate) fn read(r: &mut Reader) -> Result<Self> {
		// check the whole header up front so a short message fails at offset 0
		let mut h = Reader::new(r.take(DNS_HEADER_LEN)?);
		Ok(Header {
			id: h.u16()?,
			flags: h.u16()?.into(),
			qd_count: h.u16()?,
			an_count: h.u16()?,
			ns_count: h.u16()?,
			ar_count: h.u16()?,
		})
	}

	pub fn unpack(b: &[u8]) -> Result<Self> {
		Header::read(&mut Reader::new(b))
	}
}

// mimics dig/drill output
impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(
			f,
			";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
			opcode2str(self.flags.opcode),
			rcode2str(self.flags.rcode),
			self.id
		)?;
		write!(
			f,
			";; flags: {}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
			self.flags, self.qd_count, self.an_count, self.ns_count, self.ar_count
		)
	}
}

// I really liked bitfields in C
fn get_bit(v: u16, o: u8) -> bool {
	(v >> o) & 1 == 1
}
fn get_bits(v: u16, o: u8, l: u8) -> u8 {
	((v >> o) & ((1 << l) - 1)) as u8
}
fn set_bit(v: &mut u16, o: u8, b: bool) {
	*v = (*v & !(1 << o)) | ((b as u16) << o);
}
fn set_bits(v: &mut u16, o: u8, l: u8, b: u8) {
	let mask = ((1u16 << l) - 1) << o;
	*v = (*v & !mask) | (((b as u16) << o) & mask);
}
