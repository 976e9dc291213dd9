pub const DNS_HEADER_LEN: usize = 12;
// classic udp limit, rfc1035 4.2.1, we don't do edns0
pub const DNS_UDP_MAX: usize = 512;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

// top 2 bits of a label length byte, rfc1035 4.1.4
pub const LABEL_KIND_MASK: u8 = 0b1100_0000;
pub const LABEL_KIND_POINTER: u8 = 0b1100_0000;

// bit offset within the 16 bit flags word, name, for easier enumeration/display only
// caution: in rfc1035 4.1.1 (and rfc6895 2), 0 actually denotes the highest bit
// ad and cd are introduced in rfc2535 6.7
pub const FLAGS: &[(u8, &str)] = &[
	(15, "qr"), // query or response
	// 4 bits gap here is opcode
	(10, "aa"), // authoritative answer
	(9, "tc"),  // truncated
	(8, "rd"),  // recursive desired
	(7, "ra"),  // recursive available
	(6, "z"),   // zero
	(5, "ad"),  // authentic data
	(4, "cd"),  // checking disabled
];
// 4 bits afterwards is rcode

// standard query, recursion desired
pub const FLAGS_QUERY_RD: u16 = 0x0100;

// OpCode
pub const OPCODE_QUERY: u8 = 0;
const OPCODE_TABLE: &[&str] = &["QUERY", "IQUERY", "STATUS"];

// RCode
pub const RCODE_NOERROR: u8 = 0;
const RCODE_TABLE: &[&str] = &[
	"NOERROR", "FORMERR", "SERVFAIL", "NXDOMAIN", "NOTIMP", "REFUSED",
];

// Class
pub const CLASS_IN: u16 = 1;
const CLASS_TABLE: &[&str] = &["IN"];

// Type
pub const TYPE_A: u16 = 1;
pub const TYPE_MX: u16 = 15;
const TYPE_TABLE: &[(u16, &str)] = &[
	(TYPE_A, "A"),
	(2, "NS"),
	(5, "CNAME"),
	(6, "SOA"),
	(12, "PTR"),
	(TYPE_MX, "MX"),
	(16, "TXT"),
	(28, "AAAA"),
];

pub fn opcode2str(c: u8) -> &'static str {
	code2str(OPCODE_TABLE, OPCODE_QUERY as u16, c as u16)
}

pub fn rcode2str(c: u8) -> &'static str {
	code2str(RCODE_TABLE, RCODE_NOERROR as u16, c as u16)
}

pub fn class2str(c: u16) -> &'static str {
	code2str(CLASS_TABLE, CLASS_IN, c)
}

// types are sparse, so no base offset trick here
pub fn type2str(c: u16) -> &'static str {
	TYPE_TABLE
		.iter()
		.find(|(t, _)| *t == c)
		.map(|(_, s)| *s)
		.unwrap_or("NotImplemented")
}

fn code2str(table: &'static [&'static str], base: u16, c: u16) -> &'static str {
	match c.checked_sub(base) {
		Some(c) if (c as usize) < table.len() => table[c as usize],
		_ => "NotImplemented",
	}
}
