use std::{fmt::Display, net::Ipv4Addr};

use log::*;

use crate::{
	constants::*,
	error::{Error, Result},
	header::Header,
	name,
	query::RecordType,
	wire::{peek, u16be, Reader},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
	pub name: String,
	pub qtype: u16,
	pub qclass: u16,
}

/// Owner name of an answer record.
///
/// Servers nearly always compress it to a pointer back into the question,
/// which is kept as the raw offset since pointers are never followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
	Name(String),
	Pointer(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
	A(Ipv4Addr),
	Mx { preference: u16, exchange: String },
	Unknown(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	pub owner: Owner,
	pub rtype: u16,
	pub class: u16,
	pub ttl: u32,
	pub rdlength: u16,
	pub data: RData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
	pub header: Header,
	pub questions: Vec<Question>,
	pub answers: Vec<Record>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
	/// type that was asked for, only used for diagnostics
	pub expected: RecordType,
	/// fail on answer records of types other than A and MX
	pub strict: bool,
}

impl From<RecordType> for ParseOptions {
	fn from(expected: RecordType) -> Self {
		ParseOptions {
			expected,
			strict: false,
		}
	}
}

/// Parses the header, question and answer sections of `raw`.
///
/// Authority and additional sections are left alone. Any failure aborts the
/// whole parse, there are no partial results.
pub fn parse(raw: &[u8], opts: impl Into<ParseOptions>) -> Result<Response> {
	parse_with_end(raw, opts.into()).map(|(resp, _)| resp)
}

// also returns where the answer section ended
fn parse_with_end(raw: &[u8], opts: ParseOptions) -> Result<(Response, usize)> {
	let mut r = Reader::new(raw);
	let header = Header::read(&mut r)?;
	if header.flags.z {
		warn!("header: reserved bit is not zero");
	}

	let mut questions = Vec::with_capacity(header.qd_count.min(4) as usize);
	for _ in 0..header.qd_count {
		questions.push(read_question(&mut r)?);
	}

	let mut answers = Vec::with_capacity(header.an_count.min(32) as usize);
	for _ in 0..header.an_count {
		let rec = read_record(&mut r, opts.strict)?;
		if rec.rtype != opts.expected.code() && !matches!(rec.data, RData::Unknown(_)) {
			debug!(
				"answer of type {} in response to {} query",
				type2str(rec.rtype),
				opts.expected
			);
		}
		answers.push(rec);
	}
	trace!(
		"parsed {} questions, {} answers, {} of {} bytes consumed",
		questions.len(),
		answers.len(),
		r.pos(),
		raw.len()
	);

	Ok((
		Response {
			header,
			questions,
			answers,
		},
		r.pos(),
	))
}

fn read_question(r: &mut Reader) -> Result<Question> {
	let (name, offset) = name::decode(r.buf(), r.pos())?;
	r.set_pos(offset);
	Ok(Question {
		name,
		qtype: r.u16()?,
		qclass: r.u16()?,
	})
}

fn read_owner(r: &mut Reader) -> Result<Owner> {
	let b = r.buf();
	let pos = r.pos();
	let first = peek(b, pos, 1)?[0];
	if name::is_pointer(first) {
		let p = u16be(r.take(2)?);
		return Ok(Owner::Pointer(p & 0x3fff));
	}
	let (name, offset) = name::decode(b, pos)?;
	r.set_pos(offset);
	Ok(Owner::Name(name))
}

fn read_record(r: &mut Reader, strict: bool) -> Result<Record> {
	let owner = read_owner(r)?;
	let rtype = r.u16()?;
	let class = r.u16()?;
	let ttl = r.u32()?;
	let rdlength = r.u16()?;
	let rdata = r.take(rdlength as usize)?;

	let data = match rtype {
		TYPE_A => {
			let Ok(octets) = <[u8; 4]>::try_from(rdata) else {
				return Err(Error::MalformedRecord {
					rtype: "A",
					reason: format!("rdlength {rdlength}, expecting 4"),
				});
			};
			RData::A(Ipv4Addr::from(octets))
		}
		TYPE_MX => read_mx(rdata)?,
		_ if strict => {
			return Err(Error::UnsupportedRecordType(type2str(rtype).to_owned()));
		}
		_ => {
			debug!("passing through {} record, {} bytes", type2str(rtype), rdlength);
			RData::Unknown(rdata.to_vec())
		}
	};

	Ok(Record {
		owner,
		rtype,
		class,
		ttl,
		rdlength,
		data,
	})
}

// decoded within the rdata slice only, so a runaway name can't leak into the next record
fn read_mx(rdata: &[u8]) -> Result<RData> {
	if rdata.len() < 2 {
		return Err(Error::MalformedRecord {
			rtype: "MX",
			reason: format!("rdlength {}, expecting at least 2", rdata.len()),
		});
	}
	let preference = u16be(&rdata[0..2]);
	let (exchange, end) = name::decode(rdata, 2)?;
	if end != rdata.len() {
		return Err(Error::MalformedRecord {
			rtype: "MX",
			reason: format!("{} trailing bytes after exchange", rdata.len() - end),
		});
	}
	Ok(RData::Mx {
		preference,
		exchange,
	})
}

impl Display for Owner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Owner::Name(n) => write!(f, "{n}."),
			Owner::Pointer(p) => write!(f, "@{p}"),
		}
	}
}

impl Display for RData {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RData::A(a) => write!(f, "{a}"),
			RData::Mx {
				preference,
				exchange,
			} => write!(f, "{preference} {exchange}."),
			// rfc3597 generic presentation
			RData::Unknown(b) => {
				write!(f, "\\# {}", b.len())?;
				if !b.is_empty() {
					write!(f, " ")?;
				}
				for x in b {
					write!(f, "{x:02x}")?;
				}
				Ok(())
			}
		}
	}
}

impl Display for Record {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}\t{}\t{}\t{}\t{}",
			self.owner,
			self.ttl,
			class2str(self.class),
			type2str(self.rtype),
			self.data
		)
	}
}

// mimics dig/drill output
impl Display for Response {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{}", self.header)?;
		writeln!(f)?;
		writeln!(f, ";; QUESTION SECTION:")?;
		for q in &self.questions {
			writeln!(
				f,
				";{}.\t\t{}\t{}",
				q.name,
				class2str(q.qclass),
				type2str(q.qtype)
			)?;
		}
		if !self.answers.is_empty() {
			writeln!(f)?;
			writeln!(f, ";; ANSWER SECTION:")?;
			for a in &self.answers {
				writeln!(f, "{a}")?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::header::Flags;
	use hickory_proto::{
		op::{Message, MessageType, Query},
		rr::{
			rdata::{a::A, mx::MX},
			Name, RData as HRData, Record as HRecord, RecordType as HRecordType,
		},
	};

	fn init() {
		let _ = env_logger::builder().is_test(true).try_init();
	}

	fn header(id: u16, qd: u16, an: u16) -> Vec<u8> {
		Header {
			id,
			flags: Flags::from(0x8180),
			qd_count: qd,
			an_count: an,
			..Default::default()
		}
		.pack()
		.to_vec()
	}

	fn question(buf: &mut Vec<u8>, n: &str, t: u16) {
		buf.extend(name::encode(n).unwrap());
		buf.extend_from_slice(&t.to_be_bytes());
		buf.extend_from_slice(&CLASS_IN.to_be_bytes());
	}

	// owner compressed to the question name, like real servers do
	fn answer(buf: &mut Vec<u8>, t: u16, ttl: u32, rdata: &[u8]) {
		buf.extend_from_slice(&[0xc0, 0x0c]);
		buf.extend_from_slice(&t.to_be_bytes());
		buf.extend_from_slice(&CLASS_IN.to_be_bytes());
		buf.extend_from_slice(&ttl.to_be_bytes());
		buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
		buf.extend_from_slice(rdata);
	}

	fn mx_rdata(pref: u16, exchange: &str) -> Vec<u8> {
		let mut b = pref.to_be_bytes().to_vec();
		b.extend(name::encode(exchange).unwrap());
		b
	}

	#[test]
	fn a_record() {
		init();
		let mut m = header(0x1234, 1, 1);
		question(&mut m, "example.com", TYPE_A);
		answer(&mut m, TYPE_A, 300, b"\x5d\xb8\xd8\x22");

		let resp = parse(&m, RecordType::A).unwrap();
		assert_eq!(resp.header.id, 0x1234);
		assert!(resp.header.flags.qr && resp.header.flags.ra);
		assert_eq!(
			resp.questions,
			[Question {
				name: "example.com".to_owned(),
				qtype: TYPE_A,
				qclass: CLASS_IN,
			}]
		);
		assert_eq!(
			resp.answers,
			[Record {
				owner: Owner::Pointer(12),
				rtype: TYPE_A,
				class: CLASS_IN,
				ttl: 300,
				rdlength: 4,
				data: RData::A(Ipv4Addr::new(93, 184, 216, 34)),
			}]
		);
		assert_eq!(resp.answers[0].data.to_string(), "93.184.216.34");
	}

	#[test]
	fn mx_record() {
		init();
		let mut m = header(1, 1, 1);
		question(&mut m, "example.com", TYPE_MX);
		answer(&mut m, TYPE_MX, 3600, &mx_rdata(10, "mail.example.com"));

		let resp = parse(&m, RecordType::MX).unwrap();
		assert_eq!(
			resp.answers[0].data,
			RData::Mx {
				preference: 10,
				exchange: "mail.example.com".to_owned(),
			}
		);
		assert_eq!(resp.answers[0].to_string(), "@12\t3600\tIN\tMX\t10 mail.example.com.");
	}

	#[test]
	fn offsets_add_up() {
		let mut m = header(7, 1, 4);
		question(&mut m, "example.com", TYPE_MX);
		let q_end = m.len();
		let rdatas = [
			mx_rdata(10, "a.example.com"),
			mx_rdata(20, "b.example.com"),
			b"\x01\x02\x03\x04\x05".to_vec(),
			mx_rdata(30, "c.example.com"),
		];
		for (i, rd) in rdatas.iter().enumerate() {
			let t = if i == 2 { 16 } else { TYPE_MX };
			answer(&mut m, t, 60, rd);
		}
		let expected_end = q_end + rdatas.iter().map(|rd| 12 + rd.len()).sum::<usize>();
		assert_eq!(expected_end, m.len());
		// trailing garbage must not be touched
		m.extend_from_slice(&[0xff; 3]);

		let (resp, end) = parse_with_end(&m, RecordType::MX.into()).unwrap();
		assert_eq!(end, expected_end);
		assert_eq!(resp.answers.len(), 4);
		assert_eq!(resp.answers[2].data, RData::Unknown(vec![1, 2, 3, 4, 5]));
		assert_eq!(resp.answers[2].data.to_string(), "\\# 5 0102030405");
		let prefs: Vec<_> = resp
			.answers
			.iter()
			.filter_map(|a| match &a.data {
				RData::Mx { preference, .. } => Some(*preference),
				_ => None,
			})
			.collect();
		assert_eq!(prefs, [10, 20, 30]);
	}

	#[test]
	fn uncompressed_owner() {
		let mut m = header(1, 1, 1);
		question(&mut m, "example.com", TYPE_A);
		m.extend(name::encode("example.com").unwrap());
		m.extend_from_slice(&[0, 1, 0, 1, 0, 0, 0, 5, 0, 4, 10, 0, 0, 1]);
		let resp = parse(&m, RecordType::A).unwrap();
		assert_eq!(resp.answers[0].owner, Owner::Name("example.com".to_owned()));
		assert_eq!(resp.answers[0].data, RData::A(Ipv4Addr::new(10, 0, 0, 1)));
	}

	#[test]
	fn partially_compressed_owner() {
		let mut m = header(1, 1, 1);
		question(&mut m, "example.com", TYPE_A);
		m.extend_from_slice(b"\x03www\xc0\x0c");
		m.extend_from_slice(&[0, 1, 0, 1, 0, 0, 0, 5, 0, 4, 10, 0, 0, 1]);
		assert!(matches!(
			parse(&m, RecordType::A),
			Err(Error::UnsupportedNameEncoding { byte: 0xc0, .. })
		));
	}

	#[test]
	fn short_a_rdata() {
		let mut m = header(1, 1, 1);
		question(&mut m, "example.com", TYPE_A);
		answer(&mut m, TYPE_A, 1, b"\x01\x02\x03");
		assert!(matches!(
			parse(&m, RecordType::A),
			Err(Error::MalformedRecord { rtype: "A", .. })
		));
	}

	#[test]
	fn bad_mx_rdata() {
		for rd in [
			b"\x00".to_vec(),
			// name terminator missing within rdata
			b"\x00\x0a\x04mail".to_vec(),
			// trailing byte
			[mx_rdata(5, "mx.example.com"), vec![0]].concat(),
			// compressed exchange
			b"\x00\x0a\x04mail\xc0\x0c".to_vec(),
		] {
			let mut m = header(1, 1, 1);
			question(&mut m, "example.com", TYPE_MX);
			answer(&mut m, TYPE_MX, 1, &rd);
			assert!(parse(&m, RecordType::MX).is_err(), "{rd:?} should fail");
		}
		let mut m = header(1, 1, 1);
		question(&mut m, "example.com", TYPE_MX);
		answer(&mut m, TYPE_MX, 1, b"\x00\x0a\x04mail");
		assert!(matches!(
			parse(&m, RecordType::MX),
			Err(Error::Truncated { .. })
		));
	}

	#[test]
	fn strict_rejects_unknown() {
		let mut m = header(1, 1, 2);
		question(&mut m, "www.example.com", TYPE_A);
		// CNAME
		answer(&mut m, 5, 60, &name::encode("example.com").unwrap());
		answer(&mut m, TYPE_A, 60, &[1, 1, 1, 1]);

		let lax = parse(&m, RecordType::A).unwrap();
		assert!(matches!(lax.answers[0].data, RData::Unknown(_)));
		assert_eq!(lax.answers[1].data, RData::A(Ipv4Addr::new(1, 1, 1, 1)));

		let strict = ParseOptions {
			expected: RecordType::A,
			strict: true,
		};
		match parse(&m, strict) {
			Err(Error::UnsupportedRecordType(t)) => assert_eq!(t, "CNAME"),
			r => panic!("expected unsupported record type, got {:?}", r),
		}
	}

	#[test]
	fn truncation_everywhere() {
		let mut m = header(1, 1, 2);
		question(&mut m, "example.com", TYPE_MX);
		answer(&mut m, TYPE_MX, 60, &mx_rdata(10, "mx1.example.com"));
		answer(&mut m, TYPE_A, 60, &[192, 0, 2, 1]);
		assert!(parse(&m, RecordType::MX).is_ok());
		for len in 0..m.len() {
			assert!(
				matches!(parse(&m[..len], RecordType::MX), Err(Error::Truncated { .. })),
				"cut at {len}"
			);
		}
	}

	#[test]
	fn short_header() {
		assert!(matches!(
			parse(&[0x12, 0x34, 0x81, 0x80, 0, 1], RecordType::A),
			Err(Error::Truncated { offset: 0, .. })
		));
	}

	#[test]
	fn no_answers() {
		let mut m = header(9, 1, 0);
		m[3] = 0x83;
		question(&mut m, "nope.example", TYPE_A);
		let resp = parse(&m, RecordType::A).unwrap();
		assert!(resp.answers.is_empty());
		assert_eq!(resp.header.flags.rcode, 3);
		let s = resp.to_string();
		assert!(s.contains("status: NXDOMAIN"));
		assert!(s.contains(";nope.example.\t\tIN\tA"));
		assert!(!s.contains("ANSWER SECTION"));
	}

	#[test]
	fn hickory_encoded_response() {
		init();
		let qname = Name::from_ascii("example.com.").unwrap();
		let mut msg = Message::new();
		msg.set_id(0xabcd)
			.set_message_type(MessageType::Response)
			.set_recursion_desired(true)
			.set_recursion_available(true);
		msg.add_query(Query::query(qname.clone(), HRecordType::MX));
		msg.add_answer(HRecord::from_rdata(
			qname.clone(),
			300,
			HRData::MX(MX::new(10, Name::from_ascii("mx.example.net.").unwrap())),
		));
		msg.add_answer(HRecord::from_rdata(
			qname,
			300,
			HRData::A(A::new(93, 184, 216, 34)),
		));
		let raw = msg.to_vec().unwrap();

		let resp = parse(&raw, RecordType::MX).unwrap();
		assert_eq!(resp.header.id, 0xabcd);
		assert_eq!(u16::from(resp.header.flags), 0x8180);
		assert_eq!(resp.questions[0].name, "example.com");
		assert_eq!(resp.questions[0].qtype, TYPE_MX);
		assert_eq!(resp.answers.len(), 2);
		assert_eq!(resp.answers[0].owner, Owner::Pointer(12));
		assert_eq!(resp.answers[0].ttl, 300);
		assert_eq!(
			resp.answers[0].data,
			RData::Mx {
				preference: 10,
				exchange: "mx.example.net".to_owned(),
			}
		);
		assert_eq!(
			resp.answers[1].data,
			RData::A(Ipv4Addr::new(93, 184, 216, 34))
		);
	}
}
