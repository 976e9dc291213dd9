// barebones dns stub resolver
// it does 3 things only:
// 	build a query for A or MX
// 	send it to a recursive resolver over udp
// 	parse the header, question and answer sections of the reply
// https://datatracker.ietf.org/doc/html/rfc1035

pub mod constants;
mod error;
pub mod header;
pub mod name;
pub mod query;
pub mod resolver;
pub mod response;
pub mod transport;
mod wire;

pub use error::{Error, Result};
pub use header::{Flags, Header};
pub use query::RecordType;
pub use resolver::Resolver;
pub use response::{Owner, ParseOptions, Question, RData, Record, Response};
