use std::{process::ExitCode, time::Duration};

use clap::Parser;
use log::*;
use tokio::task::JoinSet;

use dnsq::{resolver::DEFAULT_SERVER, RecordType, Resolver};

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[clap(about = "query a recursive resolver for A or MX records")]
pub struct Args {
	#[clap(required = true)]
	pub names: Vec<String>,

	/// A or MX
	#[clap(short = 't', long = "type", default_value = "A")]
	pub rtype: String,

	#[clap(short, long, default_value = DEFAULT_SERVER)]
	pub server: String,

	/// seconds to wait for each reply
	#[clap(long, default_value_t = 2)]
	pub timeout: u64,

	/// fail on answer records other than A and MX
	#[clap(long)]
	pub strict: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = Args::parse();

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL))
		.init();

	// reject the selector before touching the network
	let rtype: RecordType = match args.rtype.parse() {
		Ok(t) => t,
		Err(e) => {
			error!("{}", e);
			return ExitCode::FAILURE;
		}
	};
	let server = match args.server.parse() {
		Ok(s) => s,
		Err(e) => {
			error!("invalid server address {}: {}", args.server, e);
			return ExitCode::FAILURE;
		}
	};
	let resolver = Resolver::new(server)
		.with_timeout(Duration::from_secs(args.timeout))
		.strict(args.strict);

	// independent lookups, printed in whatever order they complete
	let mut set = JoinSet::new();
	for name in args.names {
		let resolver = resolver.clone();
		set.spawn(async move {
			let r = resolver.resolve_async(&name, rtype).await;
			(name, r)
		});
	}

	let mut failed = false;
	while let Some(joined) = set.join_next().await {
		match joined {
			Ok((_, Ok(resp))) => println!("{resp}"),
			Ok((name, Err(e))) => {
				error!("{} {}: {}", name, rtype, e);
				failed = true;
			}
			Err(e) => {
				error!("lookup task failed: {}", e);
				failed = true;
			}
		}
	}

	if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}
