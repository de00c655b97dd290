//! Development utility that prints a signed bearer token for an owner ID.
//!
//! Token issuance normally belongs to the identity service sitting in front
//! of this API; this binary stands in for it during local development and
//! manual testing. The signing secret is read from the `SECRET` environment
//! variable and must match the one the server was started with.

use std::env;

use clap::Parser;

use coinpurse::{OwnerID, TokenKeys, issue_token};

/// Print a signed bearer token for the given owner ID.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The owner ID to issue the token for.
    #[arg(long)]
    owner: i64,
}

fn main() {
    let args = Args::parse();

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let token = issue_token(OwnerID::new(args.owner), &TokenKeys::new(&secret))
        .expect("Could not issue token");

    println!("{token}");
}
