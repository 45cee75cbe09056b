use std::{env, error::Error};

use clap::Parser;
use time::Duration;

use fintrack_rs::{TokenIssuer, UserId, session_cookie};

/// A utility for minting session tokens for manual testing of the REST API
/// server of fintrack_rs.
///
/// Reads the signing secret from the `AUTH_SECRET` environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ID of the user the token is issued to.
    #[arg(long)]
    user_id: String,

    /// How many minutes the token stays valid for.
    #[arg(long, default_value_t = 60)]
    minutes: i64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let secret = env::var("AUTH_SECRET")
        .map_err(|_| "The environment variable 'AUTH_SECRET' must be set")?;

    if args.minutes <= 0 {
        return Err("--minutes must be positive".into());
    }

    let user_id = UserId::new(&args.user_id)?;
    let token = TokenIssuer::new(&secret).issue(&user_id, Duration::minutes(args.minutes))?;

    println!("Authorization: Bearer {token}");
    println!("Set-Cookie: {}", session_cookie(token));

    Ok(())
}
