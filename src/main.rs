//! # r-auth-client example CLI
//!
//! Resolves a token (and optionally its owner's profile) against a running auth service,
//! repeating the lookup to show the cache at work.
//!
//! ```bash
//! RUST_LOG=r_auth_client=debug cargo run --features cli -- \
//!   --url https://example.org/services/auth \
//!   --token "$AUTH_TOKEN" --user --repeat 3
//! ```

use clap::Parser;
use r_auth_client::{AuthClient, AuthError, ClientConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "r-auth-client", about = "Look up auth tokens through a caching client")]
struct Args {
    /// Base URL of the auth service.
    #[arg(long, env = "AUTH_URL")]
    url: String,

    /// Bearer token to resolve.
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    token: String,

    /// Also resolve the token owner's profile.
    #[arg(long)]
    user: bool,

    /// How many times to repeat each lookup.
    #[arg(long, default_value_t = 2)]
    repeat: usize,

    /// Capacity of each cache.
    #[arg(long, default_value_t = r_auth_client::DEFAULT_CACHE_CAPACITY)]
    capacity: usize,
}

#[tokio::main]
async fn main() -> Result<(), AuthError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ClientConfig::default().with_cache_capacity(args.capacity);
    let client = AuthClient::create(&args.url, config).await?;
    println!("auth service version: {}", client.service_version().await?);

    let misses = AtomicUsize::new(0);
    let on_miss = || {
        misses.fetch_add(1, Ordering::Relaxed);
    };

    for round in 1..=args.repeat {
        let token = client.get_token(&args.token, Some(&on_miss)).await?;
        println!(
            "[{round}] token {} user={} mfa={} expires={:?}",
            token.id(),
            token.user(),
            token.mfa(),
            token.expires_at()
        );

        if args.user {
            let user = client.get_user(&args.token, Some(&on_miss)).await?;
            let roles: Vec<&str> = user.custom_roles().iter().map(String::as_str).collect();
            println!("[{round}] user {} roles={roles:?}", user.user());
        }
    }

    println!("cache misses: {}", misses.load(Ordering::Relaxed));
    Ok(())
}
