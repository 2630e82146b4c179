//! Encode and decode a small sample sequence.
//!
//! Run with: RUST_LOG=serde_backref=trace cargo run --example sample

use serde_backref::{decode, encode, values};
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let to_send = values!["foo", "foo", 23, ["bar", 42], 23, ["bar", 42]];

    let encoded = encode(&to_send)?;
    info!(%encoded, "encoded sample");
    println!("Encoded: {}", encoded);

    let decoded = decode(&encoded)?;
    println!("Decoded: {:?}", decoded);

    assert_eq!(to_send, decoded);
    println!("✓ Round-trip successful");

    Ok(())
}
