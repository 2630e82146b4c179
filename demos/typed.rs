//! Carry Rust types through the codec and compare against JSON.
//!
//! Run with: cargo run --example typed

use serde::{Deserialize, Serialize};
use serde_backref::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
enum Status {
    Active,
    Suspended,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Account(u32, String, Status);

fn main() -> Result<(), Box<dyn Error>> {
    let accounts: Vec<Account> = (0..12)
        .map(|i| {
            let status = if i % 4 == 0 {
                Status::Suspended
            } else {
                Status::Active
            };
            Account(i % 3, format!("team-{}", i % 3), status)
        })
        .collect();

    // Serialize to backref
    let payload = to_string(&accounts)?;
    let json = serde_json::to_string(&accounts)?;
    println!("Backref ({} bytes):\n{}\n", payload.len(), payload);
    println!("JSON ({} bytes):\n{}\n", json.len(), json);

    // Deserialize back to tuple structs
    let accounts_back: Vec<Account> = from_str(&payload)?;
    assert_eq!(accounts, accounts_back);
    println!("✓ Round-trip successful");

    Ok(())
}
