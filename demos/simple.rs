//! Basic JSON serialization and deserialization through serde.
//!
//! Run with: cargo run --example simple

use codable_json::{from_str, to_string, to_string_pretty};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
        },
    ];

    let json = to_string(&users)?;
    println!("Compact:\n{}\n", json);
    println!("Pretty:\n{}\n", to_string_pretty(&users)?);

    let users_back: Vec<User> = from_str(&json)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    // Errors carry the path to the offending value
    let broken = r#"[{"id":1,"name":"A","email":"a@x"},{"id":"two","name":"B","email":"b@x"}]"#;
    if let Err(err) = from_str::<Vec<User>>(broken) {
        println!("Error: {}", err);
    }

    Ok(())
}
