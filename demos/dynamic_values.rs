//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use codable_json::{json, to_string_pretty, to_value, ReadOptions, Value};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = json!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    if let Some(obj) = config.as_object_mut() {
        obj.insert("workers".to_string(), Value::from(4));
    }
    println!("Config:\n{}\n", to_string_pretty(&config)?);

    println!("host:     {}", config["host"].as_str().unwrap_or_default());
    println!("port:     {}", config["port"].as_i64().unwrap_or_default());
    println!("features: {} items\n", config["features"].as_array().map_or(0, Vec::len));

    // Parse text, including relaxed syntax
    let parsed = Value::parse(b"{name: 'svc', retries: 0x03, /* ms */ timeout: 2.5e3,}", ReadOptions::JSON5)?;
    println!("Parsed JSON5: {}\n", parsed);

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let user_value = to_value(&user)?;
    println!("User as Value: {}\n", user_value);

    println!("Type checks:");
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());
    println!("  type:      {}", user_value["roles"].type_name());

    Ok(())
}
