//! Using the json! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use codable_json::{json, to_string_pretty, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let null_val = json!(null);
    let bool_val = json!(true);
    let number = json!(42);
    let text = json!("Hello, JSON!");

    println!("Primitives:");
    println!("  null:   {}", null_val);
    println!("  bool:   {}", bool_val);
    println!("  number: {}", number);
    println!("  text:   {}\n", text);

    let numbers = json!([1, 2, 3, 4, 5]);
    let mixed = json!([1, "two", true, null, (-7)]);

    println!("Arrays:");
    println!("  Numbers: {}", numbers);
    println!("  Mixed:   {}\n", mixed);

    let config = json!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n", to_string_pretty(&config)?);

    let items = vec![
        json!({"id": 1, "status": "active"}),
        json!({"id": 2, "status": "pending"}),
    ];
    let summary = json!({
        "total": (items.len()),
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", summary);

    println!("Accessing values:");
    println!("  App name: {}", config["app"]["name"].as_str().unwrap_or("?"));
    println!("  Port:     {}", config["database"]["port"].as_u64().unwrap_or_default());
    if let Value::Array(features) = &config["features"] {
        println!("  Features: {}", features.len());
    }
    println!("  Missing:  {}", config["nope"][3]);

    Ok(())
}
