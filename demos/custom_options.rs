//! Controlling the reader and the printer with option flags.
//!
//! Run with: cargo run --example custom_options

use codable_json::{
    decode_with_options, to_string_with_options, DecodeOptions, EncodeOptions, Json5Options, ReadOptions, Value,
    WriteOptions,
};
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
struct Config {
    name: String,
    path: String,
    ratio: f64,
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "Crème".to_string(),
        path: "/var/lib/app".to_string(),
        ratio: f64::NAN,
        debug: true,
    };

    println!("NaN as null:");
    let options = EncodeOptions::new().with_write_options(WriteOptions::INF_AND_NAN_AS_NULL);
    println!("{}\n", to_string_with_options(&config, &options)?);

    println!("ASCII-only, escaped slashes, sorted, two-space indent:");
    let options = EncodeOptions::new().with_write_options(
        WriteOptions::ESCAPE_UNICODE
            | WriteOptions::ESCAPE_SLASHES
            | WriteOptions::SORTED_KEYS
            | WriteOptions::PRETTY_TWO_SPACES
            | WriteOptions::ALLOW_INF_AND_NAN,
    );
    println!("{}\n", to_string_with_options(&config, &options)?);

    let input = b"// generated\n[1, 2, 3,]";
    match decode_with_options::<Vec<u8>>(input, &DecodeOptions::default()) {
        Ok(_) => println!("strict reader accepted it"),
        Err(err) => println!("Strict reader: {}", err),
    }

    let options = DecodeOptions::new().with_json5(Json5Options {
        comments: true,
        trailing_commas: true,
        ..Json5Options::none()
    });
    let values: Vec<u8> = decode_with_options(input, &options)?;
    println!("Relaxed reader: {:?}\n", values);

    let options = DecodeOptions::new().with_read_options(ReadOptions::STOP_WHEN_DONE);
    let first: Value = decode_with_options(b"{\"a\":1} trailing", &options)?;
    println!("Stopped after first value: {}", first);

    Ok(())
}
