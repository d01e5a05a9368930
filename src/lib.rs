//! # codable_json
//!
//! Typed JSON coding: read a document once, then decode strongly typed values
//! out of it, or encode typed values into a tree and print it.
//!
//! ## Key Features
//!
//! - **Three container views**: keyed (objects), indexed (arrays) and
//!   single-value access on both the decode and the encode side
//! - **Located errors**: every decode or encode failure carries the field
//!   path where it happened, such as `users.Index 2.email`
//! - **Strategies**: key casing, date, binary data and non-finite float
//!   policies chosen per call
//! - **Relaxed syntax**: comments, trailing commas, JSON5 and more, each a
//!   separate read flag
//! - **Serde Compatible**: any `Serialize`/`Deserialize` type goes through
//!   the same engine, with the same strategies and error paths
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ### Hand-written coding
//!
//! ```rust
//! use codable_json::{decode, encode_to_string, Decode, DecodeContext, Encode, EncodeContext, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     id: u64,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! impl Decode for User {
//!     fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
//!         let keyed = ctx.keyed()?;
//!         Ok(User {
//!             id: keyed.decode("id")?,
//!             name: keyed.decode("name")?,
//!             email: keyed.decode_optional("email")?,
//!         })
//!     }
//! }
//!
//! impl Encode for User {
//!     fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
//!         let mut keyed = ctx.keyed();
//!         keyed.encode("id", &self.id)?;
//!         keyed.encode("name", &self.name)?;
//!         keyed.encode_if_present("email", &self.email)
//!     }
//! }
//!
//! let user: User = decode(br#"{"id": 1, "name": "Ada"}"#)?;
//! assert_eq!(user.email, None);
//! assert_eq!(encode_to_string(&user)?, r#"{"id":1,"name":"Ada"}"#);
//! # Ok::<(), codable_json::Error>(())
//! ```
//!
//! ### Through serde
//!
//! ```rust
//! use codable_json::{from_str, to_string};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let json = to_string(&Point { x: 1, y: 2 })?;
//! assert_eq!(json, r#"{"x":1,"y":2}"#);
//! let back: Point = from_str(&json)?;
//! assert_eq!(back, Point { x: 1, y: 2 });
//! # Ok::<(), codable_json::Error>(())
//! ```
//!
//! ### Strategies
//!
//! ```rust
//! use codable_json::{from_slice_with_options, DecodeOptions, KeyDecodingStrategy};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Account { display_name: String }
//!
//! let options = DecodeOptions::new().with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
//! let account: Account = from_slice_with_options(br#"{"display_name": "Ada"}"#, &options)?;
//! assert_eq!(account.display_name, "Ada");
//! # Ok::<(), codable_json::Error>(())
//! ```
//!
//! ### Dynamic Values with the json! Macro
//!
//! ```rust
//! use codable_json::{json, Value};
//!
//! let data = json!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde"]
//! });
//!
//! assert_eq!(data["name"].as_str(), Some("Alice"));
//! assert_eq!(data.to_string(), r#"{"name":"Alice","age":30,"tags":["rust","serde"]}"#);
//! ```
//!
//! ## Behavior Worth Knowing
//!
//! - Duplicate object keys resolve to the first occurrence.
//! - Integers decode into any numeric type they fit; narrowing that would
//!   lose the value fails with [`Error::InvalidData`]. Integers decode into
//!   floats, and numeric strings decode into numbers.
//! - Encoding a value that writes nothing fails instead of printing a
//!   placeholder.
//! - Nesting is limited to 512 containers.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - typed decode and encode
//! - **`macro.rs`** - building values with `json!`
//! - **`dynamic_values.rs`** - walking a [`Document`] and [`Value`]
//! - **`custom_options.rs`** - read and write flags
//! - **`strategies.rs`** - key, date, data and float strategies
//!
//! Run any example with: `cargo run --example <name>`

pub mod build;
pub mod de;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod impls;
pub mod macros;
pub mod map;
pub mod number;
pub mod options;
pub mod path;
mod read;
pub mod ser;
pub mod strategy;
pub mod value;
mod write;

pub use build::{Builder, MutId, MutNode};
pub use de::{from_document, from_reader, from_slice, from_slice_with_options, from_str, Deserializer};
pub use decode::{
    decode, decode_document, decode_owned, decode_with_options, Decode, DecodeContext, DecodeOptions,
    IndexedDecoder, KeyedDecoder, SingleValueDecoder,
};
pub use document::{ArrayRef, Document, Node, NodeKind, ObjectRef};
pub use encode::{
    encode, encode_to_string, encode_to_string_with_options, encode_to_writer, encode_with_options, Encode,
    EncodeContext, EncodeOptions, IndexedEncoder, KeyedEncoder, SingleValueEncoder,
};
pub use error::{Error, ErrorKind, ParseErrorCode, Result, WriteErrorCode};
pub use impls::Bytes;
pub use map::Map;
pub use number::Number;
pub use options::{Json5Options, ReadOptions, WriteOptions};
pub use path::{CodingPath, PathSegment};
pub use ser::{
    to_string, to_string_pretty, to_string_with_options, to_value, to_vec, to_vec_with_options, to_writer,
    Serde, Serializer,
};
pub use strategy::{
    convert_from_snake_case, convert_to_snake_case, DataDecodingStrategy, DataEncodingStrategy,
    DateDecodingStrategy, DateEncodingStrategy, KeyDecodingStrategy, KeyEncodingStrategy,
    NonConformingFloatDecodingStrategy, NonConformingFloatEncodingStrategy,
};
pub use value::Value;
