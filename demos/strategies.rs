//! Key, date, data and float strategies with a hand-written Decode/Encode type.
//!
//! Run with: cargo run --example strategies

use chrono::{DateTime, TimeZone, Utc};
use codable_json::{
    decode_with_options, encode_to_string_with_options, Bytes, Decode, DecodeContext, DecodeOptions,
    DateDecodingStrategy, DateEncodingStrategy, Encode, EncodeContext, EncodeOptions, KeyDecodingStrategy,
    KeyEncodingStrategy, NonConformingFloatDecodingStrategy, NonConformingFloatEncodingStrategy, Result,
    WriteOptions,
};
use std::error::Error;

#[derive(Debug, PartialEq)]
struct Upload {
    file_name: String,
    uploaded_at: DateTime<Utc>,
    checksum: Bytes,
    score: f64,
}

impl Decode for Upload {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        Ok(Upload {
            file_name: keyed.decode("fileName")?,
            uploaded_at: keyed.decode("uploadedAt")?,
            checksum: keyed.decode("checksum")?,
            score: keyed.decode("score")?,
        })
    }
}

impl Encode for Upload {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        let mut keyed = ctx.keyed();
        keyed.encode("fileName", &self.file_name)?;
        keyed.encode("uploadedAt", &self.uploaded_at)?;
        keyed.encode("checksum", &self.checksum)?;
        keyed.encode("score", &self.score)
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let upload = Upload {
        file_name: "report.pdf".to_string(),
        uploaded_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().ok_or("bad date")?,
        checksum: Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
        score: f64::INFINITY,
    };

    let encode_options = EncodeOptions::new()
        .with_write_options(WriteOptions::PRETTY)
        .with_key_strategy(KeyEncodingStrategy::ConvertToSnakeCase)
        .with_date_strategy(DateEncodingStrategy::SecondsSince1970)
        .with_float_strategy(NonConformingFloatEncodingStrategy::convert_to_default_strings());
    let json = encode_to_string_with_options(&upload, &encode_options)?;
    println!("Encoded:\n{}\n", json);

    let decode_options = DecodeOptions::new()
        .with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase)
        .with_date_strategy(DateDecodingStrategy::SecondsSince1970)
        .with_float_strategy(NonConformingFloatDecodingStrategy::convert_from_default_strings());
    let back: Upload = decode_with_options(json.as_bytes(), &decode_options)?;
    assert_eq!(back, upload);
    println!("✓ Round-trip successful");

    let iso = EncodeOptions::new().with_date_strategy(DateEncodingStrategy::Iso8601);
    println!("ISO 8601 date: {}", encode_to_string_with_options(&upload.uploaded_at, &iso)?);

    let formatted = EncodeOptions::new().with_date_strategy(DateEncodingStrategy::Formatted("%d %b %Y".into()));
    println!("Formatted date: {}", encode_to_string_with_options(&upload.uploaded_at, &formatted)?);

    Ok(())
}
