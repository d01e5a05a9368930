use codable_json::{
    decode, decode_with_options, encode, encode_to_string, encode_to_string_with_options, Decode, DecodeContext,
    DecodeOptions, Document, Encode, EncodeContext, EncodeOptions, ErrorKind, Json5Options,
    NonConformingFloatDecodingStrategy, ReadOptions, Result, Value, WriteOptions,
};
use std::collections::BTreeMap;

#[derive(Debug, PartialEq)]
struct Outer {
    a: Middle,
}

#[derive(Debug, PartialEq)]
struct Middle {
    b: Vec<i64>,
}

impl Decode for Outer {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        Ok(Outer { a: keyed.decode("a")? })
    }
}

impl Decode for Middle {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        Ok(Middle { b: keyed.decode("b")? })
    }
}

#[derive(Debug, PartialEq)]
struct Floats {
    a: f64,
    b: f64,
    c: f64,
    d: f32,
}

impl Decode for Floats {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        Ok(Floats {
            a: keyed.decode("a")?,
            b: keyed.decode("b")?,
            c: keyed.decode("c")?,
            d: keyed.decode("d")?,
        })
    }
}

#[derive(Debug, PartialEq, Default)]
struct AllOptional {
    name: Option<String>,
    count: Option<u32>,
    tags: Option<Vec<String>>,
}

impl Decode for AllOptional {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        Ok(AllOptional {
            name: keyed.decode("name")?,
            count: keyed.decode_optional("count")?,
            tags: keyed.decode_optional("tags")?,
        })
    }
}

impl Encode for AllOptional {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        let mut keyed = ctx.keyed();
        keyed.encode_if_present("name", &self.name)?;
        keyed.encode_if_present("count", &self.count)?;
        keyed.encode_if_present("tags", &self.tags)
    }
}

#[derive(Debug, PartialEq, Clone)]
struct LineItem {
    sku: String,
    quantity: u32,
    price: f64,
}

#[derive(Debug, PartialEq, Clone)]
struct Order {
    id: u64,
    items: Vec<LineItem>,
    note: Option<String>,
    dimensions: (u8, u8, u8),
}

impl Decode for LineItem {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        Ok(LineItem {
            sku: keyed.decode("sku")?,
            quantity: keyed.decode_or("quantity", 1)?,
            price: keyed.decode("price")?,
        })
    }
}

impl Encode for LineItem {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        let mut keyed = ctx.keyed();
        keyed.encode("sku", &self.sku)?;
        keyed.encode("quantity", &self.quantity)?;
        keyed.encode("price", &self.price)
    }
}

impl Decode for Order {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        let mut items: Vec<LineItem> = Vec::new();
        let mut list = keyed.nested_indexed("items")?;
        while !list.is_at_end() {
            items.push(list.decode_next()?);
        }
        let mut dims = keyed.nested_indexed("dimensions")?;
        let dimensions: (u8, u8, u8) = (dims.decode_next()?, dims.decode_next()?, dims.decode_next()?);
        Ok(Order {
            id: keyed.decode("id")?,
            items,
            note: keyed.decode_optional("note")?,
            dimensions,
        })
    }
}

impl Encode for Order {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        let mut keyed = ctx.keyed();
        keyed.encode("id", &self.id)?;
        let mut list = keyed.nested_indexed("items");
        for item in &self.items {
            list.encode(item)?;
        }
        keyed.encode_if_present("note", &self.note)?;
        let mut dims = keyed.nested_indexed("dimensions");
        dims.encode(&self.dimensions.0)?;
        dims.encode(&self.dimensions.1)?;
        dims.encode(&self.dimensions.2)
    }
}

struct Empty;

impl Encode for Empty {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        let _ = ctx.keyed();
        Ok(())
    }
}

struct Silent;

impl Encode for Silent {
    fn encode(&self, _ctx: EncodeContext<'_>) -> Result<()> {
        Ok(())
    }
}

fn sample_order() -> Order {
    Order {
        id: 42,
        items: vec![
            LineItem {
                sku: "WIDGET-001".to_string(),
                quantity: 2,
                price: 29.99,
            },
            LineItem {
                sku: "GADGET-002".to_string(),
                quantity: 1,
                price: 49.5,
            },
        ],
        note: None,
        dimensions: (3, 4, 5),
    }
}

#[test]
fn test_error_path_points_at_failing_element() {
    let err = decode::<Outer>(br#"{"a":{"b":[1,"x",3]}}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("a.b.Index 1"));
}

#[test]
fn test_missing_key_path() {
    let err = decode::<Outer>(br#"{"a":{}}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingKey);
    assert_eq!(err.path(), Some("a.b"));
    assert_eq!(err.to_string(), "Missing key 'b' (at a.b)");
}

#[test]
fn test_integer_literal_decodes_as_float() {
    assert_eq!(decode::<f64>(b"1").unwrap(), 1.0);
    let floats: Floats = decode(br#"{"a":1,"b":0,"c":0.5,"d":1}"#).unwrap();
    assert_eq!(
        floats,
        Floats {
            a: 1.0,
            b: 0.0,
            c: 0.5,
            d: 1.0
        }
    );
}

#[test]
fn test_duplicate_keys_resolve_to_first() {
    let document = Document::parse(br#"{"key":"first","key":"second"}"#, ReadOptions::DEFAULT).unwrap();
    let root = document.root_object().unwrap();
    assert_eq!(root.len(), 2);
    assert_eq!(root.get("key").and_then(|node| node.as_str()), Some("first"));

    let map: BTreeMap<String, String> = decode(br#"{"key":"first","key":"second"}"#).unwrap();
    assert_eq!(map["key"], "first");
}

#[test]
fn test_empty_containers() {
    assert_eq!(encode_to_string(&Empty).unwrap(), "{}");
    assert_eq!(encode_to_string(&Vec::<i32>::new()).unwrap(), "[]");
    assert_eq!(encode_to_string(&AllOptional::default()).unwrap(), "{}");

    let decoded: AllOptional = decode(b"{}").unwrap();
    assert_eq!(decoded, AllOptional::default());
}

#[test]
fn test_null_fields_are_absent() {
    let decoded: AllOptional = decode(br#"{"name":null,"count":null,"tags":["x"]}"#).unwrap();
    assert_eq!(decoded.name, None);
    assert_eq!(decoded.count, None);
    assert_eq!(decoded.tags, Some(vec!["x".to_string()]));
}

#[test]
fn test_boundary_integers_round_trip() {
    let encoded = encode(&i64::MAX).unwrap();
    assert_eq!(encoded, b"9223372036854775807");
    assert_eq!(decode::<i64>(&encoded).unwrap(), i64::MAX);

    let encoded = encode(&u64::MAX).unwrap();
    assert_eq!(encoded, b"18446744073709551615");
    assert_eq!(decode::<u64>(&encoded).unwrap(), u64::MAX);

    let encoded = encode(&i64::MIN).unwrap();
    assert_eq!(decode::<i64>(&encoded).unwrap(), i64::MIN);
}

#[test]
fn test_narrowing_is_checked() {
    let err = decode::<i8>(b"300").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(decode::<i8>(b"-128").unwrap(), i8::MIN);
    assert_eq!(decode::<u32>(b"-1").unwrap_err().kind(), ErrorKind::InvalidData);
    assert_eq!(decode::<i32>(b"1.5").unwrap_err().kind(), ErrorKind::TypeMismatch);
    assert_eq!(decode::<i32>(b"2.0").unwrap(), 2);
}

#[test]
fn test_relaxed_syntax_is_gated() {
    let input = b"{a:1,}";
    let err = decode::<BTreeMap<String, i32>>(input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.path(), None);

    let options = DecodeOptions::new().with_json5(Json5Options::all());
    let map: BTreeMap<String, i32> = decode_with_options(input, &options).unwrap();
    assert_eq!(map.get("a"), Some(&1));

    let options = DecodeOptions::new().with_read_options(ReadOptions::JSON5);
    assert!(decode_with_options::<BTreeMap<String, i32>>(input, &options).is_ok());
}

#[test]
fn test_order_round_trip() {
    let order = sample_order();
    let json = encode_to_string(&order).unwrap();
    assert_eq!(
        json,
        r#"{"id":42,"items":[{"sku":"WIDGET-001","quantity":2,"price":29.99},{"sku":"GADGET-002","quantity":1,"price":49.5}],"dimensions":[3,4,5]}"#
    );
    let back: Order = decode(json.as_bytes()).unwrap();
    assert_eq!(back, order);
}

#[test]
fn test_decode_or_default() {
    let item: LineItem = decode(br#"{"sku":"A","price":1}"#).unwrap();
    assert_eq!(item.quantity, 1);
    assert_eq!(item.price, 1.0);
}

#[test]
fn test_exhausted_array_is_missing_value() {
    let err = decode::<Order>(br#"{"id":1,"items":[],"dimensions":[1,2]}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingValue);
    assert_eq!(err.path(), Some("dimensions.Index 2"));
}

#[test]
fn test_null_root_is_missing_value() {
    let err = decode::<i32>(b"null").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingValue);
    assert_eq!(decode::<Option<i32>>(b"null").unwrap(), None);
}

#[test]
fn test_container_kind_mismatch() {
    let err = decode::<Outer>(b"[1]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.to_string(), "Expected object, got array");
}

#[test]
fn test_value_that_writes_nothing_fails() {
    let err = encode(&Silent).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);

    let mut map = BTreeMap::new();
    map.insert("field".to_string(), vec![Empty]);
    assert_eq!(encode_to_string(&map).unwrap(), r#"{"field":[{}]}"#);
}

#[test]
fn test_sorting_is_idempotent() {
    let input = br#"{"zeta":{"b":1,"a":[{"y":1,"x":2}]},"alpha":true,"Mid":null}"#;
    let value: Value = decode(input).unwrap();
    let options = EncodeOptions::new().with_write_options(WriteOptions::SORTED_KEYS);
    let once = encode_to_string_with_options(&value, &options).unwrap();
    assert_eq!(once, r#"{"Mid":null,"alpha":true,"zeta":{"a":[{"x":2,"y":1}],"b":1}}"#);

    let reparsed: Value = decode(once.as_bytes()).unwrap();
    let twice = encode_to_string_with_options(&reparsed, &options).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_scalar_coercions() {
    assert!(decode::<bool>(b"1").unwrap());
    assert!(!decode::<bool>(b"0.0").unwrap());
    assert!(decode::<bool>(br#""TRUE""#).unwrap());
    assert!(!decode::<bool>(br#""0""#).unwrap());
    assert_eq!(decode::<bool>(br#""yes""#).unwrap_err().kind(), ErrorKind::TypeMismatch);

    assert_eq!(decode::<i32>(br#""-17""#).unwrap(), -17);
    assert_eq!(decode::<f64>(br#""2.5""#).unwrap(), 2.5);
    assert_eq!(decode::<String>(b"12").unwrap(), "12");
    assert_eq!(decode::<String>(b"false").unwrap(), "false");
    assert_eq!(decode::<String>(b"[]").unwrap_err().kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_raw_numbers_decode_like_parsed_numbers() {
    let input = b"[0x10, -0x1F, +1, .5, 5., 0x0, -Infinity, NaN]";
    let parsed = DecodeOptions::new()
        .with_json5(true)
        .with_float_strategy(NonConformingFloatDecodingStrategy::convert_from_default_strings());
    let raw = parsed.clone().with_read_options(ReadOptions::NUMBER_AS_RAW);

    let expected: Vec<f64> = decode_with_options(input, &parsed).unwrap();
    let actual: Vec<f64> = decode_with_options(input, &raw).unwrap();
    assert_eq!(&actual[..6], &[16.0, -31.0, 1.0, 0.5, 5.0, 0.0]);
    assert_eq!(&actual[..7], &expected[..7]);
    assert!(actual[7].is_nan() && expected[7].is_nan());

    let expected: Vec<bool> = decode_with_options(input, &parsed).unwrap();
    let actual: Vec<bool> = decode_with_options(input, &raw).unwrap();
    assert_eq!(actual, expected);
    assert_eq!(actual, vec![true, true, true, true, true, false, true, true]);

    let strict = DecodeOptions::new()
        .with_json5(true)
        .with_read_options(ReadOptions::NUMBER_AS_RAW);
    let err = decode_with_options::<Vec<f64>>(input, &strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(err.path(), Some("Index 6"));
}

#[test]
fn test_tuples_reject_trailing_elements() {
    let err = decode::<(u8, u8)>(b"[1,2,3]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(err.to_string(), "expected 2 elements, found 3");

    let err = decode::<Vec<(u8, u8)>>(b"[[1,2],[3,4,5]]").unwrap_err();
    assert_eq!(err.path(), Some("Index 1"));

    let err = codable_json::from_str::<(bool, String)>(r#"[true, "a", null]"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(decode::<(u8, u8)>(b"[1,2]").unwrap(), (1, 2));
}

#[derive(Debug, PartialEq)]
struct Flags {
    cleared: bool,
    note: Option<String>,
}

impl Decode for Flags {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let keyed = ctx.keyed()?;
        let cleared = keyed.decode_null("cleared");
        let note = if keyed.decode_null("note") {
            None
        } else {
            Some(keyed.decode("note")?)
        };
        Ok(Flags { cleared, note })
    }
}

#[test]
fn test_absent_key_decodes_as_null() {
    let flags: Flags = decode(b"{}").unwrap();
    assert_eq!(
        flags,
        Flags {
            cleared: true,
            note: None
        }
    );

    let flags: Flags = decode(br#"{"cleared":false,"note":"hi"}"#).unwrap();
    assert!(!flags.cleared);
    assert_eq!(flags.note.as_deref(), Some("hi"));
}
