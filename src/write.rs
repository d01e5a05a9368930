//! Printer turning a build tree into JSON text.

use crate::build::{Builder, MutId, MutNode};
use crate::error::{Error, Result, WriteErrorCode};
use crate::number::Number;
use crate::options::WriteOptions;

/// Writes the tree under `root`.
///
/// `SORTED_KEYS` is not consulted here; the encoder sorts the tree first.
pub(crate) fn write_tree(builder: &Builder, root: MutId, options: WriteOptions) -> Result<Vec<u8>> {
    let mut writer = Writer {
        out: Vec::with_capacity(128),
        options,
        indent: options.indent_width(),
    };
    if let Err(err) = writer.value(builder, root, 0) {
        if let Error::Write { code, .. } = &err {
            tracing::debug!(?code, written = writer.out.len(), "write failed");
        }
        return Err(err);
    }
    if options.contains(WriteOptions::NEWLINE_AT_END) {
        writer.out.push(b'\n');
    }
    Ok(writer.out)
}

struct Writer {
    out: Vec<u8>,
    options: WriteOptions,
    indent: Option<usize>,
}

impl Writer {
    fn value(&mut self, builder: &Builder, id: MutId, depth: usize) -> Result<()> {
        match builder.node(id) {
            MutNode::Pending => {
                return Err(Error::write(
                    WriteErrorCode::InvalidValueType,
                    "node was allocated but never given a value",
                ))
            }
            MutNode::Null => self.out.extend_from_slice(b"null"),
            MutNode::Bool(true) => self.out.extend_from_slice(b"true"),
            MutNode::Bool(false) => self.out.extend_from_slice(b"false"),
            MutNode::Number(number) => self.number(*number)?,
            MutNode::Raw(text) => self.out.extend_from_slice(text.as_bytes()),
            MutNode::String(text) => self.string(text),
            MutNode::Array(items) => {
                if items.is_empty() {
                    self.out.extend_from_slice(b"[]");
                    return Ok(());
                }
                self.out.push(b'[');
                for (i, &item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(b',');
                    }
                    self.newline(depth + 1);
                    self.value(builder, item, depth + 1)?;
                }
                self.newline(depth);
                self.out.push(b']');
            }
            MutNode::Object(map) => {
                if map.is_empty() {
                    self.out.extend_from_slice(b"{}");
                    return Ok(());
                }
                self.out.push(b'{');
                for (i, (key, &child)) in map.iter().enumerate() {
                    if i > 0 {
                        self.out.push(b',');
                    }
                    self.newline(depth + 1);
                    self.string(key);
                    self.out.push(b':');
                    if self.indent.is_some() {
                        self.out.push(b' ');
                    }
                    self.value(builder, child, depth + 1)?;
                }
                self.newline(depth);
                self.out.push(b'}');
            }
        }
        Ok(())
    }

    fn newline(&mut self, depth: usize) {
        if let Some(width) = self.indent {
            self.out.push(b'\n');
            self.out.resize(self.out.len() + width * depth, b' ');
        }
    }

    fn number(&mut self, number: Number) -> Result<()> {
        match number {
            Number::PosInt(u) => self.out.extend_from_slice(itoa::Buffer::new().format(u).as_bytes()),
            Number::NegInt(i) => self.out.extend_from_slice(itoa::Buffer::new().format(i).as_bytes()),
            Number::Float(f) if f.is_finite() => {
                self.out.extend_from_slice(ryu::Buffer::new().format_finite(f).as_bytes());
            }
            Number::Float(f) => {
                if self.options.contains(WriteOptions::INF_AND_NAN_AS_NULL) {
                    self.out.extend_from_slice(b"null");
                } else if self.options.contains(WriteOptions::ALLOW_INF_AND_NAN) {
                    let literal: &[u8] = if f.is_nan() {
                        b"NaN"
                    } else if f > 0.0 {
                        b"Infinity"
                    } else {
                        b"-Infinity"
                    };
                    self.out.extend_from_slice(literal);
                } else {
                    return Err(Error::write(
                        WriteErrorCode::NanOrInf,
                        "NaN or Infinity number is not allowed in JSON",
                    ));
                }
            }
        }
        Ok(())
    }

    fn string(&mut self, text: &str) {
        let escape_unicode = self.options.contains(WriteOptions::ESCAPE_UNICODE);
        let escape_slashes = self.options.contains(WriteOptions::ESCAPE_SLASHES);

        self.out.push(b'"');
        let mut run_start = 0;
        for (i, ch) in text.char_indices() {
            let needs_escape = match ch {
                '"' | '\\' => true,
                '/' => escape_slashes,
                c if (c as u32) < 0x20 => true,
                c => escape_unicode && !c.is_ascii(),
            };
            if !needs_escape {
                continue;
            }
            self.out.extend_from_slice(&text.as_bytes()[run_start..i]);
            run_start = i + ch.len_utf8();
            match ch {
                '"' => self.out.extend_from_slice(b"\\\""),
                '\\' => self.out.extend_from_slice(b"\\\\"),
                '/' => self.out.extend_from_slice(b"\\/"),
                '\n' => self.out.extend_from_slice(b"\\n"),
                '\r' => self.out.extend_from_slice(b"\\r"),
                '\t' => self.out.extend_from_slice(b"\\t"),
                '\u{8}' => self.out.extend_from_slice(b"\\b"),
                '\u{c}' => self.out.extend_from_slice(b"\\f"),
                c => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        self.unicode_escape(*unit);
                    }
                }
            }
        }
        self.out.extend_from_slice(&text.as_bytes()[run_start..]);
        self.out.push(b'"');
    }

    fn unicode_escape(&mut self, unit: u16) {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        self.out.extend_from_slice(b"\\u");
        for shift in [12, 8, 4, 0] {
            self.out.push(HEX[usize::from((unit >> shift) & 0xF)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Builder, MutId) {
        let mut builder = Builder::new();
        let root = builder.alloc();
        let name = builder.insert(root, "name".to_string());
        builder.set(name, MutNode::String("Ada".to_string()));
        let tags = builder.insert(root, "tags".to_string());
        for tag in ["x", "y"] {
            let item = builder.append(tags);
            builder.set(item, MutNode::String(tag.to_string()));
        }
        let empty = builder.insert(root, "empty".to_string());
        builder.make_object(empty);
        (builder, root)
    }

    fn write(builder: &Builder, root: MutId, options: WriteOptions) -> String {
        String::from_utf8(write_tree(builder, root, options).unwrap()).unwrap()
    }

    fn scalar(node: MutNode, options: WriteOptions) -> Result<String> {
        let mut builder = Builder::new();
        let root = builder.alloc();
        builder.set(root, node);
        write_tree(&builder, root, options).map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_compact_output() {
        let (builder, root) = tree();
        assert_eq!(
            write(&builder, root, WriteOptions::DEFAULT),
            r#"{"name":"Ada","tags":["x","y"],"empty":{}}"#
        );
    }

    #[test]
    fn test_pretty_output() {
        let (builder, root) = tree();
        let expected = "{\n    \"name\": \"Ada\",\n    \"tags\": [\n        \"x\",\n        \"y\"\n    ],\n    \"empty\": {}\n}";
        assert_eq!(write(&builder, root, WriteOptions::PRETTY), expected);

        let two = "{\n  \"name\": \"Ada\",\n  \"tags\": [\n    \"x\",\n    \"y\"\n  ],\n  \"empty\": {}\n}\n";
        assert_eq!(
            write(
                &builder,
                root,
                WriteOptions::PRETTY | WriteOptions::PRETTY_TWO_SPACES | WriteOptions::NEWLINE_AT_END
            ),
            two
        );
    }

    #[test]
    fn test_numbers() {
        let cases = [
            (Number::PosInt(u64::MAX), "18446744073709551615"),
            (Number::NegInt(i64::MIN), "-9223372036854775808"),
            (Number::Float(1.0), "1.0"),
            (Number::Float(0.1), "0.1"),
            (Number::Float(-2.5e-8), "-2.5e-8"),
        ];
        for (number, expected) in cases {
            assert_eq!(scalar(MutNode::Number(number), WriteOptions::DEFAULT).unwrap(), expected);
        }
        assert_eq!(
            scalar(MutNode::Raw("123456789012345678901234567890".into()), WriteOptions::DEFAULT)
                .unwrap(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_non_finite_floats() {
        let nan = MutNode::Number(Number::Float(f64::NAN));
        let inf = MutNode::Number(Number::Float(f64::NEG_INFINITY));

        match scalar(nan.clone(), WriteOptions::DEFAULT) {
            Err(Error::Write { code, .. }) => assert_eq!(code, WriteErrorCode::NanOrInf),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(scalar(nan.clone(), WriteOptions::ALLOW_INF_AND_NAN).unwrap(), "NaN");
        assert_eq!(scalar(inf, WriteOptions::ALLOW_INF_AND_NAN).unwrap(), "-Infinity");
        assert_eq!(scalar(nan.clone(), WriteOptions::INF_AND_NAN_AS_NULL).unwrap(), "null");
        assert_eq!(
            scalar(nan, WriteOptions::INF_AND_NAN_AS_NULL | WriteOptions::ALLOW_INF_AND_NAN)
                .unwrap(),
            "null"
        );
    }

    #[test]
    fn test_string_escapes() {
        let text = MutNode::String("q\"b\\s/n\nc\u{1}é😀".to_string());
        assert_eq!(
            scalar(text.clone(), WriteOptions::DEFAULT).unwrap(),
            "\"q\\\"b\\\\s/n\\nc\\u0001é😀\""
        );
        assert_eq!(
            scalar(text, WriteOptions::ESCAPE_SLASHES | WriteOptions::ESCAPE_UNICODE).unwrap(),
            "\"q\\\"b\\\\s\\/n\\nc\\u0001\\u00E9\\uD83D\\uDE00\""
        );
    }

    #[test]
    fn test_pending_node_is_rejected() {
        let mut builder = Builder::new();
        let root = builder.alloc();
        builder.append(root);
        match write_tree(&builder, root, WriteOptions::DEFAULT) {
            Err(Error::Write { code, .. }) => assert_eq!(code, WriteErrorCode::InvalidValueType),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(scalar(MutNode::Array(Vec::new()), WriteOptions::PRETTY).unwrap(), "[]");
        assert_eq!(
            scalar(MutNode::Object(Default::default()), WriteOptions::PRETTY).unwrap(),
            "{}"
        );
    }
}
