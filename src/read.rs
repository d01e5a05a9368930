//! Recursive-descent reader producing the arena behind a [`Document`].
//!
//! [`Document`]: crate::Document

use crate::document::{Member, Slot, Text};
use crate::error::{Error, ParseErrorCode, Result};
use crate::number::Number;
use crate::options::ReadOptions;

/// Containers nested deeper than this are rejected.
pub(crate) const MAX_DEPTH: usize = 512;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) struct Parts {
    pub(crate) nodes: Vec<Slot>,
    pub(crate) children: Vec<usize>,
    pub(crate) members: Vec<Member>,
    pub(crate) owned: Vec<String>,
    pub(crate) root: Option<usize>,
}

pub(crate) fn read(input: &[u8], options: ReadOptions) -> Result<Parts> {
    Reader {
        input,
        pos: 0,
        depth: 0,
        options,
        nodes: Vec::new(),
        children: Vec::new(),
        members: Vec::new(),
        owned: Vec::new(),
    }
    .document()
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    options: ReadOptions,
    nodes: Vec<Slot>,
    children: Vec<usize>,
    members: Vec<Member>,
    owned: Vec<String>,
}

impl<'a> Reader<'a> {
    fn document(mut self) -> Result<Parts> {
        // U+FEFF is also JSON5 whitespace, so either flag admits it.
        if self.input.starts_with(BOM) {
            if self.allows(ReadOptions::ALLOW_BOM) {
                self.pos = BOM.len();
            } else if !self.allows(ReadOptions::ALLOW_EXTENDED_WHITESPACE) {
                return Err(self.fail_with(
                    ParseErrorCode::UnexpectedCharacter,
                    "byte order mark is not allowed",
                ));
            }
        }

        self.skip_trivia()?;
        if self.at_end() {
            return Err(self.fail(ParseErrorCode::EmptyContent));
        }

        let root = self.value()?;

        if !self.allows(ReadOptions::STOP_WHEN_DONE) {
            self.skip_trivia()?;
            if !self.at_end() {
                return Err(self.fail(ParseErrorCode::UnexpectedContent));
            }
        }

        Ok(Parts {
            nodes: self.nodes,
            children: self.children,
            members: self.members,
            owned: self.owned,
            root: Some(root),
        })
    }

    #[inline]
    fn allows(&self, flag: ReadOptions) -> bool {
        self.options.contains(flag)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or(&[])
    }

    fn fail(&self, code: ParseErrorCode) -> Error {
        Error::parse(code, self.pos)
    }

    fn fail_with(&self, code: ParseErrorCode, detail: &str) -> Error {
        Error::parse_with(code, self.pos, detail)
    }

    fn unexpected(&self) -> Error {
        if self.at_end() {
            self.fail(ParseErrorCode::UnexpectedEnd)
        } else {
            self.fail(ParseErrorCode::UnexpectedCharacter)
        }
    }

    fn push(&mut self, slot: Slot) -> usize {
        self.nodes.push(slot);
        self.nodes.len() - 1
    }

    // Whitespace and comments

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.pos += 1,
                Some(b'/') if self.allows(ReadOptions::ALLOW_COMMENTS) => self.comment()?,
                Some(_) if self.allows(ReadOptions::ALLOW_EXTENDED_WHITESPACE) => {
                    match extended_whitespace_len(self.rest()) {
                        Some(len) => self.pos += len,
                        None => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn comment(&mut self) -> Result<()> {
        let start = self.pos;
        match self.peek_at(1) {
            Some(b'/') => {
                self.pos += 2;
                while let Some(b) = self.peek() {
                    self.pos += 1;
                    if b == b'\n' {
                        break;
                    }
                }
                Ok(())
            }
            Some(b'*') => {
                self.pos += 2;
                loop {
                    match self.peek() {
                        None => {
                            return Err(Error::parse_with(
                                ParseErrorCode::InvalidComment,
                                start,
                                "unclosed multiline comment",
                            ))
                        }
                        Some(b'*') if self.peek_at(1) == Some(b'/') => {
                            self.pos += 2;
                            return Ok(());
                        }
                        Some(_) => self.pos += 1,
                    }
                }
            }
            _ => Err(self.fail(ParseErrorCode::InvalidComment)),
        }
    }

    // Values

    fn value(&mut self) -> Result<usize> {
        match self.peek() {
            None => Err(self.fail(ParseErrorCode::UnexpectedEnd)),
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => {
                let text = self.string()?;
                Ok(self.push(Slot::String(text)))
            }
            Some(b'\'') if self.allows(ReadOptions::ALLOW_SINGLE_QUOTED_STRINGS) => {
                let text = self.string()?;
                Ok(self.push(Slot::String(text)))
            }
            Some(b't') => self.literal(b"true", Slot::Bool(true)),
            Some(b'f') => self.literal(b"false", Slot::Bool(false)),
            Some(b'n') if self.rest().starts_with(b"null") => {
                self.literal(b"null", Slot::Null)
            }
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(b'+' | b'.') if self.allows(ReadOptions::ALLOW_EXTENDED_NUMBERS) => {
                self.number()
            }
            Some(b'i' | b'I' | b'n' | b'N') if self.allows(ReadOptions::ALLOW_INF_AND_NAN) => {
                self.number()
            }
            Some(b'n') => Err(self.fail(ParseErrorCode::Literal)),
            Some(_) => Err(self.fail(ParseErrorCode::UnexpectedCharacter)),
        }
    }

    fn literal(&mut self, word: &[u8], slot: Slot) -> Result<usize> {
        if self.rest().starts_with(word) {
            self.pos += word.len();
            Ok(self.push(slot))
        } else {
            Err(self.fail(ParseErrorCode::Literal))
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.fail_with(
                ParseErrorCode::JsonStructure,
                "maximum nesting depth exceeded",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// After a `,` inside a container: `true` if the container closes here.
    fn trailing_comma(&mut self, close: u8) -> Result<bool> {
        self.skip_trivia()?;
        if self.peek() != Some(close) {
            return Ok(false);
        }
        if self.allows(ReadOptions::ALLOW_TRAILING_COMMAS) {
            self.pos += 1;
            Ok(true)
        } else {
            Err(self.fail_with(
                ParseErrorCode::UnexpectedCharacter,
                "trailing comma is not allowed",
            ))
        }
    }

    fn array(&mut self) -> Result<usize> {
        self.enter()?;
        let slot = self.push(Slot::Null);
        self.pos += 1;

        let mut items = Vec::new();
        self.skip_trivia()?;
        if self.peek() == Some(b']') {
            self.pos += 1;
        } else {
            loop {
                items.push(self.value()?);
                self.skip_trivia()?;
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        if self.trailing_comma(b']')? {
                            break;
                        }
                    }
                    Some(b']') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.unexpected()),
                }
            }
        }

        let start = self.children.len();
        let len = items.len();
        self.children.extend(items);
        self.nodes[slot] = Slot::Array { start, len };
        self.depth -= 1;
        Ok(slot)
    }

    fn object(&mut self) -> Result<usize> {
        self.enter()?;
        let slot = self.push(Slot::Null);
        self.pos += 1;

        let mut members = Vec::new();
        self.skip_trivia()?;
        if self.peek() == Some(b'}') {
            self.pos += 1;
        } else {
            loop {
                let key = self.key()?;
                self.skip_trivia()?;
                if self.peek() != Some(b':') {
                    return Err(self.unexpected());
                }
                self.pos += 1;
                self.skip_trivia()?;
                let value = self.value()?;
                members.push(Member { key, value });

                self.skip_trivia()?;
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        if self.trailing_comma(b'}')? {
                            break;
                        }
                        self.skip_trivia()?;
                    }
                    Some(b'}') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.unexpected()),
                }
            }
        }

        let start = self.members.len();
        let len = members.len();
        self.members.extend(members);
        self.nodes[slot] = Slot::Object { start, len };
        self.depth -= 1;
        Ok(slot)
    }

    fn key(&mut self) -> Result<Text> {
        match self.peek() {
            Some(b'"') => self.string(),
            Some(b'\'') if self.allows(ReadOptions::ALLOW_SINGLE_QUOTED_STRINGS) => self.string(),
            Some(b) if self.allows(ReadOptions::ALLOW_UNQUOTED_KEYS) && is_ident_start(b) => {
                self.identifier()
            }
            _ => Err(self.unexpected()),
        }
    }

    fn identifier(&mut self) -> Result<Text> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_ident_continue(b)) {
            self.pos += 1;
        }
        self.span_text(start, self.pos)
    }

    // Strings

    fn string(&mut self) -> Result<Text> {
        let quote = self.peek().unwrap_or(b'"');
        self.pos += 1;
        let start = self.pos;

        loop {
            match self.peek() {
                None => {
                    return Err(self.fail_with(ParseErrorCode::UnexpectedEnd, "unclosed string"))
                }
                Some(b) if b == quote => {
                    let text = self.span_text(start, self.pos)?;
                    self.pos += 1;
                    return Ok(text);
                }
                Some(b'\\') => break,
                Some(b) if b < 0x20 => {
                    return Err(self.fail_with(
                        ParseErrorCode::InvalidString,
                        "unexpected control character in string",
                    ))
                }
                Some(_) => self.pos += 1,
            }
        }

        let input = self.input;
        let mut buf = input[start..self.pos].to_vec();
        loop {
            match self.peek() {
                None => {
                    return Err(self.fail_with(ParseErrorCode::UnexpectedEnd, "unclosed string"))
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => self.escape(quote, &mut buf)?,
                Some(b) if b < 0x20 => {
                    return Err(self.fail_with(
                        ParseErrorCode::InvalidString,
                        "unexpected control character in string",
                    ))
                }
                Some(b) => {
                    buf.push(b);
                    self.pos += 1;
                }
            }
        }

        let text = match String::from_utf8(buf) {
            Ok(text) => text,
            Err(err) if self.allows(ReadOptions::ALLOW_INVALID_UNICODE) => {
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
            Err(_) => {
                return Err(self.fail_with(ParseErrorCode::InvalidString, "invalid UTF-8"));
            }
        };
        self.owned.push(text);
        Ok(Text::Owned(self.owned.len() - 1))
    }

    fn span_text(&mut self, start: usize, end: usize) -> Result<Text> {
        let input = self.input;
        let bytes = &input[start..end];
        if std::str::from_utf8(bytes).is_ok() {
            return Ok(Text::Span { start, end });
        }
        if !self.allows(ReadOptions::ALLOW_INVALID_UNICODE) {
            return Err(Error::parse_with(
                ParseErrorCode::InvalidString,
                start,
                "invalid UTF-8",
            ));
        }
        self.owned.push(String::from_utf8_lossy(bytes).into_owned());
        Ok(Text::Owned(self.owned.len() - 1))
    }

    fn escape(&mut self, quote: u8, buf: &mut Vec<u8>) -> Result<()> {
        let extended = self.allows(ReadOptions::ALLOW_EXTENDED_ESCAPES);
        self.pos += 1;
        let Some(b) = self.peek() else {
            return Err(self.fail_with(ParseErrorCode::UnexpectedEnd, "unclosed string"));
        };
        self.pos += 1;

        match b {
            b'"' => buf.push(b'"'),
            b'\\' => buf.push(b'\\'),
            b'/' => buf.push(b'/'),
            b'b' => buf.push(0x08),
            b'f' => buf.push(0x0C),
            b'n' => buf.push(b'\n'),
            b'r' => buf.push(b'\r'),
            b't' => buf.push(b'\t'),
            b'u' => {
                let ch = self.unicode_escape()?;
                push_char(buf, ch);
            }
            b'\'' if extended || quote == b'\'' => buf.push(b'\''),
            _ if !extended => {
                self.pos -= 1;
                return Err(self.fail_with(
                    ParseErrorCode::InvalidString,
                    "invalid escaped character",
                ));
            }
            b'v' => buf.push(0x0B),
            b'0' if !matches!(self.peek(), Some(b'0'..=b'9')) => buf.push(0),
            b'1'..=b'9' | b'0' => {
                self.pos -= 1;
                return Err(self.fail_with(
                    ParseErrorCode::InvalidString,
                    "octal escapes are not allowed",
                ));
            }
            b'x' => {
                let value = self.hex_digits(2)?;
                push_char(buf, char::from(value as u8));
            }
            b'\n' => {}
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            0xE2 if self.peek() == Some(0x80) && matches!(self.peek_at(1), Some(0xA8 | 0xA9)) => {
                self.pos += 2;
            }
            _ => {
                // Identity escape: copy the escaped character as-is.
                let len = utf8_len(b);
                buf.push(b);
                for _ in 1..len {
                    match self.peek() {
                        Some(next) => {
                            buf.push(next);
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
            }
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self
                .peek()
                .and_then(|b| char::from(b).to_digit(16))
                .ok_or_else(|| {
                    self.fail_with(ParseErrorCode::InvalidString, "invalid hex escape")
                })?;
            value = value * 16 + digit;
            self.pos += 1;
        }
        Ok(value)
    }

    fn unicode_escape(&mut self) -> Result<char> {
        let lossy = self.allows(ReadOptions::ALLOW_INVALID_UNICODE);
        let unit = self.hex_digits(4)?;
        match unit {
            0xD800..=0xDBFF => {
                if self.peek() == Some(b'\\') && self.peek_at(1) == Some(b'u') {
                    let save = self.pos;
                    self.pos += 2;
                    let low = self.hex_digits(4)?;
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        return char::from_u32(code).ok_or_else(|| {
                            self.fail_with(ParseErrorCode::InvalidString, "invalid surrogate pair")
                        });
                    }
                    self.pos = save;
                }
                if lossy {
                    Ok(char::REPLACEMENT_CHARACTER)
                } else {
                    Err(self.fail_with(ParseErrorCode::InvalidString, "lone high surrogate"))
                }
            }
            0xDC00..=0xDFFF => {
                if lossy {
                    Ok(char::REPLACEMENT_CHARACTER)
                } else {
                    Err(self.fail_with(ParseErrorCode::InvalidString, "lone low surrogate"))
                }
            }
            _ => char::from_u32(unit)
                .ok_or_else(|| self.fail_with(ParseErrorCode::InvalidString, "invalid escape")),
        }
    }

    // Numbers

    fn number(&mut self) -> Result<usize> {
        let start = self.pos;
        let extended = self.allows(ReadOptions::ALLOW_EXTENDED_NUMBERS);

        let mut negative = false;
        match self.peek() {
            Some(b'-') => {
                negative = true;
                self.pos += 1;
            }
            Some(b'+') if extended => self.pos += 1,
            _ => {}
        }

        if self.allows(ReadOptions::ALLOW_INF_AND_NAN) {
            if let Some(value) = self.non_finite() {
                let value = if negative { -value } else { value };
                if self.allows(ReadOptions::NUMBER_AS_RAW) {
                    return Ok(self.push(Slot::Raw(Text::Span {
                        start,
                        end: self.pos,
                    })));
                }
                return Ok(self.push(Slot::Number(Number::Float(value))));
            }
        }

        if extended
            && self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x' | b'X'))
        {
            return self.hex_number(start, negative);
        }

        let mut is_float = false;
        let int_start = self.pos;
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.fail_with(
                        ParseErrorCode::InvalidNumber,
                        "leading zeros are not allowed",
                    ));
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            Some(b'.') if extended => {}
            _ => {
                return Err(self.fail_with(ParseErrorCode::InvalidNumber, "no digit after sign"))
            }
        }
        let has_int_digits = self.pos > int_start;

        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            let frac_start = self.pos;
            self.skip_digits();
            if self.pos == frac_start && !(extended && has_int_digits) {
                return Err(self.fail_with(
                    ParseErrorCode::InvalidNumber,
                    "no digit after decimal point",
                ));
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            self.skip_digits();
            if self.pos == exp_start {
                return Err(self.fail_with(
                    ParseErrorCode::InvalidNumber,
                    "no digit after exponent sign",
                ));
            }
        }

        let end = self.pos;
        if self.allows(ReadOptions::NUMBER_AS_RAW) {
            return Ok(self.push(Slot::Raw(Text::Span { start, end })));
        }

        let input = self.input;
        let literal = std::str::from_utf8(&input[start..end]).unwrap_or_default();
        if !is_float {
            let digits = &literal[int_start - start..];
            if let Ok(magnitude) = digits.parse::<u64>() {
                if let Some(number) = signed_integer(magnitude, negative) {
                    return Ok(self.push(Slot::Number(number)));
                }
            }
            if self.allows(ReadOptions::BIG_NUMBER_AS_RAW) {
                return Ok(self.push(Slot::Raw(Text::Span { start, end })));
            }
        }

        let value: f64 = literal
            .parse()
            .map_err(|_| Error::parse(ParseErrorCode::InvalidNumber, start))?;
        if value.is_infinite() {
            if self.allows(ReadOptions::BIG_NUMBER_AS_RAW) {
                return Ok(self.push(Slot::Raw(Text::Span { start, end })));
            }
            if !self.allows(ReadOptions::ALLOW_INF_AND_NAN) {
                return Err(Error::parse_with(
                    ParseErrorCode::InvalidNumber,
                    start,
                    "number is out of range",
                ));
            }
        }
        Ok(self.push(Slot::Number(Number::Float(value))))
    }

    fn hex_number(&mut self, start: usize, negative: bool) -> Result<usize> {
        self.pos += 2;
        let digits_start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err(self.fail_with(ParseErrorCode::InvalidNumber, "no digit after 0x"));
        }
        let end = self.pos;
        if self.allows(ReadOptions::NUMBER_AS_RAW) {
            return Ok(self.push(Slot::Raw(Text::Span { start, end })));
        }

        let input = self.input;
        let digits = std::str::from_utf8(&input[digits_start..end]).unwrap_or_default();
        match u64::from_str_radix(digits, 16)
            .ok()
            .and_then(|magnitude| signed_integer(magnitude, negative))
        {
            Some(number) => Ok(self.push(Slot::Number(number))),
            None if self.allows(ReadOptions::BIG_NUMBER_AS_RAW) => {
                Ok(self.push(Slot::Raw(Text::Span { start, end })))
            }
            None => Err(Error::parse_with(
                ParseErrorCode::InvalidNumber,
                start,
                "hex number is out of range",
            )),
        }
    }

    fn non_finite(&mut self) -> Option<f64> {
        let rest = self.rest();
        let matches = |word: &[u8]| {
            rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word)
        };
        let (len, value) = if matches(b"infinity") {
            (8, f64::INFINITY)
        } else if matches(b"inf") {
            (3, f64::INFINITY)
        } else if matches(b"nan") {
            (3, f64::NAN)
        } else {
            return None;
        };
        self.pos += len;
        Some(value)
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }
}

/// `-0` is kept as a float so that its sign survives.
fn signed_integer(magnitude: u64, negative: bool) -> Option<Number> {
    if !negative {
        return Some(Number::PosInt(magnitude));
    }
    if magnitude == 0 {
        return Some(Number::Float(-0.0));
    }
    let value = -i128::from(magnitude);
    i64::try_from(value).ok().map(Number::NegInt)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn utf8_len(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

fn push_char(buf: &mut Vec<u8>, ch: char) {
    let mut tmp = [0u8; 4];
    buf.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
}

/// Length of the JSON5 whitespace sequence at the start of `bytes`.
fn extended_whitespace_len(bytes: &[u8]) -> Option<usize> {
    match bytes {
        [0x0B | 0x0C, ..] => Some(1),
        [0xC2, 0xA0, ..] => Some(2),
        [0xE1, 0x9A, 0x80, ..] => Some(3),
        [0xE2, 0x80, 0x80..=0x8A | 0xA8 | 0xA9 | 0xAF, ..] => Some(3),
        [0xE2, 0x81, 0x9F, ..] => Some(3),
        [0xE3, 0x80, 0x80, ..] => Some(3),
        [0xEF, 0xBB, 0xBF, ..] => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, NodeKind};
    use crate::error::{Error, ParseErrorCode};
    use crate::number::Number;
    use crate::options::ReadOptions;

    fn parse(input: &str) -> Document {
        Document::parse_str(input, ReadOptions::DEFAULT).unwrap()
    }

    fn parse_with(input: &str, options: ReadOptions) -> Document {
        Document::parse_str(input, options).unwrap()
    }

    fn code(input: &[u8], options: ReadOptions) -> ParseErrorCode {
        match Document::parse(input, options) {
            Err(Error::Parse { code, .. }) => code,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_scalars() {
        assert!(parse("null").root().unwrap().is_null());
        assert_eq!(parse(" true ").root().unwrap().as_bool(), Some(true));
        assert_eq!(parse("\"hi\"").root().unwrap().as_str(), Some("hi"));
    }

    #[test]
    fn test_integer_representation() {
        let doc = parse("[0, 42, -7, 18446744073709551615, -9223372036854775808, 1.5, 1e3, -0]");
        let nums: Vec<_> = doc
            .root_array()
            .unwrap()
            .iter()
            .map(|n| n.as_number().unwrap())
            .collect();
        assert_eq!(nums[0], Number::PosInt(0));
        assert_eq!(nums[1], Number::PosInt(42));
        assert_eq!(nums[2], Number::NegInt(-7));
        assert_eq!(nums[3], Number::PosInt(u64::MAX));
        assert_eq!(nums[4], Number::NegInt(i64::MIN));
        assert_eq!(nums[5], Number::Float(1.5));
        assert_eq!(nums[6], Number::Float(1000.0));
        assert!(matches!(nums[7], Number::Float(f) if f == 0.0 && f.is_sign_negative()));
    }

    #[test]
    fn test_big_integers_fall_back_to_float_or_raw() {
        let doc = parse("18446744073709551616");
        assert_eq!(
            doc.root().unwrap().as_number(),
            Some(Number::Float(18446744073709551616.0))
        );

        let doc = parse_with("123456789012345678901234567890", ReadOptions::BIG_NUMBER_AS_RAW);
        let root = doc.root().unwrap();
        assert_eq!(root.kind(), NodeKind::Raw);
        assert_eq!(root.as_raw(), Some("123456789012345678901234567890"));

        let doc = parse_with("[1, 1e999]", ReadOptions::BIG_NUMBER_AS_RAW);
        let array = doc.root_array().unwrap();
        assert_eq!(array.get(0).unwrap().as_u64(), Some(1));
        assert_eq!(array.get(1).unwrap().as_raw(), Some("1e999"));
    }

    #[test]
    fn test_number_as_raw_keeps_literal_text() {
        let doc = parse_with("[1, -2.50, 3e2]", ReadOptions::NUMBER_AS_RAW);
        let raw: Vec<_> = doc
            .root_array()
            .unwrap()
            .iter()
            .map(|n| n.as_raw().unwrap())
            .collect();
        assert_eq!(raw, vec!["1", "-2.50", "3e2"]);
    }

    #[test]
    fn test_overflowing_float_is_rejected_by_default() {
        assert_eq!(code(b"1e999", ReadOptions::DEFAULT), ParseErrorCode::InvalidNumber);
        let doc = parse_with("1e999", ReadOptions::ALLOW_INF_AND_NAN);
        assert_eq!(doc.root().unwrap().as_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn test_malformed_numbers() {
        for input in ["01", "-", "1.", ".5", "1e", "+1", "0x10", "1.e3"] {
            assert_eq!(
                code(input.as_bytes(), ReadOptions::DEFAULT),
                if input == "+1" || input == ".5" {
                    ParseErrorCode::UnexpectedCharacter
                } else if input == "0x10" {
                    ParseErrorCode::UnexpectedContent
                } else {
                    ParseErrorCode::InvalidNumber
                },
                "input {input}"
            );
        }
    }

    #[test]
    fn test_extended_numbers() {
        let doc = parse_with(
            "[0x1F, -0XfF, +3, .5, 5., +.25]",
            ReadOptions::ALLOW_EXTENDED_NUMBERS,
        );
        let nums: Vec<_> = doc
            .root_array()
            .unwrap()
            .iter()
            .map(|n| n.as_number().unwrap())
            .collect();
        assert_eq!(
            nums,
            vec![
                Number::PosInt(31),
                Number::NegInt(-255),
                Number::PosInt(3),
                Number::Float(0.5),
                Number::Float(5.0),
                Number::Float(0.25),
            ]
        );
    }

    #[test]
    fn test_inf_and_nan_literals() {
        assert_eq!(code(b"NaN", ReadOptions::DEFAULT), ParseErrorCode::UnexpectedCharacter);
        let doc = parse_with("[Infinity, -inf, NaN, nan, null]", ReadOptions::ALLOW_INF_AND_NAN);
        let array = doc.root_array().unwrap();
        assert_eq!(array.get(0).unwrap().as_f64(), Some(f64::INFINITY));
        assert_eq!(array.get(1).unwrap().as_f64(), Some(f64::NEG_INFINITY));
        assert!(array.get(2).unwrap().as_f64().unwrap().is_nan());
        assert!(array.get(3).unwrap().as_f64().unwrap().is_nan());
        assert!(array.get(4).unwrap().is_null());
    }

    #[test]
    fn test_string_escapes() {
        let doc = parse(r#""a\"b\\c\/d\b\f\n\r\té😀""#);
        assert_eq!(
            doc.root().unwrap().as_str(),
            Some("a\"b\\c/d\u{8}\u{c}\n\r\té😀")
        );
        assert_eq!(code(br#""\q""#, ReadOptions::DEFAULT), ParseErrorCode::InvalidString);
        assert_eq!(code(b"\"a\nb\"", ReadOptions::DEFAULT), ParseErrorCode::InvalidString);
        assert_eq!(code(br#""abc"#, ReadOptions::DEFAULT), ParseErrorCode::UnexpectedEnd);
    }

    #[test]
    fn test_lone_surrogates() {
        assert_eq!(code(br#""\ud800""#, ReadOptions::DEFAULT), ParseErrorCode::InvalidString);
        let doc = parse_with(r#""x\ud800y""#, ReadOptions::ALLOW_INVALID_UNICODE);
        assert_eq!(doc.root().unwrap().as_str(), Some("x\u{FFFD}y"));
    }

    #[test]
    fn test_invalid_utf8() {
        let input = b"\"ab\xFFcd\"";
        assert_eq!(code(input, ReadOptions::DEFAULT), ParseErrorCode::InvalidString);
        let doc = Document::parse(input, ReadOptions::ALLOW_INVALID_UNICODE).unwrap();
        assert_eq!(doc.root().unwrap().as_str(), Some("ab\u{FFFD}cd"));
    }

    #[test]
    fn test_extended_escapes() {
        let doc = parse_with(
            "\"\\'\\v\\0\\x41\\q\\\nz\"",
            ReadOptions::ALLOW_EXTENDED_ESCAPES,
        );
        assert_eq!(doc.root().unwrap().as_str(), Some("'\u{b}\0Aqz"));
        assert_eq!(
            code(br#""\01""#, ReadOptions::ALLOW_EXTENDED_ESCAPES),
            ParseErrorCode::InvalidString
        );
    }

    #[test]
    fn test_single_quotes_and_unquoted_keys() {
        let options = ReadOptions::ALLOW_SINGLE_QUOTED_STRINGS | ReadOptions::ALLOW_UNQUOTED_KEYS;
        let doc = parse_with("{name: 'it\\'s', $id_2: \"x\", 'k': 1}", options);
        let object = doc.root_object().unwrap();
        assert_eq!(object.get("name").and_then(|n| n.as_str()), Some("it's"));
        assert_eq!(object.get("$id_2").and_then(|n| n.as_str()), Some("x"));
        assert_eq!(object.get("k").and_then(|n| n.as_u64()), Some(1));
    }

    #[test]
    fn test_comments() {
        let input = "// leading\n{ /* inline */ \"a\": 1 // trailing\n}";
        assert_eq!(
            code(input.as_bytes(), ReadOptions::DEFAULT),
            ParseErrorCode::UnexpectedCharacter
        );
        let doc = parse_with(input, ReadOptions::ALLOW_COMMENTS);
        assert_eq!(doc.root().unwrap().get("a").and_then(|n| n.as_u64()), Some(1));
        assert_eq!(
            code(b"[1] /* open", ReadOptions::ALLOW_COMMENTS),
            ParseErrorCode::InvalidComment
        );
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(code(b"[1,]", ReadOptions::DEFAULT), ParseErrorCode::UnexpectedCharacter);
        let doc = parse_with("[1, 2,]", ReadOptions::ALLOW_TRAILING_COMMAS);
        assert_eq!(doc.root_array().unwrap().len(), 2);
        let doc = parse_with("{\"a\": 1,}", ReadOptions::ALLOW_TRAILING_COMMAS);
        assert_eq!(doc.root_object().unwrap().len(), 1);
        assert!(Document::parse(b"[,]", ReadOptions::ALLOW_TRAILING_COMMAS).is_err());
    }

    #[test]
    fn test_relaxed_object_gating() {
        assert!(Document::parse(b"{a:1,}", ReadOptions::DEFAULT).is_err());
        let doc = parse_with("{a:1,}", ReadOptions::JSON5);
        assert_eq!(doc.root().unwrap().get("a").and_then(|n| n.as_u64()), Some(1));
    }

    #[test]
    fn test_extended_whitespace() {
        let input = "\u{FEFF}[\u{a0}1,\u{2028}2\u{3000}]\u{b}";
        assert!(Document::parse_str(input, ReadOptions::DEFAULT).is_err());
        let doc = parse_with(input, ReadOptions::ALLOW_EXTENDED_WHITESPACE);
        assert_eq!(doc.root_array().unwrap().len(), 2);
    }

    #[test]
    fn test_bom() {
        let input = b"\xEF\xBB\xBF{}";
        assert_eq!(code(input, ReadOptions::DEFAULT), ParseErrorCode::UnexpectedCharacter);
        let doc = Document::parse(input, ReadOptions::ALLOW_BOM).unwrap();
        assert!(doc.root_object().unwrap().is_empty());
    }

    #[test]
    fn test_trailing_content_and_stop_when_done() {
        assert_eq!(code(b"{} {}", ReadOptions::DEFAULT), ParseErrorCode::UnexpectedContent);
        let doc = parse_with("[1] garbage", ReadOptions::STOP_WHEN_DONE);
        assert_eq!(doc.root_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_and_truncated_input() {
        assert_eq!(code(b"", ReadOptions::DEFAULT), ParseErrorCode::EmptyContent);
        assert_eq!(code(b"  \n ", ReadOptions::DEFAULT), ParseErrorCode::EmptyContent);
        assert_eq!(code(b"[1, 2", ReadOptions::DEFAULT), ParseErrorCode::UnexpectedEnd);
        assert_eq!(code(b"{\"a\" 1}", ReadOptions::DEFAULT), ParseErrorCode::UnexpectedCharacter);
        assert_eq!(code(b"tru", ReadOptions::DEFAULT), ParseErrorCode::Literal);
        assert_eq!(code(b"nul", ReadOptions::DEFAULT), ParseErrorCode::Literal);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(super::MAX_DEPTH), "]".repeat(super::MAX_DEPTH));
        assert!(Document::parse_str(&deep, ReadOptions::DEFAULT).is_ok());

        let too_deep = format!(
            "{}{}",
            "[".repeat(super::MAX_DEPTH + 1),
            "]".repeat(super::MAX_DEPTH + 1)
        );
        assert_eq!(
            code(too_deep.as_bytes(), ReadOptions::DEFAULT),
            ParseErrorCode::JsonStructure
        );
    }

    #[test]
    fn test_error_position() {
        match Document::parse(b"[1, x]", ReadOptions::DEFAULT) {
            Err(Error::Parse { position, .. }) => assert_eq!(position, 4),
            other => panic!("unexpected {other:?}"),
        }
    }
}
