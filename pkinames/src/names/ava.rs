//! Attribute value assertions (`keyword=value` pairs) and their textual grammar.
//!
//! An [`AttributeTypeAndValue`] is parsed from a single AVA substring (RDN and DN splitting happens
//! elsewhere) in one of the three [`DnFormat`] dialects and can be rendered in each of them. The
//! RFC 2253 canonical rendering is used for equality and hashing.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::OnceLock;

use const_oid::db::rfc3280::EMAIL_ADDRESS;
use const_oid::db::rfc4519::DOMAIN_COMPONENT;
use der::asn1::ObjectIdentifier;
use der::{Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Writer};
use log::debug;
use subtle_encoding::hex;
use unicode_normalization::UnicodeNormalization;

use crate::names::attribute_value::*;
use crate::names::keywords::{DnFormat, KeywordRegistry, StringMap};
use crate::{Error, Result};

/// Characters that may be escaped in a quoted RFC 1779 value
const SPECIAL_CHARS_1779: &str = ",=\n+<>#;\\\"";
/// Characters that may be escaped in an RFC 2253 value
const SPECIAL_CHARS_2253: &str = ",=+<>#;\\\"";
/// Characters that must be escaped in an RFC 2253 value. A leading `#` introduces a hex value
/// before the string parser is reached, so `#` may appear unescaped elsewhere.
const ESCAPED_2253: &str = ",=+<>;\\\"";
/// Characters that may be escaped in a value in the loose dialect
const SPECIAL_CHARS_DEFAULT: &str = ",=\n+<>#;\\\" ";
/// Characters that must not appear unescaped outside quotes in the loose and RFC 1779 dialects
const ESCAPED_DEFAULT: &str = ",+<>;\"";

/// `AttributeTypeAndValue` pairs an attribute type OID with a DER encoded value.
///
/// Instances are immutable. Equality and hashing use the RFC 2253 canonical form, which is computed
/// on first use and cached.
#[derive(Clone, Debug)]
pub struct AttributeTypeAndValue {
    oid: ObjectIdentifier,
    value: AttributeValue,
    canonical: OnceLock<String>,
}

struct CharCursor {
    chars: Vec<char>,
    pos: usize,
}

impl CharCursor {
    fn new(s: &str) -> Self {
        CharCursor {
            chars: s.chars().collect(),
            pos: 0,
        }
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn rest(&self) -> &[char] {
        &self.chars[self.pos..]
    }
}

fn read_char(cursor: &mut CharCursor, msg: &str) -> Result<char> {
    match cursor.next() {
        Some(c) => Ok(c),
        None => {
            debug!("{}", msg);
            Err(Error::MalformedDnString)
        }
    }
}

/// Returns the byte for a `\xx` escape when `first` is a hex digit, consuming the second digit.
fn embedded_hex_pair(first: char, cursor: &mut CharCursor) -> Result<Option<u8>> {
    let hi = match first.to_digit(16) {
        Some(hi) => hi,
        None => return Ok(None),
    };
    let lo = match cursor.next().and_then(|c| c.to_digit(16)) {
        Some(lo) => lo,
        None => {
            debug!("escaped hex value must include two valid digits");
            return Err(Error::InvalidEscape);
        }
    };
    Ok(Some((hi * 16 + lo) as u8))
}

fn flush_embedded_hex(embedded: &mut Vec<u8>, out: &mut String) -> Result<()> {
    if embedded.is_empty() {
        return Ok(());
    }
    match String::from_utf8(core::mem::take(embedded)) {
        Ok(s) => {
            out.push_str(&s);
            Ok(())
        }
        Err(_) => {
            debug!("escaped hex pairs do not form valid UTF-8");
            Err(Error::InvalidEscape)
        }
    }
}

/// Returns true if only spaces (escaped or not) remain
fn trailing_space(rest: &[char]) -> bool {
    let mut iter = rest.iter();
    while let Some(c) = iter.next() {
        match c {
            ' ' => continue,
            '\\' => {
                if iter.next() != Some(&' ') {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

fn push_spaces(out: &mut String, count: &mut usize) {
    for _ in 0..*count {
        out.push(' ');
    }
    *count = 0;
}

fn hex_string(data: &[u8], upper: bool) -> String {
    let encoded = if upper {
        hex::encode_upper(data)
    } else {
        hex::encode(data)
    };
    String::from_utf8(encoded).unwrap_or_default()
}

impl AttributeTypeAndValue {
    /// Creates an AVA from an attribute type and a DER encoded value
    pub fn new(oid: ObjectIdentifier, value: AttributeValue) -> Self {
        AttributeTypeAndValue {
            oid,
            value,
            canonical: OnceLock::new(),
        }
    }

    /// Creates an AVA with a string value, choosing PrintableString when every character permits
    /// it and UTF8String otherwise. Email address and domain component values are always IA5String.
    pub fn from_string(oid: ObjectIdentifier, value: &str) -> Result<Self> {
        let printable = value.chars().all(is_printable_string_char);
        Ok(Self::new(oid, string_value_for(&oid, value, printable)?))
    }

    /// Parses one `keyword=value` assertion in the given dialect. `keywords` maps additional
    /// upper case keywords to dotted OIDs.
    pub fn parse(s: &str, format: DnFormat, keywords: &StringMap) -> Result<Self> {
        let eq = match s.find('=') {
            Some(eq) => eq,
            None => {
                debug!("Incorrect AVA format: {}", s);
                return Err(Error::MalformedDnString);
            }
        };
        let oid = KeywordRegistry::standard().keyword_to_oid(&s[..eq], format, keywords)?;

        let mut cursor = CharCursor::new(&s[eq + 1..]);
        let first = if format == DnFormat::Rfc2253 {
            let c = cursor.next();
            if c == Some(' ') {
                debug!("Incorrect AVA RFC2253 format - leading space must be escaped");
                return Err(Error::MalformedDnString);
            }
            c
        } else {
            loop {
                match cursor.next() {
                    Some(' ') | Some('\n') => continue,
                    other => break other,
                }
            }
        };

        let value = match first {
            None => AttributeValue::from_str_with_tag(TAG_PRINTABLE_STRING, "")?,
            Some('#') => parse_hex_string(&mut cursor)?,
            Some('"') if format != DnFormat::Rfc2253 => parse_quoted_string(&oid, &mut cursor)?,
            Some(c) => parse_string(&oid, c, &mut cursor, format)?,
        };
        Ok(Self::new(oid, value))
    }

    /// Attribute type
    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    /// Attribute value
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Attribute value as a string, if the value is one of the string types
    pub fn value_string(&self) -> Option<String> {
        self.value.as_string()
    }

    /// Returns true if the attribute type has a keyword defined by RFC 2253
    pub fn has_rfc2253_keyword(&self) -> bool {
        KeywordRegistry::standard().has_keyword(&self.oid, DnFormat::Rfc2253)
    }

    fn keyword(&self, format: DnFormat, oid_map: &StringMap) -> Result<String> {
        KeywordRegistry::standard().oid_to_keyword(&self.oid, format, oid_map)
    }

    /// Renders the AVA in RFC 1779 form. `oid_map` maps dotted OIDs to alternate keywords.
    pub fn to_rfc1779_string(&self, oid_map: &StringMap) -> Result<String> {
        Ok(self.to_keyword_value_string(&self.keyword(DnFormat::Rfc1779, oid_map)?))
    }

    /// Renders the AVA in the loose dialect with alternate keywords from `oid_map`
    pub fn to_string_with_oid_map(&self, oid_map: &StringMap) -> Result<String> {
        Ok(self.to_keyword_value_string(&self.keyword(DnFormat::Default, oid_map)?))
    }

    fn to_keyword_value_string(&self, keyword: &str) -> String {
        let mut retval = format!("{}=", keyword);
        let val = match self.value.as_string() {
            Some(val) => val,
            None => {
                retval.push('#');
                retval.push_str(&hex_string(self.value.as_bytes(), true));
                return retval;
            }
        };

        // Leading or trailing whitespace, runs of whitespace and special characters force quoting.
        const ESCAPEES: &str = ",+=\n<>#;\\\"";
        let mut quote_needed = false;
        let mut previous_white = false;
        let mut sbuffer = String::with_capacity(val.len());
        for (i, c) in val.chars().enumerate() {
            if is_printable_string_char(c) || ESCAPEES.contains(c) {
                if !quote_needed && ((i == 0 && (c == ' ' || c == '\n')) || ESCAPEES.contains(c)) {
                    quote_needed = true;
                }
                if !(c == ' ' || c == '\n') {
                    if c == '"' || c == '\\' {
                        sbuffer.push('\\');
                    }
                    previous_white = false;
                } else {
                    if !quote_needed && previous_white {
                        quote_needed = true;
                    }
                    previous_white = true;
                }
                sbuffer.push(c);
            } else {
                previous_white = false;
                sbuffer.push(c);
            }
        }
        if sbuffer.ends_with(' ') || sbuffer.ends_with('\n') {
            quote_needed = true;
        }

        if quote_needed {
            retval.push('"');
            retval.push_str(&sbuffer);
            retval.push('"');
        } else {
            retval.push_str(&sbuffer);
        }
        retval
    }

    /// Renders the AVA in RFC 2253 form. `oid_map` maps dotted OIDs to alternate keywords.
    ///
    /// Values that are not strings, and values of attribute types without an RFC 2253 keyword,
    /// are rendered as `#` followed by the hex encoding of the DER value.
    pub fn to_rfc2253_string(&self, oid_map: &StringMap) -> Result<String> {
        let keyword = self.keyword(DnFormat::Rfc2253, oid_map)?;
        let mut type_and_value = format!("{}=", keyword);

        let val = if keyword.starts_with(|c: char| c.is_ascii_digit())
            || !self.value.is_directory_string(false)
        {
            None
        } else {
            self.value.as_string()
        };
        let val = match val {
            Some(val) => val,
            None => {
                type_and_value.push('#');
                type_and_value.push_str(&hex_string(self.value.as_bytes(), false));
                return Ok(type_and_value);
            }
        };

        const ESCAPEES: &str = ",=+<>#;\"\\";
        let chars: Vec<char> = val.chars().collect();
        let lead = chars.iter().position(|c| *c != ' ').unwrap_or(chars.len());
        let trail = chars.iter().rposition(|c| *c != ' ');
        for (i, c) in chars.iter().enumerate() {
            let c = *c;
            let outside = i < lead || trail.map(|t| i > t).unwrap_or(true);
            if c == ' ' && outside {
                // only the first leading space may use the single character escape
                if i < lead && i > 0 {
                    type_and_value.push_str("\\20");
                } else {
                    type_and_value.push_str("\\ ");
                }
            } else if ESCAPEES.contains(c) {
                // '#' only needs escaping in the leading position
                if c != '#' || i == 0 {
                    type_and_value.push('\\');
                }
                type_and_value.push(c);
            } else if c == '\u{0}' {
                type_and_value.push_str("\\00");
            } else {
                type_and_value.push(c);
            }
        }
        Ok(type_and_value)
    }

    /// Returns the RFC 2253 canonical form: escaped, internal whitespace collapsed, trimmed, case
    /// folded and NFKD normalized.
    pub fn to_rfc2253_canonical_string(&self) -> &str {
        self.canonical.get_or_init(|| self.compute_canonical())
    }

    fn compute_canonical(&self) -> String {
        let keyword = self
            .keyword(DnFormat::Rfc2253, &StringMap::new())
            .unwrap_or_else(|_| self.oid.to_string());
        let mut type_and_value = format!("{}=", keyword);

        let val = if keyword.starts_with(|c: char| c.is_ascii_digit())
            || !self.value.is_directory_string(true)
        {
            None
        } else {
            self.value.as_string()
        };
        match val {
            None => {
                type_and_value.push('#');
                type_and_value.push_str(&hex_string(self.value.as_bytes(), false));
            }
            Some(val) => {
                const ESCAPEES: &str = ",+<>;\"\\";
                let mut sbuffer = String::with_capacity(val.len());
                let mut previous_white = false;
                for (i, c) in val.chars().enumerate() {
                    let leading_hash = i == 0 && c == '#';
                    if is_printable_string_char(c) || ESCAPEES.contains(c) || leading_hash {
                        if leading_hash || ESCAPEES.contains(c) {
                            sbuffer.push('\\');
                        }
                        if !c.is_whitespace() {
                            previous_white = false;
                            sbuffer.push(c);
                        } else if !previous_white {
                            previous_white = true;
                            sbuffer.push(c);
                        }
                    } else {
                        previous_white = false;
                        sbuffer.push(c);
                    }
                }
                type_and_value.push_str(sbuffer.trim());
            }
        }

        type_and_value
            .to_uppercase()
            .to_lowercase()
            .nfkd()
            .collect::<String>()
    }

    /// Ordering used to sort the members of a multi-valued RDN before rendering its canonical form.
    /// AVAs with RFC 2253 keywords sort first, by canonical string; the rest sort by OID arcs.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        match (self.has_rfc2253_keyword(), other.has_rfc2253_keyword()) {
            (true, true) => self
                .to_rfc2253_canonical_string()
                .cmp(other.to_rfc2253_canonical_string()),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.oid.arcs().cmp(other.oid.arcs()),
        }
    }
}

fn string_value_for(oid: &ObjectIdentifier, value: &str, printable: bool) -> Result<AttributeValue> {
    if *oid == EMAIL_ADDRESS || *oid == DOMAIN_COMPONENT {
        AttributeValue::from_str_with_tag(TAG_IA5_STRING, value)
    } else if printable {
        AttributeValue::from_str_with_tag(TAG_PRINTABLE_STRING, value)
    } else {
        AttributeValue::from_str_with_tag(TAG_UTF8_STRING, value)
    }
}

fn parse_hex_string(cursor: &mut CharCursor) -> Result<AttributeValue> {
    let mut bytes = Vec::new();
    let mut high: Option<u32> = None;
    let mut digits = 0;
    while let Some(c) = cursor.next() {
        if c == ' ' || c == '\n' {
            if cursor.rest().iter().any(|c| *c != ' ' && *c != '\n') {
                debug!("AVA parse, invalid hex digit following whitespace");
                return Err(Error::MalformedDnString);
            }
            break;
        }
        let v = match c.to_digit(16) {
            Some(v) => v,
            None => {
                debug!("AVA parse, invalid hex digit: {}", c);
                return Err(Error::MalformedDnString);
            }
        };
        match high.take() {
            Some(h) => bytes.push((h * 16 + v) as u8),
            None => high = Some(v),
        }
        digits += 1;
    }
    if digits == 0 {
        debug!("AVA parse, zero hex digits");
        return Err(Error::MalformedDnString);
    }
    if high.is_some() {
        debug!("AVA parse, odd number of hex digits");
        return Err(Error::MalformedDnString);
    }
    AttributeValue::from_der(&bytes).map_err(|e| {
        debug!("AVA parse, hex value is not a DER encoding: {:?}", e);
        Error::MalformedDer
    })
}

fn parse_quoted_string(oid: &ObjectIdentifier, cursor: &mut CharCursor) -> Result<AttributeValue> {
    const NO_CLOSE: &str = "Quoted string did not end in quote";
    let mut temp = String::new();
    let mut embedded_hex = Vec::new();
    let mut printable = true;

    let mut c = read_char(cursor, NO_CLOSE)?;
    while c != '"' {
        if c == '\\' {
            c = read_char(cursor, NO_CLOSE)?;
            if let Some(b) = embedded_hex_pair(c, cursor)? {
                printable = false;
                embedded_hex.push(b);
                c = read_char(cursor, NO_CLOSE)?;
                continue;
            }
            if !SPECIAL_CHARS_1779.contains(c) {
                debug!("Invalid escaped character in AVA: {}", c);
                return Err(Error::InvalidEscape);
            }
        }
        flush_embedded_hex(&mut embedded_hex, &mut temp)?;
        printable &= is_printable_string_char(c);
        temp.push(c);
        c = read_char(cursor, NO_CLOSE)?;
    }
    flush_embedded_hex(&mut embedded_hex, &mut temp)?;

    if cursor.rest().iter().any(|c| *c != ' ' && *c != '\n') {
        debug!("AVA had characters other than whitespace after terminating quote");
        return Err(Error::MalformedDnString);
    }
    string_value_for(oid, &temp, printable)
}

fn parse_string(
    oid: &ObjectIdentifier,
    first: char,
    cursor: &mut CharCursor,
    format: DnFormat,
) -> Result<AttributeValue> {
    let mut temp = String::new();
    let mut embedded_hex = Vec::new();
    let mut printable = true;
    let mut leading_char = true;
    let mut space_count = 0;

    let mut next = Some(first);
    while let Some(mut c) = next {
        let mut escape = false;
        if c == '\\' {
            escape = true;
            c = match cursor.next() {
                Some(c) => c,
                None => {
                    debug!("Invalid trailing backslash");
                    return Err(Error::InvalidEscape);
                }
            };
            if let Some(b) = embedded_hex_pair(c, cursor)? {
                printable = false;
                embedded_hex.push(b);
                next = cursor.next();
                leading_char = false;
                continue;
            }
            match format {
                DnFormat::Default => {
                    if !SPECIAL_CHARS_DEFAULT.contains(c) {
                        debug!("Invalid escaped character in AVA: '{}'", c);
                        return Err(Error::InvalidEscape);
                    }
                }
                DnFormat::Rfc2253 => {
                    if c == ' ' {
                        if !leading_char && !trailing_space(cursor.rest()) {
                            debug!("Invalid escaped space character in AVA. Only a leading or trailing space character can be escaped.");
                            return Err(Error::InvalidEscape);
                        }
                    } else if !SPECIAL_CHARS_2253.contains(c) {
                        debug!("Invalid escaped character in AVA: '{}'", c);
                        return Err(Error::InvalidEscape);
                    }
                }
                DnFormat::Rfc1779 => {}
            }
        } else {
            let reserved = match format {
                DnFormat::Rfc2253 => ESCAPED_2253,
                _ => ESCAPED_DEFAULT,
            };
            if reserved.contains(c) {
                debug!("Character '{}' in AVA appears without escape", c);
                return Err(Error::MalformedDnString);
            }
        }

        if !embedded_hex.is_empty() {
            push_spaces(&mut temp, &mut space_count);
            flush_embedded_hex(&mut embedded_hex, &mut temp)?;
        }

        printable &= is_printable_string_char(c);
        if c == ' ' && !escape {
            // unescaped trailing spaces are dropped
            space_count += 1;
        } else {
            push_spaces(&mut temp, &mut space_count);
            temp.push(c);
        }
        next = cursor.next();
        leading_char = false;
    }

    if format == DnFormat::Rfc2253 && space_count > 0 {
        debug!("Incorrect AVA RFC2253 format - trailing space must be escaped");
        return Err(Error::MalformedDnString);
    }
    if !embedded_hex.is_empty() {
        push_spaces(&mut temp, &mut space_count);
        flush_embedded_hex(&mut embedded_hex, &mut temp)?;
    }

    string_value_for(oid, &temp, printable)
}

impl PartialEq for AttributeTypeAndValue {
    fn eq(&self, other: &Self) -> bool {
        self.to_rfc2253_canonical_string() == other.to_rfc2253_canonical_string()
    }
}

impl Eq for AttributeTypeAndValue {}

impl Hash for AttributeTypeAndValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_rfc2253_canonical_string().hash(state);
    }
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self
            .keyword(DnFormat::Default, &StringMap::new())
            .unwrap_or_else(|_| format!("OID.{}", self.oid));
        write!(f, "{}", self.to_keyword_value_string(&keyword))
    }
}

impl<'a> DecodeValue<'a> for AttributeTypeAndValue {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let oid = ObjectIdentifier::decode(nested)?;
            let value = AttributeValue::read(nested)?;
            Ok(AttributeTypeAndValue::new(oid, value))
        })
    }
}

impl EncodeValue for AttributeTypeAndValue {
    fn value_len(&self) -> der::Result<Length> {
        self.oid.encoded_len()? + self.value.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.oid.encode(writer)?;
        self.value.encode(writer)
    }
}

impl Sequence<'_> for AttributeTypeAndValue {}

#[cfg(test)]
mod tests {
    use super::*;
    use const_oid::db::rfc4519::{COMMON_NAME, ORGANIZATION_NAME};
    use hex_literal::hex;

    fn parse(s: &str, format: DnFormat) -> Result<AttributeTypeAndValue> {
        AttributeTypeAndValue::parse(s, format, &StringMap::new())
    }

    #[test]
    fn hex_escapes_decode_to_utf8() {
        let ava = parse("CN=\\48\\65\\6c\\6c\\6f", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value_string().unwrap(), "Hello");
        // embedded hex always yields UTF8String
        assert_eq!(ava.value().tag(), TAG_UTF8_STRING);

        let ava = parse("CN=caf\\C3\\A9 bar", DnFormat::Default).unwrap();
        assert_eq!(ava.value_string().unwrap(), "caf\u{e9} bar");

        assert_eq!(
            parse("CN=\\C3", DnFormat::Default).unwrap_err(),
            Error::InvalidEscape
        );
        assert_eq!(
            parse("CN=a\\4", DnFormat::Default).unwrap_err(),
            Error::InvalidEscape
        );
    }

    #[test]
    fn value_type_selection() {
        let ava = parse("CN=Bob", DnFormat::Default).unwrap();
        assert_eq!(ava.value().tag(), TAG_PRINTABLE_STRING);
        let ava = parse("CN=Bob@example", DnFormat::Default).unwrap();
        assert_eq!(ava.value().tag(), TAG_UTF8_STRING);
        let ava = parse("EMAILADDRESS=bob@example.com", DnFormat::Default).unwrap();
        assert_eq!(ava.value().tag(), TAG_IA5_STRING);
        let ava = parse("DC=com", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value().tag(), TAG_IA5_STRING);
    }

    #[test]
    fn whitespace_handling() {
        let ava = parse(" cn =   Bob Smith  ", DnFormat::Default).unwrap();
        assert_eq!(ava.oid(), &COMMON_NAME);
        assert_eq!(ava.value_string().unwrap(), "Bob Smith");

        assert!(parse("CN= Bob", DnFormat::Rfc2253).is_err());
        assert!(parse("CN=Bob ", DnFormat::Rfc2253).is_err());
        let ava = parse("CN=\\ Bob\\ ", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value_string().unwrap(), " Bob ");
        assert_eq!(
            parse("CN=Bob\\ Smith", DnFormat::Rfc2253).unwrap_err(),
            Error::InvalidEscape
        );
    }

    #[test]
    fn quoted_values() {
        let ava = parse("O=\"Acme, Inc.\"", DnFormat::Rfc1779).unwrap();
        assert_eq!(ava.oid(), &ORGANIZATION_NAME);
        assert_eq!(ava.value_string().unwrap(), "Acme, Inc.");
        let ava = parse("O=\"say \\\"hi\\\"\"  ", DnFormat::Default).unwrap();
        assert_eq!(ava.value_string().unwrap(), "say \"hi\"");
        assert!(parse("O=\"unterminated", DnFormat::Default).is_err());
        assert!(parse("O=\"a\" b", DnFormat::Default).is_err());
        // RFC 2253 has no quoting
        assert!(parse("O=\"a\"", DnFormat::Rfc2253).is_err());
    }

    #[test]
    fn unescaped_reserved_characters() {
        assert_eq!(
            parse("CN=a;b", DnFormat::Rfc2253).unwrap_err(),
            Error::MalformedDnString
        );
        assert_eq!(
            parse("CN=a<b", DnFormat::Default).unwrap_err(),
            Error::MalformedDnString
        );
        let ava = parse("CN=a\\;b", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value_string().unwrap(), "a;b");
        // '#' may be escaped anywhere and needs no escape after the first position
        let ava = parse("CN=a\\#b", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value_string().unwrap(), "a#b");
        let ava = parse("CN=a#b#", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value_string().unwrap(), "a#b#");
        assert_eq!(
            ava.to_rfc2253_string(&StringMap::new()).unwrap(),
            "CN=a#b#"
        );
        assert_eq!(
            parse("CN=a\\qb", DnFormat::Default).unwrap_err(),
            Error::InvalidEscape
        );
        // RFC 1779 accepts any escaped character
        let ava = parse("CN=a\\qb", DnFormat::Rfc1779).unwrap();
        assert_eq!(ava.value_string().unwrap(), "aqb");
    }

    #[test]
    fn hex_values() {
        let ava = parse("2.5.4.3=#130548656c6c6f", DnFormat::Rfc2253).unwrap();
        assert_eq!(ava.value().as_bytes(), hex!("130548656C6C6F"));
        assert_eq!(ava.value_string().unwrap(), "Hello");
        assert_eq!(
            ava.to_rfc2253_string(&StringMap::new()).unwrap(),
            "CN=Hello"
        );

        assert!(parse("CN=#", DnFormat::Default).is_err());
        assert!(parse("CN=#130", DnFormat::Default).is_err());
        assert!(parse("CN=#13zz", DnFormat::Default).is_err());
        assert_eq!(
            parse("CN=#1305", DnFormat::Default).unwrap_err(),
            Error::MalformedDer
        );
    }

    #[test]
    fn rendering() {
        let none = StringMap::new();
        let ava = AttributeTypeAndValue::from_string(COMMON_NAME, "Acme, Inc.").unwrap();
        assert_eq!(ava.to_string(), "CN=\"Acme, Inc.\"");
        assert_eq!(ava.to_rfc1779_string(&none).unwrap(), "CN=\"Acme, Inc.\"");
        assert_eq!(ava.to_rfc2253_string(&none).unwrap(), "CN=Acme\\, Inc.");

        let ava = AttributeTypeAndValue::from_string(COMMON_NAME, "  two").unwrap();
        assert_eq!(ava.to_rfc2253_string(&none).unwrap(), "CN=\\ \\20two");
        let again = parse(&ava.to_rfc2253_string(&none).unwrap(), DnFormat::Rfc2253).unwrap();
        assert_eq!(again.value_string().unwrap(), "  two");

        let ava = AttributeTypeAndValue::from_string(EMAIL_ADDRESS, "a@b.com").unwrap();
        assert_eq!(ava.to_string(), "EMAILADDRESS=a@b.com");
        assert_eq!(
            ava.to_rfc2253_string(&none).unwrap(),
            "1.2.840.113549.1.9.1=#1607614062e636f6d"
        );
        assert_eq!(
            ava.to_rfc1779_string(&none).unwrap(),
            "OID.1.2.840.113549.1.9.1=a@b.com"
        );
    }

    #[test]
    fn canonical_equality() {
        let a = parse("CN=Bob  Smith", DnFormat::Default).unwrap();
        let b = parse("cn=\"bob smith\"", DnFormat::Default).unwrap();
        assert_eq!(a.to_rfc2253_canonical_string(), "cn=bob smith");
        assert_eq!(a, b);

        // UTF8String and PrintableString values compare equal when the text agrees
        let c = AttributeTypeAndValue::new(
            COMMON_NAME,
            AttributeValue::from_str_with_tag(TAG_UTF8_STRING, "BOB SMITH").unwrap(),
        );
        assert_eq!(a, c);

        // compatibility characters are decomposed
        let d = AttributeTypeAndValue::from_string(COMMON_NAME, "\u{FB01}le").unwrap();
        let e = AttributeTypeAndValue::from_string(COMMON_NAME, "file").unwrap();
        assert_eq!(d, e);
    }

    #[test]
    fn der_round_trip() {
        let der = hex!("300C06035504030C0548656C6C6F");
        let ava = AttributeTypeAndValue::from_der(&der).unwrap();
        assert_eq!(ava.oid(), &COMMON_NAME);
        assert_eq!(ava.value().tag(), TAG_UTF8_STRING);
        assert_eq!(ava.to_der().unwrap(), der.to_vec());

        // trailing data inside the SEQUENCE
        assert!(AttributeTypeAndValue::from_der(&hex!("300E06035504030C0548656C6C6F0500")).is_err());
    }
}
