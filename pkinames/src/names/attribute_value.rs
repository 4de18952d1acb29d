//! Attribute values carried as raw DER TLV bytes.
//!
//! The der crate's `Tag` cannot represent UniversalString (0x1C) or GeneralString (0x1B), both
//! of which appear in the wild as attribute values, so values are stored as raw tag-length-value
//! bytes and string conversion is performed here.

use der::{Decode, Encode, Length, Reader, SliceReader};
use log::debug;

use crate::{Error, Result};

/// UTF8String tag
pub const TAG_UTF8_STRING: u8 = 0x0C;
/// PrintableString tag
pub const TAG_PRINTABLE_STRING: u8 = 0x13;
/// T61String (TeletexString) tag
pub const TAG_T61_STRING: u8 = 0x14;
/// IA5String tag
pub const TAG_IA5_STRING: u8 = 0x16;
/// GeneralString tag
pub const TAG_GENERAL_STRING: u8 = 0x1B;
/// UniversalString tag
pub const TAG_UNIVERSAL_STRING: u8 = 0x1C;
/// BMPString tag
pub const TAG_BMP_STRING: u8 = 0x1E;

/// `AttributeValue` holds one DER encoded value (tag, length and content octets).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AttributeValue {
    raw: Vec<u8>,
    header_len: usize,
}

/// Returns true if the character is in the PrintableString repertoire
pub fn is_printable_string_char(c: char) -> bool {
    matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' | ' ' | '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' | ':'
        | '=' | '?')
}

impl AttributeValue {
    /// Builds a value from a tag byte and content octets
    pub fn new(tag: u8, content: &[u8]) -> Result<Self> {
        let len = Length::try_from(content.len())?.to_der()?;
        let mut raw = Vec::with_capacity(1 + len.len() + content.len());
        raw.push(tag);
        raw.extend_from_slice(&len);
        raw.extend_from_slice(content);
        Ok(AttributeValue {
            raw,
            header_len: 1 + len.len(),
        })
    }

    /// Builds a string value of the given string type
    pub fn from_str_with_tag(tag: u8, value: &str) -> Result<Self> {
        match tag {
            TAG_UTF8_STRING => Self::new(tag, value.as_bytes()),
            TAG_PRINTABLE_STRING => {
                if !value.chars().all(is_printable_string_char) {
                    return Err(Error::Asn1Error(
                        der::Tag::PrintableString.value_error(),
                    ));
                }
                Self::new(tag, value.as_bytes())
            }
            TAG_IA5_STRING => {
                if !value.is_ascii() {
                    return Err(Error::Asn1Error(der::Tag::Ia5String.value_error()));
                }
                Self::new(tag, value.as_bytes())
            }
            TAG_BMP_STRING => {
                let mut content = Vec::with_capacity(value.len() * 2);
                for unit in value.encode_utf16() {
                    content.extend_from_slice(&unit.to_be_bytes());
                }
                Self::new(tag, &content)
            }
            TAG_UNIVERSAL_STRING => {
                let mut content = Vec::with_capacity(value.len() * 4);
                for c in value.chars() {
                    content.extend_from_slice(&(c as u32).to_be_bytes());
                }
                Self::new(tag, &content)
            }
            _ => Err(Error::MalformedDer),
        }
    }

    /// Parses a complete TLV, rejecting high tag numbers and trailing bytes
    pub fn from_der(raw: &[u8]) -> Result<Self> {
        let tag = match raw.first() {
            Some(t) => *t,
            None => return Err(Error::MalformedDer),
        };
        if tag & 0x1F == 0x1F {
            debug!("Unsupported high tag number form in attribute value");
            return Err(Error::MalformedDer);
        }
        let mut reader = SliceReader::new(&raw[1..])?;
        let len = Length::decode(&mut reader)?;
        let header_len = 1 + usize::try_from(reader.position())?;
        reader.read_slice(len)?;
        if !reader.is_finished() {
            debug!("Attribute value has trailing data");
            return Err(Error::MalformedDer);
        }
        Ok(AttributeValue {
            raw: raw.to_vec(),
            header_len,
        })
    }

    /// Reads one TLV from the reader
    pub(crate) fn read<'a, R: Reader<'a>>(reader: &mut R) -> der::Result<Self> {
        let tag = reader.read_byte()?;
        if tag & 0x1F == 0x1F {
            return Err(der::ErrorKind::TagUnknown { byte: tag }.into());
        }
        let len = Length::decode(reader)?;
        let content = reader.read_slice(len)?;
        let len_bytes = len.to_der()?;
        let mut raw = Vec::with_capacity(1 + len_bytes.len() + content.len());
        raw.push(tag);
        raw.extend_from_slice(&len_bytes);
        raw.extend_from_slice(content);
        Ok(AttributeValue {
            raw,
            header_len: 1 + len_bytes.len(),
        })
    }

    /// The tag byte
    pub fn tag(&self) -> u8 {
        self.raw[0]
    }

    /// The content octets
    pub fn content(&self) -> &[u8] {
        &self.raw[self.header_len..]
    }

    /// The complete encoding
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Returns true if the value is one of the string types rendered as text. The canonical form
    /// only treats PrintableString and UTF8String values as text.
    pub fn is_directory_string(&self, canonical: bool) -> bool {
        if canonical {
            matches!(self.tag(), TAG_PRINTABLE_STRING | TAG_UTF8_STRING)
        } else {
            matches!(
                self.tag(),
                TAG_PRINTABLE_STRING
                    | TAG_T61_STRING
                    | TAG_IA5_STRING
                    | TAG_GENERAL_STRING
                    | TAG_BMP_STRING
                    | TAG_UTF8_STRING
            )
        }
    }

    /// Returns the value as a string for the string types, or None for any other value or when the
    /// content octets are not valid for the tag.
    pub fn as_string(&self) -> Option<String> {
        let content = self.content();
        match self.tag() {
            TAG_UTF8_STRING => String::from_utf8(content.to_vec()).ok(),
            TAG_PRINTABLE_STRING | TAG_IA5_STRING => {
                if content.is_ascii() {
                    String::from_utf8(content.to_vec()).ok()
                } else {
                    None
                }
            }
            TAG_T61_STRING | TAG_GENERAL_STRING => {
                Some(content.iter().map(|b| *b as char).collect())
            }
            TAG_BMP_STRING => {
                if content.len() % 2 != 0 {
                    return None;
                }
                let units: Vec<u16> = content
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&units).ok()
            }
            TAG_UNIVERSAL_STRING => {
                if content.len() % 4 != 0 {
                    return None;
                }
                content
                    .chunks(4)
                    .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
                    .collect()
            }
            _ => None,
        }
    }
}

impl Encode for AttributeValue {
    fn encoded_len(&self) -> der::Result<Length> {
        Length::try_from(self.raw.len())
    }

    fn encode(&self, writer: &mut impl der::Writer) -> der::Result<()> {
        writer.write(&self.raw)
    }
}
