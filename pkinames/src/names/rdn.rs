//! Relative distinguished names: sets of one or more attribute value assertions.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::OnceLock;

use der::asn1::ObjectIdentifier;
use der::{
    Decode, DecodeValue, Encode, EncodeValue, FixedTag, Header, Length, Reader, Tag, Writer,
};
use log::debug;

use crate::names::ava::AttributeTypeAndValue;
use crate::names::keywords::{DnFormat, StringMap};
use crate::{Error, Result};

/// Splits `s` at each occurrence of a separator character that is neither escaped by an odd run of
/// backslashes nor, when `track_quotes` is set, inside a quoted string.
pub(crate) fn split_unescaped<'a>(
    s: &'a str,
    separators: &[char],
    track_quotes: bool,
) -> Result<Vec<&'a str>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '"' && track_quotes {
            in_quotes = !in_quotes;
        } else if !in_quotes && separators.contains(&c) {
            pieces.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    if in_quotes {
        debug!("Unbalanced quotes in name string: {}", s);
        return Err(Error::MalformedDnString);
    }
    pieces.push(&s[start..]);
    Ok(pieces)
}

/// `RelativeDistinguishedName` is a non-empty set of [`AttributeTypeAndValue`] objects.
///
/// Members are kept in the order given (or parsed). DER encoding sorts them by their encodings and
/// the canonical form sorts them with [`AttributeTypeAndValue::canonical_cmp`], so two RDNs with the
/// same members in a different order are equal.
#[derive(Clone, Debug)]
pub struct RelativeDistinguishedName {
    avas: Vec<AttributeTypeAndValue>,
    canonical: OnceLock<String>,
}

impl RelativeDistinguishedName {
    /// Creates an RDN from one or more AVAs
    pub fn new(avas: Vec<AttributeTypeAndValue>) -> Result<Self> {
        if avas.is_empty() {
            debug!("RDN must contain at least one AVA");
            return Err(Error::InvalidName);
        }
        Ok(RelativeDistinguishedName {
            avas,
            canonical: OnceLock::new(),
        })
    }

    /// Parses an RDN string, splitting at unescaped `+` characters
    pub fn parse(s: &str, format: DnFormat, keywords: &StringMap) -> Result<Self> {
        let track_quotes = format != DnFormat::Rfc2253;
        let mut avas = vec![];
        for piece in split_unescaped(s, &['+'], track_quotes)? {
            if piece.trim().is_empty() {
                debug!("Empty AVA in RDN \"{}\"", s);
                return Err(Error::MalformedDnString);
            }
            avas.push(AttributeTypeAndValue::parse(piece, format, keywords)?);
        }
        Self::new(avas)
    }

    /// Members of the RDN
    pub fn avas(&self) -> &[AttributeTypeAndValue] {
        &self.avas
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.avas.len()
    }

    /// Always false, an RDN has at least one member
    pub fn is_empty(&self) -> bool {
        self.avas.is_empty()
    }

    /// Returns the first member with the given attribute type
    pub fn find_attribute(&self, oid: &ObjectIdentifier) -> Option<&AttributeTypeAndValue> {
        self.avas.iter().find(|ava| ava.oid() == oid)
    }

    /// Renders the RDN in RFC 1779 form, joining members with ` + `
    pub fn to_rfc1779_string(&self, oid_map: &StringMap) -> Result<String> {
        let parts = self
            .avas
            .iter()
            .map(|ava| ava.to_rfc1779_string(oid_map))
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join(" + "))
    }

    /// Renders the RDN in the loose dialect with alternate keywords from `oid_map`
    pub fn to_string_with_oid_map(&self, oid_map: &StringMap) -> Result<String> {
        let parts = self
            .avas
            .iter()
            .map(|ava| ava.to_string_with_oid_map(oid_map))
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join(" + "))
    }

    /// Renders the RDN in RFC 2253 form, joining members with `+`
    pub fn to_rfc2253_string(&self, oid_map: &StringMap) -> Result<String> {
        let parts = self
            .avas
            .iter()
            .map(|ava| ava.to_rfc2253_string(oid_map))
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join("+"))
    }

    /// Canonical form of the RDN with members sorted
    pub fn to_rfc2253_canonical_string(&self) -> &str {
        self.canonical.get_or_init(|| {
            if self.avas.len() == 1 {
                return self.avas[0].to_rfc2253_canonical_string().to_string();
            }
            let mut sorted: Vec<&AttributeTypeAndValue> = self.avas.iter().collect();
            sorted.sort_by(|a, b| a.canonical_cmp(b));
            sorted
                .iter()
                .map(|ava| ava.to_rfc2253_canonical_string())
                .collect::<Vec<&str>>()
                .join("+")
        })
    }

    fn sorted_encodings(&self) -> der::Result<Vec<Vec<u8>>> {
        let mut encodings = self
            .avas
            .iter()
            .map(|ava| ava.to_der())
            .collect::<der::Result<Vec<Vec<u8>>>>()?;
        encodings.sort();
        Ok(encodings)
    }
}

impl PartialEq for RelativeDistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.to_rfc2253_canonical_string() == other.to_rfc2253_canonical_string()
    }
}

impl Eq for RelativeDistinguishedName {}

impl Hash for RelativeDistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_rfc2253_canonical_string().hash(state);
    }
}

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ava) in self.avas.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", ava)?;
        }
        Ok(())
    }
}

impl FixedTag for RelativeDistinguishedName {
    const TAG: Tag = Tag::Set;
}

impl<'a> DecodeValue<'a> for RelativeDistinguishedName {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let mut avas = vec![];
            while !nested.is_finished() {
                avas.push(AttributeTypeAndValue::decode(nested)?);
            }
            if avas.is_empty() {
                return Err(Tag::Set.value_error());
            }
            Ok(RelativeDistinguishedName {
                avas,
                canonical: OnceLock::new(),
            })
        })
    }
}

impl EncodeValue for RelativeDistinguishedName {
    fn value_len(&self) -> der::Result<Length> {
        self.avas
            .iter()
            .try_fold(Length::ZERO, |acc, ava| acc + ava.encoded_len()?)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for encoding in self.sorted_encodings()? {
            writer.write(&encoding)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use const_oid::db::rfc4519::{COMMON_NAME, ORGANIZATIONAL_UNIT_NAME};

    #[test]
    fn splitting() {
        assert_eq!(
            split_unescaped("a+b\\+c+d", &['+'], true).unwrap(),
            vec!["a", "b\\+c", "d"]
        );
        assert_eq!(
            split_unescaped("a\\\\+b", &['+'], true).unwrap(),
            vec!["a\\\\", "b"]
        );
        assert_eq!(
            split_unescaped("a=\"x+y\"+b", &['+'], true).unwrap(),
            vec!["a=\"x+y\"", "b"]
        );
        assert_eq!(
            split_unescaped("a=\"x+y", &['+'], true).unwrap_err(),
            Error::MalformedDnString
        );
        assert_eq!(
            split_unescaped("a=\"x+y", &['+'], false).unwrap(),
            vec!["a=\"x", "y"]
        );
    }

    #[test]
    fn multi_valued() {
        let none = StringMap::new();
        let rdn = RelativeDistinguishedName::parse("OU=Sales + CN=J. Smith", DnFormat::Default, &none)
            .unwrap();
        assert_eq!(rdn.len(), 2);
        assert_eq!(rdn.to_string(), "OU=Sales + CN=J. Smith");
        assert_eq!(rdn.to_rfc2253_string(&none).unwrap(), "OU=Sales+CN=J. Smith");
        assert_eq!(rdn.to_rfc2253_canonical_string(), "cn=j. smith+ou=sales");
        assert_eq!(
            rdn.find_attribute(&ORGANIZATIONAL_UNIT_NAME)
                .unwrap()
                .value_string()
                .unwrap(),
            "Sales"
        );

        let reordered =
            RelativeDistinguishedName::parse("CN=J. Smith+OU=Sales", DnFormat::Rfc2253, &none)
                .unwrap();
        assert_eq!(rdn, reordered);
        assert_eq!(rdn.to_der().unwrap(), reordered.to_der().unwrap());
    }

    #[test]
    fn empty_members() {
        let none = StringMap::new();
        assert_eq!(
            RelativeDistinguishedName::parse("CN=a+", DnFormat::Default, &none).unwrap_err(),
            Error::MalformedDnString
        );
        assert_eq!(
            RelativeDistinguishedName::new(vec![]).unwrap_err(),
            Error::InvalidName
        );
        let rdn = RelativeDistinguishedName::parse("CN=a\\+b", DnFormat::Rfc2253, &none).unwrap();
        assert_eq!(rdn.len(), 1);
        assert_eq!(
            rdn.find_attribute(&COMMON_NAME).unwrap().value_string().unwrap(),
            "a+b"
        );
    }

    #[test]
    fn der() {
        let none = StringMap::new();
        let rdn = RelativeDistinguishedName::parse("CN=Hello", DnFormat::Default, &none).unwrap();
        let der = rdn.to_der().unwrap();
        assert_eq!(der[0], 0x31);
        let rdn2 = RelativeDistinguishedName::from_der(&der).unwrap();
        assert_eq!(rdn, rdn2);
        assert!(RelativeDistinguishedName::from_der(&[0x31, 0x00]).is_err());
    }
}
