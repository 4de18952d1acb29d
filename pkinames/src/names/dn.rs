//! Distinguished names: ordered sequences of relative distinguished names.
//!
//! RDNs are held in DER order, i.e., index 0 is the most general (typically `C=` or `DC=`) and the
//! last RDN is the most specific. All three string dialects list the most specific RDN first, so
//! parsing reverses the order of the string and rendering reverses it back.
//!
//! The rendered forms without keyword overrides are cached on first use, as is the canonical form
//! used for equality and hashing.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use std::sync::OnceLock;

use const_oid::db::rfc4519::COMMON_NAME;
use der::asn1::ObjectIdentifier;
use der::{Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Writer};
use log::debug;
use x509_cert::name::Name;

use crate::names::ava::AttributeTypeAndValue;
use crate::names::general_name::NameRelation;
use crate::names::keywords::{DnFormat, StringMap};
use crate::names::rdn::{split_unescaped, RelativeDistinguishedName};
use crate::{Error, Result};

/// `DistinguishedName` is an X.500 name
#[derive(Clone, Debug, Default)]
pub struct DistinguishedName {
    rdns: Vec<RelativeDistinguishedName>,
    default_string: OnceLock<String>,
    rfc1779_string: OnceLock<String>,
    rfc2253_string: OnceLock<String>,
    canonical: OnceLock<String>,
    encoding: OnceLock<Vec<u8>>,
}

impl DistinguishedName {
    /// Creates a name from RDNs listed most general first
    pub fn new(rdns: Vec<RelativeDistinguishedName>) -> Self {
        DistinguishedName {
            rdns,
            ..Default::default()
        }
    }

    /// Parses a name string in the given dialect. `keywords` maps additional upper case keywords to
    /// dotted OIDs. An empty (or, outside RFC 2253, all whitespace) string yields the empty name.
    pub fn parse(s: &str, format: DnFormat, keywords: &StringMap) -> Result<Self> {
        if s.is_empty() || (format != DnFormat::Rfc2253 && s.trim().is_empty()) {
            return Ok(Self::default());
        }
        let (separators, track_quotes): (&[char], bool) = match format {
            DnFormat::Rfc2253 => (&[','], false),
            _ => (&[',', ';'], true),
        };

        let mut rdns = vec![];
        for piece in split_unescaped(s, separators, track_quotes)? {
            if piece.trim().is_empty() {
                debug!("Empty RDN in distinguished name \"{}\"", s);
                return Err(Error::MalformedDnString);
            }
            rdns.push(RelativeDistinguishedName::parse(piece, format, keywords)?);
        }
        rdns.reverse();
        Ok(Self::new(rdns))
    }

    /// RDNs, most general first
    pub fn rdns(&self) -> &[RelativeDistinguishedName] {
        &self.rdns
    }

    /// Number of RDNs
    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    /// Returns true for the empty name, which is the root of the name hierarchy
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Returns true if this name is equal to or subordinate to `base`.
    ///
    /// Every name is within the empty name; the empty name is within no other name.
    pub fn is_within_subtree(&self, base: &DistinguishedName) -> bool {
        if base.is_empty() {
            return true;
        }
        if self.is_empty() || self.len() < base.len() {
            return false;
        }
        self.rdns.iter().zip(base.rdns.iter()).all(|(a, b)| a == b)
    }

    /// Returns the relation of `other` to the subtree rooted at this name. The empty name is the
    /// widest directory name.
    pub fn constrains(&self, other: &DistinguishedName) -> NameRelation {
        if self == other {
            NameRelation::Match
        } else if other.is_empty() {
            NameRelation::Widens
        } else if self.is_empty() || other.is_within_subtree(self) {
            NameRelation::Narrows
        } else if self.is_within_subtree(other) {
            NameRelation::Widens
        } else {
            NameRelation::SameType
        }
    }

    /// Returns the longest name that both names are within
    pub fn common_prefix(&self, other: &DistinguishedName) -> DistinguishedName {
        let rdns = self
            .rdns
            .iter()
            .zip(other.rdns.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();
        Self::new(rdns)
    }

    /// Returns the attribute of the given type from the most specific RDN that has one
    pub fn find_most_specific_attribute(
        &self,
        oid: &ObjectIdentifier,
    ) -> Option<&AttributeTypeAndValue> {
        self.rdns.iter().rev().find_map(|rdn| rdn.find_attribute(oid))
    }

    /// Returns every AVA in the name, most general RDN first
    pub fn all_avas(&self) -> Vec<&AttributeTypeAndValue> {
        self.rdns.iter().flat_map(|rdn| rdn.avas().iter()).collect()
    }

    /// Returns the most specific common name value, if any
    pub fn common_name(&self) -> Option<String> {
        self.find_most_specific_attribute(&COMMON_NAME)
            .and_then(|ava| ava.value_string())
    }

    /// RFC 1779 form
    pub fn to_rfc1779_string(&self) -> &str {
        self.rfc1779_string.get_or_init(|| {
            self.to_rfc1779_string_with(&StringMap::new())
                .unwrap_or_default()
        })
    }

    /// RFC 1779 form with alternate keywords from `oid_map` (dotted OID to keyword)
    pub fn to_rfc1779_string_with(&self, oid_map: &StringMap) -> Result<String> {
        let parts = self
            .rdns
            .iter()
            .rev()
            .map(|rdn| rdn.to_rfc1779_string(oid_map))
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join(", "))
    }

    /// Loose dialect form with alternate keywords from `oid_map` (dotted OID to keyword)
    pub fn to_string_with(&self, oid_map: &StringMap) -> Result<String> {
        let parts = self
            .rdns
            .iter()
            .rev()
            .map(|rdn| rdn.to_string_with_oid_map(oid_map))
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join(", "))
    }

    /// RFC 2253 form
    pub fn to_rfc2253_string(&self) -> &str {
        self.rfc2253_string.get_or_init(|| {
            self.to_rfc2253_string_with(&StringMap::new())
                .unwrap_or_default()
        })
    }

    /// RFC 2253 form with alternate keywords from `oid_map` (dotted OID to keyword)
    pub fn to_rfc2253_string_with(&self, oid_map: &StringMap) -> Result<String> {
        let parts = self
            .rdns
            .iter()
            .rev()
            .map(|rdn| rdn.to_rfc2253_string(oid_map))
            .collect::<Result<Vec<String>>>()?;
        Ok(parts.join(","))
    }

    /// RFC 2253 canonical form, used for equality
    pub fn to_rfc2253_canonical_string(&self) -> &str {
        self.canonical.get_or_init(|| {
            self.rdns
                .iter()
                .rev()
                .map(|rdn| rdn.to_rfc2253_canonical_string())
                .collect::<Vec<&str>>()
                .join(",")
        })
    }

    /// DER encoding of the name, computed once
    pub fn as_der(&self) -> der::Result<&[u8]> {
        if let Some(encoding) = self.encoding.get() {
            return Ok(encoding);
        }
        let encoding = self.to_der()?;
        Ok(self.encoding.get_or_init(|| encoding))
    }

    /// Renders the name in the given dialect without keyword overrides
    pub fn to_string_in(&self, format: DnFormat) -> String {
        match format {
            DnFormat::Default => self.to_string(),
            DnFormat::Rfc1779 => self.to_rfc1779_string().to_string(),
            DnFormat::Rfc2253 => self.to_rfc2253_string().to_string(),
        }
    }
}

impl FromStr for DistinguishedName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, DnFormat::Default, &StringMap::new())
    }
}

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.to_rfc2253_canonical_string() == other.to_rfc2253_canonical_string()
    }
}

impl Eq for DistinguishedName {}

impl Hash for DistinguishedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_rfc2253_canonical_string().hash(state);
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.default_string.get_or_init(|| {
            self.rdns
                .iter()
                .rev()
                .map(|rdn| rdn.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        });
        f.write_str(s)
    }
}

impl<'a> DecodeValue<'a> for DistinguishedName {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let mut rdns = vec![];
            while !nested.is_finished() {
                rdns.push(RelativeDistinguishedName::decode(nested)?);
            }
            Ok(DistinguishedName::new(rdns))
        })
    }
}

impl EncodeValue for DistinguishedName {
    fn value_len(&self) -> der::Result<Length> {
        self.rdns
            .iter()
            .try_fold(Length::ZERO, |acc, rdn| acc + rdn.encoded_len()?)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for rdn in &self.rdns {
            rdn.encode(writer)?;
        }
        Ok(())
    }
}

impl Sequence<'_> for DistinguishedName {}

impl TryFrom<&Name> for DistinguishedName {
    type Error = Error;

    fn try_from(name: &Name) -> Result<Self> {
        Ok(DistinguishedName::from_der(&name.to_der()?)?)
    }
}

impl TryFrom<&DistinguishedName> for Name {
    type Error = Error;

    fn try_from(name: &DistinguishedName) -> Result<Self> {
        Ok(Name::from_der(name.as_der()?)?)
    }
}
