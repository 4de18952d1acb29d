//! The GeneralName CHOICE and the relation used to compare names against name constraints.
//!
//! ```text
//! GeneralName ::= CHOICE {
//!      otherName                       [0]     OtherName,
//!      rfc822Name                      [1]     IA5String,
//!      dNSName                         [2]     IA5String,
//!      x400Address                     [3]     ORAddress,
//!      directoryName                   [4]     Name,
//!      ediPartyName                    [5]     EDIPartyName,
//!      uniformResourceIdentifier       [6]     IA5String,
//!      iPAddress                       [7]     OCTET STRING,
//!      registeredID                    [8]     OBJECT IDENTIFIER }
//! ```
//!
//! Tags are implicit except for directoryName, which is explicit because Name is a CHOICE.

use core::fmt;

use der::asn1::ObjectIdentifier;
use der::{
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Tag, TagNumber,
    Writer,
};
use flagset::{flags, FlagSet};
use log::debug;

use crate::names::attribute_value::AttributeValue;
use crate::names::dn::DistinguishedName;
use crate::names::dns_name::DnsName;
use crate::names::ip_address_name::IpAddressName;
use crate::names::other_names::{EdiPartyName, OtherName, X400Address};
use crate::names::rfc822_name::Rfc822Name;
use crate::names::uri_name::UriName;
use crate::{Error, Result};

/// `NameRelation` describes how a name relates to the subtree rooted at another name of the same
/// form. The relation is always stated from the point of view of the argument to
/// [`GeneralName::constrains`], i.e., `a.constrains(b) == Narrows` means `b` lies within `a`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum NameRelation {
    /// The names are of different forms and cannot be compared
    DiffType = -1,
    /// The names are equal
    Match = 0,
    /// The argument lies within the receiver's subtree
    Narrows = 1,
    /// The receiver lies within the argument's subtree
    Widens = 2,
    /// Same form, neither name lies within the other
    SameType = 3,
}

flags! {
    /// Forms of GeneralName, in tag number order
    pub enum NameTypes: u16 {
        /// otherName [0]
        OtherName,
        /// rfc822Name [1]
        Rfc822Name,
        /// dNSName [2]
        DnsName,
        /// x400Address [3]
        X400Address,
        /// directoryName [4]
        DirectoryName,
        /// ediPartyName [5]
        EdiPartyName,
        /// uniformResourceIdentifier [6]
        UniformResourceIdentifier,
        /// iPAddress [7]
        IpAddress,
        /// registeredID [8]
        RegisteredId,
    }
}

const TAG_NUMBERS: [TagNumber; 9] = [
    TagNumber::N0,
    TagNumber::N1,
    TagNumber::N2,
    TagNumber::N3,
    TagNumber::N4,
    TagNumber::N5,
    TagNumber::N6,
    TagNumber::N7,
    TagNumber::N8,
];

fn context_tag(number: usize, constructed: bool) -> Tag {
    Tag::ContextSpecific {
        constructed,
        number: TAG_NUMBERS[number],
    }
}

fn explicit(number: usize, inner: &[u8]) -> der::Result<Vec<u8>> {
    let mut out = Header::new(context_tag(number, true), inner.len())?.to_der()?;
    out.extend_from_slice(inner);
    Ok(out)
}

fn expect_tag(header: &Header, expected: Tag) -> der::Result<()> {
    if header.tag != expected {
        return Err(header.tag.unexpected_error(Some(expected)));
    }
    Ok(())
}

fn read_ia5<'a, R: Reader<'a>>(reader: &mut R, header: &Header) -> der::Result<&'a str> {
    let bytes = reader.read_slice(header.length)?;
    if !bytes.is_ascii() {
        return Err(Tag::Ia5String.value_error());
    }
    core::str::from_utf8(bytes).map_err(|_| Tag::Ia5String.value_error())
}

fn equality_only(equal: bool, form: &str) -> Result<NameRelation> {
    if equal {
        Ok(NameRelation::Match)
    } else {
        debug!("Narrowing and widening are not supported for {}", form);
        Err(Error::UnsupportedRelation)
    }
}

/// `GeneralName` is one of the nine name forms
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum GeneralName {
    OtherName(OtherName),
    Rfc822Name(Rfc822Name),
    DnsName(DnsName),
    X400Address(X400Address),
    DirectoryName(DistinguishedName),
    EdiPartyName(EdiPartyName),
    UniformResourceIdentifier(UriName),
    IpAddress(IpAddressName),
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    /// Returns the form of the name
    pub fn name_type(&self) -> NameTypes {
        match self {
            GeneralName::OtherName(_) => NameTypes::OtherName,
            GeneralName::Rfc822Name(_) => NameTypes::Rfc822Name,
            GeneralName::DnsName(_) => NameTypes::DnsName,
            GeneralName::X400Address(_) => NameTypes::X400Address,
            GeneralName::DirectoryName(_) => NameTypes::DirectoryName,
            GeneralName::EdiPartyName(_) => NameTypes::EdiPartyName,
            GeneralName::UniformResourceIdentifier(_) => NameTypes::UniformResourceIdentifier,
            GeneralName::IpAddress(_) => NameTypes::IpAddress,
            GeneralName::RegisteredId(_) => NameTypes::RegisteredId,
        }
    }

    /// Returns the context-specific tag number of the name's form
    pub fn tag_number(&self) -> u8 {
        match self {
            GeneralName::OtherName(_) => 0,
            GeneralName::Rfc822Name(_) => 1,
            GeneralName::DnsName(_) => 2,
            GeneralName::X400Address(_) => 3,
            GeneralName::DirectoryName(_) => 4,
            GeneralName::EdiPartyName(_) => 5,
            GeneralName::UniformResourceIdentifier(_) => 6,
            GeneralName::IpAddress(_) => 7,
            GeneralName::RegisteredId(_) => 8,
        }
    }

    /// Creates a name of a hierarchical form from its textual representation. Directory names are
    /// parsed in the loose dialect and registered IDs as dotted OIDs.
    pub fn from_type_and_string(name_type: NameTypes, value: &str) -> Result<Self> {
        match name_type {
            NameTypes::Rfc822Name => Ok(GeneralName::Rfc822Name(Rfc822Name::new(value)?)),
            NameTypes::DnsName => Ok(GeneralName::DnsName(DnsName::new(value)?)),
            NameTypes::DirectoryName => Ok(GeneralName::DirectoryName(value.parse()?)),
            NameTypes::UniformResourceIdentifier => {
                Ok(GeneralName::UniformResourceIdentifier(UriName::new(value)?))
            }
            NameTypes::IpAddress => Ok(GeneralName::IpAddress(value.parse()?)),
            NameTypes::RegisteredId => match value.parse::<ObjectIdentifier>() {
                Ok(oid) => Ok(GeneralName::RegisteredId(oid)),
                Err(_) => {
                    debug!("Invalid registered ID: {}", value);
                    Err(Error::InvalidName)
                }
            },
            _ => {
                debug!("No textual form for {:?} names", name_type);
                Err(Error::InvalidName)
            }
        }
    }

    /// Returns the widest name of the given form, i.e., a name whose subtree holds every name of
    /// that form. Only the hierarchical forms have one.
    pub fn widest(name_type: NameTypes) -> Result<Self> {
        match name_type {
            NameTypes::Rfc822Name => Ok(GeneralName::Rfc822Name(Rfc822Name::new("")?)),
            NameTypes::DnsName => Ok(GeneralName::DnsName(DnsName::new("")?)),
            NameTypes::DirectoryName => {
                Ok(GeneralName::DirectoryName(DistinguishedName::default()))
            }
            NameTypes::UniformResourceIdentifier => {
                Ok(GeneralName::UniformResourceIdentifier(UriName::new("")?))
            }
            NameTypes::IpAddress => Ok(GeneralName::IpAddress(IpAddressName::widest())),
            _ => {
                debug!("{:?} names have no widest form", name_type);
                Err(Error::UnsupportedRelation)
            }
        }
    }

    /// Returns the relation of `other` to the subtree rooted at this name.
    ///
    /// Names of different forms yield [`NameRelation::DiffType`]. For otherName, x400Address,
    /// ediPartyName and registeredID values only equality is defined, so comparing two distinct
    /// values of one of those forms fails with [`Error::UnsupportedRelation`].
    pub fn constrains(&self, other: &GeneralName) -> Result<NameRelation> {
        match (self, other) {
            (GeneralName::Rfc822Name(a), GeneralName::Rfc822Name(b)) => Ok(a.constrains(b)),
            (GeneralName::DnsName(a), GeneralName::DnsName(b)) => Ok(a.constrains(b)),
            (GeneralName::DirectoryName(a), GeneralName::DirectoryName(b)) => Ok(a.constrains(b)),
            (
                GeneralName::UniformResourceIdentifier(a),
                GeneralName::UniformResourceIdentifier(b),
            ) => Ok(a.constrains(b)),
            (GeneralName::IpAddress(a), GeneralName::IpAddress(b)) => Ok(a.constrains(b)),
            (GeneralName::OtherName(a), GeneralName::OtherName(b)) => {
                equality_only(a == b, "otherName")
            }
            (GeneralName::X400Address(a), GeneralName::X400Address(b)) => {
                equality_only(a == b, "x400Address")
            }
            (GeneralName::EdiPartyName(a), GeneralName::EdiPartyName(b)) => {
                equality_only(a == b, "ediPartyName")
            }
            (GeneralName::RegisteredId(a), GeneralName::RegisteredId(b)) => {
                equality_only(a == b, "registeredID")
            }
            _ => Ok(NameRelation::DiffType),
        }
    }

    /// As [`GeneralName::constrains`], with an absent name always of a different type
    pub fn constrains_opt(&self, other: Option<&GeneralName>) -> Result<NameRelation> {
        match other {
            Some(other) => self.constrains(other),
            None => Ok(NameRelation::DiffType),
        }
    }

    fn tag_and_content(&self) -> der::Result<(Tag, Vec<u8>)> {
        let tag = context_tag(
            self.tag_number() as usize,
            matches!(
                self,
                GeneralName::OtherName(_)
                    | GeneralName::X400Address(_)
                    | GeneralName::DirectoryName(_)
                    | GeneralName::EdiPartyName(_)
            ),
        );
        let content = match self {
            GeneralName::OtherName(on) => {
                let mut content = on.type_id.to_der()?;
                content.extend(explicit(0, &on.value)?);
                content
            }
            GeneralName::Rfc822Name(n) => n.as_str().as_bytes().to_vec(),
            GeneralName::DnsName(n) => n.as_str().as_bytes().to_vec(),
            GeneralName::X400Address(x) => x.0.clone(),
            GeneralName::DirectoryName(dn) => dn.as_der()?.to_vec(),
            GeneralName::EdiPartyName(edi) => {
                let mut content = vec![];
                if let Some(assigner) = &edi.name_assigner {
                    content.extend(explicit(0, assigner.as_bytes())?);
                }
                content.extend(explicit(1, edi.party_name.as_bytes())?);
                content
            }
            GeneralName::UniformResourceIdentifier(u) => u.as_str().as_bytes().to_vec(),
            GeneralName::IpAddress(ip) => ip.as_bytes().to_vec(),
            GeneralName::RegisteredId(oid) => oid.as_bytes().to_vec(),
        };
        Ok((tag, content))
    }
}

impl<'a> Decode<'a> for GeneralName {
    fn decode<R: Reader<'a>>(reader: &mut R) -> der::Result<Self> {
        let header = Header::decode(reader)?;
        let (constructed, number) = match header.tag {
            Tag::ContextSpecific {
                constructed,
                number,
            } => (constructed, number.value()),
            tag => return Err(tag.unexpected_error(None)),
        };
        let syntax_error = |_| header.tag.value_error();

        match (number, constructed) {
            (0, true) => reader.read_nested(header.length, |nested| {
                let type_id = ObjectIdentifier::decode(nested)?;
                let inner = Header::decode(nested)?;
                expect_tag(&inner, context_tag(0, true))?;
                let value = nested.read_slice(inner.length)?.to_vec();
                Ok(GeneralName::OtherName(OtherName { type_id, value }))
            }),
            (1, false) => Ok(GeneralName::Rfc822Name(
                Rfc822Name::new(read_ia5(reader, &header)?).map_err(syntax_error)?,
            )),
            (2, false) => {
                // the empty name only exists as the widest constraint built in memory
                let name = read_ia5(reader, &header)?;
                if name.is_empty() {
                    return Err(header.tag.length_error());
                }
                Ok(GeneralName::DnsName(DnsName::new(name).map_err(syntax_error)?))
            }
            (3, true) => Ok(GeneralName::X400Address(X400Address(
                reader.read_slice(header.length)?.to_vec(),
            ))),
            (4, true) => reader.read_nested(header.length, |nested| {
                Ok(GeneralName::DirectoryName(DistinguishedName::decode(
                    nested,
                )?))
            }),
            (5, true) => reader.read_nested(header.length, |nested| {
                let mut name_assigner = None;
                if nested.peek_tag()? == context_tag(0, true) {
                    let inner = Header::decode(nested)?;
                    name_assigner = Some(nested.read_nested(inner.length, AttributeValue::read)?);
                }
                let inner = Header::decode(nested)?;
                expect_tag(&inner, context_tag(1, true))?;
                let party_name = nested.read_nested(inner.length, AttributeValue::read)?;
                Ok(GeneralName::EdiPartyName(EdiPartyName {
                    name_assigner,
                    party_name,
                }))
            }),
            (6, false) => Ok(GeneralName::UniformResourceIdentifier(
                UriName::new(read_ia5(reader, &header)?).map_err(syntax_error)?,
            )),
            (7, false) => Ok(GeneralName::IpAddress(
                IpAddressName::new(reader.read_slice(header.length)?).map_err(syntax_error)?,
            )),
            (8, false) => Ok(GeneralName::RegisteredId(ObjectIdentifier::from_bytes(
                reader.read_slice(header.length)?,
            )?)),
            _ => Err(header.tag.unexpected_error(None)),
        }
    }
}

impl Encode for GeneralName {
    fn encoded_len(&self) -> der::Result<Length> {
        let (tag, content) = self.tag_and_content()?;
        let len = Length::try_from(content.len())?;
        Header::new(tag, len)?.encoded_len()? + len
    }

    fn encode(&self, writer: &mut impl Writer) -> der::Result<()> {
        let (tag, content) = self.tag_and_content()?;
        Header::new(tag, content.len())?.encode(writer)?;
        writer.write(&content)
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::OtherName(on) => write!(f, "Other-Name: {}", on),
            GeneralName::Rfc822Name(n) => write!(f, "RFC822Name: {}", n),
            GeneralName::DnsName(n) => write!(f, "DNSName: {}", n),
            GeneralName::X400Address(x) => write!(f, "X400Address: {}", x),
            GeneralName::DirectoryName(dn) => write!(f, "DirectoryName: {}", dn),
            GeneralName::EdiPartyName(edi) => write!(f, "EDIPartyName: {}", edi),
            GeneralName::UniformResourceIdentifier(u) => write!(f, "URIName: {}", u),
            GeneralName::IpAddress(ip) => write!(f, "IPAddress: {}", ip),
            GeneralName::RegisteredId(oid) => write!(f, "OIDName: {}", oid),
        }
    }
}

impl TryFrom<&x509_cert::ext::pkix::name::GeneralName> for GeneralName {
    type Error = Error;

    fn try_from(gn: &x509_cert::ext::pkix::name::GeneralName) -> Result<Self> {
        Ok(GeneralName::from_der(&gn.to_der()?)?)
    }
}

impl TryFrom<&GeneralName> for x509_cert::ext::pkix::name::GeneralName {
    type Error = Error;

    fn try_from(gn: &GeneralName) -> Result<Self> {
        Ok(x509_cert::ext::pkix::name::GeneralName::from_der(
            &gn.to_der()?,
        )?)
    }
}

/// `GeneralNames` is a SEQUENCE OF GeneralName, as found in the subject and issuer alternative
/// name extensions.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct GeneralNames(pub Vec<GeneralName>);

impl GeneralNames {
    /// Returns the set of forms present
    pub fn name_types(&self) -> FlagSet<NameTypes> {
        self.0
            .iter()
            .fold(FlagSet::default(), |acc, gn| acc | gn.name_type())
    }

    /// Returns the names of the given form
    pub fn of_type(&self, name_type: NameTypes) -> impl Iterator<Item = &GeneralName> {
        self.0.iter().filter(move |gn| gn.name_type() == name_type)
    }

    /// Iterates over the names
    pub fn iter(&self) -> core::slice::Iter<'_, GeneralName> {
        self.0.iter()
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no names
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> DecodeValue<'a> for GeneralNames {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let mut names = vec![];
            while !nested.is_finished() {
                names.push(GeneralName::decode(nested)?);
            }
            if names.is_empty() {
                return Err(Tag::Sequence.value_error());
            }
            Ok(GeneralNames(names))
        })
    }
}

impl EncodeValue for GeneralNames {
    fn value_len(&self) -> der::Result<Length> {
        self.0
            .iter()
            .try_fold(Length::ZERO, |acc, gn| acc + gn.encoded_len()?)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for gn in &self.0 {
            gn.encode(writer)?;
        }
        Ok(())
    }
}

impl Sequence<'_> for GeneralNames {}

impl fmt::Display for GeneralNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gn) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", gn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn relation_values() {
        assert_eq!(NameRelation::DiffType as i8, -1);
        assert_eq!(NameRelation::Match as i8, 0);
        assert_eq!(NameRelation::Narrows as i8, 1);
        assert_eq!(NameRelation::Widens as i8, 2);
        assert_eq!(NameRelation::SameType as i8, 3);
    }

    #[test]
    fn der_forms() {
        let dns = GeneralName::from_der(&hex!("820B6578616D706C652E636F6D")).unwrap();
        assert_eq!(dns.to_string(), "DNSName: example.com");
        assert_eq!(dns.to_der().unwrap(), hex!("820B6578616D706C652E636F6D").to_vec());

        let ip = GeneralName::from_der(&hex!("8708C0A80000FFFFFF00")).unwrap();
        assert_eq!(ip.to_string(), "IPAddress: 192.168.0.0/255.255.255.0");
        assert!(GeneralName::from_der(&hex!("8703C0A800")).is_err());

        let rid = GeneralName::from_der(&hex!("88032A0304")).unwrap();
        assert_eq!(rid, GeneralName::RegisteredId(ObjectIdentifier::new_unwrap("1.2.3.4")));

        // directoryName is explicitly tagged
        let dn = GeneralName::from_der(&hex!("A40F300D310B3009060355040613025553")).unwrap();
        assert_eq!(dn.to_string(), "DirectoryName: C=US");
        assert_eq!(dn.to_der().unwrap(), hex!("A40F300D310B3009060355040613025553").to_vec());

        // otherName carrying a UTF8String UPN
        let der = hex!("A01B060A2B060104018237140203A00D0C0B75406578616D706C652E6F");
        let on = GeneralName::from_der(&der).unwrap();
        match &on {
            GeneralName::OtherName(on) => {
                assert_eq!(on.type_id, ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.20.2.3"));
                assert_eq!(on.value[0], 0x0C);
            }
            _ => panic!("expected otherName"),
        }
        assert_eq!(on.to_der().unwrap(), der.to_vec());
    }

    #[test]
    fn edi_party_name() {
        let der = hex!("A50EA0050C03616263A1050C03646566");
        let edi = GeneralName::from_der(&der).unwrap();
        assert_eq!(edi.to_string(), "EDIPartyName: nameAssigner = abc, partyName = def");
        assert_eq!(edi.to_der().unwrap(), der.to_vec());

        let der = hex!("A507A1050C03646566");
        let edi = GeneralName::from_der(&der).unwrap();
        assert_eq!(edi.to_string(), "EDIPartyName: partyName = def");
        assert!(GeneralName::from_der(&hex!("A507A0050C03646566")).is_err());
    }

    #[test]
    fn syntax_is_checked_when_decoding() {
        // dNSName "-a"
        assert!(GeneralName::from_der(&hex!("82022D61")).is_err());
        // primitive tag [4]
        assert!(GeneralName::from_der(&hex!("8400")).is_err());
        // universal tag
        assert!(GeneralName::from_der(&hex!("0400")).is_err());
        // empty and wrongly sized iPAddress values
        assert!(GeneralName::from_der(&hex!("8700")).is_err());
        assert!(GeneralName::from_der(&hex!("87030A0000")).is_err());
        assert!(GeneralName::from_der(&hex!("87040A000001")).is_ok());
        // empty dNSName
        assert!(GeneralName::from_der(&hex!("8200")).is_err());
    }

    #[test]
    fn equality_only_forms() {
        let a = GeneralName::RegisteredId(ObjectIdentifier::new_unwrap("1.2.3.4"));
        let b = GeneralName::RegisteredId(ObjectIdentifier::new_unwrap("1.2.3.5"));
        let dns = GeneralName::from_type_and_string(NameTypes::DnsName, "example.com").unwrap();
        assert_eq!(a.constrains(&a.clone()).unwrap(), NameRelation::Match);
        assert_eq!(a.constrains(&b), Err(Error::UnsupportedRelation));
        assert_eq!(a.constrains(&dns).unwrap(), NameRelation::DiffType);
        assert_eq!(dns.constrains(&a).unwrap(), NameRelation::DiffType);
        assert_eq!(dns.constrains_opt(None).unwrap(), NameRelation::DiffType);

        let x1 = GeneralName::X400Address(X400Address(vec![0x30, 0x00]));
        let x2 = GeneralName::X400Address(X400Address(vec![0x30, 0x01, 0x00]));
        assert_eq!(x1.constrains(&x1).unwrap(), NameRelation::Match);
        assert_eq!(x1.constrains(&x2), Err(Error::UnsupportedRelation));
    }

    #[test]
    fn widest_names() {
        let widest = GeneralName::widest(NameTypes::DnsName).unwrap();
        let dns = GeneralName::from_type_and_string(NameTypes::DnsName, "example.com").unwrap();
        assert_eq!(widest.constrains(&dns).unwrap(), NameRelation::Narrows);
        let widest = GeneralName::widest(NameTypes::IpAddress).unwrap();
        let ip = GeneralName::from_type_and_string(NameTypes::IpAddress, "8.8.8.8").unwrap();
        assert_eq!(widest.constrains(&ip).unwrap(), NameRelation::Narrows);
        let widest = GeneralName::widest(NameTypes::DirectoryName).unwrap();
        let dn = GeneralName::from_type_and_string(NameTypes::DirectoryName, "O=Acme").unwrap();
        assert_eq!(widest.constrains(&dn).unwrap(), NameRelation::Narrows);
        assert_eq!(
            GeneralName::widest(NameTypes::OtherName),
            Err(Error::UnsupportedRelation)
        );
    }

    #[test]
    fn general_names() {
        let names = GeneralNames(vec![
            GeneralName::from_type_and_string(NameTypes::DnsName, "example.com").unwrap(),
            GeneralName::from_type_and_string(NameTypes::IpAddress, "192.0.2.1").unwrap(),
        ]);
        let types = names.name_types();
        assert!(types.contains(NameTypes::DnsName));
        assert!(types.contains(NameTypes::IpAddress));
        assert!(!types.contains(NameTypes::Rfc822Name));
        assert_eq!(names.of_type(NameTypes::IpAddress).count(), 1);

        let der = names.to_der().unwrap();
        assert_eq!(GeneralNames::from_der(&der).unwrap(), names);
        assert!(GeneralNames::from_der(&[0x30, 0x00]).is_err());

        let x509 = x509_cert::ext::pkix::name::GeneralName::try_from(&names.0[0]).unwrap();
        assert_eq!(GeneralName::try_from(&x509).unwrap(), names.0[0]);
    }
}
