//! GeneralName forms that have no name hierarchy: otherName, x400Address and ediPartyName.
//!
//! These are compared for equality only; a narrowing or widening comparison between two distinct
//! values of the same form fails with [`Error::UnsupportedRelation`](crate::Error).

use core::fmt;

use der::asn1::ObjectIdentifier;
use subtle_encoding::hex;

use crate::names::attribute_value::AttributeValue;

/// `OtherName` is an `otherName` GeneralName: a type identifier and a value whose syntax the type
/// identifier defines.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OtherName {
    /// Type of the value
    pub type_id: ObjectIdentifier,
    /// Complete DER encoding of the value (the contents of the explicit `[0]` tag)
    pub value: Vec<u8>,
}

impl fmt::Display for OtherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_value = String::from_utf8(hex::encode_upper(&self.value)).unwrap_or_default();
        write!(f, "{}: #{}", self.type_id, hex_value)
    }
}

/// `X400Address` holds the content octets of an `x400Address` GeneralName (an ORAddress SEQUENCE
/// with its tag replaced).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct X400Address(pub Vec<u8>);

impl fmt::Display for X400Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_value = String::from_utf8(hex::encode_upper(&self.0)).unwrap_or_default();
        write!(f, "#{}", hex_value)
    }
}

/// `EdiPartyName` is an `ediPartyName` GeneralName. Both fields are DirectoryString values.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EdiPartyName {
    /// Optional name assigner
    pub name_assigner: Option<AttributeValue>,
    /// Party name
    pub party_name: AttributeValue,
}

impl fmt::Display for EdiPartyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(assigner) = &self.name_assigner {
            write!(
                f,
                "nameAssigner = {}, ",
                assigner.as_string().unwrap_or_default()
            )?;
        }
        write!(
            f,
            "partyName = {}",
            self.party_name.as_string().unwrap_or_default()
        )
    }
}
