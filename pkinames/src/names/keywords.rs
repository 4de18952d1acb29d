//! Registry of the attribute type keywords understood when parsing and rendering distinguished
//! name strings.
//!
//! Each keyword carries two compliance flags. A keyword that is not compliant with the dialect in
//! use is never emitted for it, and is not accepted for it when parsing; the dotted OID form (or the
//! `OID.` prefixed form for RFC 1779) is used instead.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use const_oid::db::rfc2256::STATE_OR_PROVINCE_NAME;
use const_oid::db::rfc3280::EMAIL_ADDRESS;
use const_oid::db::rfc4519::{
    COMMON_NAME, COUNTRY_NAME, DN_QUALIFIER, DOMAIN_COMPONENT, GENERATION_QUALIFIER, GIVEN_NAME,
    INITIALS, LOCALITY_NAME, ORGANIZATIONAL_UNIT_NAME, ORGANIZATION_NAME, SERIAL_NUMBER, STREET,
    SURNAME, TITLE, UID,
};
use der::asn1::ObjectIdentifier;
use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// `StringMap` is a typedef for the keyword override maps accepted by parsing and rendering
/// functions.
pub type StringMap = BTreeMap<String, String>;

/// Sun-defined attribute type used by the `IP` keyword.
pub const IP_ADDRESS_ATTRIBUTE: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.42.2.11.2.1");

/// `DnFormat` identifies one of the three textual dialects for distinguished names.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DnFormat {
    /// Loose legacy form: commas or semicolons separate RDNs, whitespace is tolerated around
    /// separators, values may be quoted.
    #[default]
    Default,
    /// RFC 1779 form
    Rfc1779,
    /// RFC 2253 (RFC 4514) form: strict escaping, no quoting.
    Rfc2253,
}

/// One row of the keyword table
#[derive(Clone, Debug)]
pub struct KeywordEntry {
    /// Upper case keyword
    pub keyword: &'static str,
    /// Attribute type the keyword stands for
    pub oid: ObjectIdentifier,
    /// Whether RFC 1779 defines the keyword
    pub rfc1779: bool,
    /// Whether RFC 2253 defines the keyword
    pub rfc2253: bool,
}

impl KeywordEntry {
    const fn new(
        keyword: &'static str,
        oid: ObjectIdentifier,
        rfc1779: bool,
        rfc2253: bool,
    ) -> Self {
        KeywordEntry {
            keyword,
            oid,
            rfc1779,
            rfc2253,
        }
    }

    /// Returns true if the keyword may be used with the given dialect
    pub fn is_compliant(&self, format: DnFormat) -> bool {
        match format {
            DnFormat::Default => true,
            DnFormat::Rfc1779 => self.rfc1779,
            DnFormat::Rfc2253 => self.rfc2253,
        }
    }
}

// Where two keywords share an OID, the later row is the one used for rendering.
static KEYWORD_TABLE: &[KeywordEntry] = &[
    KeywordEntry::new("CN", COMMON_NAME, true, true),
    KeywordEntry::new("C", COUNTRY_NAME, true, true),
    KeywordEntry::new("L", LOCALITY_NAME, true, true),
    KeywordEntry::new("S", STATE_OR_PROVINCE_NAME, false, false),
    KeywordEntry::new("ST", STATE_OR_PROVINCE_NAME, true, true),
    KeywordEntry::new("O", ORGANIZATION_NAME, true, true),
    KeywordEntry::new("OU", ORGANIZATIONAL_UNIT_NAME, true, true),
    KeywordEntry::new("T", TITLE, false, false),
    KeywordEntry::new("IP", IP_ADDRESS_ATTRIBUTE, false, false),
    KeywordEntry::new("STREET", STREET, true, true),
    KeywordEntry::new("DC", DOMAIN_COMPONENT, false, true),
    KeywordEntry::new("DNQUALIFIER", DN_QUALIFIER, false, false),
    KeywordEntry::new("DNQ", DN_QUALIFIER, false, false),
    KeywordEntry::new("SURNAME", SURNAME, false, false),
    KeywordEntry::new("GIVENNAME", GIVEN_NAME, false, false),
    KeywordEntry::new("INITIALS", INITIALS, false, false),
    KeywordEntry::new("GENERATION", GENERATION_QUALIFIER, false, false),
    KeywordEntry::new("EMAIL", EMAIL_ADDRESS, false, false),
    KeywordEntry::new("EMAILADDRESS", EMAIL_ADDRESS, false, false),
    KeywordEntry::new("UID", UID, false, true),
    KeywordEntry::new("SERIALNUMBER", SERIAL_NUMBER, false, false),
];

/// `KeywordRegistry` provides constant time lookup by keyword and by OID over the keyword table.
#[derive(Debug)]
pub struct KeywordRegistry {
    by_keyword: HashMap<&'static str, &'static KeywordEntry>,
    by_oid: HashMap<ObjectIdentifier, &'static KeywordEntry>,
}

lazy_static! {
    static ref STANDARD_REGISTRY: KeywordRegistry = KeywordRegistry::build(KEYWORD_TABLE);
}

impl KeywordRegistry {
    fn build(table: &'static [KeywordEntry]) -> Self {
        let mut by_keyword = HashMap::new();
        let mut by_oid = HashMap::new();
        for entry in table {
            by_keyword.insert(entry.keyword, entry);
            by_oid.insert(entry.oid, entry);
        }
        KeywordRegistry { by_keyword, by_oid }
    }

    /// Returns the process-wide registry built from the standard keyword table
    pub fn standard() -> &'static KeywordRegistry {
        &STANDARD_REGISTRY
    }

    /// Returns the entry for an upper case keyword, if any
    pub fn entry_for_keyword(&self, keyword: &str) -> Option<&'static KeywordEntry> {
        self.by_keyword.get(keyword).copied()
    }

    /// Returns the entry used when rendering the given OID, if any
    pub fn entry_for_oid(&self, oid: &ObjectIdentifier) -> Option<&'static KeywordEntry> {
        self.by_oid.get(oid).copied()
    }

    /// Resolves the keyword portion of an AVA to an OID.
    ///
    /// The caller's `extra` map (keyword to dotted OID) is consulted before the registry. When no
    /// compliant keyword is found, the keyword must be a dotted OID; RFC 1779 requires the `OID.`
    /// prefix and the default dialect permits it.
    pub fn keyword_to_oid(
        &self,
        keyword: &str,
        format: DnFormat,
        extra: &StringMap,
    ) -> Result<ObjectIdentifier> {
        let mut keyword = keyword.to_ascii_uppercase();
        if format == DnFormat::Rfc2253 {
            if keyword.starts_with(' ') || keyword.ends_with(' ') {
                debug!("Invalid leading or trailing space in keyword \"{}\"", keyword);
                return Err(Error::InvalidKeyword);
            }
        } else {
            keyword = keyword.trim().to_string();
        }

        if let Some((_, oid_str)) = extra.iter().find(|(k, _)| k.eq_ignore_ascii_case(&keyword)) {
            return ObjectIdentifier::from_str(oid_str).map_err(|_| {
                debug!("Keyword map entry {} has malformed OID {}", keyword, oid_str);
                Error::InvalidKeyword
            });
        }
        if let Some(entry) = self.entry_for_keyword(&keyword) {
            if entry.is_compliant(format) {
                return Ok(entry.oid);
            }
        }

        let dotted = match format {
            DnFormat::Rfc1779 => match keyword.strip_prefix("OID.") {
                Some(rest) => rest,
                None => {
                    debug!("Invalid RFC1779 keyword: {}", keyword);
                    return Err(Error::InvalidKeyword);
                }
            },
            DnFormat::Default => keyword.strip_prefix("OID.").unwrap_or(keyword.as_str()),
            DnFormat::Rfc2253 => keyword.as_str(),
        };
        if !dotted.starts_with(|c: char| c.is_ascii_digit()) {
            debug!("Invalid keyword \"{}\"", keyword);
            return Err(Error::InvalidKeyword);
        }
        ObjectIdentifier::from_str(dotted).map_err(|_| {
            debug!("Invalid OID keyword \"{}\"", dotted);
            Error::InvalidKeyword
        })
    }

    /// Returns the keyword used to render the given OID in the given dialect.
    ///
    /// The caller's `extra` map (dotted OID to keyword) takes precedence. Without a compliant
    /// keyword the dotted OID is returned, prefixed with `OID.` for all dialects other than RFC 2253.
    pub fn oid_to_keyword(
        &self,
        oid: &ObjectIdentifier,
        format: DnFormat,
        extra: &StringMap,
    ) -> Result<String> {
        let oid_string = oid.to_string();
        if let Some(keyword) = extra.get(&oid_string) {
            return check_keyword_override(keyword);
        }
        if let Some(entry) = self.entry_for_oid(oid) {
            if entry.is_compliant(format) {
                return Ok(entry.keyword.to_string());
            }
        }
        match format {
            DnFormat::Rfc2253 => Ok(oid_string),
            _ => Ok(format!("OID.{}", oid_string)),
        }
    }

    /// Returns true if the OID has a keyword that is compliant with the given dialect
    pub fn has_keyword(&self, oid: &ObjectIdentifier, format: DnFormat) -> bool {
        self.entry_for_oid(oid)
            .map(|e| e.is_compliant(format))
            .unwrap_or(false)
    }
}

/// Override keywords must start with a letter and contain only letters, digits and underscores.
fn check_keyword_override(keyword: &str) -> Result<String> {
    let keyword = keyword.trim();
    let mut chars = keyword.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => {
            debug!("Keyword override \"{}\" does not start with a letter", keyword);
            return Err(Error::InvalidKeyword);
        }
    }
    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        debug!(
            "Keyword override \"{}\" contains a character that is not a letter, digit, or underscore",
            keyword
        );
        return Err(Error::InvalidKeyword);
    }
    Ok(keyword.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_keyword() {
        let reg = KeywordRegistry::standard();
        let none = StringMap::new();
        assert_eq!(
            reg.keyword_to_oid("cn", DnFormat::Default, &none).unwrap(),
            COMMON_NAME
        );
        assert_eq!(
            reg.keyword_to_oid(" st ", DnFormat::Rfc1779, &none).unwrap(),
            STATE_OR_PROVINCE_NAME
        );
        // S is only legal in the loose dialect
        assert!(reg.keyword_to_oid("S", DnFormat::Rfc1779, &none).is_err());
        assert_eq!(
            reg.keyword_to_oid("S", DnFormat::Default, &none).unwrap(),
            STATE_OR_PROVINCE_NAME
        );
        assert_eq!(
            reg.keyword_to_oid("DC", DnFormat::Rfc2253, &none).unwrap(),
            DOMAIN_COMPONENT
        );
        assert_eq!(
            reg.keyword_to_oid(" CN", DnFormat::Rfc2253, &none),
            Err(Error::InvalidKeyword)
        );
    }

    #[test]
    fn lookup_dotted_oids() {
        let reg = KeywordRegistry::standard();
        let none = StringMap::new();
        assert_eq!(
            reg.keyword_to_oid("OID.2.5.4.3", DnFormat::Rfc1779, &none).unwrap(),
            COMMON_NAME
        );
        assert_eq!(
            reg.keyword_to_oid("2.5.4.3", DnFormat::Rfc1779, &none),
            Err(Error::InvalidKeyword)
        );
        assert_eq!(
            reg.keyword_to_oid("2.5.4.3", DnFormat::Default, &none).unwrap(),
            COMMON_NAME
        );
        assert_eq!(
            reg.keyword_to_oid("1.2.3.4", DnFormat::Rfc2253, &none).unwrap(),
            ObjectIdentifier::new_unwrap("1.2.3.4")
        );
        assert_eq!(
            reg.keyword_to_oid("NOTAKEYWORD", DnFormat::Default, &none),
            Err(Error::InvalidKeyword)
        );
    }

    #[test]
    fn lookup_by_oid() {
        let reg = KeywordRegistry::standard();
        let none = StringMap::new();
        assert_eq!(
            reg.oid_to_keyword(&STATE_OR_PROVINCE_NAME, DnFormat::Default, &none)
                .unwrap(),
            "ST"
        );
        assert_eq!(
            reg.oid_to_keyword(&DN_QUALIFIER, DnFormat::Default, &none)
                .unwrap(),
            "DNQ"
        );
        assert_eq!(
            reg.oid_to_keyword(&EMAIL_ADDRESS, DnFormat::Rfc2253, &none)
                .unwrap(),
            "1.2.840.113549.1.9.1"
        );
        assert_eq!(
            reg.oid_to_keyword(&EMAIL_ADDRESS, DnFormat::Rfc1779, &none)
                .unwrap(),
            "OID.1.2.840.113549.1.9.1"
        );
        assert!(reg.has_keyword(&UID, DnFormat::Rfc2253));
        assert!(!reg.has_keyword(&UID, DnFormat::Rfc1779));
    }

    #[test]
    fn keyword_overrides() {
        let reg = KeywordRegistry::standard();
        let mut keywords = StringMap::new();
        keywords.insert("EMAILADDR".to_string(), EMAIL_ADDRESS.to_string());
        assert_eq!(
            reg.keyword_to_oid("emailAddr", DnFormat::Rfc2253, &keywords)
                .unwrap(),
            EMAIL_ADDRESS
        );

        let mut oids = StringMap::new();
        oids.insert(EMAIL_ADDRESS.to_string(), "emailAddress".to_string());
        assert_eq!(
            reg.oid_to_keyword(&EMAIL_ADDRESS, DnFormat::Rfc2253, &oids)
                .unwrap(),
            "emailAddress"
        );
        oids.insert(EMAIL_ADDRESS.to_string(), "1email".to_string());
        assert_eq!(
            reg.oid_to_keyword(&EMAIL_ADDRESS, DnFormat::Rfc2253, &oids),
            Err(Error::InvalidKeyword)
        );
        oids.insert(EMAIL_ADDRESS.to_string(), "e-mail".to_string());
        assert_eq!(
            reg.oid_to_keyword(&EMAIL_ADDRESS, DnFormat::Rfc2253, &oids),
            Err(Error::InvalidKeyword)
        );
    }
}
