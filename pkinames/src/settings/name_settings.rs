//! Structures and functions related to configuring name parsing and name constraints processing

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use der::asn1::{ObjectIdentifier, Utf8StringRef};
use der::{Decode, Encode};
use log::error;
use serde::{Deserialize, Serialize};
use subtle_encoding::hex;

use pkiprocmacros::*;

use crate::constraints::general_subtree::GeneralSubtree;
use crate::constraints::general_subtrees::GeneralSubtrees;
use crate::names::dn::DistinguishedName;
use crate::names::general_name::{GeneralName, NameTypes};
use crate::names::keywords::{DnFormat, StringMap};
use crate::names::other_names::OtherName;
use crate::{Error, Result};

/// Microsoft User Principal Name OID (see <https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-wcce/ea9ef420-4cbf-44bc-b093-c4175139f90f>)
pub const MSFT_USER_PRINCIPAL_NAME: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.20.2.3");

/// `NameSettings` is a typedef for a `BTreeMap` that maps `PS_*` keys to a variant map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSettings(pub BTreeMap<String, NameSettingsTypes>);

impl NameSettings {
    /// Creates a new empty [`NameSettings`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the settings as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            error!("Failed to serialize name settings: {}", e);
            Error::ParseError
        })
    }

    /// Parses settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            error!("Failed to parse name settings: {}", e);
            Error::ParseError
        })
    }

    /// Parses a distinguished name string using the dialect and keyword map held in the settings
    pub fn parse_dn(&self, s: &str) -> Result<DistinguishedName> {
        DistinguishedName::parse(s, get_dn_format(self), &get_keyword_map(self))
    }

    /// Renders a distinguished name using the dialect and OID map held in the settings
    pub fn render_dn(&self, dn: &DistinguishedName) -> Result<String> {
        let oid_map = get_oid_map(self);
        match get_dn_format(self) {
            DnFormat::Rfc2253 => dn.to_rfc2253_string_with(&oid_map),
            DnFormat::Rfc1779 => dn.to_rfc1779_string_with(&oid_map),
            DnFormat::Default => dn.to_string_with(&oid_map),
        }
    }
}

/// `read_settings` reads a JSON file containing [`NameSettings`]
pub fn read_settings(path: impl AsRef<Path>) -> Result<NameSettings> {
    let path = path.as_ref();
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to read settings from {}: {}", path.display(), e);
            return Err(Error::NotFound);
        }
    };
    NameSettings::from_json(&json)
}

/// `NameSettingsTypes` is used to define a variant map with types associated with name processing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameSettingsTypes {
    /// Represents bool values
    Bool(bool),
    /// Represents String values
    String(String),
    /// Represents DnFormat values
    DnFormat(DnFormat),
    /// Represents string to string maps
    StringMap(StringMap),
    /// Represents textual name constraints
    NameConstraintsSettings(NameConstraintsSettings),
}

//-----------------------------------------------------------------------------------------------
// Settings keys
//-----------------------------------------------------------------------------------------------
/// `PS_DN_FORMAT` is used to retrieve the [`DnFormat`] used by [`NameSettings::parse_dn`] and
/// [`NameSettings::render_dn`]. The default value is [`DnFormat::Default`].
pub static PS_DN_FORMAT: &str = "psDnFormat";

/// `PS_KEYWORD_MAP` is used to retrieve a map of additional attribute keywords to dotted OIDs that
/// are accepted when parsing. The default value is an empty map.
pub static PS_KEYWORD_MAP: &str = "psKeywordMap";

/// `PS_OID_MAP` is used to retrieve a map of dotted OIDs to keywords that are used when rendering,
/// taking precedence over the standard keywords. The default value is an empty map.
pub static PS_OID_MAP: &str = "psOidMap";

/// `PS_INITIAL_PERMITTED_SUBTREES` is used to retrieve a [`NameConstraintsSettings`] value. This
/// corresponds to the initial-permitted-subtrees value described in RFC 5280 section 6.1.1. There
/// is no default.
pub static PS_INITIAL_PERMITTED_SUBTREES: &str = "psInitialPermittedSubtrees";

/// `PS_INITIAL_EXCLUDED_SUBTREES` is used to retrieve a [`NameConstraintsSettings`] value. This
/// corresponds to the initial-excluded-subtrees value described in RFC 5280 section 6.1.1. There is
/// no default.
pub static PS_INITIAL_EXCLUDED_SUBTREES: &str = "psInitialExcludedSubtrees";

/// `PS_EMAIL_IN_DN_FALLBACK` is used to retrieve a boolean value. When true and a certificate has
/// no subject alternative name extension, emailAddress attributes in the subject name are checked
/// against rfc822Name constraints. The default value is true.
pub static PS_EMAIL_IN_DN_FALLBACK: &str = "psEmailInDnFallback";

/// `PS_CN_IN_DN_FALLBACK` is used to retrieve a boolean value. When true, the most specific common
/// name in the subject is checked against iPAddress or dNSName constraints if the subject
/// alternative names hold no name of that form. The default value is false.
pub static PS_CN_IN_DN_FALLBACK: &str = "psCnInDnFallback";

nps_gets_and_sets_with_default!(PS_DN_FORMAT, DnFormat, DnFormat::Default);
nps_gets_and_sets_with_default!(PS_KEYWORD_MAP, StringMap, StringMap::new());
nps_gets_and_sets_with_default!(PS_OID_MAP, StringMap, StringMap::new());
nps_gets_and_sets!(PS_INITIAL_PERMITTED_SUBTREES, NameConstraintsSettings);
nps_gets_and_sets!(PS_INITIAL_EXCLUDED_SUBTREES, NameConstraintsSettings);
nps_gets_and_sets_with_default!(PS_EMAIL_IN_DN_FALLBACK, bool, true);
nps_gets_and_sets_with_default!(PS_CN_IN_DN_FALLBACK, bool, false);

/// `NameConstraintsSettings` is a serialization-friendly form of a list of subtrees. Each field
/// lists the bases of one form as strings. Subtrees with no textual form (or carrying a minimum or
/// maximum) are listed in `not_supported` as upper case hex encodings of the GeneralSubtree.
#[derive(Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct NameConstraintsSettings {
    /// user_principal_name governs use of UPN values in otherName instances in SANs
    pub user_principal_name: Option<Vec<String>>,
    /// rfc822_name governs use of email addresses in SANs
    pub rfc822_name: Option<Vec<String>>,
    /// dns_name governs use of DNS names in SANs
    pub dns_name: Option<Vec<String>>,
    /// directory_name governs use of DNs in SANs and subject fields
    pub directory_name: Option<Vec<String>>,
    /// uniform_resource_identifier governs use of URIs in SANs
    pub uniform_resource_identifier: Option<Vec<String>>,
    /// ip_address governs use of IP addresses in SANs
    pub ip_address: Option<Vec<String>>,
    /// registered_id governs use of registered IDs in SANs
    pub registered_id: Option<Vec<String>>,
    /// ASCII hex encodings of subtrees that have no textual form here
    pub not_supported: Option<Vec<String>>,
}

fn push_string(field: &mut Option<Vec<String>>, value: String) {
    field.get_or_insert_with(Vec::new).push(value);
}

fn upn_subtree(upn: &str) -> Result<GeneralSubtree> {
    let value = Utf8StringRef::new(upn)?.to_der()?;
    Ok(GeneralSubtree::new(GeneralName::OtherName(OtherName {
        type_id: MSFT_USER_PRINCIPAL_NAME,
        value,
    })))
}

fn upn_string(on: &OtherName) -> Option<String> {
    if on.type_id != MSFT_USER_PRINCIPAL_NAME {
        return None;
    }
    Utf8StringRef::from_der(&on.value)
        .ok()
        .map(|s| s.as_str().to_string())
}

impl NameConstraintsSettings {
    /// Builds the subtree list described by the settings. Names are listed by form in GeneralName
    /// tag order, followed by the `not_supported` entries.
    pub fn to_subtrees(&self) -> Result<GeneralSubtrees> {
        let mut trees = GeneralSubtrees::default();
        if let Some(upns) = &self.user_principal_name {
            for upn in upns {
                trees.push(upn_subtree(upn)?);
            }
        }
        let textual = [
            (NameTypes::Rfc822Name, &self.rfc822_name),
            (NameTypes::DnsName, &self.dns_name),
            (NameTypes::DirectoryName, &self.directory_name),
            (NameTypes::UniformResourceIdentifier, &self.uniform_resource_identifier),
            (NameTypes::IpAddress, &self.ip_address),
            (NameTypes::RegisteredId, &self.registered_id),
        ];
        for (name_type, values) in textual {
            if let Some(values) = values {
                for value in values {
                    // the empty iPAddress only exists as the widest name
                    let base = if value.is_empty() && name_type == NameTypes::IpAddress {
                        GeneralName::widest(name_type)?
                    } else {
                        GeneralName::from_type_and_string(name_type, value)?
                    };
                    trees.push(GeneralSubtree::new(base));
                }
            }
        }
        if let Some(encodings) = &self.not_supported {
            for encoding in encodings {
                let der = match hex::decode(encoding.as_bytes()) {
                    Ok(der) => der,
                    Err(_) => {
                        error!("Failed to decode hex subtree {}", encoding);
                        return Err(Error::MalformedDer);
                    }
                };
                trees.push(GeneralSubtree::from_der(&der)?);
            }
        }
        Ok(trees)
    }

    /// Describes a subtree list in settings form
    pub fn from_subtrees(trees: &GeneralSubtrees) -> Result<Self> {
        let mut settings = NameConstraintsSettings::default();
        for tree in trees {
            if !tree.is_supported() {
                settings.push_not_supported(tree)?;
                continue;
            }
            match &tree.base {
                GeneralName::OtherName(on) => match upn_string(on) {
                    Some(upn) => push_string(&mut settings.user_principal_name, upn),
                    None => settings.push_not_supported(tree)?,
                },
                GeneralName::Rfc822Name(n) => {
                    push_string(&mut settings.rfc822_name, n.as_str().to_string())
                }
                GeneralName::DnsName(n) => {
                    push_string(&mut settings.dns_name, n.as_str().to_string())
                }
                GeneralName::DirectoryName(dn) => {
                    push_string(&mut settings.directory_name, dn.to_string())
                }
                GeneralName::UniformResourceIdentifier(u) => push_string(
                    &mut settings.uniform_resource_identifier,
                    u.as_str().to_string(),
                ),
                GeneralName::IpAddress(ip) => {
                    push_string(&mut settings.ip_address, ip.to_string())
                }
                GeneralName::RegisteredId(oid) => {
                    push_string(&mut settings.registered_id, oid.to_string())
                }
                _ => settings.push_not_supported(tree)?,
            }
        }
        Ok(settings)
    }

    fn push_not_supported(&mut self, tree: &GeneralSubtree) -> Result<()> {
        let encoding = String::from_utf8(hex::encode_upper(tree.to_der()?)).unwrap_or_default();
        push_string(&mut self.not_supported, encoding);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::other_names::X400Address;
    use const_oid::db::rfc5280::ID_PE_SUBJECT_INFO_ACCESS;

    #[test]
    fn defaults() {
        let nps = NameSettings::new();
        assert_eq!(get_dn_format(&nps), DnFormat::Default);
        assert!(get_keyword_map(&nps).is_empty());
        assert!(get_oid_map(&nps).is_empty());
        assert!(get_initial_permitted_subtrees(&nps).is_none());
        assert!(get_initial_excluded_subtrees(&nps).is_none());
        assert!(get_email_in_dn_fallback(&nps));
        assert!(!get_cn_in_dn_fallback(&nps));
    }

    #[test]
    fn gets_and_sets() {
        let mut nps = NameSettings::new();
        set_dn_format(&mut nps, DnFormat::Rfc2253);
        set_cn_in_dn_fallback(&mut nps, true);
        let mut keywords = StringMap::new();
        keywords.insert("SIA".to_string(), ID_PE_SUBJECT_INFO_ACCESS.to_string());
        set_keyword_map(&mut nps, keywords.clone());
        assert_eq!(get_dn_format(&nps), DnFormat::Rfc2253);
        assert!(get_cn_in_dn_fallback(&nps));
        assert_eq!(get_keyword_map(&nps), keywords);

        // a value of the wrong variant reads as the default
        nps.0
            .insert(PS_DN_FORMAT.to_string(), NameSettingsTypes::Bool(true));
        assert_eq!(get_dn_format(&nps), DnFormat::Default);
    }

    #[test]
    fn parse_and_render_dn() {
        let mut nps = NameSettings::new();
        let mut keywords = StringMap::new();
        keywords.insert("SIA".to_string(), ID_PE_SUBJECT_INFO_ACCESS.to_string());
        set_keyword_map(&mut nps, keywords);
        set_dn_format(&mut nps, DnFormat::Rfc2253);
        let dn = nps.parse_dn("SIA=x,CN=Bob,O=Example").unwrap();
        assert_eq!(dn.len(), 3);
        assert_eq!(
            nps.render_dn(&dn).unwrap(),
            "1.3.6.1.5.5.7.1.11=#130178,CN=Bob,O=Example"
        );

        let mut oid_map = StringMap::new();
        oid_map.insert(ID_PE_SUBJECT_INFO_ACCESS.to_string(), "SIA".to_string());
        set_oid_map(&mut nps, oid_map);
        assert_eq!(nps.render_dn(&dn).unwrap(), "SIA=x,CN=Bob,O=Example");
    }

    #[test]
    fn subtrees_from_settings() {
        let ncs = NameConstraintsSettings {
            user_principal_name: Some(vec!["user@example.com".to_string()]),
            dns_name: Some(vec!["example.com".to_string(), ".example.org".to_string()]),
            directory_name: Some(vec!["O=Example, C=US".to_string()]),
            ip_address: Some(vec!["10.0.0.0/255.0.0.0".to_string()]),
            registered_id: Some(vec!["1.2.3.4".to_string()]),
            ..Default::default()
        };
        let trees = ncs.to_subtrees().unwrap();
        assert_eq!(trees.len(), 6);
        assert_eq!(trees.get(1).unwrap().base.to_string(), "DNSName: example.com");
        assert_eq!(
            trees.get(4).unwrap().base.to_string(),
            "IPAddress: 10.0.0.0/255.0.0.0"
        );
        assert_eq!(NameConstraintsSettings::from_subtrees(&trees).unwrap(), ncs);
    }

    #[test]
    fn widest_names_in_settings() {
        let trees = GeneralSubtrees::new(vec![
            GeneralSubtree::new(GeneralName::widest(NameTypes::IpAddress).unwrap()),
            GeneralSubtree::new(GeneralName::widest(NameTypes::DnsName).unwrap()),
        ]);
        let ncs = NameConstraintsSettings::from_subtrees(&trees).unwrap();
        assert_eq!(ncs.ip_address, Some(vec![String::new()]));
        assert_eq!(ncs.dns_name, Some(vec![String::new()]));
        assert!(ncs.not_supported.is_none());
        assert_eq!(ncs.to_subtrees().unwrap(), trees);
    }

    #[test]
    fn unsupported_subtrees_as_hex() {
        let mut with_max =
            GeneralSubtree::new(GeneralName::from_type_and_string(NameTypes::DnsName, "a.com").unwrap());
        with_max.maximum = Some(3);
        let x400 = GeneralSubtree::new(GeneralName::X400Address(X400Address(vec![0x30, 0x00])));
        let trees = GeneralSubtrees::new(vec![with_max.clone(), x400.clone()]);

        let ncs = NameConstraintsSettings::from_subtrees(&trees).unwrap();
        assert_eq!(
            ncs.not_supported,
            Some(vec!["300A8205612E636F6D810103".to_string(), "3004A3023000".to_string()])
        );
        assert!(ncs.dns_name.is_none());
        assert_eq!(ncs.to_subtrees().unwrap(), trees);

        let bad = NameConstraintsSettings {
            not_supported: Some(vec!["3G".to_string()]),
            ..Default::default()
        };
        assert_eq!(bad.to_subtrees().err(), Some(Error::MalformedDer));
    }

    #[test]
    fn invalid_textual_names() {
        let ncs = NameConstraintsSettings {
            dns_name: Some(vec!["-bad.example.com".to_string()]),
            ..Default::default()
        };
        assert_eq!(ncs.to_subtrees().err(), Some(Error::InvalidName));
    }

    #[test]
    fn json_round_trip() {
        let mut nps = NameSettings::new();
        set_dn_format(&mut nps, DnFormat::Rfc1779);
        set_email_in_dn_fallback(&mut nps, false);
        set_initial_permitted_subtrees(
            &mut nps,
            NameConstraintsSettings {
                dns_name: Some(vec!["example.com".to_string()]),
                ..Default::default()
            },
        );
        let json = nps.to_json().unwrap();
        let parsed = NameSettings::from_json(&json).unwrap();
        assert_eq!(parsed, nps);
        assert!(NameSettings::from_json("{not json").is_err());
    }
}
