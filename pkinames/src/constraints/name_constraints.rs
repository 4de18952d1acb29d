//! The name constraints extension and the checks applied to certificate names
//!
//! ```text
//! NameConstraints ::= SEQUENCE {
//!      permittedSubtrees       [0]     GeneralSubtrees OPTIONAL,
//!      excludedSubtrees        [1]     GeneralSubtrees OPTIONAL }
//! ```

use core::fmt;
use std::net::IpAddr;

use const_oid::db::rfc3280::EMAIL_ADDRESS;
use const_oid::db::rfc5280::{ID_CE_NAME_CONSTRAINTS, ID_CE_SUBJECT_ALT_NAME};
use der::{Decode, Encode, Sequence};
use log::{debug, info};
use x509_cert::ext::Extension;
use x509_cert::Certificate;

use crate::constraints::general_subtrees::GeneralSubtrees;
use crate::names::dn::DistinguishedName;
use crate::names::dns_name::DnsName;
use crate::names::general_name::{GeneralName, GeneralNames, NameRelation, NameTypes};
use crate::names::ip_address_name::IpAddressName;
use crate::names::rfc822_name::Rfc822Name;
use crate::settings::name_settings::{
    get_cn_in_dn_fallback, get_email_in_dn_fallback, get_initial_excluded_subtrees,
    get_initial_permitted_subtrees, NameSettings,
};
use crate::util::logging::log_error_for_name;
use crate::{Error, Result};

/// `NameConstraints` holds permitted and excluded subtrees, either as carried in a certificate
/// extension or as the state accumulated while processing a certification path.
///
/// An absent list places no constraint. A present but empty permitted list, which merging can
/// produce, permits every name of every form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Sequence)]
pub struct NameConstraints {
    /// Names must lie within one of these subtrees
    #[asn1(
        context_specific = "0",
        optional = "true",
        tag_mode = "IMPLICIT",
        constructed = "true"
    )]
    pub permitted_subtrees: Option<GeneralSubtrees>,
    /// Names must not lie within any of these subtrees
    #[asn1(
        context_specific = "1",
        optional = "true",
        tag_mode = "IMPLICIT",
        constructed = "true"
    )]
    pub excluded_subtrees: Option<GeneralSubtrees>,
}

fn union_into(target: &mut Option<GeneralSubtrees>, addition: &GeneralSubtrees) -> Result<()> {
    match target {
        Some(trees) => trees.union(addition),
        None => {
            *target = Some(addition.clone());
            Ok(())
        }
    }
}

impl NameConstraints {
    /// Creates name constraints from the given lists
    pub fn new(permitted: Option<GeneralSubtrees>, excluded: Option<GeneralSubtrees>) -> Self {
        NameConstraints {
            permitted_subtrees: permitted,
            excluded_subtrees: excluded,
        }
    }

    /// Builds the initial state from `PS_INITIAL_PERMITTED_SUBTREES` and
    /// `PS_INITIAL_EXCLUDED_SUBTREES`.
    pub fn from_settings(settings: &NameSettings) -> Result<Self> {
        let permitted = get_initial_permitted_subtrees(settings)
            .map(|ncs| ncs.to_subtrees())
            .transpose()?;
        let excluded = get_initial_excluded_subtrees(settings)
            .map(|ncs| ncs.to_subtrees())
            .transpose()?;
        Ok(NameConstraints::new(permitted, excluded))
    }

    /// Decodes the value of a name constraints extension
    pub fn from_extension(ext: &Extension) -> Result<Self> {
        if ext.extn_id != ID_CE_NAME_CONSTRAINTS {
            debug!("Extension {} is not a name constraints extension", ext.extn_id);
            return Err(Error::NotFound);
        }
        Ok(NameConstraints::from_der(ext.extn_value.as_bytes())?)
    }

    /// Returns true if neither list is present
    pub fn is_empty(&self) -> bool {
        self.permitted_subtrees.is_none() && self.excluded_subtrees.is_none()
    }

    /// Merges the constraints from a later certificate in a path into this state.
    ///
    /// Excluded subtrees are united and permitted subtrees intersected. Whatever the intersection
    /// cannot express is added to the excluded subtrees, then permitted subtrees that are excluded
    /// are dropped.
    pub fn merge(&mut self, new: &NameConstraints) -> Result<()> {
        if let Some(new_excluded) = &new.excluded_subtrees {
            union_into(&mut self.excluded_subtrees, new_excluded)?;
        }

        if let Some(new_permitted) = &new.permitted_subtrees {
            match &mut self.permitted_subtrees {
                None => self.permitted_subtrees = Some(new_permitted.clone()),
                Some(permitted) => {
                    if let Some(spillover) = permitted.intersect(new_permitted)? {
                        union_into(&mut self.excluded_subtrees, &spillover)?;
                    }
                }
            }
        }

        if let (Some(permitted), Some(excluded)) =
            (&mut self.permitted_subtrees, &self.excluded_subtrees)
        {
            permitted.reduce(excluded)?;
        }
        Ok(())
    }

    /// Checks a single name. The name is rejected if it matches or lies within an excluded
    /// subtree. If permitted subtrees of the name's form are present, the name must match or lie
    /// within one of them.
    ///
    /// Fails with [`Error::UnsupportedConstraintConfig`] if a subtree that is compared with the
    /// name has a minimum or maximum.
    pub fn verify(&self, name: &GeneralName) -> Result<bool> {
        if let Some(excluded) = &self.excluded_subtrees {
            for tree in excluded {
                match tree.constrains(name)? {
                    NameRelation::Match | NameRelation::Narrows => {
                        info!("{} is within excluded subtree {}", name, tree);
                        return Ok(false);
                    }
                    _ => {}
                }
            }
        }

        if let Some(permitted) = &self.permitted_subtrees {
            let mut same_type = false;
            for tree in permitted {
                match tree.constrains(name)? {
                    NameRelation::DiffType => {}
                    NameRelation::Match | NameRelation::Narrows => return Ok(true),
                    NameRelation::Widens | NameRelation::SameType => same_type = true,
                }
            }
            if same_type {
                info!("{} is not within any permitted subtree", name);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Checks the names of a certificate subject: the subject name itself, every subject
    /// alternative name and, per `settings`, names drawn from subject attributes.
    ///
    /// Without a subject alternative name extension, emailAddress attributes are checked as
    /// rfc822Name values (`PS_EMAIL_IN_DN_FALLBACK`). The most specific common name may be checked
    /// as an iPAddress or dNSName (`PS_CN_IN_DN_FALLBACK`) when the alternative names hold no name
    /// of that form.
    pub fn verify_names(
        &self,
        subject: &DistinguishedName,
        alt_names: Option<&GeneralNames>,
        settings: &NameSettings,
    ) -> Result<bool> {
        match self.verify_subject_names(subject, alt_names, settings) {
            Err(Error::UnsupportedConstraintConfig) => {
                log_error_for_name(subject, "Unsupported name constraints encountered");
                Err(Error::UnsupportedConstraintConfig)
            }
            r => r,
        }
    }

    fn verify_subject_names(
        &self,
        subject: &DistinguishedName,
        alt_names: Option<&GeneralNames>,
        settings: &NameSettings,
    ) -> Result<bool> {
        if !subject.is_empty() && !self.verify(&GeneralName::DirectoryName(subject.clone()))? {
            return Ok(false);
        }

        let mut names = match alt_names {
            Some(alt_names) => alt_names.clone(),
            None => {
                let mut names = GeneralNames::default();
                if get_email_in_dn_fallback(settings) {
                    for ava in subject.all_avas().iter().rev() {
                        if *ava.oid() != EMAIL_ADDRESS {
                            continue;
                        }
                        let email = ava
                            .value_string()
                            .filter(|v| !v.is_empty())
                            .and_then(|v| Rfc822Name::new(&v).ok());
                        match email {
                            Some(email) => names.0.push(GeneralName::Rfc822Name(email)),
                            None => debug!("Skipping emailAddress attribute that is not a mailbox"),
                        }
                    }
                }
                names
            }
        };

        if get_cn_in_dn_fallback(settings) {
            if let Some(cn) = subject.common_name() {
                let types = names.name_types();
                match cn.parse::<IpAddr>() {
                    Ok(addr) => {
                        if !types.contains(NameTypes::IpAddress) {
                            names.0.push(GeneralName::IpAddress(IpAddressName::from(addr)));
                        }
                    }
                    Err(_) => {
                        if !types.contains(NameTypes::DnsName) {
                            match DnsName::new(&cn) {
                                Ok(dns) if !dns.is_empty() => {
                                    names.0.push(GeneralName::DnsName(dns))
                                }
                                _ => debug!("Common name \"{}\" is not a DNS name", cn),
                            }
                        }
                    }
                }
            }
        }

        for name in names.iter() {
            if !self.verify(name)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Checks the subject and subject alternative names of a certificate
    pub fn verify_certificate(&self, cert: &Certificate, settings: &NameSettings) -> Result<bool> {
        let tbs = &cert.tbs_certificate;
        let subject = DistinguishedName::try_from(&tbs.subject)?;
        let mut alt_names = None;
        if let Some(extensions) = &tbs.extensions {
            for ext in extensions {
                if ext.extn_id == ID_CE_SUBJECT_ALT_NAME {
                    alt_names = Some(GeneralNames::from_der(ext.extn_value.as_bytes())?);
                }
            }
        }
        self.verify_names(&subject, alt_names.as_ref(), settings)
    }
}

impl TryFrom<&x509_cert::ext::pkix::NameConstraints> for NameConstraints {
    type Error = Error;

    fn try_from(nc: &x509_cert::ext::pkix::NameConstraints) -> Result<Self> {
        Ok(NameConstraints::from_der(&nc.to_der()?)?)
    }
}

impl TryFrom<&NameConstraints> for x509_cert::ext::pkix::NameConstraints {
    type Error = Error;

    fn try_from(nc: &NameConstraints) -> Result<Self> {
        Ok(x509_cert::ext::pkix::NameConstraints::from_der(
            &nc.to_der()?,
        )?)
    }
}

impl fmt::Display for NameConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NameConstraints: [")?;
        for (label, trees) in [
            ("Permitted", &self.permitted_subtrees),
            ("Excluded", &self.excluded_subtrees),
        ] {
            if let Some(trees) = trees {
                writeln!(f, "  {}:", label)?;
                for tree in trees {
                    writeln!(f, "    {}", tree)?;
                }
            }
        }
        write!(f, "]")
    }
}
