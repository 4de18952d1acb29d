//! uniformResourceIdentifier values
//!
//! A URI in a subject alternative name is a full URI with a scheme. A URI name constraint is only a
//! host (`host.example.com`) or a domain (`.example.com`), and names are constrained by their host
//! portion alone.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::net::IpAddr;

use log::debug;
use url::{Host, Url};

use crate::names::dns_name::DnsName;
use crate::names::general_name::NameRelation;
use crate::names::ip_address_name::IpAddressName;
use crate::{Error, Result};

#[derive(Clone, Debug)]
enum UriHost {
    Absent,
    Domain(DnsName),
    Ip(IpAddressName),
}

/// `UriName` is a URI, or a host or domain used as a URI name constraint
#[derive(Clone, Debug)]
pub struct UriName {
    uri: String,
    host: String,
    host_name: UriHost,
}

impl UriName {
    /// Creates a URI name. Values without a `:` are taken to be host-only constraint forms; all
    /// other values must parse as a URI. The empty value is the widest possible constraint.
    pub fn new(uri: &str) -> Result<Self> {
        if uri.is_empty() {
            return Ok(UriName {
                uri: String::new(),
                host: String::new(),
                host_name: UriHost::Absent,
            });
        }
        if !uri.is_ascii() {
            debug!("URI name \"{}\" contains non-ASCII characters", uri);
            return Err(Error::InvalidName);
        }
        if !uri.contains(':') {
            return Self::name_constraint(uri);
        }

        let url = match Url::parse(uri) {
            Ok(url) => url,
            Err(e) => {
                debug!("Failed to parse URI name \"{}\": {}", uri, e);
                return Err(Error::InvalidName);
            }
        };
        let (host, host_name) = match url.host() {
            None => (String::new(), UriHost::Absent),
            Some(Host::Domain(d)) => {
                if d.is_empty() {
                    (String::new(), UriHost::Absent)
                } else {
                    let dns = DnsName::new(d).map_err(|e| {
                        debug!("Host portion of URI \"{}\" is not a valid DNS name", uri);
                        e
                    })?;
                    (d.to_string(), UriHost::Domain(dns))
                }
            }
            Some(Host::Ipv4(v4)) => (
                v4.to_string(),
                UriHost::Ip(IpAddressName::from(IpAddr::V4(v4))),
            ),
            Some(Host::Ipv6(v6)) => (
                format!("[{}]", v6),
                UriHost::Ip(IpAddressName::from(IpAddr::V6(v6))),
            ),
        };
        Ok(UriName {
            uri: uri.to_string(),
            host,
            host_name,
        })
    }

    fn name_constraint(host: &str) -> Result<Self> {
        let dns = DnsName::new(host.strip_prefix('.').unwrap_or(host))?;
        if dns.is_empty() {
            debug!("URI name constraint \"{}\" has no host", host);
            return Err(Error::InvalidName);
        }
        Ok(UriName {
            uri: host.to_string(),
            host: host.to_string(),
            host_name: UriHost::Domain(dns),
        })
    }

    /// The URI as given
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The host portion, empty if the URI has none
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true for the empty name
    pub fn is_empty(&self) -> bool {
        self.uri.is_empty()
    }

    /// Returns true if the value is a `.`-prefixed domain constraint
    pub fn is_domain(&self) -> bool {
        self.host.starts_with('.')
    }

    /// Returns the relation of `other` to the subtree rooted at this name by comparing hosts.
    ///
    /// A host constraint only matches URIs with that exact host. A domain constraint contains the
    /// URIs whose host is in the domain. IP literal hosts only ever match exactly.
    pub fn constrains(&self, other: &UriName) -> NameRelation {
        if self.is_empty() && other.is_empty() {
            return NameRelation::Match;
        }
        if self.is_empty() {
            return NameRelation::Narrows;
        }
        if other.is_empty() {
            return NameRelation::Widens;
        }
        if !self.host.is_empty() && self.host.eq_ignore_ascii_case(&other.host) {
            return NameRelation::Match;
        }

        let (this_dns, other_dns) = match (&self.host_name, &other.host_name) {
            (UriHost::Domain(a), UriHost::Domain(b)) => (a, b),
            (UriHost::Absent, UriHost::Absent) if self == other => return NameRelation::Match,
            _ => return NameRelation::SameType,
        };

        let this_domain = self.is_domain();
        let other_domain = other.is_domain();
        let relation = this_dns.constrains(other_dns);
        match relation {
            NameRelation::Widens | NameRelation::Narrows if !this_domain && !other_domain => {
                NameRelation::SameType
            }
            NameRelation::Match if this_domain != other_domain => {
                if this_domain {
                    NameRelation::Widens
                } else {
                    NameRelation::Narrows
                }
            }
            _ => relation,
        }
    }
}

impl PartialEq for UriName {
    fn eq(&self, other: &Self) -> bool {
        self.uri.eq_ignore_ascii_case(&other.uri)
    }
}

impl Eq for UriName {}

impl Hash for UriName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for UriName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
