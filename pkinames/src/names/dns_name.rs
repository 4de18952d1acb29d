//! dNSName values

use core::fmt;
use core::hash::{Hash, Hasher};

use log::debug;

use crate::names::general_name::NameRelation;
use crate::{Error, Result};

/// `DnsName` is a host or domain name. A leading `.` is permitted so that the value can serve as a
/// domain-only name constraint, and the empty name is the widest possible constraint.
///
/// Comparison is ASCII case-insensitive.
#[derive(Clone, Debug)]
pub struct DnsName(String);

fn check_label(label: &str, first: bool) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }
    if first && label == "*" {
        return true;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl DnsName {
    /// Creates a DNS name after checking its syntax
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Ok(DnsName(String::new()));
        }
        let domain = name.strip_prefix('.').unwrap_or(name);
        if domain.is_empty() || domain.ends_with('.') {
            debug!("DNS name \"{}\" has an empty label", name);
            return Err(Error::InvalidName);
        }
        for (i, label) in domain.split('.').enumerate() {
            if !check_label(label, i == 0 && domain.len() == name.len()) {
                debug!("DNS name \"{}\" has an invalid label \"{}\"", name, label);
                return Err(Error::InvalidName);
            }
        }
        Ok(DnsName(name.to_string()))
    }

    /// The name as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty name
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the relation of `other` to the subtree rooted at this name.
    ///
    /// A name that ends with this name at a label boundary is within it. A name beginning with `.`
    /// stands for hosts in the domain but not the domain itself, so `.example.com` contains
    /// `host.example.com` but is wider than neither `example.com` nor contained by it.
    pub fn constrains(&self, other: &DnsName) -> NameRelation {
        let this_name = self.0.to_ascii_lowercase();
        let in_name = other.0.to_ascii_lowercase();
        if in_name == this_name {
            return NameRelation::Match;
        }
        if this_name.is_empty() {
            return NameRelation::Narrows;
        }
        if in_name.is_empty() {
            return NameRelation::Widens;
        }

        if this_name.ends_with(&in_name) {
            let ndx = this_name.len() - in_name.len();
            if (this_name.as_bytes()[ndx - 1] == b'.') ^ in_name.starts_with('.') {
                NameRelation::Widens
            } else {
                NameRelation::SameType
            }
        } else if in_name.ends_with(&this_name) {
            let ndx = in_name.len() - this_name.len();
            if (in_name.as_bytes()[ndx - 1] == b'.') ^ this_name.starts_with('.') {
                NameRelation::Narrows
            } else {
                NameRelation::SameType
            }
        } else {
            NameRelation::SameType
        }
    }
}

impl PartialEq for DnsName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for DnsName {}

impl Hash for DnsName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dns(s: &str) -> DnsName {
        DnsName::new(s).unwrap()
    }

    #[test]
    fn syntax() {
        assert!(DnsName::new("example.com").is_ok());
        assert!(DnsName::new(".example.com").is_ok());
        assert!(DnsName::new("*.example.com").is_ok());
        assert!(DnsName::new("1.2.3.4").is_ok());
        assert!(DnsName::new("").unwrap().is_empty());
        assert_eq!(DnsName::new("."), Err(Error::InvalidName));
        assert_eq!(DnsName::new("example.com."), Err(Error::InvalidName));
        assert_eq!(DnsName::new("a..com"), Err(Error::InvalidName));
        assert_eq!(DnsName::new("-a.com"), Err(Error::InvalidName));
        assert_eq!(DnsName::new("a b.com"), Err(Error::InvalidName));
        assert_eq!(DnsName::new(".*.example.com"), Err(Error::InvalidName));
        assert_eq!(DnsName::new("a.*.com"), Err(Error::InvalidName));
    }

    #[test]
    fn leading_dot_constraints() {
        let base = dns(".example.com");
        assert_eq!(base.constrains(&dns("host.example.com")), NameRelation::Narrows);
        assert_eq!(base.constrains(&dns("a.b.example.com")), NameRelation::Narrows);
        assert_eq!(base.constrains(&dns("example.com")), NameRelation::Widens);
        assert_eq!(base.constrains(&dns("notexample.com")), NameRelation::SameType);
        assert_eq!(base.constrains(&dns(".EXAMPLE.com")), NameRelation::Match);
    }

    #[test]
    fn host_constraints() {
        let base = dns("example.com");
        assert_eq!(base.constrains(&dns("api.example.com")), NameRelation::Narrows);
        assert_eq!(base.constrains(&dns("xexample.com")), NameRelation::SameType);
        assert_eq!(base.constrains(&dns("com")), NameRelation::Widens);
        assert_eq!(base.constrains(&dns("example.org")), NameRelation::SameType);
        assert_eq!(dns("api.example.com").constrains(&base), NameRelation::Widens);
    }

    #[test]
    fn widest() {
        let empty = dns("");
        assert_eq!(empty.constrains(&dns("example.com")), NameRelation::Narrows);
        assert_eq!(dns("example.com").constrains(&empty), NameRelation::Widens);
        assert_eq!(empty.constrains(&dns("")), NameRelation::Match);
    }
}
