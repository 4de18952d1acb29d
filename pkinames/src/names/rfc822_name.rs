//! rfc822Name values

use core::fmt;
use core::hash::{Hash, Hasher};

use log::debug;

use crate::names::general_name::NameRelation;
use crate::{Error, Result};

/// `Rfc822Name` is an email address, or (as a constraint) a host name or a `.`-prefixed domain.
/// The empty name is the widest possible constraint.
#[derive(Clone, Debug)]
pub struct Rfc822Name(String);

impl Rfc822Name {
    /// Creates an RFC822 name after checking its syntax
    pub fn new(name: &str) -> Result<Self> {
        if !name.is_ascii() {
            debug!("RFC822 name \"{}\" contains non-ASCII characters", name);
            return Err(Error::InvalidName);
        }
        if name.is_empty() {
            return Ok(Rfc822Name(String::new()));
        }
        let domain = match name.find('@') {
            Some(at) => &name[at + 1..],
            None => name,
        };
        if domain.is_empty() {
            debug!("RFC822 name \"{}\" may not end with @", name);
            return Err(Error::InvalidName);
        }
        if domain == "." || domain.contains(char::is_whitespace) {
            debug!("RFC822 name \"{}\" has an invalid domain", name);
            return Err(Error::InvalidName);
        }
        Ok(Rfc822Name(name.to_string()))
    }

    /// The name as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty name
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the portion following the `@`, or the whole name when there is no local part
    pub fn domain(&self) -> &str {
        match self.0.find('@') {
            Some(at) => &self.0[at + 1..],
            None => &self.0,
        }
    }

    /// Returns the relation of `other` to the subtree rooted at this name.
    ///
    /// A full mailbox only matches itself. A host name contains the mailboxes at that host, and a
    /// `.`-prefixed domain contains every host in the domain and every mailbox at those hosts.
    pub fn constrains(&self, other: &Rfc822Name) -> NameRelation {
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
            if in_name.contains('@') {
                NameRelation::SameType
            } else if in_name.starts_with('.') {
                NameRelation::Widens
            } else {
                let ndx = this_name.len() - in_name.len();
                if this_name.as_bytes()[ndx - 1] == b'@' {
                    NameRelation::Widens
                } else {
                    NameRelation::SameType
                }
            }
        } else if in_name.ends_with(&this_name) {
            if this_name.contains('@') {
                NameRelation::SameType
            } else if this_name.starts_with('.') {
                NameRelation::Narrows
            } else {
                let ndx = in_name.len() - this_name.len();
                if in_name.as_bytes()[ndx - 1] == b'@' {
                    NameRelation::Narrows
                } else {
                    NameRelation::SameType
                }
            }
        } else {
            NameRelation::SameType
        }
    }
}

impl PartialEq for Rfc822Name {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Rfc822Name {}

impl Hash for Rfc822Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Rfc822Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc822(s: &str) -> Rfc822Name {
        Rfc822Name::new(s).unwrap()
    }

    #[test]
    fn syntax() {
        assert!(Rfc822Name::new("user@example.com").is_ok());
        assert!(Rfc822Name::new("example.com").is_ok());
        assert!(Rfc822Name::new(".example.com").is_ok());
        assert_eq!(Rfc822Name::new("user@"), Err(Error::InvalidName));
        assert_eq!(Rfc822Name::new("user@."), Err(Error::InvalidName));
        assert_eq!(Rfc822Name::new("us\u{e9}r@example.com"), Err(Error::InvalidName));
        assert_eq!(rfc822("User@Example.com").domain(), "Example.com");
    }

    #[test]
    fn mailbox_constraints() {
        let base = rfc822("user@example.com");
        assert_eq!(base.constrains(&rfc822("USER@example.com")), NameRelation::Match);
        assert_eq!(base.constrains(&rfc822("other@example.com")), NameRelation::SameType);
        assert_eq!(base.constrains(&rfc822("example.com")), NameRelation::Widens);
        assert_eq!(base.constrains(&rfc822(".com")), NameRelation::Widens);
        assert_eq!(base.constrains(&rfc822("ample.com")), NameRelation::SameType);
    }

    #[test]
    fn host_and_domain_constraints() {
        let host = rfc822("example.com");
        assert_eq!(host.constrains(&rfc822("user@example.com")), NameRelation::Narrows);
        assert_eq!(host.constrains(&rfc822("user@mail.example.com")), NameRelation::SameType);

        let domain = rfc822(".example.com");
        assert_eq!(domain.constrains(&rfc822("user@mail.example.com")), NameRelation::Narrows);
        assert_eq!(domain.constrains(&rfc822("mail.example.com")), NameRelation::Narrows);
        assert_eq!(domain.constrains(&rfc822("user@example.com")), NameRelation::SameType);

        let empty = rfc822("");
        assert_eq!(empty.constrains(&host), NameRelation::Narrows);
        assert_eq!(host.constrains(&empty), NameRelation::Widens);
    }
}
