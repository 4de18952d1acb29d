//! A single name constraint subtree
//!
//! ```text
//! GeneralSubtree ::= SEQUENCE {
//!      base                    GeneralName,
//!      minimum         [0]     BaseDistance DEFAULT 0,
//!      maximum         [1]     BaseDistance OPTIONAL }
//!
//! BaseDistance ::= INTEGER (0..MAX)
//! ```

use core::fmt;

use der::Sequence;
use log::error;

use crate::names::general_name::{GeneralName, NameRelation};
use crate::{Error, Result};

/// `GeneralSubtree` is a subtree of the name space rooted at `base`.
///
/// Non-zero `minimum` and present `maximum` values are decoded and re-encoded as given, but cannot
/// be evaluated: any attempt to compare names against such a subtree fails with
/// [`Error::UnsupportedConstraintConfig`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Sequence)]
pub struct GeneralSubtree {
    /// Root of the subtree
    pub base: GeneralName,
    /// Minimum distance from the base
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", default = "Default::default")]
    pub minimum: u32,
    /// Maximum distance from the base
    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", optional = "true")]
    pub maximum: Option<u32>,
}

impl GeneralSubtree {
    /// Creates a subtree with the default minimum and no maximum
    pub fn new(base: GeneralName) -> Self {
        GeneralSubtree {
            base,
            minimum: 0,
            maximum: None,
        }
    }

    /// Returns true if the subtree uses only the base (minimum zero, no maximum)
    pub fn is_supported(&self) -> bool {
        self.minimum == 0 && self.maximum.is_none()
    }

    /// Returns the relation of `name` to this subtree, failing for subtrees that carry a
    /// minimum or maximum.
    pub fn constrains(&self, name: &GeneralName) -> Result<NameRelation> {
        if !self.is_supported() {
            error!(
                "Subtree {} specifies a minimum or maximum base distance, which is not supported",
                self
            );
            return Err(Error::UnsupportedConstraintConfig);
        }
        self.base.constrains(name)
    }
}

impl From<GeneralName> for GeneralSubtree {
    fn from(base: GeneralName) -> Self {
        GeneralSubtree::new(base)
    }
}

impl fmt::Display for GeneralSubtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.minimum != 0 {
            write!(f, " (minimum {})", self.minimum)?;
        }
        if let Some(maximum) = self.maximum {
            write!(f, " (maximum {})", maximum)?;
        }
        Ok(())
    }
}
