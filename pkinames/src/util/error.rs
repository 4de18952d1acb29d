//! Error types

use core::fmt;

/// Result type
pub type Result<T> = core::result::Result<T, Error>;

/// Error type
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A distinguished name string could not be parsed, i.e., unbalanced quotes, an empty RDN or AVA
    /// component, a missing `=` or a reserved character that appears without an escape.
    MalformedDnString,
    /// An escape sequence in a distinguished name string was not valid for the dialect in use, i.e.,
    /// a bad hex pair or an escaped character that the dialect does not permit.
    InvalidEscape,
    /// An attribute keyword could not be resolved to an OID, or a caller supplied keyword
    /// override is not made of letters, digits and underscores starting with a letter.
    InvalidKeyword,
    /// A DER encoding was structurally invalid (wrong tag, trailing bytes, duplicate fields, etc.).
    MalformedDer,
    /// Asn1Error is used to propagate error information from the der crate.
    Asn1Error(der::Error),
    /// A narrowing or widening comparison was requested for a name type that only supports equality.
    UnsupportedRelation,
    /// A subtree with a non-zero minimum or a maximum was presented for verification.
    UnsupportedConstraintConfig,
    /// A textual GeneralName value does not conform to the syntax of its type.
    InvalidName,
    /// NotFound occurs when an action failed because a necessary artifact was not found.
    NotFound,
    /// ParseError is used when settings could not be serialized or deserialized.
    ParseError,
}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Error {
        Error::Asn1Error(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedDnString => write!(f, "MalformedDnString"),
            Error::InvalidEscape => write!(f, "InvalidEscape"),
            Error::InvalidKeyword => write!(f, "InvalidKeyword"),
            Error::MalformedDer => write!(f, "MalformedDer"),
            Error::Asn1Error(err) => write!(f, "Asn1Error: {}", err),
            Error::UnsupportedRelation => write!(f, "UnsupportedRelation"),
            Error::UnsupportedConstraintConfig => write!(f, "UnsupportedConstraintConfig"),
            Error::InvalidName => write!(f, "InvalidName"),
            Error::NotFound => write!(f, "NotFound"),
            Error::ParseError => write!(f, "ParseError"),
        }
    }
}

impl std::error::Error for Error {}

#[test]
fn error_test() {
    let _s = format!("{}", Error::MalformedDnString);
    let _s = format!("{}", Error::InvalidEscape);
    let _s = format!("{}", Error::InvalidKeyword);
    let _s = format!("{}", Error::MalformedDer);
    let _s = format!("{}", Error::UnsupportedRelation);
    let _s = format!("{}", Error::UnsupportedConstraintConfig);
    let _s = format!("{}", Error::InvalidName);
    let _s = format!("{}", Error::NotFound);
    let _s = format!("{}", Error::ParseError);

    let der_err: der::Error = der::ErrorKind::Failed.into();
    let e: Error = der_err.into();
    assert_eq!(e, Error::Asn1Error(der_err));
    assert!(format!("{}", e).starts_with("Asn1Error"));
}
