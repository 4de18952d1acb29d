//! Distinguished names and the GeneralName forms

pub mod attribute_value;
pub mod ava;
pub mod dn;
pub mod dns_name;
pub mod general_name;
pub mod ip_address_name;
pub mod keywords;
pub mod other_names;
pub mod rdn;
pub mod rfc822_name;
pub mod uri_name;

pub use crate::{
    names::attribute_value::*, names::ava::*, names::dn::*, names::dns_name::*,
    names::general_name::*, names::ip_address_name::*, names::keywords::*,
    names::other_names::*, names::rdn::*, names::rfc822_name::*, names::uri_name::*,
};
