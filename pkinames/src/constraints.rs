//! RFC5280 name constraints: subtrees, the operations that combine them and the checks applied to
//! certificate names

pub mod general_subtree;
pub mod general_subtrees;
pub mod name_constraints;

pub use crate::{
    constraints::general_subtree::*, constraints::general_subtrees::*,
    constraints::name_constraints::*,
};
