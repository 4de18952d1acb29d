//! Ordered lists of subtrees and the operations used to combine them while processing name
//! constraints along a certification path.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;
use std::sync::OnceLock;

use der::{
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Tag, Writer,
};
use log::debug;

use crate::constraints::general_subtree::GeneralSubtree;
use crate::names::general_name::{GeneralName, NameRelation, NameTypes};
use crate::Result;

/// `GeneralSubtrees` is an ordered list of [`GeneralSubtree`] values.
///
/// The hash of the list is computed on first use and discarded by every mutating operation.
#[derive(Clone, Debug, Default)]
pub struct GeneralSubtrees {
    trees: Vec<GeneralSubtree>,
    hash: OnceLock<u64>,
}

impl GeneralSubtrees {
    /// Creates a list holding the given subtrees
    pub fn new(trees: Vec<GeneralSubtree>) -> Self {
        GeneralSubtrees {
            trees,
            hash: OnceLock::new(),
        }
    }

    /// Subtree at index `i`
    pub fn get(&self, i: usize) -> Option<&GeneralSubtree> {
        self.trees.get(i)
    }

    /// Appends a subtree
    pub fn push(&mut self, tree: GeneralSubtree) {
        self.trees.push(tree);
        self.invalidate();
    }

    /// Removes and returns the subtree at index `i`
    pub fn remove(&mut self, i: usize) -> GeneralSubtree {
        self.invalidate();
        self.trees.remove(i)
    }

    /// Returns true if an equal subtree is present
    pub fn contains(&self, tree: &GeneralSubtree) -> bool {
        self.trees.contains(tree)
    }

    /// Number of subtrees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Iterates over the subtrees
    pub fn iter(&self) -> core::slice::Iter<'_, GeneralSubtree> {
        self.trees.iter()
    }

    /// Returns true if any subtree has a base of the given form
    pub fn has_type(&self, name_type: NameTypes) -> bool {
        self.trees.iter().any(|t| t.base.name_type() == name_type)
    }

    /// Hash of the list contents, cached until the list is next modified
    pub fn hash_code(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.trees.hash(&mut hasher);
            hasher.finish()
        })
    }

    fn invalidate(&mut self) {
        self.hash = OnceLock::new();
    }

    /// Removes redundant subtrees. Each subtree is compared with every later subtree of the same
    /// form: a subtree that is matched or contained by a later one is dropped, as is any later
    /// subtree that it contains.
    pub fn minimize(&mut self) -> Result<()> {
        let mut i = 0;
        while i + 1 < self.trees.len() {
            let mut remove_current = false;
            let mut j = i + 1;
            while j < self.trees.len() {
                match self.trees[i].base.constrains(&self.trees[j].base)? {
                    NameRelation::DiffType | NameRelation::SameType => j += 1,
                    NameRelation::Match | NameRelation::Widens => {
                        remove_current = true;
                        break;
                    }
                    NameRelation::Narrows => {
                        self.trees.remove(j);
                    }
                }
            }
            if remove_current {
                self.trees.remove(i);
            } else {
                i += 1;
            }
        }
        self.invalidate();
        Ok(())
    }

    /// Appends the subtrees of `other` then minimizes the result
    pub fn union(&mut self, other: &GeneralSubtrees) -> Result<()> {
        self.trees.extend(other.trees.iter().cloned());
        self.minimize()
    }

    /// Replaces this list with its intersection with `other`, treating both as permitted subtrees.
    ///
    /// Where names of a form appear in both lists but no name in one is related to any name of the
    /// same form in the other, no subtree can express the intersection. All names of that form are
    /// then dropped from this list and the widest subtree of the form is returned in the spillover
    /// list, which the caller must add to the excluded subtrees.
    pub fn intersect(&mut self, other: &GeneralSubtrees) -> Result<Option<GeneralSubtrees>> {
        if self.is_empty() {
            self.union(other)?;
            return Ok(None);
        }

        let mut other = other.clone();
        self.minimize()?;
        other.minimize()?;

        // every entry is classified against the list as it was on entry
        let mut kept = Vec::with_capacity(self.trees.len());
        let mut narrowed = GeneralSubtrees::default();
        let mut spillover: Option<GeneralSubtrees> = None;

        for this_entry in self.trees.iter() {
            let mut same_type = false;
            let mut within_other = false;
            let mut narrower = vec![];
            for other_entry in other.iter() {
                match this_entry.base.constrains(&other_entry.base)? {
                    NameRelation::Narrows => narrower.push(other_entry.clone()),
                    NameRelation::SameType => same_type = true,
                    NameRelation::Match | NameRelation::Widens => {
                        within_other = true;
                        break;
                    }
                    NameRelation::DiffType => {}
                }
            }

            if within_other {
                kept.push(this_entry.clone());
            } else if !narrower.is_empty() {
                narrowed.trees.extend(narrower);
            } else if same_type {
                let name_type = this_entry.base.name_type();
                if !overlaps_for_type(&self.trees, name_type, &other)? {
                    let widest = GeneralSubtree::new(GeneralName::widest(name_type)?);
                    debug!(
                        "No {:?} name is common to both permitted lists; excluding all",
                        name_type
                    );
                    let excluded = spillover.get_or_insert_with(GeneralSubtrees::default);
                    if !excluded.contains(&widest) {
                        excluded.push(widest);
                    }
                }
            } else {
                kept.push(this_entry.clone());
            }
        }
        self.trees = kept;

        if !narrowed.is_empty() {
            self.union(&narrowed)?;
        }

        // forms present only in other carry over unchanged, including when nothing is left here
        for other_entry in other.iter() {
            let mut diff_type = true;
            for this_entry in self.trees.iter() {
                if this_entry.base.constrains(&other_entry.base)? != NameRelation::DiffType {
                    diff_type = false;
                    break;
                }
            }
            if diff_type {
                self.trees.push(other_entry.clone());
            }
        }

        self.invalidate();
        Ok(spillover)
    }

    /// Removes every subtree that matches or lies within one of the `excluded` subtrees
    pub fn reduce(&mut self, excluded: &GeneralSubtrees) -> Result<()> {
        for excluded_entry in excluded.iter() {
            let mut j = 0;
            while j < self.trees.len() {
                match excluded_entry.base.constrains(&self.trees[j].base)? {
                    NameRelation::Match | NameRelation::Narrows => {
                        self.trees.remove(j);
                    }
                    _ => j += 1,
                }
            }
        }
        self.invalidate();
        Ok(())
    }
}

/// Returns true if some entry of `trees` of the given form matches, contains or lies within an
/// entry of `other`
fn overlaps_for_type(
    trees: &[GeneralSubtree],
    name_type: NameTypes,
    other: &GeneralSubtrees,
) -> Result<bool> {
    for this_entry in trees.iter().filter(|t| t.base.name_type() == name_type) {
        for other_entry in other.iter() {
            match this_entry.base.constrains(&other_entry.base)? {
                NameRelation::Match | NameRelation::Widens | NameRelation::Narrows => {
                    return Ok(true)
                }
                _ => {}
            }
        }
    }
    Ok(false)
}

impl From<Vec<GeneralSubtree>> for GeneralSubtrees {
    fn from(trees: Vec<GeneralSubtree>) -> Self {
        GeneralSubtrees::new(trees)
    }
}

impl<'a> IntoIterator for &'a GeneralSubtrees {
    type Item = &'a GeneralSubtree;
    type IntoIter = core::slice::Iter<'a, GeneralSubtree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

impl PartialEq for GeneralSubtrees {
    fn eq(&self, other: &Self) -> bool {
        self.trees == other.trees
    }
}

impl Eq for GeneralSubtrees {}

impl Hash for GeneralSubtrees {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for GeneralSubtrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tree) in self.trees.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", tree)?;
        }
        Ok(())
    }
}

impl<'a> DecodeValue<'a> for GeneralSubtrees {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let mut trees = vec![];
            while !nested.is_finished() {
                trees.push(GeneralSubtree::decode(nested)?);
            }
            if trees.is_empty() {
                return Err(Tag::Sequence.value_error());
            }
            Ok(GeneralSubtrees::new(trees))
        })
    }
}

impl EncodeValue for GeneralSubtrees {
    fn value_len(&self) -> der::Result<Length> {
        self.trees
            .iter()
            .try_fold(Length::ZERO, |acc, t| acc + t.encoded_len()?)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for tree in &self.trees {
            tree.encode(writer)?;
        }
        Ok(())
    }
}

impl Sequence<'_> for GeneralSubtrees {}
