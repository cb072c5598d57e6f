//! The order-independent declaration bag.
//!
//! Pure storage: a plain map keyed by `(path, option)` with typed values.
//! `set` overwrites any prior value for the pair, so declarations may
//! arrive in any order and be repeated without error (last write wins).
//! No validation happens here; the builder interprets the bag as a whole.

use std::collections::{BTreeMap, HashMap};

use canopy_foundation::TreePath;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The option slots a declaration may fill.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionKey {
    /// The path names an aggregate (root or nested).
    IsAggregate,
    /// The path names a member of its parent aggregate.
    IsMember,
    /// The aggregate is an ordered collection under its parent.
    IsArray,
    /// The member's declared type name.
    MemberType,
    /// The element participates in its owner's primary key.
    IsKey,
    /// The element is the owner's human-readable label.
    IsDisplayName,
    /// The element must be present at persistence time.
    IsRequired,
    /// The member references another aggregate's root (target path).
    RefTo,
    /// The aggregate is a variant in the named variation group.
    VariationGroup,
    /// The discriminator value selecting this variant.
    VariationSwitch,
}

/// A typed option value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionValue {
    /// A flag.
    Bool(bool),
    /// A name or path.
    Text(String),
}

impl OptionValue {
    /// Reads this value as a flag.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Reads this value as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Bool(_) => None,
        }
    }
}

/// Order-independent store of raw schema declarations.
#[derive(Clone, Debug, Default)]
pub struct DeclarationBag {
    application_name: Option<String>,
    entries: BTreeMap<(TreePath, OptionKey), OptionValue>,
    // First-seen order per path, so member ordering follows declaration order.
    first_seen: HashMap<TreePath, usize>,
    counter: usize,
}

impl DeclarationBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application name. Last write wins.
    pub fn set_application_name(&mut self, name: impl Into<String>) {
        self.application_name = Some(name.into());
    }

    /// The declared application name, if any.
    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Stores one option for one path, overwriting any prior value.
    pub fn set(&mut self, path: TreePath, key: OptionKey, value: OptionValue) {
        if !self.first_seen.contains_key(&path) {
            self.first_seen.insert(path.clone(), self.counter);
            self.counter += 1;
        }
        self.entries.insert((path, key), value);
    }

    /// Reads one option for one path.
    #[must_use]
    pub fn get(&self, path: &TreePath, key: OptionKey) -> Option<&OptionValue> {
        self.entries.get(&(path.clone(), key))
    }

    /// Reads a flag option, defaulting to false when unset or mistyped.
    #[must_use]
    pub fn get_flag(&self, path: &TreePath, key: OptionKey) -> bool {
        self.get(path, key)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    /// Reads a text option.
    #[must_use]
    pub fn get_text(&self, path: &TreePath, key: OptionKey) -> Option<&str> {
        self.get(path, key).and_then(OptionValue::as_text)
    }

    /// The position at which a path was first declared.
    #[must_use]
    pub fn order_of(&self, path: &TreePath) -> usize {
        self.first_seen.get(path).copied().unwrap_or(usize::MAX)
    }

    /// All paths declared as aggregates, in first-declaration order.
    #[must_use]
    pub fn aggregate_paths(&self) -> Vec<TreePath> {
        let mut paths: Vec<TreePath> = self
            .entries
            .iter()
            .filter(|((_, key), value)| {
                *key == OptionKey::IsAggregate && value.as_bool() == Some(true)
            })
            .map(|((path, _), _)| path.clone())
            .collect();
        paths.sort_by_key(|path| self.order_of(path));
        paths
    }

    /// All paths declared as members, in first-declaration order.
    #[must_use]
    pub fn member_paths(&self) -> Vec<TreePath> {
        let mut paths: Vec<TreePath> = self
            .entries
            .iter()
            .filter(|((_, key), value)| {
                *key == OptionKey::IsMember && value.as_bool() == Some(true)
            })
            .map(|((path, _), _)| path.clone())
            .collect();
        paths.sort_by_key(|path| self.order_of(path));
        paths
    }

    /// Direct member paths of an aggregate path, in first-declaration order.
    #[must_use]
    pub fn member_paths_of(&self, aggregate: &TreePath) -> Vec<TreePath> {
        let mut paths: Vec<TreePath> = self
            .entries
            .iter()
            .filter(|((path, key), value)| {
                *key == OptionKey::IsMember
                    && value.as_bool() == Some(true)
                    && path.parent().as_ref() == Some(aggregate)
            })
            .map(|((path, _), _)| path.clone())
            .collect();
        paths.sort_by_key(|path| self.order_of(path));
        paths
    }

    /// Fluent handle for declaring an aggregate.
    pub fn aggregate(&mut self, path: TreePath) -> AggregateDecl<'_> {
        self.set(path.clone(), OptionKey::IsAggregate, OptionValue::Bool(true));
        AggregateDecl { bag: self, path }
    }

    /// Fluent handle for declaring a member.
    pub fn member(&mut self, path: TreePath) -> MemberDecl<'_> {
        self.set(path.clone(), OptionKey::IsMember, OptionValue::Bool(true));
        MemberDecl { bag: self, path }
    }
}

/// Typed write-through wrapper over the bag for one aggregate path.
pub struct AggregateDecl<'a> {
    bag: &'a mut DeclarationBag,
    path: TreePath,
}

impl AggregateDecl<'_> {
    /// Marks this aggregate as an ordered collection under its parent.
    pub fn array(self) -> Self {
        self.bag
            .set(self.path.clone(), OptionKey::IsArray, OptionValue::Bool(true));
        self
    }

    /// Marks the parent-child relation as part of the parent's key.
    pub fn key(self) -> Self {
        self.bag
            .set(self.path.clone(), OptionKey::IsKey, OptionValue::Bool(true));
        self
    }

    /// Declares this aggregate as a variant of a variation group.
    pub fn variation(self, group: impl Into<String>, switch: impl Into<String>) -> Self {
        self.bag.set(
            self.path.clone(),
            OptionKey::VariationGroup,
            OptionValue::Text(group.into()),
        );
        self.bag.set(
            self.path.clone(),
            OptionKey::VariationSwitch,
            OptionValue::Text(switch.into()),
        );
        self
    }

    /// Declares this aggregate as a variant without a discriminator value.
    ///
    /// Only useful for exercising the builder's missing-discriminator
    /// validation from front-ends that collect the two attributes
    /// separately.
    pub fn variation_group_only(self, group: impl Into<String>) -> Self {
        self.bag.set(
            self.path.clone(),
            OptionKey::VariationGroup,
            OptionValue::Text(group.into()),
        );
        self
    }
}

/// Typed write-through wrapper over the bag for one member path.
pub struct MemberDecl<'a> {
    bag: &'a mut DeclarationBag,
    path: TreePath,
}

impl MemberDecl<'_> {
    /// Declares the member's type name.
    pub fn member_type(self, name: impl Into<String>) -> Self {
        self.bag.set(
            self.path.clone(),
            OptionKey::MemberType,
            OptionValue::Text(name.into()),
        );
        self
    }

    /// Marks the member as part of the owner's primary key.
    pub fn key(self) -> Self {
        self.bag
            .set(self.path.clone(), OptionKey::IsKey, OptionValue::Bool(true));
        self
    }

    /// Marks the member as the owner's display name.
    pub fn display_name(self) -> Self {
        self.bag.set(
            self.path.clone(),
            OptionKey::IsDisplayName,
            OptionValue::Bool(true),
        );
        self
    }

    /// Marks the member as required at persistence time.
    pub fn required(self) -> Self {
        self.bag.set(
            self.path.clone(),
            OptionKey::IsRequired,
            OptionValue::Bool(true),
        );
        self
    }

    /// Declares the member as a reference to another aggregate's root.
    pub fn ref_to(self, target: impl Into<String>) -> Self {
        self.bag.set(
            self.path.clone(),
            OptionKey::RefTo,
            OptionValue::Text(target.into()),
        );
        self
    }
}
