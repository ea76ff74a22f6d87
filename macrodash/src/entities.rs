//! Static entity configuration: the countries the dashboard knows about and the peer groups
//! built from them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{MacrodashError, MacrodashResult};

/// (code, display name) for every known entity. EU members plus the UK and the US.
pub const ENTITIES: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("BG", "Bulgaria"),
    ("HR", "Croatia"),
    ("CY", "Cyprus"),
    ("CZ", "Czech Republic"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("GR", "Greece"),
    ("HU", "Hungary"),
    ("IE", "Ireland"),
    ("IT", "Italy"),
    ("LV", "Latvia"),
    ("LT", "Lithuania"),
    ("LU", "Luxembourg"),
    ("MT", "Malta"),
    ("NL", "Netherlands"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("SK", "Slovakia"),
    ("SI", "Slovenia"),
    ("ES", "Spain"),
    ("SE", "Sweden"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub code: String,
    pub name: String,
}

/// All known entities, in configuration order.
pub fn all() -> Vec<Entity> {
    ENTITIES
        .iter()
        .map(|(code, name)| Entity {
            code: (*code).into(),
            name: (*name).into(),
        })
        .collect()
}

pub fn codes() -> BTreeSet<String> {
    ENTITIES.iter().map(|(code, _)| (*code).to_string()).collect()
}

/// Resolve a user selection given either as a code (`AT`) or a display name (`austria`).
pub fn lookup(selection: &str) -> MacrodashResult<Entity> {
    let selection = selection.trim();
    ENTITIES
        .iter()
        .find(|(code, name)| {
            code.eq_ignore_ascii_case(selection) || name.eq_ignore_ascii_case(selection)
        })
        .map(|(code, name)| Entity {
            code: (*code).into(),
            name: (*name).into(),
        })
        .ok_or_else(|| MacrodashError::UnknownEntity(selection.to_string()))
}

/// A named set of entities defined as "everything known, minus an exclusion set".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerGroup {
    pub name: String,
    pub exclude: BTreeSet<String>,
}

impl PeerGroup {
    pub fn new<I, S>(name: &str, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// The EU average compares against every known country except the UK and the US.
    pub fn eu() -> Self {
        Self::new("EU", ["GB", "US"])
    }

    /// Members drawn from `known`, ascending by code.
    pub fn members(&self, known: &BTreeSet<String>) -> BTreeSet<String> {
        known.difference(&self.exclude).cloned().collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        codes().contains(code) && !self.exclude.contains(code)
    }
}
