//! A decrypted tree: every entity collection keyed by ID.

use crate::error::Result;
use crate::model::entities::{
    Classification, EntityId, LifeEvent, Pattern, Person, Relationship, TraumaEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// All decrypted collections of one tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeData {
    pub persons: BTreeMap<EntityId, Person>,
    pub relationships: BTreeMap<EntityId, Relationship>,
    pub events: BTreeMap<EntityId, TraumaEvent>,
    pub life_events: BTreeMap<EntityId, LifeEvent>,
    pub classifications: BTreeMap<EntityId, Classification>,
    pub patterns: BTreeMap<EntityId, Pattern>,
}

/// List form accepted on input, where collections are arrays.
#[derive(Deserialize, Default)]
#[serde(default)]
struct TreeLists {
    persons: Vec<Person>,
    relationships: Vec<Relationship>,
    events: Vec<TraumaEvent>,
    life_events: Vec<LifeEvent>,
    classifications: Vec<Classification>,
    patterns: Vec<Pattern>,
}

impl TreeData {
    /// Parse a tree from JSON holding arrays of entities.
    pub fn from_json(json: &str) -> Result<Self> {
        let lists: TreeLists = serde_json::from_str(json)?;
        Ok(Self {
            persons: lists.persons.into_iter().map(|p| (p.id.clone(), p)).collect(),
            relationships: lists
                .relationships
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
            events: lists.events.into_iter().map(|e| (e.id.clone(), e)).collect(),
            life_events: lists
                .life_events
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
            classifications: lists
                .classifications
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            patterns: lists.patterns.into_iter().map(|p| (p.id.clone(), p)).collect(),
        })
    }

    /// Load a tree from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
