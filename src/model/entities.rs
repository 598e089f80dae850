//! Decrypted entity payloads: persons, relationships, events, classifications, patterns.

use serde::{Deserialize, Serialize};

/// Stable string identifier of any entity.
pub type EntityId = String;

/// A person in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    /// Free text, e.g. "female", "male", "non-binary".
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_adopted: bool,
}

/// Kind of link between two persons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    BiologicalParent,
    StepParent,
    AdoptiveParent,
    Partner,
    BiologicalSibling,
    StepSibling,
    HalfSibling,
}

impl RelationshipKind {
    /// Whether the source person is a parent of the target person.
    pub fn is_parent(self) -> bool {
        matches!(
            self,
            RelationshipKind::BiologicalParent
                | RelationshipKind::StepParent
                | RelationshipKind::AdoptiveParent
        )
    }
}

/// A directed relationship between two persons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: EntityId,
    pub source_person_id: EntityId,
    pub target_person_id: EntityId,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
}

/// Category of a trauma event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraumaCategory {
    Loss,
    Abuse,
    Addiction,
    War,
    Displacement,
    Illness,
    Poverty,
}

impl TraumaCategory {
    /// Every category, in display order.
    pub const ALL: [TraumaCategory; 7] = [
        TraumaCategory::Loss,
        TraumaCategory::Abuse,
        TraumaCategory::Addiction,
        TraumaCategory::War,
        TraumaCategory::Displacement,
        TraumaCategory::Illness,
        TraumaCategory::Poverty,
    ];
}

/// Category of a life event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventCategory {
    Family,
    Education,
    Career,
    Relocation,
    Health,
    Medical,
    Other,
}

impl LifeEventCategory {
    /// Every category, in display order.
    pub const ALL: [LifeEventCategory; 7] = [
        LifeEventCategory::Family,
        LifeEventCategory::Education,
        LifeEventCategory::Career,
        LifeEventCategory::Relocation,
        LifeEventCategory::Health,
        LifeEventCategory::Medical,
        LifeEventCategory::Other,
    ];
}

/// Whether a classification is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStatus {
    Suspected,
    Diagnosed,
}

impl ClassificationStatus {
    /// Both statuses.
    pub const ALL: [ClassificationStatus; 2] =
        [ClassificationStatus::Suspected, ClassificationStatus::Diagnosed];
}

/// A traumatic event affecting one or more persons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraumaEvent {
    pub id: EntityId,
    pub title: String,
    pub category: TraumaCategory,
    /// Free text such as "1995", "1995-03" or "early 2000s".
    pub approximate_date: String,
    #[serde(default)]
    pub severity: u8,
    pub person_ids: Vec<EntityId>,
}

/// A non-traumatic life event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub id: EntityId,
    pub title: String,
    pub category: LifeEventCategory,
    pub approximate_date: String,
    pub person_ids: Vec<EntityId>,
}

/// A clinical classification attached to persons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub id: EntityId,
    /// Top-level category key, e.g. "depressive".
    pub dsm_category: String,
    #[serde(default)]
    pub dsm_subcategory: Option<String>,
    pub status: ClassificationStatus,
    #[serde(default)]
    pub diagnosis_year: Option<i32>,
    pub person_ids: Vec<EntityId>,
}

/// Type tag of an entity a pattern links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    TraumaEvent,
    LifeEvent,
    Classification,
    TurningPoint,
}

/// One link from a pattern to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkedEntity {
    pub entity_type: EntityType,
    pub entity_id: EntityId,
}

/// A thematic pattern spanning several entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub linked_entities: Vec<LinkedEntity>,
    pub person_ids: Vec<EntityId>,
}
