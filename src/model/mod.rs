//! Plaintext entity shapes consumed by the timeline filter.

mod date;
mod entities;
mod tree;

pub use date::parse_year;
pub use entities::{
    Classification, ClassificationStatus, EntityId, EntityType, LifeEvent, LifeEventCategory,
    LinkedEntity, Pattern, Person, Relationship, RelationshipKind, TraumaCategory, TraumaEvent,
};
pub use tree::TreeData;
