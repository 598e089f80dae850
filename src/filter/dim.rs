//! Which entities the current filters push into the background.

use crate::filter::selection::Selection;
use crate::filter::state::{TimeRange, TimelineFilterState};
use crate::model::{parse_year, EntityId, EntityType, TreeData};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// IDs of entities to dim (or hide, depending on the filter mode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DimSets {
    pub persons: BTreeSet<EntityId>,
    pub events: BTreeSet<EntityId>,
    pub life_events: BTreeSet<EntityId>,
    pub classifications: BTreeSet<EntityId>,
}

/// The one shared "nothing dimmed" result.
pub static EMPTY_DIM_SETS: DimSets = DimSets {
    persons: BTreeSet::new(),
    events: BTreeSet::new(),
    life_events: BTreeSet::new(),
    classifications: BTreeSet::new(),
};

impl DimSets {
    /// Whether no entity of any kind is dimmed.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
            && self.events.is_empty()
            && self.life_events.is_empty()
            && self.classifications.is_empty()
    }

    /// Whether this is the shared empty sentinel itself.
    pub fn is_sentinel(&self) -> bool {
        std::ptr::eq(self, &EMPTY_DIM_SETS)
    }
}

/// Compute the dimmed entities for `state` over `tree`.
///
/// When nothing is dimmed the shared [`EMPTY_DIM_SETS`] is returned
/// borrowed, so callers can detect "no filtering" by pointer.
pub fn compute_dim_sets(tree: &TreeData, state: &TimelineFilterState) -> Cow<'static, DimSets> {
    let persons_filter = &state.visible_persons;
    let time_range = state.time_range.as_ref();
    let mut dim = DimSets::default();

    if let Selection::Restricted(visible) = persons_filter {
        dim.persons = tree
            .persons
            .keys()
            .filter(|id| !visible.contains(*id))
            .cloned()
            .collect();
    }

    for event in tree.events.values() {
        if all_persons_hidden(&event.person_ids, persons_filter)
            || state.trauma_categories.excludes(&event.category)
            || outside_range(parse_year(&event.approximate_date), time_range)
        {
            dim.events.insert(event.id.clone());
        }
    }

    for event in tree.life_events.values() {
        if all_persons_hidden(&event.person_ids, persons_filter)
            || state.life_event_categories.excludes(&event.category)
            || outside_range(parse_year(&event.approximate_date), time_range)
        {
            dim.life_events.insert(event.id.clone());
        }
    }

    for cls in tree.classifications.values() {
        let subcategory_excluded = cls
            .dsm_subcategory
            .as_ref()
            .is_some_and(|sub| state.classification_subcategories.excludes(sub));

        if all_persons_hidden(&cls.person_ids, persons_filter)
            || state.classification_categories.excludes(&cls.dsm_category)
            || subcategory_excluded
            || state.classification_statuses.excludes(&cls.status)
            || outside_range(cls.diagnosis_year, time_range)
        {
            dim.classifications.insert(cls.id.clone());
        }
    }

    if let Selection::Restricted(visible_patterns) = &state.visible_patterns {
        apply_pattern_restriction(tree, visible_patterns, &mut dim);
    }

    if dim.is_empty() {
        Cow::Borrowed(&EMPTY_DIM_SETS)
    } else {
        Cow::Owned(dim)
    }
}

/// True when a person filter is active and none of `person_ids` passes it.
fn all_persons_hidden(person_ids: &[EntityId], filter: &Selection<EntityId>) -> bool {
    filter.is_active() && person_ids.iter().all(|id| filter.excludes(id))
}

/// Entities without a parseable year are never time-filtered.
fn outside_range(year: Option<i32>, range: Option<&TimeRange>) -> bool {
    match (year, range) {
        (Some(year), Some(range)) => !range.contains(year),
        _ => false,
    }
}

/// Dim everything not linked from a visible pattern. Only adds.
fn apply_pattern_restriction(
    tree: &TreeData,
    visible_patterns: &BTreeSet<EntityId>,
    dim: &mut DimSets,
) {
    let mut linked_events = BTreeSet::new();
    let mut linked_life_events = BTreeSet::new();
    let mut linked_classifications = BTreeSet::new();

    for pattern in visible_patterns.iter().filter_map(|id| tree.patterns.get(id)) {
        for link in &pattern.linked_entities {
            let target = match link.entity_type {
                EntityType::TraumaEvent => &mut linked_events,
                EntityType::LifeEvent => &mut linked_life_events,
                EntityType::Classification => &mut linked_classifications,
                EntityType::TurningPoint => continue,
            };
            target.insert(link.entity_id.as_str());
        }
    }

    dim.events.extend(
        tree.events
            .keys()
            .filter(|id| !linked_events.contains(id.as_str()))
            .cloned(),
    );
    dim.life_events.extend(
        tree.life_events
            .keys()
            .filter(|id| !linked_life_events.contains(id.as_str()))
            .cloned(),
    );
    dim.classifications.extend(
        tree.classifications
            .keys()
            .filter(|id| !linked_classifications.contains(id.as_str()))
            .cloned(),
    );
}
