//! Declarative timeline filter state.

use crate::filter::groups::PersonGroups;
use crate::filter::selection::Selection;
use crate::model::{ClassificationStatus, EntityId, LifeEventCategory, TraumaCategory};
use serde::{Deserialize, Serialize};

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: i32,
    pub max: i32,
}

impl TimeRange {
    /// Range from `min` to `max`, both included.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `year` falls inside the range.
    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// How the renderer treats filtered-out entities. The engine itself
/// never branches on this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Dim,
    Hide,
}

/// Canned configurations that isolate one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickFilter {
    TraumaOnly,
    LifeEventsOnly,
    ClassificationsOnly,
}

/// Every filter dimension of the timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineFilterState {
    /// Effective visible persons, derived from `active_groups` or set
    /// directly by per-person toggles.
    pub visible_persons: Selection<EntityId>,
    pub trauma_categories: Selection<TraumaCategory>,
    pub life_event_categories: Selection<LifeEventCategory>,
    pub classification_categories: Selection<String>,
    pub classification_subcategories: Selection<String>,
    pub classification_statuses: Selection<ClassificationStatus>,
    pub time_range: Option<TimeRange>,
    pub visible_patterns: Selection<EntityId>,
    pub filter_mode: FilterMode,
    /// Active person groups and their members.
    pub active_groups: PersonGroups,
}

impl TimelineFilterState {
    /// Number of dimensions currently narrowing the view.
    ///
    /// An explicit empty set counts. Filter mode does not.
    pub fn active_filter_count(&self) -> usize {
        [
            self.visible_persons.is_active(),
            self.trauma_categories.is_active(),
            self.life_event_categories.is_active(),
            self.classification_categories.is_active(),
            self.classification_subcategories.is_active(),
            self.classification_statuses.is_active(),
            self.time_range.is_some(),
            self.visible_patterns.is_active(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// The preset the three layer filters currently match, if any.
    ///
    /// Exactly one layer must be unrestricted and the other two
    /// restricted to nothing.
    pub fn active_quick_filter(&self) -> Option<QuickFilter> {
        let trauma = layer_state(&self.trauma_categories);
        let life = layer_state(&self.life_event_categories);
        let classification = layer_state(&self.classification_categories);

        match (trauma, life, classification) {
            (Layer::Open, Layer::Empty, Layer::Empty) => Some(QuickFilter::TraumaOnly),
            (Layer::Empty, Layer::Open, Layer::Empty) => Some(QuickFilter::LifeEventsOnly),
            (Layer::Empty, Layer::Empty, Layer::Open) => Some(QuickFilter::ClassificationsOnly),
            _ => None,
        }
    }

    /// Restore every dimension to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

enum Layer {
    Open,
    Empty,
    Partial,
}

fn layer_state<T: Ord + Clone>(selection: &Selection<T>) -> Layer {
    match selection.as_set() {
        None => Layer::Open,
        Some(set) if set.is_empty() => Layer::Empty,
        Some(_) => Layer::Partial,
    }
}
