//! Mutations on the timeline filter state.

use crate::filter::dim::{compute_dim_sets, DimSets};
use crate::filter::groups::effective_persons;
use crate::filter::selection::Selection;
use crate::filter::state::{FilterMode, QuickFilter, TimeRange, TimelineFilterState};
use crate::model::{
    ClassificationStatus, EntityId, LifeEventCategory, TraumaCategory, TreeData,
};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::debug;

/// Full domain of every filter dimension.
///
/// Category and status domains are fixed; persons, classification
/// (sub)categories and patterns are whatever the data currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDomains {
    pub persons: BTreeSet<EntityId>,
    pub trauma_categories: BTreeSet<TraumaCategory>,
    pub life_event_categories: BTreeSet<LifeEventCategory>,
    pub classification_categories: BTreeSet<String>,
    pub classification_subcategories: BTreeSet<String>,
    pub classification_statuses: BTreeSet<ClassificationStatus>,
    pub patterns: BTreeSet<EntityId>,
}

impl FilterDomains {
    /// Collect every value currently present in the tree.
    pub fn from_tree(tree: &TreeData) -> Self {
        Self {
            persons: tree.persons.keys().cloned().collect(),
            trauma_categories: TraumaCategory::ALL.into_iter().collect(),
            life_event_categories: LifeEventCategory::ALL.into_iter().collect(),
            classification_categories: tree
                .classifications
                .values()
                .map(|c| c.dsm_category.clone())
                .collect(),
            classification_subcategories: tree
                .classifications
                .values()
                .filter_map(|c| c.dsm_subcategory.clone())
                .collect(),
            classification_statuses: ClassificationStatus::ALL.into_iter().collect(),
            patterns: tree.patterns.keys().cloned().collect(),
        }
    }
}

/// Filter state together with the domains its toggles work against.
#[derive(Debug, Clone, Default)]
pub struct TimelineFilter {
    state: TimelineFilterState,
    domains: FilterDomains,
}

impl TimelineFilter {
    /// Unfiltered view over `tree`.
    pub fn new(tree: &TreeData) -> Self {
        Self::with_state(tree, TimelineFilterState::default())
    }

    /// Resume from a saved state.
    pub fn with_state(tree: &TreeData, state: TimelineFilterState) -> Self {
        Self {
            state,
            domains: FilterDomains::from_tree(tree),
        }
    }

    /// Current filter state.
    pub fn state(&self) -> &TimelineFilterState {
        &self.state
    }

    /// Consume the filter, keeping its state for later resumption.
    pub fn into_state(self) -> TimelineFilterState {
        self.state
    }

    /// Domains the toggles currently work against.
    pub fn domains(&self) -> &FilterDomains {
        &self.domains
    }

    /// Refresh the dynamic domains after the data changed.
    ///
    /// Person groups are recombined, and every data-driven dimension whose
    /// set now covers its whole domain collapses to `Unrestricted`.
    pub fn refresh_domains(&mut self, tree: &TreeData) {
        self.domains = FilterDomains::from_tree(tree);
        let state = &mut self.state;
        let domains = &self.domains;

        if state.active_groups.is_empty() {
            state.visible_persons.recollapse(&domains.persons);
        } else {
            state.visible_persons = effective_persons(&state.active_groups, &domains.persons);
        }
        state
            .classification_categories
            .recollapse(&domains.classification_categories);
        state
            .classification_subcategories
            .recollapse(&domains.classification_subcategories);
        state.visible_patterns.recollapse(&domains.patterns);
    }

    /// Dimmed entities under the current state.
    pub fn dim_sets(&self, tree: &TreeData) -> Cow<'static, DimSets> {
        compute_dim_sets(tree, &self.state)
    }

    /// Number of dimensions currently narrowing the view.
    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    /// Toggle one person directly.
    ///
    /// Clears any active groups; the current visible set becomes the
    /// starting point of the per-person override.
    pub fn toggle_person(&mut self, person_id: &EntityId) {
        self.state.active_groups.clear();
        self.state
            .visible_persons
            .toggle(person_id, &self.domains.persons);
    }

    /// Show or hide every person directly, clearing groups.
    pub fn toggle_all_persons(&mut self, visible: bool) {
        self.state.active_groups.clear();
        self.state.visible_persons.set_all(visible);
    }

    /// Add or remove one person group and recombine the visible set.
    ///
    /// Replaces any per-person override.
    pub fn toggle_person_group(&mut self, group_key: &str, person_ids: &BTreeSet<EntityId>) {
        if self.state.active_groups.remove(group_key).is_none() {
            self.state
                .active_groups
                .insert(group_key.to_string(), person_ids.clone());
        }
        debug!(
            group = group_key,
            active = self.state.active_groups.len(),
            "person groups changed"
        );
        self.recompute_group_persons();
    }

    fn recompute_group_persons(&mut self) {
        self.state.visible_persons =
            effective_persons(&self.state.active_groups, &self.domains.persons);
    }

    /// Show or hide one trauma category.
    pub fn toggle_trauma_category(&mut self, category: TraumaCategory) {
        self.state
            .trauma_categories
            .toggle(&category, &self.domains.trauma_categories);
    }

    /// Show (`true`) or hide (`false`) every trauma category.
    pub fn toggle_all_trauma_categories(&mut self, visible: bool) {
        self.state.trauma_categories.set_all(visible);
    }

    /// Show or hide one life-event category.
    pub fn toggle_life_event_category(&mut self, category: LifeEventCategory) {
        self.state
            .life_event_categories
            .toggle(&category, &self.domains.life_event_categories);
    }

    /// Show (`true`) or hide (`false`) every life-event category.
    pub fn toggle_all_life_event_categories(&mut self, visible: bool) {
        self.state.life_event_categories.set_all(visible);
    }

    /// Show or hide one classification category seen in the data.
    pub fn toggle_classification_category(&mut self, category: &str) {
        self.state
            .classification_categories
            .toggle(&category.to_string(), &self.domains.classification_categories);
    }

    /// Show (`true`) or hide (`false`) every classification category.
    pub fn toggle_all_classification_categories(&mut self, visible: bool) {
        self.state.classification_categories.set_all(visible);
    }

    /// Show or hide one classification subcategory seen in the data.
    ///
    /// Classifications without a subcategory are never affected.
    pub fn toggle_classification_subcategory(&mut self, subcategory: &str) {
        self.state.classification_subcategories.toggle(
            &subcategory.to_string(),
            &self.domains.classification_subcategories,
        );
    }

    /// Show (`true`) or hide (`false`) every classification subcategory.
    pub fn toggle_all_classification_subcategories(&mut self, visible: bool) {
        self.state.classification_subcategories.set_all(visible);
    }

    /// Show or hide suspected or diagnosed classifications.
    pub fn toggle_classification_status(&mut self, status: ClassificationStatus) {
        self.state
            .classification_statuses
            .toggle(&status, &self.domains.classification_statuses);
    }

    /// Show (`true`) or hide (`false`) every classification status.
    pub fn toggle_all_classification_statuses(&mut self, visible: bool) {
        self.state.classification_statuses.set_all(visible);
    }

    /// Restrict dated entities to a year range, or lift the restriction with `None`.
    pub fn set_time_range(&mut self, range: Option<TimeRange>) {
        self.state.time_range = range;
    }

    /// Show or hide one pattern. Any visible-pattern restriction dims
    /// everything the visible patterns do not link to.
    pub fn toggle_pattern(&mut self, pattern_id: &EntityId) {
        self.state
            .visible_patterns
            .toggle(pattern_id, &self.domains.patterns);
    }

    /// Show (`true`) or hide (`false`) every pattern.
    pub fn toggle_all_patterns(&mut self, visible: bool) {
        self.state.visible_patterns.set_all(visible);
    }

    /// Switch between dimming and hiding filtered entities.
    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.state.filter_mode = mode;
    }

    /// Isolate one layer, or reset the layers if that preset is already on.
    pub fn apply_quick_filter(&mut self, preset: QuickFilter) {
        let state = &mut self.state;
        state.classification_subcategories = Selection::Unrestricted;
        state.classification_statuses = Selection::Unrestricted;

        if state.active_quick_filter() == Some(preset) {
            state.trauma_categories = Selection::Unrestricted;
            state.life_event_categories = Selection::Unrestricted;
            state.classification_categories = Selection::Unrestricted;
            return;
        }

        let (trauma, life, classification) = match preset {
            QuickFilter::TraumaOnly => (true, false, false),
            QuickFilter::LifeEventsOnly => (false, true, false),
            QuickFilter::ClassificationsOnly => (false, false, true),
        };
        state.trauma_categories.set_all(trauma);
        state.life_event_categories.set_all(life);
        state.classification_categories.set_all(classification);
    }

    /// Back to the default state: everything visible, dim mode, no groups.
    pub fn reset_all(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Person};

    fn tree() -> TreeData {
        let mut tree = TreeData::default();
        for id in ["p1", "p2", "p3"] {
            tree.persons.insert(
                id.into(),
                Person {
                    id: id.into(),
                    name: id.into(),
                    birth_year: None,
                    death_year: None,
                    gender: None,
                    is_adopted: false,
                },
            );
        }
        for (id, cat, sub) in [
            ("c1", "depressive", Some("mdd")),
            ("c2", "anxiety", None),
        ] {
            tree.classifications.insert(
                id.into(),
                Classification {
                    id: id.into(),
                    dsm_category: cat.into(),
                    dsm_subcategory: sub.map(Into::into),
                    status: ClassificationStatus::Diagnosed,
                    diagnosis_year: None,
                    person_ids: vec!["p1".into()],
                },
            );
        }
        tree
    }

    fn ids(items: &[&str]) -> BTreeSet<EntityId> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_domains_from_tree() {
        let domains = FilterDomains::from_tree(&tree());
        assert_eq!(domains.persons, ids(&["p1", "p2", "p3"]));
        assert_eq!(
            domains.classification_categories,
            ids(&["anxiety", "depressive"])
        );
        assert_eq!(domains.classification_subcategories, ids(&["mdd"]));
        assert_eq!(domains.trauma_categories.len(), 7);
        assert!(domains.patterns.is_empty());
    }

    #[test]
    fn test_toggle_person_clears_groups() {
        let mut filter = TimelineFilter::new(&tree());
        filter.toggle_person_group("gender:female", &ids(&["p1", "p3"]));
        assert_eq!(
            filter.state().visible_persons,
            Selection::Restricted(ids(&["p1", "p3"]))
        );

        filter.toggle_person(&"p3".to_string());
        assert!(filter.state().active_groups.is_empty());
        assert_eq!(
            filter.state().visible_persons,
            Selection::Restricted(ids(&["p1"]))
        );
    }

    #[test]
    fn test_group_toggle_replaces_override() {
        let mut filter = TimelineFilter::new(&tree());
        filter.toggle_person(&"p2".to_string());
        filter.toggle_person_group("role:parents", &ids(&["p2"]));
        assert_eq!(
            filter.state().visible_persons,
            Selection::Restricted(ids(&["p2"]))
        );

        filter.toggle_person_group("role:parents", &ids(&["p2"]));
        assert!(filter.state().visible_persons.is_unrestricted());
        assert!(filter.state().active_groups.is_empty());
    }

    #[test]
    fn test_toggle_all_persons() {
        let mut filter = TimelineFilter::new(&tree());
        filter.toggle_person_group("gender:male", &ids(&["p2"]));
        filter.toggle_all_persons(false);
        assert_eq!(filter.state().visible_persons, Selection::none());
        assert!(filter.state().active_groups.is_empty());
    }

    #[test]
    fn test_dynamic_classification_domain_collapses() {
        let mut filter = TimelineFilter::new(&tree());
        filter.toggle_classification_category("anxiety");
        assert_eq!(
            filter.state().classification_categories,
            Selection::Restricted(ids(&["depressive"]))
        );
        filter.toggle_classification_category("anxiety");
        assert!(filter.state().classification_categories.is_unrestricted());
    }

    #[test]
    fn test_quick_filter_toggles() {
        let mut filter = TimelineFilter::new(&tree());
        filter.toggle_classification_status(ClassificationStatus::Suspected);

        filter.apply_quick_filter(QuickFilter::LifeEventsOnly);
        let state = filter.state();
        assert_eq!(state.trauma_categories, Selection::none());
        assert!(state.life_event_categories.is_unrestricted());
        assert_eq!(state.classification_categories, Selection::none());
        assert!(state.classification_statuses.is_unrestricted());
        assert_eq!(state.active_quick_filter(), Some(QuickFilter::LifeEventsOnly));

        filter.apply_quick_filter(QuickFilter::LifeEventsOnly);
        let state = filter.state();
        assert!(state.trauma_categories.is_unrestricted());
        assert!(state.life_event_categories.is_unrestricted());
        assert!(state.classification_categories.is_unrestricted());
    }

    #[test]
    fn test_switching_quick_filters() {
        let mut filter = TimelineFilter::new(&tree());
        filter.apply_quick_filter(QuickFilter::TraumaOnly);
        filter.apply_quick_filter(QuickFilter::ClassificationsOnly);

        let state = filter.state();
        assert_eq!(state.trauma_categories, Selection::none());
        assert_eq!(state.life_event_categories, Selection::none());
        assert!(state.classification_categories.is_unrestricted());
    }

    #[test]
    fn test_reset_all() {
        let mut filter = TimelineFilter::new(&tree());
        filter.toggle_person_group("gender:female", &ids(&["p1"]));
        filter.toggle_trauma_category(TraumaCategory::War);
        filter.set_time_range(Some(TimeRange::new(1900, 1950)));
        filter.set_filter_mode(FilterMode::Hide);
        filter.toggle_all_patterns(false);
        assert_eq!(filter.active_filter_count(), 4);

        filter.reset_all();
        assert_eq!(filter.state(), &TimelineFilterState::default());
        assert_eq!(filter.state().filter_mode, FilterMode::Dim);
        assert_eq!(filter.active_filter_count(), 0);
    }

    #[test]
    fn test_refresh_domains_recollapses_groups() {
        let mut data = tree();
        let mut filter = TimelineFilter::new(&data);
        filter.toggle_person_group("gender:female", &ids(&["p1", "p2"]));
        assert!(filter.state().visible_persons.is_active());

        data.persons.remove("p3");
        filter.refresh_domains(&data);
        assert!(filter.state().visible_persons.is_unrestricted());
    }

    #[test]
    fn test_refresh_domains_recollapses_data_driven_dimensions() {
        let mut data = tree();
        let mut filter = TimelineFilter::new(&data);
        filter.toggle_classification_category("anxiety");
        filter.toggle_person(&"p3".to_string());
        assert_eq!(filter.active_filter_count(), 2);

        data.classifications.remove("c2");
        data.persons.remove("p3");
        filter.refresh_domains(&data);

        assert!(filter.state().classification_categories.is_unrestricted());
        assert!(filter.state().visible_persons.is_unrestricted());
        assert_eq!(filter.active_filter_count(), 0);
    }

    #[test]
    fn test_refresh_domains_keeps_partial_restrictions() {
        let mut data = tree();
        let mut filter = TimelineFilter::new(&data);
        filter.toggle_classification_category("anxiety");
        filter.toggle_classification_subcategory("mdd");

        data.persons.remove("p3");
        filter.refresh_domains(&data);

        assert_eq!(
            filter.state().classification_categories,
            Selection::Restricted(ids(&["depressive"]))
        );
        assert_eq!(filter.state().classification_subcategories, Selection::none());
    }
}
