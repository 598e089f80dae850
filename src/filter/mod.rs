//! Timeline filter engine.
//!
//! Holds the declarative filter state, the toggle rules that mutate it,
//! and the derived set of dimmed entities. Every set-typed dimension is a
//! [`Selection`]: unrestricted, or an explicit allow-set that may be empty.

mod actions;
mod dim;
mod groups;
mod selection;
mod state;

pub use actions::{FilterDomains, TimelineFilter};
pub use dim::{compute_dim_sets, DimSets, EMPTY_DIM_SETS};
pub use groups::{
    derive_groups, effective_persons, group_category, group_key, PersonGroups, GENDER_PREFIX,
    GENERATION_PREFIX, ROLE_CHILDREN, ROLE_PARENTS, ROLE_PREFIX,
};
pub use selection::Selection;
pub use state::{FilterMode, QuickFilter, TimeRange, TimelineFilterState};
