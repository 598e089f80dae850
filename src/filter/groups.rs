//! Named person groups and how active groups combine into a visible set.
//!
//! Group keys are `category:value`, e.g. `gender:female`, `role:parents`,
//! `generation:2`. Active groups are unioned within a category and
//! intersected across categories.

use crate::filter::selection::Selection;
use crate::model::{EntityId, TreeData};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Category of groups keyed by a person's gender.
pub const GENDER_PREFIX: &str = "gender";
/// Category of groups keyed by family role.
pub const ROLE_PREFIX: &str = "role";
/// Category of groups keyed by generation depth.
pub const GENERATION_PREFIX: &str = "generation";

/// Role value for persons who are the parent in some relationship.
pub const ROLE_PARENTS: &str = "parents";
/// Role value for persons who are the child in some relationship.
pub const ROLE_CHILDREN: &str = "children";

/// Map from group key to member IDs.
pub type PersonGroups = BTreeMap<String, BTreeSet<EntityId>>;

/// Build a group key from its category and value.
pub fn group_key(category: &str, value: impl std::fmt::Display) -> String {
    format!("{}:{}", category, value)
}

/// The category part of a group key: the text before the first `:`.
pub fn group_category(key: &str) -> &str {
    key.split_once(':').map(|(cat, _)| cat).unwrap_or(key)
}

/// Combine the active groups into the visible-person selection.
///
/// No active groups, or a result that covers every known person, gives
/// `Unrestricted`.
pub fn effective_persons(
    active_groups: &PersonGroups,
    all_persons: &BTreeSet<EntityId>,
) -> Selection<EntityId> {
    if active_groups.is_empty() {
        return Selection::Unrestricted;
    }

    let mut by_category: BTreeMap<&str, BTreeSet<EntityId>> = BTreeMap::new();
    for (key, members) in active_groups {
        by_category
            .entry(group_category(key))
            .or_default()
            .extend(members.iter().cloned());
    }

    let mut categories = by_category.into_values();
    let mut visible = categories.next().unwrap_or_default();
    for members in categories {
        visible.retain(|id| members.contains(id));
    }

    Selection::collapse(visible, all_persons)
}

/// Derive the gender, role and generation groups of a tree.
///
/// Only non-empty groups are returned.
pub fn derive_groups(tree: &TreeData) -> PersonGroups {
    let mut groups = PersonGroups::new();

    for person in tree.persons.values() {
        if let Some(gender) = person.gender.as_deref().map(str::trim) {
            if !gender.is_empty() {
                groups
                    .entry(group_key(GENDER_PREFIX, gender.to_lowercase()))
                    .or_default()
                    .insert(person.id.clone());
            }
        }
    }

    let parent_links = parent_links(tree);
    let parents_key = group_key(ROLE_PREFIX, ROLE_PARENTS);
    let children_key = group_key(ROLE_PREFIX, ROLE_CHILDREN);
    for (parent, child) in &parent_links {
        groups
            .entry(parents_key.clone())
            .or_default()
            .insert(parent.clone());
        groups
            .entry(children_key.clone())
            .or_default()
            .insert(child.clone());
    }

    for (id, generation) in generations(tree, &parent_links) {
        groups
            .entry(group_key(GENERATION_PREFIX, generation))
            .or_default()
            .insert(id);
    }

    groups
}

/// Parent-to-child links between persons that exist in the tree.
fn parent_links(tree: &TreeData) -> BTreeSet<(EntityId, EntityId)> {
    tree.relationships
        .values()
        .filter(|r| r.kind.is_parent())
        .filter(|r| {
            tree.persons.contains_key(&r.source_person_id)
                && tree.persons.contains_key(&r.target_person_id)
                && r.source_person_id != r.target_person_id
        })
        .map(|r| (r.source_person_id.clone(), r.target_person_id.clone()))
        .collect()
}

/// Generation number per person: roots are 0, a child is one below its
/// deepest parent. Persons caught in a parent cycle keep the depth
/// reached from the acyclic part.
fn generations(
    tree: &TreeData,
    links: &BTreeSet<(EntityId, EntityId)>,
) -> BTreeMap<EntityId, u32> {
    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut pending_parents: BTreeMap<&str, usize> =
        tree.persons.keys().map(|id| (id.as_str(), 0)).collect();

    for (parent, child) in links {
        children.entry(parent).or_default().push(child);
        *pending_parents.entry(child).or_default() += 1;
    }

    let mut generation: BTreeMap<&str, u32> =
        tree.persons.keys().map(|id| (id.as_str(), 0)).collect();
    let mut queue: VecDeque<&str> = pending_parents
        .iter()
        .filter(|(_, &count)| count == 0)
        .map(|(&id, _)| id)
        .collect();

    while let Some(id) = queue.pop_front() {
        let next = generation[id] + 1;
        for &child in children.get(id).map(Vec::as_slice).unwrap_or_default() {
            if let Some(g) = generation.get_mut(child) {
                *g = (*g).max(next);
            }
            if let Some(count) = pending_parents.get_mut(child) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(child);
                }
            }
        }
    }

    generation
        .into_iter()
        .map(|(id, g)| (id.to_string(), g))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Person, Relationship, RelationshipKind};

    fn ids(items: &[&str]) -> BTreeSet<EntityId> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn person(id: &str, gender: Option<&str>) -> Person {
        Person {
            id: id.into(),
            name: id.to_uppercase(),
            birth_year: None,
            death_year: None,
            gender: gender.map(Into::into),
            is_adopted: false,
        }
    }

    fn parent(id: &str, source: &str, target: &str) -> Relationship {
        Relationship {
            id: id.into(),
            source_person_id: source.into(),
            target_person_id: target.into(),
            kind: RelationshipKind::BiologicalParent,
        }
    }

    #[test]
    fn test_group_category() {
        assert_eq!(group_category("gender:female"), "gender");
        assert_eq!(group_category("generation:1:extra"), "generation");
        assert_eq!(group_category("plain"), "plain");
    }

    #[test]
    fn test_no_groups_is_unrestricted() {
        let all = ids(&["p1", "p2"]);
        assert!(effective_persons(&PersonGroups::new(), &all).is_unrestricted());
    }

    #[test]
    fn test_intersection_across_categories() {
        let all = ids(&["p1", "p2", "p3", "p4"]);
        let mut active = PersonGroups::new();
        active.insert("gender:female".into(), ids(&["p1", "p3"]));
        active.insert("role:parents".into(), ids(&["p1", "p2"]));

        assert_eq!(
            effective_persons(&active, &all),
            Selection::Restricted(ids(&["p1"]))
        );
    }

    #[test]
    fn test_union_within_category() {
        let all = ids(&["p1", "p2", "p3", "p4"]);
        let mut active = PersonGroups::new();
        active.insert("generation:0".into(), ids(&["p1"]));
        active.insert("generation:1".into(), ids(&["p2", "p3"]));

        assert_eq!(
            effective_persons(&active, &all),
            Selection::Restricted(ids(&["p1", "p2", "p3"]))
        );
    }

    #[test]
    fn test_covering_everyone_collapses() {
        let all = ids(&["p1", "p2"]);
        let mut active = PersonGroups::new();
        active.insert("gender:female".into(), ids(&["p1"]));
        active.insert("gender:male".into(), ids(&["p2"]));

        assert!(effective_persons(&active, &all).is_unrestricted());
    }

    #[test]
    fn test_disjoint_categories_give_empty_set() {
        let all = ids(&["p1", "p2"]);
        let mut active = PersonGroups::new();
        active.insert("gender:female".into(), ids(&["p1"]));
        active.insert("role:children".into(), ids(&["p2"]));

        assert_eq!(effective_persons(&active, &all), Selection::none());
    }

    #[test]
    fn test_derive_groups() {
        let mut tree = TreeData::default();
        for p in [
            person("gran", Some("Female")),
            person("mum", Some("female")),
            person("dad", Some("male")),
            person("kid", None),
        ] {
            tree.persons.insert(p.id.clone(), p);
        }
        for r in [
            parent("r1", "gran", "mum"),
            parent("r2", "mum", "kid"),
            parent("r3", "dad", "kid"),
        ] {
            tree.relationships.insert(r.id.clone(), r);
        }

        let groups = derive_groups(&tree);
        assert_eq!(groups["gender:female"], ids(&["gran", "mum"]));
        assert_eq!(groups["gender:male"], ids(&["dad"]));
        assert_eq!(groups["role:parents"], ids(&["dad", "gran", "mum"]));
        assert_eq!(groups["role:children"], ids(&["kid", "mum"]));
        assert_eq!(
            group_category(&group_key(ROLE_PREFIX, ROLE_PARENTS)),
            ROLE_PREFIX
        );
        assert_eq!(groups["generation:0"], ids(&["dad", "gran"]));
        assert_eq!(groups["generation:1"], ids(&["mum"]));
        assert_eq!(groups["generation:2"], ids(&["kid"]));
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut tree = TreeData::default();
        for p in [person("a", None), person("b", None), person("root", None)] {
            tree.persons.insert(p.id.clone(), p);
        }
        for r in [
            parent("r1", "a", "b"),
            parent("r2", "b", "a"),
            parent("r3", "root", "a"),
        ] {
            tree.relationships.insert(r.id.clone(), r);
        }

        let groups = derive_groups(&tree);
        assert!(groups["generation:0"].contains("root"));
        let total: usize = groups
            .iter()
            .filter(|(k, _)| group_category(k) == GENERATION_PREFIX)
            .map(|(_, v)| v.len())
            .sum();
        assert_eq!(total, 3);
    }
}
