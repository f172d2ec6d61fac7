//! Selection tracking.
//!
//! The selected entity is never stored. Only its identifier is; the entity
//! itself is looked up in the current list every time it is read, so it
//! cannot drift from the list contents.

use crate::traits::Entity;

/// Find the entity named by `id` in `list`.
///
/// Linear scan: lists are page-bounded. Returns `None` when no id is
/// selected or the id is not in the list; neither case is an error.
pub fn resolve_selection<'a, E: Entity>(list: &'a [E], id: Option<&E::Id>) -> Option<&'a E> {
    let id = id?;
    list.iter().find(|entity| entity.id() == id)
}
