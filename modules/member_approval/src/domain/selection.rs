use std::collections::HashSet;

/// Tri-state of a "select all" control relative to the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Member ids chosen for the next bulk operation.
///
/// Pure in-memory state owned by a single session; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_owned());
        }
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sorted snapshot of the selected ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_all_selected(&self, visible: usize) -> bool {
        !self.ids.is_empty() && self.ids.len() == visible
    }

    pub fn is_partially_selected(&self, visible: usize) -> bool {
        !self.ids.is_empty() && self.ids.len() < visible
    }

    pub fn state(&self, visible: usize) -> SelectionState {
        if self.is_all_selected(visible) {
            SelectionState::All
        } else if self.is_partially_selected(visible) {
            SelectionState::Partial
        } else {
            SelectionState::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(ids: &[&str]) -> SelectionSet {
        let mut s = SelectionSet::new();
        s.select_all(ids.iter().copied());
        s
    }

    #[test]
    fn toggle_twice_restores_previous_state() {
        for start in [set_of(&[]), set_of(&["a"]), set_of(&["a", "b", "c"])] {
            for x in ["a", "b", "z"] {
                let mut s = start.clone();
                s.toggle(x);
                s.toggle(x);
                assert_eq!(s, start, "toggle({x}) twice changed the set");
            }
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut s = SelectionSet::new();
        s.toggle("a");
        assert!(s.contains("a"));
        assert_eq!(s.len(), 1);
        s.toggle("a");
        assert!(!s.contains("a"));
        assert!(s.is_empty());
    }

    #[test]
    fn select_all_replaces_and_clear_empties() {
        let mut s = set_of(&["x"]);
        s.select_all(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(s.ids(), vec!["a".to_string(), "b".to_string()]);

        s.clear();
        assert!(s.is_empty());

        s.select_all(Vec::<String>::new());
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn tri_state_follows_visible_size() {
        let empty = SelectionSet::new();
        assert!(!empty.is_all_selected(0));
        assert!(!empty.is_partially_selected(3));
        assert_eq!(empty.state(0), SelectionState::None);
        assert_eq!(empty.state(3), SelectionState::None);

        let two = set_of(&["a", "b"]);
        assert!(two.is_partially_selected(3));
        assert!(!two.is_all_selected(3));
        assert_eq!(two.state(3), SelectionState::Partial);

        assert!(two.is_all_selected(2));
        assert!(!two.is_partially_selected(2));
        assert_eq!(two.state(2), SelectionState::All);
    }

    #[test]
    fn retain_and_remove() {
        let mut s = set_of(&["a", "b", "c"]);
        s.retain(|id| id != "b");
        assert_eq!(s.ids(), vec!["a".to_string(), "c".to_string()]);
        assert!(s.remove("a"));
        assert!(!s.remove("a"));
        assert_eq!(s.ids(), vec!["c".to_string()]);
    }
}
