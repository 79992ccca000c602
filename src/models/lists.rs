//! Enabled and disabled identity lists
//!
//! The two lists are the user's persisted choices. They are kept disjoint:
//! adding an identity to one list takes it out of the other.

use super::ids::LogId;

/// The enabled (allow) and disabled (deny) identity lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLists {
    enabled: Vec<LogId>,
    disabled: Vec<LogId>,
}

impl EntryLists {
    /// Build lists from raw enabled and disabled identities
    ///
    /// Duplicates are dropped. An identity named by both lists stays enabled.
    pub fn from_parts(
        enabled: impl IntoIterator<Item = LogId>,
        disabled: impl IntoIterator<Item = LogId>,
    ) -> Self {
        let mut lists = Self::default();
        for id in disabled {
            if !lists.disabled.contains(&id) {
                lists.disabled.push(id);
            }
        }
        for id in enabled {
            lists.enable(&id);
        }
        lists
    }

    pub fn enabled(&self) -> &[LogId] {
        &self.enabled
    }

    pub fn disabled(&self) -> &[LogId] {
        &self.disabled
    }

    pub fn is_enabled(&self, id: &LogId) -> bool {
        self.enabled.contains(id)
    }

    pub fn is_disabled(&self, id: &LogId) -> bool {
        self.disabled.contains(id)
    }

    /// Whether either list names `id`
    pub fn contains(&self, id: &LogId) -> bool {
        self.is_enabled(id) || self.is_disabled(id)
    }

    /// Put `id` in the enabled list. Returns `true` if anything changed.
    pub fn enable(&mut self, id: &LogId) -> bool {
        let removed = remove(&mut self.disabled, id);
        if self.enabled.contains(id) {
            return removed;
        }
        self.enabled.push(id.clone());
        true
    }

    /// Put `id` in the disabled list. Returns `true` if anything changed.
    pub fn disable(&mut self, id: &LogId) -> bool {
        let removed = remove(&mut self.enabled, id);
        if self.disabled.contains(id) {
            return removed;
        }
        self.disabled.push(id.clone());
        true
    }

    /// Enable each default identity that neither list mentions yet
    pub fn apply_defaults<'a>(&mut self, defaults: impl IntoIterator<Item = &'a LogId>) {
        for id in defaults {
            if !self.contains(id) {
                self.enabled.push(id.clone());
            }
        }
    }
}

fn remove(list: &mut Vec<LogId>, id: &LogId) -> bool {
    let before = list.len();
    list.retain(|existing| existing != id);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> LogId {
        LogId::parse(s).unwrap()
    }

    #[test]
    fn test_from_parts_enabled_wins() {
        let lists = EntryLists::from_parts(
            vec![id("console"), id("mods"), id("console")],
            vec![id("mods"), id("jolly")],
        );

        assert_eq!(lists.enabled(), &[id("console"), id("mods")]);
        assert_eq!(lists.disabled(), &[id("jolly")]);
    }

    #[test]
    fn test_enable_and_disable_move_between_lists() {
        let mut lists = EntryLists::default();
        assert!(lists.enable(&id("console")));
        assert!(!lists.enable(&id("console")));

        assert!(lists.disable(&id("console")));
        assert!(!lists.is_enabled(&id("console")));
        assert!(lists.is_disabled(&id("console")));
    }

    #[test]
    fn test_apply_defaults_respects_existing_choices() {
        let mut lists = EntryLists::from_parts(vec![], vec![id("mods")]);
        let defaults = [id("console"), id("exception"), id("mods")];

        lists.apply_defaults(&defaults);

        assert_eq!(lists.enabled(), &[id("console"), id("exception")]);
        assert_eq!(lists.disabled(), &[id("mods")]);
    }
}
