//! Milestones reached during the guided wait

use std::collections::BTreeSet;

use crate::i18n::Language;

/// Unlock thresholds in seconds since the guided wait started
pub const THRESHOLDS: [u32; 4] = [120, 300, 480, 570];

/// Localised label for a threshold
pub fn label(threshold: u32, language: Language) -> Option<&'static str> {
    let index = THRESHOLDS.iter().position(|t| *t == threshold)?;
    Some(language.strings().milestones[index])
}

/// Milestones already surfaced in this session
///
/// Only grows. A later evaluation with a smaller elapsed time never removes
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneSet {
    unlocked: BTreeSet<u32>,
}

impl MilestoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock every threshold at or below `elapsed_secs`; returns the new ones
    pub fn unlock_up_to(&mut self, elapsed_secs: u32) -> Vec<u32> {
        THRESHOLDS
            .iter()
            .copied()
            .filter(|t| *t <= elapsed_secs)
            .filter(|t| self.unlocked.insert(*t))
            .collect()
    }

    pub fn contains(&self, threshold: u32) -> bool {
        self.unlocked.contains(&threshold)
    }

    /// Unlocked thresholds in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocks_at_threshold() {
        let mut set = MilestoneSet::new();
        assert!(set.unlock_up_to(119).is_empty());
        assert_eq!(set.unlock_up_to(120), vec![120]);
        assert!(set.unlock_up_to(121).is_empty());
        assert_eq!(set.unlock_up_to(600), vec![300, 480, 570]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_never_relocks() {
        let mut set = MilestoneSet::new();
        set.unlock_up_to(130);
        set.unlock_up_to(10);
        assert!(set.contains(120));
        assert!(!set.contains(300));
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(120, Language::En), Some("2 min - Heart rate normalizes"));
        assert_eq!(label(570, Language::It), Some("9.5 min - Quasi fatto!"));
        assert_eq!(label(42, Language::En), None);
    }
}
