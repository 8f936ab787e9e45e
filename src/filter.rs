//! Decoy removal.

use log::info;

use crate::record::TransitionRecord;

/// Result of filtering a transition table
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Records kept, in input order
    pub records: Vec<TransitionRecord>,
    /// Number of decoy records dropped
    pub decoys_removed: usize,
}

/// Drop decoy transitions when `remove_decoys` is set; otherwise return the
/// records untouched.
pub fn filter_decoys(records: Vec<TransitionRecord>, remove_decoys: bool) -> FilterOutcome {
    if !remove_decoys {
        return FilterOutcome {
            records,
            decoys_removed: 0,
        };
    }

    let before = records.len();
    let records: Vec<_> = records.into_iter().filter(|r| !r.decoy).collect();
    let decoys_removed = before - records.len();
    if decoys_removed > 0 {
        info!("Removed {} decoy transitions", decoys_removed);
    }

    FilterOutcome {
        records,
        decoys_removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, decoy: bool) -> TransitionRecord {
        TransitionRecord {
            row,
            transition_group_id: "1".to_string(),
            decoy,
            ..Default::default()
        }
    }

    #[test]
    fn test_removes_decoys_in_order() {
        let records = vec![record(0, false), record(1, true), record(2, false), record(3, true)];
        let outcome = filter_decoys(records, true);
        assert_eq!(outcome.decoys_removed, 2);
        let rows: Vec<_> = outcome.records.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 2]);
    }

    #[test]
    fn test_disabled_filter_keeps_everything() {
        let records = vec![record(0, true), record(1, true)];
        let outcome = filter_decoys(records.clone(), false);
        assert_eq!(outcome.decoys_removed, 0);
        assert_eq!(outcome.records, records);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = vec![record(0, false), record(1, true), record(2, false)];
        let once = filter_decoys(records, true).records;
        let twice = filter_decoys(once.clone(), true);
        assert_eq!(twice.decoys_removed, 0);
        assert_eq!(twice.records, once);
    }
}
