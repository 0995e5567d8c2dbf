//! Three-way EVSE status delta

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DiffError;
use crate::ids::{EvseId, OperatorId};
use crate::models::evse::EvseStatus;

/// Which part of a diff an EVSE belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffSet {
    New,
    Changed,
    Removed,
}

impl fmt::Display for DiffSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffSet::New => f.write_str("new"),
            DiffSet::Changed => f.write_str("changed"),
            DiffSet::Removed => f.write_str("removed"),
        }
    }
}

/// EVSE status changes of one operator since the last synchronization
///
/// The new, changed and removed sets are pairwise disjoint by EVSE id. An
/// empty diff is a valid no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvseStatusDiff {
    operator_id: OperatorId,
    operator_name: Option<String>,
    new_entries: BTreeMap<EvseId, EvseStatus>,
    changed_entries: BTreeMap<EvseId, EvseStatus>,
    removed_ids: BTreeSet<EvseId>,
}

impl EvseStatusDiff {
    pub fn new(operator_id: OperatorId, operator_name: Option<String>) -> Self {
        Self {
            operator_id,
            operator_name,
            new_entries: BTreeMap::new(),
            changed_entries: BTreeMap::new(),
            removed_ids: BTreeSet::new(),
        }
    }

    /// Delta between two status snapshots
    ///
    /// New: only in `current`. Changed: in both with a different status.
    /// Removed: only in `previous`.
    pub fn compute(
        operator_id: OperatorId,
        operator_name: Option<String>,
        previous: &BTreeMap<EvseId, EvseStatus>,
        current: &BTreeMap<EvseId, EvseStatus>,
    ) -> Self {
        let mut diff = Self::new(operator_id, operator_name);

        for (evse_id, status) in current {
            match previous.get(evse_id) {
                None => {
                    diff.new_entries.insert(evse_id.clone(), *status);
                }
                Some(old) if old != status => {
                    diff.changed_entries.insert(evse_id.clone(), *status);
                }
                Some(_) => {}
            }
        }

        diff.removed_ids = previous
            .keys()
            .filter(|evse_id| !current.contains_key(*evse_id))
            .cloned()
            .collect();

        diff
    }

    pub fn insert_new(&mut self, evse_id: EvseId, status: EvseStatus) -> Result<(), DiffError> {
        self.ensure_absent(&evse_id, DiffSet::New)?;
        self.new_entries.insert(evse_id, status);
        Ok(())
    }

    pub fn insert_changed(&mut self, evse_id: EvseId, status: EvseStatus) -> Result<(), DiffError> {
        self.ensure_absent(&evse_id, DiffSet::Changed)?;
        self.changed_entries.insert(evse_id, status);
        Ok(())
    }

    pub fn insert_removed(&mut self, evse_id: EvseId) -> Result<(), DiffError> {
        self.ensure_absent(&evse_id, DiffSet::Removed)?;
        self.removed_ids.insert(evse_id);
        Ok(())
    }

    /// Reject `evse_id` if any set other than `target` already holds it
    fn ensure_absent(&self, evse_id: &EvseId, target: DiffSet) -> Result<(), DiffError> {
        let existing = if self.new_entries.contains_key(evse_id) {
            Some(DiffSet::New)
        } else if self.changed_entries.contains_key(evse_id) {
            Some(DiffSet::Changed)
        } else if self.removed_ids.contains(evse_id) {
            Some(DiffSet::Removed)
        } else {
            None
        };

        match existing {
            Some(existing) if existing != target => Err(DiffError::Overlap {
                evse_id: evse_id.clone(),
                existing,
            }),
            _ => Ok(()),
        }
    }

    pub fn operator_id(&self) -> &OperatorId {
        &self.operator_id
    }

    pub fn operator_name(&self) -> Option<&str> {
        self.operator_name.as_deref()
    }

    pub fn new_entries(&self) -> &BTreeMap<EvseId, EvseStatus> {
        &self.new_entries
    }

    pub fn changed_entries(&self) -> &BTreeMap<EvseId, EvseStatus> {
        &self.changed_entries
    }

    pub fn removed_ids(&self) -> &BTreeSet<EvseId> {
        &self.removed_ids
    }

    pub fn is_empty(&self) -> bool {
        self.new_entries.is_empty() && self.changed_entries.is_empty() && self.removed_ids.is_empty()
    }

    /// Total number of EVSEs touched by this diff
    pub fn len(&self) -> usize {
        self.new_entries.len() + self.changed_entries.len() + self.removed_ids.len()
    }
}
