//! EVSE status-diff synchronizer
//!
//! A diff is pushed in three strictly sequential phases: insert, update,
//! delete. A phase with nothing to send issues no call. Every attempted
//! phase reports its own result; a failing phase never prevents the next.

use oicp_core::{
    Acknowledgement, ActionType, EvseStatus, EvseStatusDiff, EvseStatusRecord,
    OperationResult, OperatorEvseStatus, PushEvseStatus,
};
use tracing::{debug, info, instrument};

use crate::cpo::CpoClient;
use crate::options::CallOptions;

/// Per-phase results of a diff push; `None` marks a skipped phase
#[derive(Debug, Clone, PartialEq)]
pub struct DiffPushResult {
    pub insert: Option<OperationResult<Acknowledgement>>,
    pub update: Option<OperationResult<Acknowledgement>>,
    pub delete: Option<OperationResult<Acknowledgement>>,
}

impl DiffPushResult {
    fn phases(&self) -> impl Iterator<Item = &OperationResult<Acknowledgement>> {
        [&self.insert, &self.update, &self.delete]
            .into_iter()
            .flatten()
    }

    /// Number of calls issued
    pub fn calls(&self) -> usize {
        self.phases().count()
    }

    /// Every issued call succeeded and was positively acknowledged
    pub fn is_complete(&self) -> bool {
        self.phases()
            .all(|phase| phase.success().is_some_and(|ack| ack.result))
    }
}

/// The request of one phase, or `None` when the phase has nothing to send
///
/// Removed EVSEs are sent with status `Unavailable`.
pub fn phase_request(diff: &EvseStatusDiff, action: ActionType) -> Option<PushEvseStatus> {
    let records: Vec<EvseStatusRecord> = match action {
        ActionType::Insert => diff
            .new_entries()
            .iter()
            .map(|(id, status)| EvseStatusRecord::new(id.clone(), *status))
            .collect(),
        ActionType::Update => diff
            .changed_entries()
            .iter()
            .map(|(id, status)| EvseStatusRecord::new(id.clone(), *status))
            .collect(),
        ActionType::Delete => diff
            .removed_ids()
            .iter()
            .map(|id| EvseStatusRecord::new(id.clone(), EvseStatus::Unavailable))
            .collect(),
        ActionType::FullLoad => return None,
    };

    if records.is_empty() {
        return None;
    }

    Some(PushEvseStatus {
        action,
        operator: OperatorEvseStatus {
            operator_id: diff.operator_id().clone(),
            operator_name: diff.operator_name().map(str::to_string),
            records,
        },
    })
}

impl CpoClient {
    /// Push a status diff in insert, update, delete order
    ///
    /// Not transactional: a failed phase leaves the remote partially
    /// updated until the next synchronization. Every phase shares the
    /// options' timeout and cancellation token.
    #[instrument(
        skip_all,
        fields(
            operator_id = %diff.operator_id(),
            new = diff.new_entries().len(),
            changed = diff.changed_entries().len(),
            removed = diff.removed_ids().len()
        )
    )]
    pub async fn push_diff(&self, diff: &EvseStatusDiff, options: CallOptions) -> DiffPushResult {
        let insert = self.push_phase(diff, ActionType::Insert, &options).await;
        let update = self.push_phase(diff, ActionType::Update, &options).await;
        let delete = self.push_phase(diff, ActionType::Delete, &options).await;

        let result = DiffPushResult {
            insert,
            update,
            delete,
        };
        info!(
            calls = result.calls(),
            complete = result.is_complete(),
            "Status diff pushed"
        );
        result
    }

    async fn push_phase(
        &self,
        diff: &EvseStatusDiff,
        action: ActionType,
        options: &CallOptions,
    ) -> Option<OperationResult<Acknowledgement>> {
        let Some(request) = phase_request(diff, action) else {
            debug!(%action, "Skipping empty phase");
            return None;
        };
        Some(self.push_evse_status(&request, options.clone()).await)
    }
}
