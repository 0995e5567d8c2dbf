//! Pushes simulated EVSE status changes to the hub

use oicp_client::{CallOptions, CancellationToken, CpoClient};
use oicp_core::{
    ActionType, EvseStatusDiff, EvseStatusRecord, OperatorEvseStatus, OperatorId, PushEvseStatus,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::simulator::StatusSnapshot;

pub struct StatusPublisher {
    client: CpoClient,
    operator_id: OperatorId,
    operator_name: Option<String>,
}

impl StatusPublisher {
    pub fn new(client: CpoClient, operator_id: OperatorId, operator_name: Option<String>) -> Self {
        Self {
            client,
            operator_id,
            operator_name,
        }
    }

    /// Full load of every EVSE in `snapshot`
    pub fn full_load(&self, snapshot: &StatusSnapshot) -> PushEvseStatus {
        PushEvseStatus {
            action: ActionType::FullLoad,
            operator: OperatorEvseStatus {
                operator_id: self.operator_id.clone(),
                operator_name: self.operator_name.clone(),
                records: snapshot
                    .iter()
                    .map(|(id, status)| EvseStatusRecord::new(id.clone(), *status))
                    .collect(),
            },
        }
    }

    /// Send a full load, then one diff push per observed change until
    /// `shutdown` fires or the simulator goes away
    ///
    /// The baseline only advances after a complete push, so a failed phase
    /// is retried with the next change.
    pub async fn run(self, mut updates: watch::Receiver<StatusSnapshot>, shutdown: CancellationToken) {
        let mut pushed = updates.borrow_and_update().clone();

        let full_load = self.full_load(&pushed);
        let result = self
            .client
            .push_evse_status(&full_load, CallOptions::new().with_cancel(shutdown.clone()))
            .await;
        if result.success().is_some_and(|ack| ack.result) {
            info!(evses = pushed.len(), "Initial EVSE status full load pushed");
        } else {
            warn!(result = result.kind(), status = ?result.fault_status(), "Initial EVSE status full load failed");
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let current = updates.borrow_and_update().clone();
            let diff = EvseStatusDiff::compute(
                self.operator_id.clone(),
                self.operator_name.clone(),
                &pushed,
                &current,
            );
            if diff.is_empty() {
                continue;
            }

            let result = self
                .client
                .push_diff(&diff, CallOptions::new().with_cancel(shutdown.clone()))
                .await;
            if result.is_complete() {
                pushed = current;
            } else {
                warn!(calls = result.calls(), "EVSE status diff push incomplete, retrying on next change");
            }
        }

        info!("Status publisher stopped");
    }
}
