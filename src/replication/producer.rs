//! Replication Producer
//!
//! Queue and workers that forward accepted mutations to replicas.
//!
//! Each replica gets its own unbounded FIFO queue and its own worker
//! task, so the order a single replica observes matches the order the
//! primary applied the mutations. Workers survive individual call
//! failures; they exit when the queue senders are dropped, draining
//! whatever is still queued.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::{ApplyRequest, ApplyResponse};

// == Replication Task ==
/// A mutation to forward to each configured replica. This is the log
/// record minus its storage position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicationTask {
    Put { key: String, value: String },
    Del { key: String },
}

impl ReplicationTask {
    /// The wire request this task maps to.
    fn to_request(&self) -> ApplyRequest {
        match self {
            ReplicationTask::Put { key, value } => ApplyRequest {
                op_type: "PUT".to_string(),
                key: key.clone(),
                value: value.clone(),
            },
            ReplicationTask::Del { key } => ApplyRequest {
                op_type: "DEL".to_string(),
                key: key.clone(),
                value: String::new(),
            },
        }
    }

    fn key(&self) -> &str {
        match self {
            ReplicationTask::Put { key, .. } => key,
            ReplicationTask::Del { key } => key,
        }
    }
}

// == Replication Queue ==
/// The facade-side handle: one sender per replica worker.
///
/// Enqueueing never blocks and never fails the client operation. When
/// the queue is dropped (shutdown), the workers see their channels close
/// and drain.
#[derive(Debug, Clone)]
pub struct ReplicationQueue {
    senders: Vec<mpsc::UnboundedSender<ReplicationTask>>,
}

impl ReplicationQueue {
    /// Builds a queue over raw channel senders, bypassing the workers.
    #[cfg(test)]
    pub(crate) fn from_senders(senders: Vec<mpsc::UnboundedSender<ReplicationTask>>) -> Self {
        Self { senders }
    }

    /// Fans a task out to every replica worker.
    pub fn enqueue(&self, task: ReplicationTask) {
        for sender in &self.senders {
            if sender.send(task.clone()).is_err() {
                warn!(key = task.key(), "replication worker gone, dropping task");
            }
        }
    }
}

// == Replication Workers ==
/// Join handles for the per-replica workers, held by the bootstrap so
/// shutdown can wait for the queues to drain.
#[derive(Debug)]
pub struct ReplicationWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl ReplicationWorkers {
    /// Waits for each worker to drain and exit, aborting any that
    /// exceed the grace period.
    ///
    /// The queue senders must have been dropped first, otherwise the
    /// workers never see end-of-queue.
    pub async fn shutdown(mut self, grace: Duration) {
        for handle in self.handles.iter_mut() {
            if tokio::time::timeout(grace, &mut *handle).await.is_err() {
                warn!("replication worker exceeded shutdown grace period, aborting");
                handle.abort();
            }
        }
        info!("replication workers stopped");
    }
}

// == Start Workers ==
/// Spawns one worker per replica endpoint.
///
/// Returns the facade-side queue and the worker handles. `deadline`
/// bounds each remote call; a call that exceeds it is treated as a
/// transport failure for that task.
pub fn start_workers(
    replica_addresses: &[String],
    deadline: Duration,
) -> (ReplicationQueue, ReplicationWorkers) {
    let client = reqwest::Client::new();
    let mut senders = Vec::with_capacity(replica_addresses.len());
    let mut handles = Vec::with_capacity(replica_addresses.len());

    for address in replica_addresses {
        let (sender, receiver) = mpsc::unbounded_channel();
        senders.push(sender);
        handles.push(tokio::spawn(worker_loop(
            address.clone(),
            client.clone(),
            receiver,
            deadline,
        )));
        info!(replica = %address, "replication worker started");
    }

    (
        ReplicationQueue { senders },
        ReplicationWorkers { handles },
    )
}

/// Drains one replica's queue until the sender side is dropped.
async fn worker_loop(
    address: String,
    client: reqwest::Client,
    mut receiver: mpsc::UnboundedReceiver<ReplicationTask>,
    deadline: Duration,
) {
    let url = format!("http://{}/replicate", address);
    while let Some(task) = receiver.recv().await {
        forward(&client, &url, &address, &task, deadline).await;
    }
    info!(replica = %address, "replication queue drained, worker exiting");
}

/// Sends one task to one replica. Failures are diagnostics only: the
/// primary's mutation already happened and is never rolled back.
async fn forward(
    client: &reqwest::Client,
    url: &str,
    address: &str,
    task: &ReplicationTask,
    deadline: Duration,
) {
    let request = task.to_request();
    let result = client
        .post(url)
        .timeout(deadline)
        .json(&request)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            match response.json::<ApplyResponse>().await {
                Ok(body) if body.success => {
                    debug!(replica = %address, key = %request.key, op = %request.op_type, "replicated");
                }
                Ok(_) => {
                    warn!(replica = %address, key = %request.key, "replica rejected operation");
                }
                Err(err) => {
                    warn!(replica = %address, key = %request.key, error = %err, "invalid replica response");
                }
            }
        }
        Ok(response) => {
            warn!(
                replica = %address,
                key = %request.key,
                status = %response.status(),
                "replica rejected operation"
            );
        }
        Err(err) => {
            warn!(replica = %address, key = %request.key, error = %err, "replica unreachable");
        }
    }
}
