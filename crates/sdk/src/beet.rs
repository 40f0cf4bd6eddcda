/// Staged transaction pipeline
///
/// A run is an ordered list of stages. Tasks inside a stage are submitted
/// together and joined before the next stage starts; the first failure halts
/// the run once its stage has joined. Every task that reaches a receipt
/// invalidates the cached reads it declared, then reports success.
///
/// ```text
/// idle -> sending -> pending -> success
///            |          |
///            +-> error <+
/// ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::contracts::{Account, ContractWriter, Receipt, ReceiptWaiter, TransactionRequest, TxHash};
use crate::errors::TxError;
use crate::notify::{NotificationSink, TaskEvent};

// ============================================================================
// Status
// ============================================================================

/// Lifecycle of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Idle,
    /// Submission requested from the wallet
    Sending,
    /// Broadcast, waiting for a receipt
    Pending { hash: TxHash },
    Success { receipt: Receipt },
    Error { cause: TxError },
}

impl TxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Idle => "idle",
            TxStatus::Sending => "sending",
            TxStatus::Pending { .. } => "pending",
            TxStatus::Success { .. } => "success",
            TxStatus::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Success { .. } | TxStatus::Error { .. })
    }
}

// ============================================================================
// Tasks and Stages
// ============================================================================

/// Something that submits one transaction when invoked
#[async_trait]
pub trait TxEnvelope: Send + Sync {
    async fn submit(&self) -> Result<TxHash, TxError>;
}

/// Submits a prepared request through a wallet writer
pub struct ContractEnvelope {
    writer: Arc<dyn ContractWriter>,
    account: Account,
    request: TransactionRequest,
}

impl ContractEnvelope {
    pub fn new(writer: Arc<dyn ContractWriter>, account: Account, request: TransactionRequest) -> Self {
        Self {
            writer,
            account,
            request,
        }
    }

    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }
}

#[async_trait]
impl TxEnvelope for ContractEnvelope {
    async fn submit(&self) -> Result<TxHash, TxError> {
        self.writer.send(&self.account, &self.request).await
    }
}

pub struct TransactionTask {
    pub title: String,
    pub description: String,
    pub envelope: Box<dyn TxEnvelope>,
    /// Cached reads the transaction can change
    pub invalidates: Vec<QueryKey>,
}

impl TransactionTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>, envelope: Box<dyn TxEnvelope>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            envelope,
            invalidates: Vec::new(),
        }
    }

    pub fn invalidating(mut self, keys: impl IntoIterator<Item = QueryKey>) -> Self {
        for key in keys {
            if !self.invalidates.contains(&key) {
                self.invalidates.push(key);
            }
        }
        self
    }
}

pub struct TransactionStage {
    pub title: String,
    pub tasks: Vec<TransactionTask>,
}

impl TransactionStage {
    pub fn new(title: impl Into<String>, tasks: Vec<TransactionTask>) -> Self {
        Self {
            title: title.into(),
            tasks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ============================================================================
// Run Reports
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub title: String,
    pub status: TxStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub title: String,
    pub tasks: Vec<TaskReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success,
    /// First failure of the halting stage
    Error {
        stage_index: usize,
        task_title: String,
        cause: TxError,
    },
}

/// Final state of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    pub title: String,
    pub stages: Vec<StageReport>,
    pub outcome: RunOutcome,
}

impl PipelineRun {
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }

    /// Status of the first task titled `title`
    pub fn status_of(&self, title: &str) -> Option<&TxStatus> {
        self.stages
            .iter()
            .flat_map(|s| s.tasks.iter())
            .find(|t| t.title == title)
            .map(|t| &t.status)
    }
}

// ============================================================================
// Executor
// ============================================================================

pub struct Beet {
    waiter: Arc<dyn ReceiptWaiter>,
    cache: Arc<QueryCache>,
    sink: Arc<dyn NotificationSink>,
}

impl Beet {
    pub fn new(waiter: Arc<dyn ReceiptWaiter>, cache: Arc<QueryCache>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { waiter, cache, sink }
    }

    /// Execute `stages` in order and report every task's final status
    pub async fn run(&self, title: &str, stages: Vec<TransactionStage>) -> PipelineRun {
        info!(run = title, stages = stages.len(), "Starting transaction run");

        let mut reports: Vec<StageReport> = stages
            .iter()
            .map(|stage| StageReport {
                title: stage.title.clone(),
                tasks: stage
                    .tasks
                    .iter()
                    .map(|t| TaskReport {
                        title: t.title.clone(),
                        status: TxStatus::Idle,
                    })
                    .collect(),
            })
            .collect();

        let mut outcome = RunOutcome::Success;

        for (stage_index, stage) in stages.iter().enumerate() {
            if stage.is_empty() {
                debug!(run = title, stage = stage_index, "Skipping empty stage");
                continue;
            }

            // join barrier
            let statuses = join_all(
                stage
                    .tasks
                    .iter()
                    .enumerate()
                    .map(|(task_index, task)| self.run_task(title, stage_index, task_index, task)),
            )
            .await;

            for (report, status) in reports[stage_index].tasks.iter_mut().zip(statuses) {
                if let TxStatus::Error { cause } = &status {
                    if outcome == RunOutcome::Success {
                        outcome = RunOutcome::Error {
                            stage_index,
                            task_title: report.title.clone(),
                            cause: cause.clone(),
                        };
                    }
                }
                report.status = status;
            }

            if let RunOutcome::Error { task_title, .. } = &outcome {
                warn!(run = title, stage = stage_index, task = %task_title, "Halting transaction run");
                break;
            }
        }

        if outcome == RunOutcome::Success {
            info!(run = title, "Transaction run complete");
        }

        PipelineRun {
            title: title.to_string(),
            stages: reports,
            outcome,
        }
    }

    async fn run_task(
        &self,
        run_title: &str,
        stage_index: usize,
        task_index: usize,
        task: &TransactionTask,
    ) -> TxStatus {
        let emit = |status: &TxStatus| {
            self.sink.notify(&TaskEvent {
                run_title: run_title.to_string(),
                stage_index,
                task_index,
                task_title: task.title.clone(),
                status: status.clone(),
            })
        };

        emit(&TxStatus::Sending);
        let hash = match task.envelope.submit().await {
            Ok(hash) => hash,
            Err(cause) => return fail(cause, &emit),
        };

        emit(&TxStatus::Pending { hash });
        let receipt = match self.waiter.wait(&hash).await {
            Ok(receipt) => receipt,
            Err(cause) => return fail(cause, &emit),
        };

        self.cache.invalidate(&task.invalidates).await;

        let status = TxStatus::Success { receipt };
        emit(&status);
        status
    }
}

fn fail(cause: TxError, emit: &impl Fn(&TxStatus)) -> TxStatus {
    let status = TxStatus::Error { cause };
    emit(&status);
    status
}
