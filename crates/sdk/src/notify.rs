/// Pipeline status notifications

use std::sync::Mutex;

use tracing::{info, warn};

use crate::beet::TxStatus;

/// Status change of one task in a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEvent {
    pub run_title: String,
    pub stage_index: usize,
    pub task_index: usize,
    pub task_title: String,
    pub status: TxStatus,
}

/// Receiver of task status changes
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &TaskEvent);
}

/// Keeps every event in order of arrival
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TaskEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events of the task titled `title`
    pub fn events_for(&self, title: &str) -> Vec<TaskEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.task_title == title)
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &TaskEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Writes events to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &TaskEvent) {
        match &event.status {
            TxStatus::Error { cause } => warn!(
                run = %event.run_title,
                stage = event.stage_index,
                task = %event.task_title,
                %cause,
                "Transaction failed"
            ),
            status => info!(
                run = %event.run_title,
                stage = event.stage_index,
                task = %event.task_title,
                status = status.label(),
                "Transaction status"
            ),
        }
    }
}
