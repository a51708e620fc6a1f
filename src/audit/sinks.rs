//! Audit sink implementations.

use crate::audit::{AuditEvent, AuditRecord, AuditSink, Severity};
use parking_lot::Mutex;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{error, info, warn};

/// Writes audit events to the `tracing` subscriber at their own severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn notify(&self, server_name: &str, user_id: &str, event: AuditEvent) {
        let message = event.message();
        match event.severity() {
            Severity::Info => info!(target: "asset_lineage::audit", server_name, user_id, "{}", message),
            Severity::Warning => warn!(target: "asset_lineage::audit", server_name, user_id, "{}", message),
            Severity::Error => error!(target: "asset_lineage::audit", server_name, user_id, "{}", message),
        }
    }
}

/// In-process bus forwarding audit records to a receiver.
///
/// A dropped receiver silently discards events.
#[derive(Clone)]
pub struct AuditBus {
    sender: Sender<AuditRecord>,
}

impl AuditBus {
    pub fn new_pair() -> (Self, Receiver<AuditRecord>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }
}

impl AuditSink for AuditBus {
    fn notify(&self, server_name: &str, user_id: &str, event: AuditEvent) {
        let _ = self
            .sender
            .send(AuditRecord::with_now(server_name, user_id, event));
    }
}

/// Collects audit records in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.records.lock().iter().map(|r| r.event.clone()).collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn notify(&self, server_name: &str, user_id: &str, event: AuditEvent) {
        self.records
            .lock()
            .push(AuditRecord::with_now(server_name, user_id, event));
    }
}
