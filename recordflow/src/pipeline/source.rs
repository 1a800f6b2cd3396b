//! The record source driving a pipeline run.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::fanout::Downstreams;
use super::node::{DoneState, Node};
use crate::errors::PipelineError;
use crate::records::Record;

/// Summary of one completed pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Number of records pushed into the graph.
    pub pushed: usize,
}

impl RunReport {
    /// Wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// The producer at the head of a graph.
///
/// A source owns its input records, iterates them exactly once and pushes
/// each synchronously through the graph; after exhausting the input it emits
/// the completion signal, which propagates depth-first to every reachable
/// node exactly once.
pub struct RecordSource {
    name: String,
    records: Mutex<Vec<Record>>,
    downstreams: Downstreams,
    done: DoneState,
}

impl RecordSource {
    /// Creates a source over the given records.
    #[must_use]
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records: Mutex::new(records),
            downstreams: Downstreams::new(),
            done: DoneState::new(),
        }
    }

    /// The source name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers `node` downstream and returns it for fluent chaining.
    pub fn pipe<N: Node + 'static>(&self, node: Arc<N>) -> Arc<N> {
        self.downstreams.register(node.clone());
        node
    }

    /// Drives the run: pushes every record, then signals completion.
    ///
    /// A source can drive at most one run; calling `run` again is a usage
    /// error surfaced as a structural error.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        self.done.ensure_open(&self.name)?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(source = %self.name, %run_id, "pipeline run started");

        let records = std::mem::take(&mut *self.records.lock());
        let mut pushed = 0_usize;
        for record in records {
            self.downstreams.push(record).await?;
            pushed += 1;
        }

        self.done.mark(&self.name)?;
        self.downstreams.notify_done().await?;

        let finished_at = Utc::now();
        let report = RunReport {
            run_id,
            started_at,
            finished_at,
            pushed,
        };
        info!(
            source = %self.name,
            %run_id,
            pushed,
            duration_ms = report.duration_ms(),
            "pipeline run finished"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSource")
            .field("name", &self.name)
            .field("pending", &self.records.lock().len())
            .field("downstreams", &self.downstreams)
            .finish()
    }
}
