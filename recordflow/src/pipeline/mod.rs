//! The push-based streaming engine.
//!
//! A graph is wired from a [`RecordSource`] through [`StageNode`]s into
//! [`SinkNode`]s. The source iterates its input exactly once; every record
//! descends the full graph before the next one is pushed, and a single
//! completion signal propagates depth-first after the last record.
//!
//! Scheduling is cooperative and fully sequential — no task spawning, no
//! parallel delivery — so downstream nodes observe records in exactly the
//! order the upstream pushed them, and sibling fan-out targets observe
//! identical sequences.

mod fanout;
mod node;
mod sink;
mod source;
mod stage;

#[cfg(test)]
mod integration_tests;

pub use fanout::Downstreams;
pub use node::{DoneState, Node};
pub use sink::{Sink, SinkNode};
pub use source::{RecordSource, RunReport};
pub use stage::{StageNode, Transform};
