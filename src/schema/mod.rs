//! Raw activity event schema
//!
//! This module defines the loosely typed record shape read from the event store
//! and the ingestion boundary that turns records into typed events.

mod adapter;
mod raw_event;

pub use adapter::*;
pub use raw_event::*;
