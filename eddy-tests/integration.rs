//! Integration tests for Eddy
//!
//! These tests run the real API server against real HTTP mock providers, so
//! every request crosses the full stack: router, aggregation service, HTTP
//! upstream client and provider store.

#[path = "style.rs"]
mod style;

#[path = "integration/common.rs"]
mod common;

#[path = "integration/admin_workflow.rs"]
mod admin_workflow;
#[path = "integration/detail_lookup.rs"]
mod detail_lookup;
#[path = "integration/hot_list.rs"]
mod hot_list;
#[path = "integration/latency_probe.rs"]
mod latency_probe;
#[path = "integration/search_fanout.rs"]
mod search_fanout;
