//! Network probing.
//!
//! This module provides:
//! - The [`Probe`] trait, the only way the audit touches the network
//! - An HTTP implementation issuing HEAD requests
//! - A table-driven implementation for offline runs and tests

mod client;
mod probe;

pub use client::{content_length, extract_host, HttpProber};
pub use probe::{Probe, ProbeResult, StaticProber};
