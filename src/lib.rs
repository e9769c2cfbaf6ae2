//! veriom — external attacker-perspective verifier for cloud
//! misconfiguration findings.
//!
//! Takes a CSV export of reported misconfigurations, matches each row to a
//! probing strategy (unauthenticated HTTP read, raw TCP connect, or a
//! manual-check fallback), executes the probes under bounded concurrency,
//! and appends a verdict to every row of the output CSV.

pub mod cli;
pub mod config;
pub mod errors;
pub mod loader;
pub mod models;
pub mod net;
pub mod pipeline;
pub mod probes;
pub mod report;
