//! Cisco Unified Communications Manager service monitoring.
//!
//! The special agent side ([`collector`]) queries the Control Center Services
//! API and prints agent output. The check side ([`section`], [`analyzer`])
//! parses that output, discovers services by rule and computes their states.

pub mod analyzer;
pub mod collector;
pub mod config;
pub mod credentials;
pub mod error;
pub mod report;
pub mod section;
pub mod types;

pub use analyzer::rules::{analyze, CompiledRules};
pub use config::Config;
pub use types::{CheckOutcome, CheckResult, EvaluationResult, Section, ServiceRecord, Severity};
