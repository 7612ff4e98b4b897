//! Special agent side: talks to the UCM node and emits agent output.

pub mod service_status;
pub mod soap;
