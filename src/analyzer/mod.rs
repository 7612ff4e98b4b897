//! Discovery and check logic.

pub mod cluster;
pub mod discovery;
pub mod evaluate;
pub mod legacy;
pub mod matcher;
pub mod rules;
pub mod summary;
