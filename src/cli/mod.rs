//! Workflow entry points used by the binary

pub mod orchestration;
