//! Repository methods, implemented as `impl LabService` blocks.

pub mod achievement;
pub mod attempt;
pub mod notebook;
