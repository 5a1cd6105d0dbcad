//! # lab-core
//!
//! Core types, ID generation, and error types for labrun.
//!
//! This crate provides the foundational types shared across all labrun crates:
//! - Entity structs for attempts, notebook entries, steps, molecules, exercises
//!   and achievements
//! - Status and policy enums, with state machine transitions where they apply
//! - ID prefix constants and random ID generation
//! - Cross-cutting error types
//! - Trail operation envelope for JSONL persistence
//! - Collaborator traits the session engine calls out to
//! - Achievement rules over a participant's attempt history

pub mod achievements;
pub mod collaborators;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod trail;
