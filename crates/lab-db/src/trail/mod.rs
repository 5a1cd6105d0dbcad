//! JSONL trail of persisted mutations.
//!
//! One file per attempt, `{trail_dir}/{attempt_id}.jsonl`, holding every
//! create, append, complete and award touching that attempt in write order.

pub mod writer;
