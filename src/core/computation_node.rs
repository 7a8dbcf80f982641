// Copyright @yucwang 2026

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DEFAULT_ID: AtomicU64 = AtomicU64::new(1);

/// Fresh id for an object the config left unnamed, unique for the process.
pub fn generate_node_id(kind: &str) -> String {
    let seq = NEXT_DEFAULT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", kind, seq)
}

/// Anything a config can declare and later refer to by id.
pub trait ComputationNode {
    fn id(&self) -> &str;

    /// One-line summary for logs.
    fn to_string(&self) -> String;
}
