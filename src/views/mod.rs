// View-state controllers — extracted from commands.rs
// One module per dashboard view; each owns exactly one fetch slot in
// AppState and is the only writer to it. Commands stay thin wrappers.

pub mod clusters;
pub mod prediction;
pub mod summary;
pub mod trends;
