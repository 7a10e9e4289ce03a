/// Renderer boundary and resolved binding values.
pub mod backend;
/// In-memory renderer used by tests and the CLI.
pub mod recording;
pub(crate) mod traversal;
