//! Exit codes for the `anchor` CLI.
//! Part of the public contract; scripts branch on them.

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 2; // Config, I/O or journal failure
pub const NOT_FOUND: i32 = 3; // Unknown id, or unknown CID with --strict
pub const REJECTED: i32 = 4; // Empty or duplicate CID
