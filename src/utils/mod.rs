//! Small text helpers shared by the generation agents.

pub mod text;

pub use text::{clean_reply, extract_fenced_block, sanitize_name, strip_fences, strip_think_blocks};
