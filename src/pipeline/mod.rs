//! The conversion pipeline, one module per stage.
//!
//! Data flows `discover` → `codec` → `layout` → `assemble`, with `naming`
//! resolving the output path just before the document is written. The
//! orchestrator in [`crate::convert`] drives the stages; none of them
//! call each other directly.

pub mod assemble;
pub mod codec;
pub mod discover;
pub mod layout;
pub mod naming;
