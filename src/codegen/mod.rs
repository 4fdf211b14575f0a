//! Code generation for teenyc
//!
//! C text is produced directly by the parser as each production is
//! recognised; this module only owns the output buffer.

mod emitter;

pub use emitter::Emitter;
