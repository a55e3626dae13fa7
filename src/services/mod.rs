//! Services that reach outside the process.
//!
//! ARCHITECTURE
//! ============
//! The state layer stays synchronous and pure; anything that talks to the
//! network lives here behind a trait so the session can be driven by doubles.

pub mod recommend;
