//! Strategies for turning a file into text.
//!
//! Each submodule implements exactly one step. The dispatcher in
//! [`crate::import`] composes them.
//!
//! ## Data Flow
//!
//! ```text
//!                 ┌─▶ decode ───────────────────────▶ text
//! classify ───────┼─▶ pdf (local) ──fail──▶ remote ─▶ text
//!                 ├─▶ remote (too large / size unknown)
//!                 └─▶ unsupported
//! ```
//!
//! 1. [`classify`]: pure routing on declared MIME type and name suffix
//! 2. [`decode`]: read and decode plain-text files
//! 3. [`pdf`]: extract page text in-process, inside `spawn_blocking`
//!    since PDFium is synchronous
//! 4. [`remote`]: multipart upload to the parse service; the only stage
//!    with network I/O

pub mod classify;
pub mod decode;
pub mod pdf;
pub mod remote;
