//! Output generation.
//!
//! The digest is console-only: [`console`] renders each article's header,
//! optional text preview, summary block and failure warnings to any
//! [`std::io::Write`] sink (stdout in production, a buffer in tests).
//!
//! # Layout
//!
//! ```text
//!
//! === Article 1/2 ===
//! https://news.example/story
//!
//! — Summary (3 sentences) —
//!
//! First sentence. Second sentence. Third sentence.
//!
//! ```

pub mod console;
