// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax types shared by the Go front end and the test generator.
//!
//! The generator core only ever sees what this crate exposes: function
//! signatures, comment groups, and the [`Frontend`] trait that produces them.
//! Nothing here depends on a particular lexer or parser.

pub mod span;
pub mod token;
pub mod decl;
pub mod source;
pub mod frontend;

pub use span::{LineMap, LineRange, Span};
pub use frontend::{Frontend, FrontendError};
