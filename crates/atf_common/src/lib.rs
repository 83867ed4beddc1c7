//! Shared foundational types used across the atfconv crates.
//!
//! Fuse vectors and row words are both plain 2-state bit vectors; this crate
//! provides the packed [`Bits`] type they are built on, along with the text
//! renderings (index-ordered binary, LSB-first hex) the file formats need.

#![warn(missing_docs)]

pub mod bits;

pub use bits::Bits;
