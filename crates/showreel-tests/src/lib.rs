//! Integration test crate for Showreel.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple showreel crates to verify they work together.

#[cfg(test)]
mod support;

#[cfg(test)]
mod editing;

#[cfg(test)]
mod playback;
