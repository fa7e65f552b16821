//! Crate-wide error type. One enum, one `Result` alias, in the style used
//! throughout this codebase for its own components.

use thiserror::Error;

/// Everything that can go wrong calling into a [`crate::ring::Ring`] or the
/// dataset/serialization helpers around it.
#[derive(Error, Debug)]
pub enum Error {
    /// `remove_edge`/`remove_edge_and_check` was asked to delete a triple
    /// that is not present.
    #[error("triple ({s}, {p}, {o}) does not exist in the graph")]
    NotFound { s: usize, p: usize, o: usize },

    /// The three-branch insert/remove assertion in the dynamic update
    /// algorithms failed: none of the three ranges collapsed, which can
    /// only happen if the ring cycle invariant (I2) has already been
    /// broken by the caller or by data corruption.
    #[error("ring invariant violated: {detail}")]
    RingInvariantViolated { detail: &'static str },

    /// `Ring::load` received bytes that do not decode to a structurally
    /// valid Ring.
    #[error("corrupt ring image: {0}")]
    Corrupt(String),

    /// A `bincode` decode failure, surfaced directly when it has not yet
    /// been translated into a [`Error::Corrupt`] with more context.
    #[error("failed to decode ring image: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// A `bincode` encode failure while serializing a Ring.
    #[error("failed to encode ring image: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// A failure reading the whitespace-separated triple-stream dataset
    /// format, carrying the offending line number for diagnosability.
    #[error("dataset line {line}: {message}")]
    Dataset { line: usize, message: String },

    /// I/O failure opening or reading a serialized Ring image or dataset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
