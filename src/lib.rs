#![allow(unused)]
//! A self-index over integer RDF-like triples built from three cooperating
//! Burrows-Wheeler Transforms, answering point lookups and leapfrog
//! triejoin-style range queries in any of the six lexicographic triple
//! orderings without ever materialising a sorted copy for the ordering a
//! query happens to need. See [`ring::Ring`] for the entry point.

// the BWT primitive and its two backings
pub mod bwt;
// row-range cursor into one BWT column
pub mod interval;
// crate-wide error type
pub mod error;
// whitespace-separated triple-stream dataset format
pub mod dataset;
// the Ring index itself
pub mod ring;

pub use error::{Error, Result};
pub use ring::{Ring, Triple};
