//! Parser module for play notation
//!
//! This module turns the play field of an event file into a
//! [`PlayDescriptor`]. Parsing is pure: the same field always yields the same
//! descriptor, and nothing about the game is consulted.
//!
//! ## Structure
//!
//! - [`descriptor`]: the descriptor types and their canonical rendering
//! - [`combinators`]: chumsky building blocks for notation atoms
//! - [`parser`]: the play grammar and the [`parse`] entry point

pub mod combinators;
pub mod descriptor;
#[allow(clippy::module_inception)]
pub mod parser;
#[cfg(test)]
mod tests;

pub use descriptor::{
    AdvanceAnnotation, Base, ChainSegment, Destination, Fielder, FieldingGroup, FieldingStep,
    Modifier, PlayDescriptor, PlayKind, Runner, RunnerAdvance, Trajectory,
};
pub use parser::parse;
