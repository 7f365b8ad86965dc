//! # retrosheet
//!
//! A decipher for Retrosheet play-by-play notation.
//!
//! A play field such as `S8.3-H;2-H;1X3(8254)` is parsed into a
//! [`PlayDescriptor`](event::PlayDescriptor), resolved against the bases
//! before the play into a [`PlayOutcome`](event::PlayOutcome) (outs, runs,
//! occupancy, fielding credit), and threaded through a game by
//! [`GameState`](event::GameState).
//!
//! ```rust,ignore
//! use retrosheet::event::{parse, resolve, BaseState};
//!
//! let play = parse("S7.1-2")?;
//! let before = BaseState::empty().with_runner_on(Base::First);
//! let outcome = resolve(&play, &before).outcome;
//! assert_eq!(outcome.runs_scored, 0);
//! ```
//!
//! ## Testing
//!
//! Outcome tests use the fluent helpers in the [testing module](event::testing).

pub mod config;
pub mod event;
