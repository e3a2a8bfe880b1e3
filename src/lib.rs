#![warn(missing_docs)]

//! # `hashi`
//!
//! A solver for [Hashiwokakero](https://en.wikipedia.org/wiki/Hashiwokakero), also sold as Bridges.
//! Begin by building a board object using a builder such as [`SquareBoardBuilder`](builder::SquareBoardBuilder), or parse one from text.
//! Then call [`solve()`](crate::Board::solve), consuming the board and yielding a [`SolvedBoard`] which prints with its bridges drawn in.
//!
//! Islands carry a number from 1 to 8. A solution joins islands with horizontal or vertical bridges such that:
//! 1. every island has exactly as many bridges as its number, with at most two between any pair;
//! 2. no bridge crosses another or passes over an island;
//! 3. every island can reach every other over bridges.
//!
//! # Internals
//! A board is first reduced to an [`IslandMap`](model::IslandMap): the islands, numbered in row-major order, and every *candidate edge*,
//! i.e. every pair of islands in line of sight along a row or column.
//! The [`ConstraintModel`](constraint::ConstraintModel) adds which candidates cross and how many bridges each island could ever reach.
//! A solution is then a bridge count of 0, 1, or 2 per candidate.
//!
//! Four interchangeable [strategies](solver) search for one:
//! - depth-first backtracking over edges, pruned by remaining capacity;
//! - the same tree, brute force, as a baseline;
//! - best-first search ordered by decided edges plus missing bridges;
//! - a SAT encoding of rules 1 and 2, solved with [`varisat`] and refined one clause at a time until the model is connected.
//!
//! Every strategy's answer is checked against all three rules before it is reported.

pub use board::{Board, SolvedBoard};
pub use builder::{Builder, SquareBoardBuilder};
pub use config::SolverConfig;
pub use error::{BoardError, SolveError};
pub use location::Location;
pub use solution::{Bridge, Solution};
pub use solver::{SolveReport, StrategyKind};

pub mod assignment;
pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub mod config;
pub mod connectivity;
pub mod constraint;
pub mod error;
pub(crate) mod location;
pub(crate) mod logic;
pub mod model;
pub mod shape;
pub mod solution;
pub mod solver;
mod tests;
