//! cardtree: an in-memory tree of flashcard directories and card decks.
//!
//! Layers, innermost first:
//! - `domain`: nodes, names, tree algorithms, rendering, study sessions
//! - `application`: the locked tree store, snapshots, request/response protocol
//! - `infrastructure`: filesystem access and service wiring
//! - `cli`: argument parsing, commands, interactive shell

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
