//! Double dummy par after every call of a contract bridge auction.
//!
//! Given how many tricks each player takes as declarer in each strain, this
//! crate finds the contract both sides would reach with perfect knowledge
//! of the cards.  It does so before the first call and again after every
//! call of a real auction, so each call can be judged by how it moves par.
//!
//! Trick counts come from a [`DdTable`], either built by hand or solved by
//! [`dds-bridge/dds`][dds] with the `solver` feature.  Hand records from
//! Bridge Base Online are decoded by [`Lin`].
//!
//! [dds]: https://github.com/dds-bridge/dds
#![warn(missing_docs)]

mod auction;
mod board;
mod contract;
mod deal;
mod lin;
mod par;
mod tricks;

/// Bindings to the double dummy solver
#[cfg(feature = "solver")]
pub mod solver;

pub use auction::*;
pub use board::*;
pub use contract::*;
pub use deal::*;
pub use lin::*;
pub use par::*;
pub use tricks::*;
