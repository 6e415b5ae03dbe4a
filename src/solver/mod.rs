
use crate::contract::Strain;
use crate::deal::{Deal, Seat, Suit};
use crate::tricks::DdTable;
use dds_bridge_sys as sys;
use std::sync::Mutex;
use thiserror::Error;

// DDS keeps global scratch memory per thread slot
static SOLVER: Mutex<()> = Mutex::new(());

/// Faults reported by DDS while solving a deal
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A hand without cards
    #[error("A hand holds no cards")]
    ZeroCards,

    /// A card dealt to two hands
    #[error("A card is dealt twice")]
    DuplicateCards,

    /// A hand with more than 13 cards
    #[error("A hand holds more than 13 cards")]
    TooManyCards,

    /// Hands of different lengths
    #[error("Hands differ in length")]
    CardCount,

    /// DDS failed to start, index, or join its worker threads
    #[error("Threading fault in DDS (status {0})")]
    Thread(i32),

    /// Any other negative status
    #[error("Unknown fault in DDS (status {0})")]
    Unknown(i32),
}

impl Error {
    /// Turn a DDS status into a result
    ///
    /// Non-negative statuses are successes and yield `x`.
    ///
    /// # Errors
    /// The fault named by a negative `status`
    pub const fn propagate<T: Copy>(x: T, status: i32) -> Result<T, Self> {
        match status {
            0.. => Ok(x),
            sys::RETURN_ZERO_CARDS => Err(Self::ZeroCards),
            sys::RETURN_DUPLICATE_CARDS => Err(Self::DuplicateCards),
            sys::RETURN_TOO_MANY_CARDS => Err(Self::TooManyCards),
            sys::RETURN_CARD_COUNT => Err(Self::CardCount),
            sys::RETURN_THREAD_INDEX
            | sys::RETURN_THREAD_CREATE
            | sys::RETURN_THREAD_WAIT
            | sys::RETURN_THREAD_MISSING => Err(Self::Thread(status)),
            _ => Err(Self::Unknown(status)),
        }
    }
}

// DDS orders strains as spades, hearts, diamonds, clubs, notrump
const fn dds_strain(strain: Strain) -> usize {
    match strain {
        Strain::Notrump => 4,
        suit => 3 - suit as usize,
    }
}

fn make_table(table: &sys::ddTableResults) -> DdTable {
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    DdTable::from_fn(|strain, seat| table.resTable[dds_strain(strain)][seat as usize] as u8)
}

impl From<Deal> for sys::ddTableDeal {
    fn from(deal: Deal) -> Self {
        Self {
            cards: Seat::ALL.map(|seat| Suit::DESC.map(|suit| deal[seat][suit].to_bits().into())),
        }
    }
}

/// Double dummy tricks of a deal for every strain and declarer
///
/// The deal is solved by [`sys::CalcDDtable`], one call at a time across
/// the process.
///
/// # Errors
/// An [`enum@Error`] propagated from DDS
pub fn solve_deal(deal: Deal) -> Result<DdTable, Error> {
    let mut result = sys::ddTableResults::default();
    let _guard = SOLVER
        .lock()
        .map_err(|_| Error::Thread(sys::RETURN_THREAD_WAIT))?;
    let status = unsafe { sys::CalcDDtable(deal.into(), &mut result) };
    tracing::trace!(status, "CalcDDtable");
    Error::propagate(make_table(&result), status)
}
