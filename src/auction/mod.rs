
use crate::contract::{Bid, Call, Contract, Penalty};
use crate::deal::Seat;
use core::num::Wrapping;
use core::ops::Deref;
use thiserror::Error;

/// Error raised when a call breaks the rules of the auction
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalCall {
    /// Three passes have followed a bid, or four passes opened the auction
    #[error("The auction has already ended")]
    AfterEnd,

    /// A bid outside levels 1 to 7
    #[error("{0} is not a valid level")]
    InvalidLevel(u8),

    /// A bid not higher than the current contract
    #[error("{bid} is insufficient over {contract}")]
    Insufficient {
        /// The rejected bid
        bid: Bid,
        /// The contract it fails to overcall
        contract: Bid,
    },

    /// A double without an undoubled contract of the opponents
    #[error("Nothing to double")]
    InvalidDouble,

    /// A redouble without a double of the own contract
    #[error("Nothing to redouble")]
    InvalidRedouble,
}

/// A sequence of [`Call`]s from the dealer onwards
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Auction {
    /// The first seat to call
    dealer: Seat,

    /// The sequence of [`Call`]s
    calls: Vec<Call>,

    /// The proposed contract
    contract: Option<Contract>,

    /// The index of the last call other than pass in [`Self::calls`]
    ///
    /// It stays 0 before any such call, which makes four opening passes end
    /// the auction like three passes after a call.
    index: usize,
}

/// View the auction as a slice of calls
impl Deref for Auction {
    type Target = [Call];

    fn deref(&self) -> &[Call] {
        &self.calls
    }
}

impl Auction {
    /// Construct an empty auction
    #[must_use]
    pub const fn new(dealer: Seat) -> Self {
        Self {
            dealer,
            calls: Vec::new(),
            contract: None,
            index: 0,
        }
    }

    /// The first seat to call
    #[must_use]
    pub const fn dealer(&self) -> Seat {
        self.dealer
    }

    /// The seat making the call at `index`
    #[must_use]
    pub fn seat_at(&self, index: usize) -> Seat {
        #[allow(clippy::cast_possible_truncation)]
        let offset = Wrapping((index & 3) as u8);
        self.dealer + offset
    }

    /// The seat to call next
    #[must_use]
    pub fn next_seat(&self) -> Seat {
        self.seat_at(self.len())
    }

    /// The current contract with its penalty, if anyone has bid
    #[must_use]
    pub const fn contract(&self) -> Option<Contract> {
        self.contract
    }

    /// Check if the auction is terminated (by 3 consecutive passes following
    /// a call, or 4 passes in total)
    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.len() >= self.index + 4
    }

    /// Check if a pass by the next seat would end the auction
    #[must_use]
    pub fn would_end_on_pass(&self) -> bool {
        !self.has_ended() && self.len() + 1 >= self.index + 4
    }

    // Whether the last call other than pass is by the next seat's opponents
    fn is_opponents_turn(&self) -> bool {
        (self.index ^ self.len()) & 1 == 1
    }

    /// Check if the next seat may double
    ///
    /// The last call other than pass must be a bid by the opponents.
    #[must_use]
    pub fn can_double(&self) -> bool {
        !self.has_ended()
            && self.is_opponents_turn()
            && self
                .contract
                .is_some_and(|contract| contract.penalty == Penalty::None)
    }

    /// Check if the next seat may redouble
    ///
    /// The last call other than pass must be a double by the opponents.
    #[must_use]
    pub fn can_redouble(&self) -> bool {
        !self.has_ended()
            && self.is_opponents_turn()
            && self
                .contract
                .is_some_and(|contract| contract.penalty == Penalty::Doubled)
    }

    /// Add a call to the auction
    ///
    /// # Errors
    /// [`IllegalCall`] if the call breaks the rules, leaving the auction as
    /// it was
    pub fn push(&mut self, call: Call) -> Result<(), IllegalCall> {
        if self.has_ended() {
            return Err(IllegalCall::AfterEnd);
        }

        match call {
            Call::Pass => (),

            Call::Double => {
                if !self.can_double() {
                    return Err(IllegalCall::InvalidDouble);
                }
                self.contract = self.contract.map(|c| c.with_penalty(Penalty::Doubled));
                self.index = self.len();
            }

            Call::Redouble => {
                if !self.can_redouble() {
                    return Err(IllegalCall::InvalidRedouble);
                }
                self.contract = self.contract.map(|c| c.with_penalty(Penalty::Redoubled));
                self.index = self.len();
            }

            Call::Bid(bid) => {
                if !(1..=7).contains(&bid.level) {
                    return Err(IllegalCall::InvalidLevel(bid.level));
                }

                if let Some(contract) = self.contract {
                    if bid <= contract.bid {
                        return Err(IllegalCall::Insufficient {
                            bid,
                            contract: contract.bid,
                        });
                    }
                }

                self.contract = Some(bid.into());
                self.index = self.len();
            }
        }

        self.calls.push(call);
        Ok(())
    }

    /// The seat that made the last bid
    #[must_use]
    pub fn last_bidder(&self) -> Option<Seat> {
        self.iter()
            .rposition(|call| matches!(call, Call::Bid(_)))
            .map(|index| self.seat_at(index))
    }

    /// The declarer of the current contract
    ///
    /// The first player of the declaring side who first bids the strain of
    /// the contract is the declarer.
    #[must_use]
    pub fn declarer(&self) -> Option<Seat> {
        let strain = self.contract?.bid.strain;
        let side = self.last_bidder()?.partnership();

        self.iter()
            .enumerate()
            .find(|&(index, call)| {
                matches!(call, Call::Bid(bid) if bid.strain == strain)
                    && self.seat_at(index).partnership() == side
            })
            .map(|(index, _)| self.seat_at(index))
    }
}
