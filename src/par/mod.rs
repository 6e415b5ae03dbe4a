#[cfg(test)]
mod test;

use crate::auction::{Auction, IllegalCall};
use crate::board::{Board, Vulnerability};
use crate::contract::{Bid, Call, Contract, Penalty, Strain};
use crate::deal::{Partnership, Seat};
use crate::tricks::{Declarer, TrickTable};
use core::fmt;

/// A contract with its double dummy outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParContract {
    /// The contract with its penalty
    pub contract: Contract,
    /// Who declares it
    pub declarer: Declarer,
    /// Tricks the declarer takes
    pub tricks: u8,
    /// Score for north-south
    pub score: i32,
}

impl ParContract {
    /// Score a contract for north-south
    #[must_use]
    pub const fn new(
        contract: Contract,
        declarer: Declarer,
        tricks: u8,
        vulnerability: Vulnerability,
    ) -> Self {
        let side = declarer.side();
        let score = contract.score(tricks, vulnerability.is_vulnerable(side));

        Self {
            contract,
            declarer,
            tricks,
            score: side.to_ns(score),
        }
    }

    /// The declaring side
    #[must_use]
    pub const fn side(self) -> Partnership {
        self.declarer.side()
    }

    /// Score from the viewpoint of `side`
    #[must_use]
    pub const fn score_for(self, side: Partnership) -> i32 {
        side.to_ns(self.score)
    }
}

/// `4H by S =`, `4SX by EW -2`, `5C by N +1`
impl fmt::Display for ParContract {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} by {} ", self.contract, self.declarer)?;

        match i32::from(self.tricks) - i32::from(self.contract.bid.target()) {
            0 => f.write_str("="),
            diff => write!(f, "{diff:+}"),
        }
    }
}

/// Contract to beat and the contracts tied with it
///
/// `None` as the contract to beat stands for passing the board out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParState {
    best: Option<ParContract>,
    ties: Vec<ParContract>,
}

impl ParState {
    /// Start from a contract to beat with no ties yet
    #[must_use]
    pub const fn new(best: Option<ParContract>) -> Self {
        Self {
            best,
            ties: Vec::new(),
        }
    }

    /// The contract to beat
    #[must_use]
    pub const fn best(&self) -> Option<ParContract> {
        self.best
    }

    /// Contracts scoring the same as the contract to beat, in discovery order
    #[must_use]
    pub fn ties(&self) -> &[ParContract] {
        &self.ties
    }

    /// Score of the contract to beat for north-south, 0 if passed out
    #[must_use]
    pub fn score(&self) -> i32 {
        self.best.map_or(0, |best| best.score)
    }

    /// Offer a contract on behalf of `side`, returning whether it was taken
    ///
    /// A better contract for `side` replaces every tie.  An equally good one
    /// joins the ties unless it only raises the level of a tie (or, with no
    /// ties yet, of the contract to beat) by the same side in the same
    /// strain.
    pub fn offer(&mut self, candidate: ParContract, side: Partnership) -> bool {
        let current = self.best.map_or(0, |best| best.score_for(side));
        let value = candidate.score_for(side);

        if value > current {
            tracing::debug!(%candidate, score = candidate.score, "new contract to beat");
            self.best = Some(candidate);
            self.ties.clear();
            self.ties.push(candidate);
            return true;
        }

        let Some(best) = self.best else {
            return false;
        };

        if value < current {
            return false;
        }

        let inflates = |tie: &ParContract| {
            tie.side() == candidate.side()
                && tie.contract.bid.strain == candidate.contract.bid.strain
                && tie.contract.bid.level < candidate.contract.bid.level
        };

        let rivals = if self.ties.is_empty() {
            core::slice::from_ref(&best)
        } else {
            self.ties.as_slice()
        };

        if rivals.iter().any(inflates) {
            return false;
        }

        if self.ties.is_empty() {
            self.ties.push(best);
        }

        tracing::debug!(%candidate, score = candidate.score, "tied contract");
        self.best = Some(candidate);
        self.ties.push(candidate);
        true
    }

    // An unchallenged contract to beat is its own tie
    fn settle(&mut self) {
        if self.ties.is_empty() {
            self.ties.extend(self.best);
        }
    }
}

/// The seat of each side that first bid each strain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclarerMap([[Option<Seat>; 5]; 2]);

impl DeclarerMap {
    /// The seat that would declare `strain` for `side`
    #[must_use]
    pub const fn get(&self, side: Partnership, strain: Strain) -> Option<Seat> {
        self.0[side as usize][strain as usize]
    }

    /// Record a bid of `strain` by `seat`, returning whether it is the
    /// first of its side in that strain
    pub fn insert(&mut self, strain: Strain, seat: Seat) -> bool {
        let entry = &mut self.0[seat.partnership() as usize][strain as usize];
        let first = entry.is_none();
        entry.get_or_insert(seat);
        first
    }
}

/// Lowest level at which `tricks` are worth bidding in `strain`
const fn opening_level(strain: Strain, tricks: u8) -> u8 {
    match tricks {
        12.. => tricks - 6,
        11.. if strain.is_minor() => 5,
        10.. if strain.is_major() => 4,
        9.. if strain.is_notrump() => 3,
        _ => 1,
    }
}

/// The cheapest bid in `strain` worth making over `floor`, if any
fn cheapest_bid(strain: Strain, tricks: u8, floor: Option<Bid>) -> Option<Bid> {
    let mut level = opening_level(strain, tricks);

    if let Some(floor) = floor {
        level = level.max(floor.level + u8::from(strain <= floor.strain));
    }

    (level <= 7).then_some(Bid::new(level, strain))
}

struct Search<'a> {
    vulnerability: Vulnerability,
    table: &'a TrickTable,
    auction: &'a Auction,
    state: &'a mut ParState,
}

impl Search<'_> {
    /// Let `side` double the contract to beat if the real auction allows it
    fn double(&mut self, side: Partnership) -> bool {
        if !self.auction.can_double() {
            return false;
        }

        let Some(best) = self.state.best else {
            return false;
        };

        let candidate = ParContract::new(
            best.contract.with_penalty(Penalty::Doubled),
            best.declarer,
            best.tricks,
            self.vulnerability,
        );
        self.state.offer(candidate, side)
    }

    /// Offer the cheapest worthwhile contract of `side` in every strain
    fn sweep(&mut self, side: Partnership) -> bool {
        let table = self.table;
        let vulnerable = self.vulnerability.is_vulnerable(side);
        let start = self.state.best.map_or(Strain::Clubs, |best| best.contract.bid.strain);
        let mut changed = false;

        for strain in start.rotation_after() {
            for &(declarer, tricks) in table.entries(strain, side) {
                let floor = self.state.best.map(|best| best.contract.bid);
                let Some(bid) = cheapest_bid(strain, tricks, floor) else {
                    continue;
                };
                debug_assert!(bid.level <= 7);
                debug_assert!(floor.map_or(true, |floor| bid > floor));

                let penalty = if tricks < bid.target() {
                    Penalty::Doubled
                } else {
                    Penalty::None
                };

                let candidate = ParContract {
                    contract: Contract { bid, penalty },
                    declarer,
                    tricks,
                    score: side.to_ns(bid.par_score(tricks, vulnerable)),
                };
                changed |= self.state.offer(candidate, side);
            }
        }

        tracing::trace!(%side, changed, score = self.state.score(), "sweep");
        changed
    }

    /// Alternate sweeps until neither side improves
    fn run(&mut self, mover: Seat) {
        let mut side = mover.partnership();
        let mut changed = self.double(side);
        let mut first = true;
        let mut idle = 0;

        loop {
            changed |= self.sweep(side);

            if first && !changed && self.auction.would_end_on_pass() {
                break;
            }

            first = false;
            side = side.opponent();

            if changed {
                idle = 0;
            } else {
                idle += 1;
                if idle >= 2 {
                    break;
                }
            }
            changed = false;
        }
    }
}

/// Par at one decision point of the auction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BidParRecord {
    /// The call leading here with its caller, `None` before the first call
    pub call: Option<(Seat, Call)>,
    /// Par score for north-south
    pub score: i32,
    /// Contracts achieving the par score, empty if the board is passed out
    pub contracts: Vec<ParContract>,
}

/// `1H by N: +400 5C by N =`
impl fmt::Display for BidParRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.call {
            Some((seat, call)) => write!(f, "{call} by {seat}: ")?,
            None => f.write_str("Pre-bid: ")?,
        }
        write!(f, "{:+}", self.score)?;

        if self.contracts.is_empty() {
            return f.write_str(" passed out");
        }

        for (index, contract) in self.contracts.iter().enumerate() {
            f.write_str(if index == 0 { " " } else { ", " })?;
            contract.fmt(f)?;
        }
        Ok(())
    }
}

/// Double dummy par after every call of a real auction
///
/// The simulator replays the auction one call at a time.  After each call
/// it finds the contract both sides would reach from there on with perfect
/// knowledge of the cards.  Bidding a strain for the first time commits the
/// side to that seat as declarer in it.
#[derive(Debug, Clone)]
pub struct AuctionParSimulator {
    board: Board,
    table: TrickTable,
    auction: Auction,
    declarers: DeclarerMap,
    state: ParState,
    records: Vec<BidParRecord>,
}

impl AuctionParSimulator {
    /// Start a board and compute its par before the first call
    #[must_use]
    pub fn new(board: Board, table: TrickTable) -> Self {
        let mut simulator = Self {
            board,
            table,
            auction: Auction::new(board.dealer()),
            declarers: DeclarerMap::default(),
            state: ParState::default(),
            records: Vec::new(),
        };
        simulator.decide(None);
        simulator
    }

    /// Par of a whole auction, one record before the first call and one after
    /// each call
    ///
    /// # Errors
    /// [`IllegalCall`] for the first call breaking the rules
    pub fn run(
        board: Board,
        table: TrickTable,
        calls: &[Call],
    ) -> Result<Vec<BidParRecord>, IllegalCall> {
        let mut simulator = Self::new(board, table);
        for &call in calls {
            simulator.push(call)?;
        }
        Ok(simulator.into_records())
    }

    /// The board being bid
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// The real auction so far
    #[must_use]
    pub const fn auction(&self) -> &Auction {
        &self.auction
    }

    /// Tricks as committed by the auction so far
    #[must_use]
    pub const fn table(&self) -> &TrickTable {
        &self.table
    }

    /// First bidders of each strain so far
    #[must_use]
    pub const fn declarers(&self) -> &DeclarerMap {
        &self.declarers
    }

    /// Search state at the latest decision point
    #[must_use]
    pub const fn state(&self) -> &ParState {
        &self.state
    }

    /// Whether the real auction is over
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.auction.has_ended()
    }

    /// Par before the first call
    #[must_use]
    pub fn pre_bid(&self) -> &BidParRecord {
        &self.records[0]
    }

    /// Records of every decision point so far
    #[must_use]
    pub fn records(&self) -> &[BidParRecord] {
        &self.records
    }

    /// Take the records
    #[must_use]
    pub fn into_records(self) -> Vec<BidParRecord> {
        self.records
    }

    /// Make the next call and compute par after it
    ///
    /// # Errors
    /// [`IllegalCall`] if the call breaks the rules, in which case nothing
    /// changes
    pub fn push(&mut self, call: Call) -> Result<&BidParRecord, IllegalCall> {
        let seat = self.auction.next_seat();
        self.auction.push(call)?;

        if let Call::Bid(bid) = call {
            if self.declarers.insert(bid.strain, seat) {
                self.table
                    .restrict_to_declarer(bid.strain, seat.partnership(), seat);
            }
        }

        Ok(self.decide(Some((seat, call))))
    }

    // The real contract, declared by the first of its side to bid the strain
    fn real_contract(&self) -> Option<ParContract> {
        let contract = self.auction.contract()?;
        let seat = self.auction.declarer()?;
        let strain = contract.bid.strain;
        debug_assert_eq!(self.declarers.get(seat.partnership(), strain), Some(seat));
        let tricks = self.table.tricks(strain, seat)?;

        Some(ParContract::new(
            contract,
            Declarer::Seat(seat),
            tricks,
            self.board.vulnerability(),
        ))
    }

    fn decide(&mut self, call: Option<(Seat, Call)>) -> &BidParRecord {
        self.state = ParState::new(self.real_contract());

        if !self.auction.has_ended() {
            Search {
                vulnerability: self.board.vulnerability(),
                table: &self.table,
                auction: &self.auction,
                state: &mut self.state,
            }
            .run(self.auction.next_seat());
        }
        self.state.settle();

        let record = BidParRecord {
            call,
            score: self.state.score(),
            contracts: self.state.ties.clone(),
        };
        tracing::debug!(board = self.board.number(), %record, "decision point");

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }
}
