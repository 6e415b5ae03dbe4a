#[cfg(test)]
mod test;

use crate::auction::IllegalCall;
use crate::board::{Board, Vulnerability};
use crate::contract::{Call, ParseCallError};
use crate::deal::{rank_from_char, Card, Deal, Hand, Seat, Suit};
use crate::par::{AuctionParSimulator, BidParRecord};
use crate::tricks::TrickTable;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;

/// Error raised when a LIN record cannot be decoded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseLinError {
    /// No `md` tag
    #[error("The record has no deal")]
    MissingDeal,

    /// A dealer digit other than 1 to 4
    #[error("Invalid dealer: {0:?}")]
    InvalidDealer(String),

    /// A hand with unknown characters, or a rank before any suit
    #[error("Invalid hand: {0:?}")]
    InvalidHand(String),

    /// A card dealt twice
    #[error("{0} is dealt twice")]
    DuplicateCard(Card),

    /// More than one hand left to complete
    #[error("Only one hand may be omitted")]
    IncompleteDeal,

    /// A vulnerability other than `o`, `n`, `e`, `b`
    #[error("Invalid vulnerability: {0:?}")]
    InvalidVulnerability(String),

    /// A board label without a positive number
    #[error("Invalid board: {0:?}")]
    InvalidBoard(String),

    /// An unreadable call
    #[error(transparent)]
    InvalidCall(#[from] ParseCallError),

    /// An unreadable played card
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),

    /// A claim that is not a trick count
    #[error("Invalid claim: {0:?}")]
    InvalidClaim(String),
}

// Travellers wrap the record in a JavaScript handler
static POPUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"lin\('([^']*)'\)").expect("POPUP is a valid regex"));

static ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new("%([0-9A-Fa-f]{2})").expect("ESCAPE is a valid regex"));

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("NUMBER is a valid regex"));

/// Seats in the order of LIN hands and dealer digits
const LIN_SEATS: [Seat; 4] = [Seat::South, Seat::West, Seat::North, Seat::East];

/// Undo percent-encoding, reading the decoded bytes as UTF-8
fn unescape(text: &str) -> Cow<'_, str> {
    let mut bytes = Vec::new();
    let mut end = 0;

    for caps in ESCAPE.captures_iter(text) {
        let (Some(whole), Some(hex)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        bytes.extend_from_slice(text[end..whole.start()].as_bytes());

        match u8::from_str_radix(hex.as_str(), 16) {
            Ok(byte) => bytes.push(byte),
            Err(_) => bytes.extend_from_slice(whole.as_str().as_bytes()),
        }
        end = whole.end();
    }

    if end == 0 {
        return Cow::Borrowed(text);
    }
    bytes.extend_from_slice(text[end..].as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_hand(text: &str) -> Result<Hand, ParseLinError> {
    let error = || ParseLinError::InvalidHand(text.to_owned());
    let mut hand = Hand::default();
    let mut suit = None;

    for c in text.chars() {
        if let Some(s) = Suit::from_char(c) {
            suit = Some(s);
            continue;
        }

        let rank = rank_from_char(c).ok_or_else(error)?;
        let card = Card::new(suit.ok_or_else(error)?, rank);
        if !hand.insert(card) {
            return Err(ParseLinError::DuplicateCard(card));
        }
    }
    Ok(hand)
}

/// Dealer digit followed by comma-separated hands, South first
fn parse_deal(text: &str) -> Result<(Seat, Deal), ParseLinError> {
    let mut chars = text.chars();
    let dealer = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .and_then(|digit| LIN_SEATS.get((digit as usize).wrapping_sub(1)))
        .copied()
        .ok_or_else(|| ParseLinError::InvalidDealer(text.to_owned()))?;

    let mut deal = Deal::default();
    let mut seen = Hand::default();

    for (&seat, hand) in LIN_SEATS.iter().zip(chars.as_str().split(',')) {
        let hand = parse_hand(hand.trim())?;
        for suit in Suit::ASC {
            for rank in 2..=14 {
                let card = Card::new(suit, rank);
                if hand.contains(card) && !seen.insert(card) {
                    return Err(ParseLinError::DuplicateCard(card));
                }
            }
        }
        deal[seat] = hand;
    }

    let mut missing = Seat::ALL.into_iter().filter(|&seat| deal[seat].is_empty());
    match (missing.next(), missing.next()) {
        (None, _) => Ok((dealer, deal)),
        (Some(seat), None) => Ok((dealer, deal.complete(seat))),
        (Some(_), Some(_)) => Err(ParseLinError::IncompleteDeal),
    }
}

fn parse_vulnerability(text: &str) -> Result<Vulnerability, ParseLinError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "o" | "0" | "-" => Ok(Vulnerability::NONE),
        "n" => Ok(Vulnerability::NS),
        "e" => Ok(Vulnerability::EW),
        "b" => Ok(Vulnerability::ALL),
        _ => Err(ParseLinError::InvalidVulnerability(text.to_owned())),
    }
}

fn parse_card(text: &str) -> Result<Card, ParseLinError> {
    let error = || ParseLinError::InvalidCard(text.to_owned());
    let mut chars = text.trim().chars();
    let suit = chars.next().and_then(Suit::from_char).ok_or_else(error)?;
    let rank = chars.next().and_then(rank_from_char).ok_or_else(error)?;

    if chars.next().is_some() {
        return Err(error());
    }
    Ok(Card::new(suit, rank))
}

/// A hand record from Bridge Base Online
///
/// Only the tags describing the deal, the auction, and the play are kept.
/// Annotations and tags for the viewer are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lin {
    /// Players' names by seat, empty when absent
    pub players: [String; 4],
    /// The first seat to call
    pub dealer: Seat,
    /// The four hands
    pub deal: Deal,
    /// Vulnerable sides
    pub vulnerability: Vulnerability,
    /// The label from the `ah` tag, such as 1 for `Board 1`
    pub number: Option<u32>,
    /// Calls in order, without alerts
    pub calls: Vec<Call>,
    /// Played cards in order
    pub plays: Vec<Card>,
    /// Tricks claimed by the declarer
    pub claim: Option<u8>,
}

impl Lin {
    /// Decode a LIN record
    ///
    /// The record may be percent-encoded and wrapped in the `hv_popuplin`
    /// handler of BBO travellers.
    ///
    /// # Errors
    /// [`ParseLinError`] for the first tag that does not decode
    pub fn parse(text: &str) -> Result<Self, ParseLinError> {
        let text = POPUP
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map_or(text, |inner| inner.as_str());
        let text = unescape(text);

        let mut players: [String; 4] = Default::default();
        let mut deal = None;
        let mut vulnerability = Vulnerability::NONE;
        let mut number = None;
        let mut calls: Vec<Call> = Vec::new();
        let mut plays = Vec::new();
        let mut claim = None;

        let mut tokens = text.split('|');
        while let Some(tag) = tokens.next() {
            let value = tokens.next().unwrap_or_default();

            match tag.trim().to_ascii_lowercase().as_str() {
                "pn" => {
                    for (&seat, name) in LIN_SEATS.iter().zip(value.split(',')) {
                        players[seat as usize] = name.trim().to_owned();
                    }
                }
                "md" => deal = Some(parse_deal(value)?),
                "sv" => vulnerability = parse_vulnerability(value)?,
                "ah" => {
                    let found = NUMBER
                        .find(value)
                        .and_then(|m| m.as_str().parse().ok())
                        .filter(|&n: &u32| n > 0);
                    number = Some(found.ok_or_else(|| ParseLinError::InvalidBoard(value.to_owned()))?);
                }
                "mb" => calls.push(value.trim().trim_end_matches('!').parse()?),
                "pc" => plays.push(parse_card(value)?),
                "mc" => {
                    let tricks = value
                        .trim()
                        .parse()
                        .ok()
                        .filter(|&n: &u8| n <= 13)
                        .ok_or_else(|| ParseLinError::InvalidClaim(value.to_owned()))?;
                    claim = Some(tricks);
                }
                _ => tracing::trace!(tag, value, "skipping LIN tag"),
            }
        }

        let (dealer, deal) = deal.ok_or(ParseLinError::MissingDeal)?;

        Ok(Self {
            players,
            dealer,
            deal,
            vulnerability,
            number,
            calls,
            plays,
            claim,
        })
    }

    /// The board this record was played as
    ///
    /// The labelled board is used when its dealer and vulnerability agree
    /// with the record.  Otherwise the first board with the same dealer and
    /// vulnerability stands in, which scores the same.
    #[must_use]
    pub fn board(&self) -> Board {
        self.number
            .map(Board::new)
            .filter(|board| {
                board.dealer() == self.dealer && board.vulnerability() == self.vulnerability
            })
            .unwrap_or_else(|| Board::from_dealer(self.dealer, self.vulnerability))
    }

    /// Par after every call of the recorded auction
    ///
    /// # Errors
    /// [`IllegalCall`] if the recorded auction breaks the rules
    pub fn par(&self, table: TrickTable) -> Result<Vec<BidParRecord>, IllegalCall> {
        AuctionParSimulator::run(self.board(), table, &self.calls)
    }
}
