
use crate::Strain;
use core::fmt;
use core::num::Wrapping;
use core::ops::{Add, BitOr, Index, IndexMut, Not, Sub};
use rand::prelude::SliceRandom as _;
use thiserror::Error;

/// A suit of playing cards
///
/// Suits are convertible to [`Strain`]s since suits form a subset of strains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Suit {
    /// ♣, convertible to [`Strain::Clubs`]
    Clubs,
    /// ♦, convertible to [`Strain::Diamonds`]
    Diamonds,
    /// ♥, convertible to [`Strain::Hearts`]
    Hearts,
    /// ♠, convertible to [`Strain::Spades`]
    Spades,
}

impl Suit {
    /// Suits in the ascending order, the order in this crate
    pub const ASC: [Self; 4] = [Self::Clubs, Self::Diamonds, Self::Hearts, Self::Spades];

    /// Suits in the descending order, the order of PBN and LIN
    pub const DESC: [Self; 4] = [Self::Spades, Self::Hearts, Self::Diamonds, Self::Clubs];

    /// Parse the initial of a suit
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Self::Clubs),
            'D' => Some(Self::Diamonds),
            'H' => Some(Self::Hearts),
            'S' => Some(Self::Spades),
            _ => None,
        }
    }
}

impl From<Suit> for Strain {
    fn from(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => Self::Clubs,
            Suit::Diamonds => Self::Diamonds,
            Suit::Hearts => Self::Hearts,
            Suit::Spades => Self::Spades,
        }
    }
}

/// Error raised when converting [`Strain::Notrump`] to a suit
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Notrump is not a suit")]
pub struct SuitFromNotrumpError;

impl TryFrom<Strain> for Suit {
    type Error = SuitFromNotrumpError;

    fn try_from(strain: Strain) -> Result<Self, Self::Error> {
        match strain {
            Strain::Clubs => Ok(Self::Clubs),
            Strain::Diamonds => Ok(Self::Diamonds),
            Strain::Hearts => Ok(Self::Hearts),
            Strain::Spades => Ok(Self::Spades),
            Strain::Notrump => Err(SuitFromNotrumpError),
        }
    }
}

/// Position at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Seat {
    /// Dealer of Board 1, partner of [`Seat::South`]
    North,
    /// Dealer of Board 2, partner of [`Seat::West`]
    East,
    /// Dealer of Board 3, partner of [`Seat::North`]
    South,
    /// Dealer of Board 4, partner of [`Seat::East`]
    West,
}

impl Seat {
    /// Seats in the order of the rotation
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The partnership this seat belongs to
    #[must_use]
    pub const fn partnership(self) -> Partnership {
        match self {
            Self::North | Self::South => Partnership::NS,
            Self::East | Self::West => Partnership::EW,
        }
    }

    /// The seat across the table
    #[must_use]
    pub const fn partner(self) -> Self {
        Self::ALL[(self as usize + 2) & 3]
    }

    /// Parse the initial of a seat
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'E' => Some(Self::East),
            'S' => Some(Self::South),
            'W' => Some(Self::West),
            _ => None,
        }
    }
}

impl Add<Wrapping<u8>> for Seat {
    type Output = Self;

    fn add(self, rhs: Wrapping<u8>) -> Self {
        Self::ALL[usize::from((Wrapping(self as u8) + rhs).0 & 3)]
    }
}

impl Sub<Wrapping<u8>> for Seat {
    type Output = Self;

    fn sub(self, rhs: Wrapping<u8>) -> Self {
        Self::ALL[usize::from((Wrapping(self as u8) - rhs).0 & 3)]
    }
}

impl From<Seat> for char {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write as _;
        f.write_char(char::from(*self))
    }
}

/// One of the two sides at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Partnership {
    /// North and South
    NS,
    /// East and West
    EW,
}

impl Partnership {
    /// Both partnerships, north-south first
    pub const ALL: [Self; 2] = [Self::NS, Self::EW];

    /// The other side
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::NS => Self::EW,
            Self::EW => Self::NS,
        }
    }

    /// The two seats of this side in rotation order
    #[must_use]
    pub const fn seats(self) -> [Seat; 2] {
        match self {
            Self::NS => [Seat::North, Seat::South],
            Self::EW => [Seat::East, Seat::West],
        }
    }

    /// Turn a score of this side into a north-south score
    #[must_use]
    pub const fn to_ns(self, score: i32) -> i32 {
        match self {
            Self::NS => score,
            Self::EW => -score,
        }
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::NS => "NS",
            Self::EW => "EW",
        })
    }
}

/// A playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    /// The suit of the card
    pub suit: Suit,
    /// The rank from 2 to 14, where J, Q, K, A are 11, 12, 13, 14
    pub rank: u8,
}

impl Card {
    /// Create a card from suit and rank
    ///
    /// # Panics
    /// Panics if the rank is not in the range 2..=14.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        assert!(rank >= 2 && rank <= 14);
        Self { suit, rank }
    }
}

const RANKS: &[u8; 13] = b"23456789TJQKA";

/// Parse a rank character, `2`–`9`, `T`, `J`, `Q`, `K`, `A`
#[must_use]
pub fn rank_from_char(c: char) -> Option<u8> {
    let c = c.to_ascii_uppercase();
    #[allow(clippy::cast_possible_truncation)]
    RANKS.iter().position(|&r| char::from(r) == c).map(|i| i as u8 + 2)
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let suit = Strain::from(self.suit);
        write!(f, "{}{}", suit, char::from(RANKS[usize::from(self.rank) - 2]))
    }
}

/// A set of cards of the same suit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holding(u16);

impl Holding {
    /// The empty holding
    pub const EMPTY: Self = Self(0);

    /// All 13 ranks
    pub const ALL: Self = Self(0x7FFC);

    /// As a bitset of ranks
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Create a holding from a bitset of ranks, dropping invalid bits
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// The number of cards
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the holding is void
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the holding contains a rank
    #[must_use]
    pub const fn contains(self, rank: u8) -> bool {
        self.0 & 1 << rank != 0
    }

    /// Insert a rank, returning whether it was absent
    pub fn insert(&mut self, rank: u8) -> bool {
        let insertion = 1 << rank & Self::ALL.0;
        let inserted = insertion & !self.0 != 0;
        self.0 |= insertion;
        inserted
    }
}

impl BitOr for Holding {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for Holding {
    type Output = Self;

    fn not(self) -> Self {
        Self(Self::ALL.0 ^ self.0)
    }
}

impl Sub for Holding {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write as _;
        for rank in (2..15).rev() {
            if self.contains(rank) {
                f.write_char(char::from(RANKS[usize::from(rank) - 2]))?;
            }
        }
        Ok(())
    }
}

/// A hand of playing cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hand(pub [Holding; 4]);

impl Index<Suit> for Hand {
    type Output = Holding;

    fn index(&self, suit: Suit) -> &Holding {
        &self.0[suit as usize]
    }
}

impl IndexMut<Suit> for Hand {
    fn index_mut(&mut self, suit: Suit) -> &mut Holding {
        &mut self.0[suit as usize]
    }
}

impl Hand {
    /// The hand holding all 52 cards
    pub const ALL: Self = Self([Holding::ALL; 4]);

    /// The number of cards
    #[must_use]
    pub fn len(self) -> usize {
        self.0.iter().map(|holding| holding.len()).sum()
    }

    /// Whether the hand holds no cards
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0.iter().all(|holding| holding.is_empty())
    }

    /// Whether the hand holds a card
    #[must_use]
    pub fn contains(self, card: Card) -> bool {
        self[card.suit].contains(card.rank)
    }

    /// Insert a card, returning whether it was absent
    pub fn insert(&mut self, card: Card) -> bool {
        self[card.suit].insert(card.rank)
    }
}

impl BitOr for Hand {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl Sub for Hand {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

/// PBN notation of a hand, spades first
impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self[Suit::Spades],
            self[Suit::Hearts],
            self[Suit::Diamonds],
            self[Suit::Clubs]
        )
    }
}

/// A deal of four hands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deal(pub [Hand; 4]);

impl Index<Seat> for Deal {
    type Output = Hand;

    fn index(&self, seat: Seat) -> &Hand {
        &self.0[seat as usize]
    }
}

impl IndexMut<Seat> for Deal {
    fn index_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.0[seat as usize]
    }
}

struct DealDisplay {
    deal: Deal,
    seat: Seat,
}

impl fmt::Display for DealDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {} {}",
            self.seat,
            self.deal[self.seat],
            self.deal[self.seat + Wrapping(1)],
            self.deal[self.seat + Wrapping(2)],
            self.deal[self.seat + Wrapping(3)],
        )
    }
}

impl Deal {
    /// Create a deal from a shuffled standard 52-card deck
    pub fn new(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let mut cards: Vec<_> = Suit::ASC
            .into_iter()
            .flat_map(|suit| (2..=14).map(move |rank| Card::new(suit, rank)))
            .collect();
        cards.shuffle(rng);

        let mut deal = Self::default();
        for (index, card) in cards.into_iter().enumerate() {
            deal[Seat::ALL[index & 3]].insert(card);
        }
        deal
    }

    /// Complete a deal from three hands, giving the remaining cards to
    /// `missing`
    ///
    /// Whatever `missing` holds in `self` is discarded.
    #[must_use]
    pub fn complete(mut self, missing: Seat) -> Self {
        let others = Seat::ALL
            .into_iter()
            .filter(|&seat| seat != missing)
            .fold(Hand::default(), |acc, seat| acc | self[seat]);
        self[missing] = Hand::ALL - others;
        self
    }

    /// The seat holding a card
    #[must_use]
    pub fn holder(&self, card: Card) -> Option<Seat> {
        Seat::ALL.into_iter().find(|&seat| self[seat].contains(card))
    }

    /// Display the deal in PBN from a seat's perspective
    #[must_use]
    pub fn display(self, seat: Seat) -> impl fmt::Display {
        DealDisplay { deal: self, seat }
    }
}
