
use crate::contract::Strain;
use crate::deal::{Partnership, Seat};
use core::fmt;
use thiserror::Error;

/// Tricks that each seat can take as declarer for a strain
///
/// Counts are kept as given.  Range checks happen in [`TrickTable::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdRow([u8; 4]);

impl DdRow {
    /// Create a new row from the number of tricks each seat can take
    #[must_use]
    pub const fn new(n: u8, e: u8, s: u8, w: u8) -> Self {
        let mut counts = [0; 4];
        counts[Seat::North as usize] = n;
        counts[Seat::East as usize] = e;
        counts[Seat::South as usize] = s;
        counts[Seat::West as usize] = w;
        Self(counts)
    }

    /// Get the number of tricks a seat can take as declarer
    #[must_use]
    pub const fn at(self, seat: Seat) -> u8 {
        self.0[seat as usize]
    }
}

/// Double dummy tricks for every strain and declarer
///
/// This is what the solver reports for a deal, and the only knowledge of
/// the cards the par search needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdTable(pub [DdRow; 5]);

impl core::ops::Index<Strain> for DdTable {
    type Output = DdRow;

    fn index(&self, strain: Strain) -> &DdRow {
        &self.0[strain as usize]
    }
}

impl DdTable {
    /// Build a table from a function of strain and declarer
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(Strain, Seat) -> u8) -> Self {
        Self(Strain::ALL.map(|strain| {
            let [n, e, s, w] = Seat::ALL.map(|seat| f(strain, seat));
            DdRow::new(n, e, s, w)
        }))
    }

    /// Tricks a seat takes as declarer in a strain
    #[must_use]
    pub fn get(&self, strain: Strain, seat: Seat) -> u8 {
        self[strain].at(seat)
    }
}

/// Tricks shown as contract levels, `-` when below 7 tricks
impl fmt::Display for DdTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("   C  D  H  S NT")?;
        for seat in [Seat::North, Seat::South, Seat::East, Seat::West] {
            write!(f, "\n{seat}")?;
            for strain in Strain::ALL {
                match self.get(strain, seat) {
                    0..=6 => f.write_str("  -")?,
                    tricks => write!(f, "{:>3}", tricks - 6)?,
                }
            }
        }
        Ok(())
    }
}

/// Error raised when a trick count exceeds 13
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{seat} cannot take {tricks} tricks in {strain}")]
pub struct InvalidTricks {
    /// The strain of the bad entry
    pub strain: Strain,
    /// The declarer of the bad entry
    pub seat: Seat,
    /// The reported count
    pub tricks: u8,
}

/// Who would declare a contract
///
/// When both partners take the same number of tricks it does not matter
/// which of them declares, and the whole side is named instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Declarer {
    /// Either member of the partnership
    Side(Partnership),
    /// This seat only
    Seat(Seat),
}

impl Declarer {
    /// The declaring side
    #[must_use]
    pub const fn side(self) -> Partnership {
        match self {
            Self::Side(side) => side,
            Self::Seat(seat) => seat.partnership(),
        }
    }
}

impl fmt::Display for Declarer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Side(side) => side.fmt(f),
            Self::Seat(seat) => seat.fmt(f),
        }
    }
}

impl From<Seat> for Declarer {
    fn from(seat: Seat) -> Self {
        Self::Seat(seat)
    }
}

/// Declarer choices of one side in one strain, at most two
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Choices {
    len: u8,
    items: [(Declarer, u8); 2],
}

impl Choices {
    fn one(declarer: Declarer, tricks: u8) -> Self {
        Self {
            len: 1,
            items: [(declarer, tricks); 2],
        }
    }

    fn new(table: &DdTable, strain: Strain, side: Partnership) -> Self {
        let [first, second] = side.seats();
        let (x, y) = (table.get(strain, first), table.get(strain, second));

        if x == y {
            Self::one(Declarer::Side(side), x)
        } else {
            Self {
                len: 2,
                items: [(first.into(), x), (second.into(), y)],
            }
        }
    }

    fn as_slice(&self) -> &[(Declarer, u8)] {
        &self.items[..usize::from(self.len)]
    }
}

/// Double dummy tricks as seen by the par search
///
/// For each strain and side, the table lists who may declare and how many
/// tricks they take.  Partners taking the same number of tricks collapse into
/// a single entry for the side.  Once a side has bid a strain, the seat that
/// bid it first is the only remaining choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickTable([[Choices; 2]; 5]);

impl TrickTable {
    /// Build the view from the solver's table
    ///
    /// # Errors
    /// [`InvalidTricks`] if any count exceeds 13
    pub fn new(table: &DdTable) -> Result<Self, InvalidTricks> {
        for strain in Strain::ALL {
            for seat in Seat::ALL {
                let tricks = table.get(strain, seat);
                if tricks > 13 {
                    return Err(InvalidTricks {
                        strain,
                        seat,
                        tricks,
                    });
                }
            }
        }

        Ok(Self(Strain::ALL.map(|strain| {
            Partnership::ALL.map(|side| Choices::new(table, strain, side))
        })))
    }

    /// Declarer choices of a side in a strain
    #[must_use]
    pub fn entries(&self, strain: Strain, side: Partnership) -> &[(Declarer, u8)] {
        self.0[strain as usize][side as usize].as_slice()
    }

    /// Allow only `seat` to declare `strain` for `side`
    ///
    /// The partner's count is discarded.  Nothing happens if `seat` is no
    /// longer among the choices.
    pub fn restrict_to_declarer(&mut self, strain: Strain, side: Partnership, seat: Seat) {
        debug_assert_eq!(seat.partnership(), side);
        let choices = &mut self.0[strain as usize][side as usize];

        let tricks = choices
            .as_slice()
            .iter()
            .find_map(|&(declarer, tricks)| match declarer {
                Declarer::Side(_) => Some(tricks),
                Declarer::Seat(s) if s == seat => Some(tricks),
                Declarer::Seat(_) => None,
            });

        if let Some(tricks) = tricks {
            *choices = Choices::one(Declarer::Seat(seat), tricks);
        }
    }

    /// Tricks a seat takes as declarer, if it may still declare the strain
    #[must_use]
    pub fn tricks(&self, strain: Strain, seat: Seat) -> Option<u8> {
        self.entries(strain, seat.partnership())
            .iter()
            .find_map(|&(declarer, tricks)| match declarer {
                Declarer::Side(_) => Some(tricks),
                Declarer::Seat(s) => (s == seat).then_some(tricks),
            })
    }
}
