
use crate::deal::{Partnership, Seat};
use core::fmt;

bitflags::bitflags! {
    /// Sides that are vulnerable
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Vulnerability: u8 {
        /// Nobody is vulnerable
        const NONE = 0;
        /// North-south is vulnerable
        const NS = 0b01;
        /// East-west is vulnerable
        const EW = 0b10;
        /// Both sides are vulnerable
        const ALL = Self::NS.bits() | Self::EW.bits();
    }
}

// Vulnerability of boards 1 to 16, repeating every 16 boards
const PATTERN: [Vulnerability; 16] = [
    Vulnerability::NONE,
    Vulnerability::NS,
    Vulnerability::EW,
    Vulnerability::ALL,
    Vulnerability::NS,
    Vulnerability::EW,
    Vulnerability::ALL,
    Vulnerability::NONE,
    Vulnerability::EW,
    Vulnerability::ALL,
    Vulnerability::NONE,
    Vulnerability::NS,
    Vulnerability::ALL,
    Vulnerability::NONE,
    Vulnerability::NS,
    Vulnerability::EW,
];

impl Vulnerability {
    /// Whether a side is vulnerable
    #[must_use]
    pub const fn is_vulnerable(self, side: Partnership) -> bool {
        self.contains(match side {
            Partnership::NS => Self::NS,
            Partnership::EW => Self::EW,
        })
    }

    /// Exchange the vulnerability of the two sides
    #[must_use]
    pub const fn swap(self) -> Self {
        Self::from_bits_truncate((self.bits() & 1) << 1 | (self.bits() >> 1))
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match (self.contains(Self::NS), self.contains(Self::EW)) {
            (false, false) => "None",
            (true, false) => "N/S",
            (false, true) => "E/W",
            (true, true) => "Both",
        })
    }
}

/// A duplicate board, identified by its number
///
/// Dealer and vulnerability are the standard functions of the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board(u32);

impl Board {
    /// Board from its number, counting from 1
    ///
    /// # Panics
    /// Panics if `number` is 0.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        assert!(number > 0, "Boards are numbered from 1");
        Self(number)
    }

    /// The first board with this dealer and vulnerability
    ///
    /// Each combination occurs exactly once among boards 1 to 16.
    #[must_use]
    pub const fn from_dealer(dealer: Seat, vulnerability: Vulnerability) -> Self {
        let mut number = dealer as u32 + 1;
        while number + 4 <= 16 && PATTERN[number as usize - 1].bits() != vulnerability.bits() {
            number += 4;
        }
        Self(number)
    }

    /// The board number
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }

    /// The first seat to call
    #[must_use]
    pub const fn dealer(self) -> Seat {
        Seat::ALL[((self.0 - 1) % 4) as usize]
    }

    /// The vulnerable sides
    #[must_use]
    pub const fn vulnerability(self) -> Vulnerability {
        PATTERN[((self.0 - 1) % 16) as usize]
    }

    /// Whether a side is vulnerable on this board
    #[must_use]
    pub const fn is_vulnerable(self, side: Partnership) -> bool {
        self.vulnerability().is_vulnerable(side)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Board {}, Dealer {}, Vul {}",
            self.0,
            self.dealer(),
            self.vulnerability()
        )
    }
}
