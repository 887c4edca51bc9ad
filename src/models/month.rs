use chrono::{Datelike, NaiveDate};

/// A calendar month, the unit budgets are keyed by.
///
/// Identity always comes from the numeric month index so the process
/// locale can never change how records group; `name()` is display text
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// 1-based calendar index (January = 1 ... December = 12).
    pub fn index(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_index(index: u32) -> Option<Month> {
        let slot = index.checked_sub(1)? as usize;
        Self::ALL.get(slot).copied()
    }

    /// The month containing the given date.
    pub fn of(date: NaiveDate) -> Month {
        Self::ALL[date.month0() as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Three-letter abbreviation for narrow layouts.
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// Case-insensitive lookup of a canonical month name.
    pub fn parse(s: &str) -> Option<Month> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
    }

    /// The month `n` steps earlier, wrapping December -> January across
    /// year boundaries.
    pub fn back(self, n: u32) -> Month {
        let zero_based = self.index() - 1;
        let idx = (zero_based + 12 - (n % 12)) % 12;
        Self::ALL[idx as usize]
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
