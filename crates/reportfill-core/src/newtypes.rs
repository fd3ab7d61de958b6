/// Validated newtype wrappers for numeric inputs of an update run.
///
/// [`Day`] enforces its range at construction time via [`TryFrom<u32>`].
/// Once constructed the inner value is immutable, so every locator and writer
/// downstream can rely on `1 <= day <= 31` without re-checking.
use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a validated newtype from an invalid value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewtypeError {
    /// The value fell outside the permitted range.
    OutOfRange {
        /// Name of the type that rejected the input.
        type_name: &'static str,
        /// A human-readable description of the expected range.
        expected: &'static str,
        /// The input that was rejected.
        got: i64,
    },
}

impl fmt::Display for NewtypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                type_name,
                expected,
                got,
            } => write!(f, "invalid {type_name}: expected {expected}, got {got}"),
        }
    }
}

impl std::error::Error for NewtypeError {}

// ---------------------------------------------------------------------------
// Day
// ---------------------------------------------------------------------------

/// A calendar day of the month in `1..=31`.
///
/// The month itself is not known to the engine; a report template decides
/// which days exist by the header cells it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(u8);

impl Day {
    /// Smallest accepted day.
    pub const MIN: u32 = 1;
    /// Largest accepted day.
    pub const MAX: u32 = 31;

    /// Returns the day as a plain integer.
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// Zero-based offset from the first day of the month (`day - 1`).
    pub fn offset(self) -> u32 {
        self.get() - 1
    }
}

impl TryFrom<u32> for Day {
    type Error = NewtypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(day) if (Self::MIN..=Self::MAX).contains(&value) => Ok(Self(day)),
            Ok(_) | Err(_) => Err(NewtypeError::OutOfRange {
                type_name: "Day",
                expected: "an integer in 1..=31",
                got: i64::from(value),
            }),
        }
    }
}

impl TryFrom<i64> for Day {
    type Error = NewtypeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let out_of_range = || NewtypeError::OutOfRange {
            type_name: "Day",
            expected: "an integer in 1..=31",
            got: value,
        };
        let narrowed = u32::try_from(value).map_err(|_| out_of_range())?;
        Self::try_from(narrowed).map_err(|_| out_of_range())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
