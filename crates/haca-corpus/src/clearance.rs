//! Security clearance level (SCL)

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Security clearance level
///
/// Held by accounts and required by documents. Higher levels permit access
/// to more documents; comparison is plain integer ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Clearance(u8);

impl Clearance {
    /// Lowest possible clearance
    pub const NONE: Self = Self(0);

    /// Create clearance from raw level
    #[inline]
    #[must_use]
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Raw numeric level
    #[inline]
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// True if this clearance is at least `required`
    #[inline]
    #[must_use]
    pub fn permits(self, required: Clearance) -> bool {
        required <= self
    }
}

impl From<u8> for Clearance {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

impl Display for Clearance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SCL-{}", self.0)
    }
}
