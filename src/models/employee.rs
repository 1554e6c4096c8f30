//! Employee and shift models.
//!
//! An employee works in a shift system of 1, 2 or 3 shifts: the shift
//! system is the highest shift index they may be rostered into.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// A shift index in 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Shift(u8);

impl Shift {
    /// Morning shift.
    pub const FIRST: Shift = Shift(1);
    /// Afternoon shift.
    pub const SECOND: Shift = Shift(2);
    /// Night shift.
    pub const THIRD: Shift = Shift(3);
    /// Highest shift index.
    pub const MAX: u8 = 3;

    /// Creates a shift, rejecting indices outside 1..=3.
    pub fn new(index: u8) -> PlannerResult<Self> {
        if (1..=Self::MAX).contains(&index) {
            Ok(Self(index))
        } else {
            Err(PlannerError::InvalidShift(index))
        }
    }

    /// Shift index.
    #[inline]
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Returns shift 1 if this shift exceeds `max`, else itself.
    pub fn clamp_to(self, max: u8) -> Self {
        if self.0 > max {
            Self::FIRST
        } else {
            self
        }
    }

    /// All shifts in `1..=max` (at least shift 1).
    pub fn up_to(max: u8) -> impl Iterator<Item = Shift> {
        (1..=max.clamp(1, Self::MAX)).map(Shift)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Shift {
    type Error = PlannerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Shift::new(value)
    }
}

impl From<Shift> for u8 {
    fn from(shift: Shift) -> Self {
        shift.0
    }
}

/// Employee availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    /// Can be rostered.
    #[default]
    Available,
    /// On vacation.
    Vacation,
    /// On sick leave.
    Sick,
}

impl EmployeeStatus {
    /// Whether the status is a leave (Vacation or Sick).
    pub fn is_leave(&self) -> bool {
        !matches!(self, EmployeeStatus::Available)
    }
}

/// An employee who can be placed on project groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Availability status.
    pub status: EmployeeStatus,
    /// Highest shift index this employee may work (1..=3).
    pub shift_system: u8,
    /// Preferred shift, honored by the engine when within range.
    pub preferred_shift: Option<Shift>,
}

impl Employee {
    /// Creates an available employee on a three-shift system.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            status: EmployeeStatus::Available,
            shift_system: Shift::MAX,
            preferred_shift: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the shift system (clamped to 1..=3).
    pub fn with_shift_system(mut self, shift_system: u8) -> Self {
        self.shift_system = shift_system.clamp(1, Shift::MAX);
        self
    }

    /// Sets the preferred shift.
    pub fn with_preferred_shift(mut self, shift: Shift) -> Self {
        self.preferred_shift = Some(shift);
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether the employee may work `shift`.
    #[inline]
    pub fn can_work(&self, shift: Shift) -> bool {
        shift.index() <= self.shift_system
    }

    /// Whether the status allows rostering.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == EmployeeStatus::Available
    }
}
