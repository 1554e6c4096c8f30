//! Input validation for planning data.
//!
//! Checks structural integrity of employees, groups and manually entered
//! assignments before planning. Detects:
//! - Duplicate employee ids and group keys
//! - Shift systems outside 1..=3 and preferred shifts beyond them
//! - Assignments referencing unknown employees or groups
//! - Assignment shifts above the employee's shift system
//! - Duplicate assignment keys
//!
//! The engine never produces the last three; they come from imported or
//! hand-edited data, which is not clamped.

use std::collections::{HashMap, HashSet};

use crate::models::{Employee, ProjectGroup, ScheduleAssignment, Shift};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two employees share the same id.
    DuplicateId,
    /// Two groups share the same key.
    DuplicateGroup,
    /// Employee shift system outside 1..=3.
    InvalidShiftSystem,
    /// Preferred shift above the employee's shift system.
    PreferredShiftOutOfRange,
    /// An assignment references an employee that doesn't exist.
    UnknownEmployee,
    /// An assignment references a group that doesn't exist.
    UnknownGroup,
    /// An assignment's shift is above the employee's shift system.
    ShiftExceedsShiftSystem,
    /// Two assignments share the same key.
    DuplicateAssignment,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates planning input.
///
/// Checks:
/// 1. No duplicate employee ids
/// 2. No duplicate group keys
/// 3. Every shift system in 1..=3, preferred shifts within it
/// 4. Every assignment references a known employee and group
/// 5. Every assignment shift within its employee's shift system
/// 6. No two assignments with the same key
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    employees: &[Employee],
    groups: &[ProjectGroup],
    assignments: &[ScheduleAssignment],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut by_id: HashMap<&str, &Employee> = HashMap::new();
    for e in employees {
        if by_id.insert(e.id.as_str(), e).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", e.id),
            ));
        }

        if !(1..=Shift::MAX).contains(&e.shift_system) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShiftSystem,
                format!("Employee '{}' has shift system {}", e.id, e.shift_system),
            ));
        }

        if let Some(preferred) = e.preferred_shift {
            if preferred.index() > e.shift_system {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PreferredShiftOutOfRange,
                    format!(
                        "Employee '{}' prefers shift {} but works a {}-shift system",
                        e.id, preferred, e.shift_system
                    ),
                ));
            }
        }
    }

    let mut group_keys = HashSet::new();
    for g in groups {
        if !group_keys.insert(&g.key) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateGroup,
                format!("Duplicate group key: {}", g.key),
            ));
        }
    }

    let mut keys = HashSet::new();
    for a in assignments {
        match by_id.get(a.employee_id.as_str()) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownEmployee,
                format!(
                    "Assignment '{}' references unknown employee '{}'",
                    a.id, a.employee_id
                ),
            )),
            Some(e) if a.shift.index() > e.shift_system => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ShiftExceedsShiftSystem,
                    format!(
                        "Assignment '{}' puts '{}' on shift {} of a {}-shift system",
                        a.id, a.employee_id, a.shift, e.shift_system
                    ),
                ))
            }
            Some(_) => {}
        }

        if !group_keys.contains(&a.group_key) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownGroup,
                format!(
                    "Assignment '{}' references unknown group '{}'",
                    a.id, a.group_key
                ),
            ));
        }

        if !keys.insert(a.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateAssignment,
                format!("Duplicate assignment: {}", a.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
