//! A single placement of a base cell and its repeat policy.
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::affine::Affine2D;

/// Bit set of stopping rules that govern a repeating destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StopConditions(u32);

impl StopConditions {
    pub const NONE: Self = Self(0);
    /// Stop after `max_iterations` placements.
    pub const ITERATIONS: Self = Self(1 << 0);
    /// Stop once a placement grows beyond `max_size`.
    pub const MAX_SIZE: Self = Self(1 << 1);
    /// Stop once a placement shrinks below `min_size`.
    pub const MIN_SIZE: Self = Self(1 << 2);
    /// Scripted predicate. Recorded but never evaluated.
    pub const SCRIPTED: Self = Self(1 << 3);

    const NAMES: [(Self, &'static str); 4] = [
        (Self::ITERATIONS, "iterations"),
        (Self::MAX_SIZE, "max_size"),
        (Self::MIN_SIZE, "min_size"),
        (Self::SCRIPTED, "scripted"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Keeps only known bits.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & 0b1111)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Parses a whitespace-separated list of rule names.
    pub fn from_names(list: &str) -> Option<Self> {
        let mut out = Self::NONE;
        for word in list.split_whitespace() {
            let (flag, _) = Self::NAMES.iter().find(|(_, name)| *name == word)?;
            out.insert(*flag);
        }
        Some(out)
    }
}

impl BitOr for StopConditions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StopConditions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Space-separated rule names, empty when no rule is set.
impl fmt::Display for StopConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One destination of a base cell.
///
/// `transform` maps the base cell's local frame to this placement, relative
/// to the start of the current lattice cell. A destination with
/// `max_iterations > 1` re-applies its transform to its own previous
/// placement, producing an orbit (e.g. a rotation repeated N times).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TilingDest {
    pub transform: Affine2D,
    /// Number of placements. `1` places once, `0` is treated as `1`, and a
    /// negative value repeats until a size rule halts it.
    pub max_iterations: i32,
    pub conditions: StopConditions,
    /// Bbox diagonal above which repetition stops (with [`StopConditions::MAX_SIZE`]).
    pub max_size: f64,
    /// Bbox diagonal below which repetition stops (with [`StopConditions::MIN_SIZE`]).
    pub min_size: f64,
    /// Whether this placement's outline is drawn when tracing cells.
    pub traceable: bool,
    /// Reserved; carries no behavior.
    pub is_progressive: bool,
    /// Reserved predicate text; never evaluated.
    pub scripted_condition: Option<String>,
}

impl Default for TilingDest {
    fn default() -> Self {
        Self {
            transform: Affine2D::IDENTITY,
            max_iterations: 1,
            conditions: StopConditions::NONE,
            max_size: 0.0,
            min_size: 0.0,
            traceable: true,
            is_progressive: false,
            scripted_condition: None,
        }
    }
}

impl TilingDest {
    /// Single, non-repeating placement.
    pub fn new(transform: Affine2D) -> Self {
        Self {
            transform,
            ..Default::default()
        }
    }

    /// Destination repeated `iterations` times, bounded by the iteration count.
    pub fn repeated(transform: Affine2D, iterations: i32) -> Self {
        Self {
            transform,
            max_iterations: iterations,
            conditions: StopConditions::ITERATIONS,
            ..Default::default()
        }
    }

    pub fn with_iterations(mut self, max_iterations: i32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_conditions(mut self, conditions: StopConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Sets `max_size` and enables the matching rule.
    pub fn with_max_size(mut self, max_size: f64) -> Self {
        self.max_size = max_size;
        self.conditions.insert(StopConditions::MAX_SIZE);
        self
    }

    /// Sets `min_size` and enables the matching rule.
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self.conditions.insert(StopConditions::MIN_SIZE);
        self
    }

    pub fn with_traceable(mut self, traceable: bool) -> Self {
        self.traceable = traceable;
        self
    }

    pub fn with_progressive(mut self, is_progressive: bool) -> Self {
        self.is_progressive = is_progressive;
        self
    }

    pub fn with_scripted_condition(mut self, script: impl Into<String>) -> Self {
        self.scripted_condition = Some(script.into());
        self.conditions.insert(StopConditions::SCRIPTED);
        self
    }

    /// Whether this destination places more than once (or without bound).
    pub fn is_recursive(&self) -> bool {
        self.max_iterations != 1 && self.max_iterations != 0
    }

    /// Placement count when bounded, `None` when only size rules can stop it.
    pub fn placement_limit(&self) -> Option<usize> {
        match self.max_iterations {
            n if n < 0 => None,
            0 => Some(1),
            n => Some(n as usize),
        }
    }

    pub fn max_size_active(&self) -> bool {
        self.conditions.contains(StopConditions::MAX_SIZE) && self.max_size > 0.0
    }

    pub fn min_size_active(&self) -> bool {
        self.conditions.contains(StopConditions::MIN_SIZE) && self.min_size > 0.0
    }

    /// Whether some rule can end the repetition.
    pub fn is_bounded(&self) -> bool {
        self.max_iterations >= 0 || self.max_size_active() || self.min_size_active()
    }

    /// Whether every field other than `transform` still holds its default.
    pub fn is_plain(&self) -> bool {
        let default = TilingDest::default();
        self.max_iterations == default.max_iterations
            && self.conditions == default.conditions
            && self.max_size == default.max_size
            && self.min_size == default.min_size
            && self.traceable == default.traceable
            && self.is_progressive == default.is_progressive
            && self.scripted_condition.is_none()
    }
}
