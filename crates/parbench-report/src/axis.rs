//! Process-count axis scaling.

use std::ops::Range;

use parbench_core::catalog::AlgorithmSpec;

/// How process counts are laid out along the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    /// Position equals the process count.
    Linear,
    /// Position is `log2(p)`; every tick is a power of two.
    Log2,
}

impl AxisScale {
    /// Log2 for algorithms restricted to power-of-two process counts.
    #[must_use]
    pub fn for_algorithm(spec: &AlgorithmSpec) -> Self {
        if spec.power_of_two_only {
            Self::Log2
        } else {
            Self::Linear
        }
    }

    /// Axis position of process count `p`.
    #[must_use]
    pub fn position(self, p: u32) -> i32 {
        match self {
            Self::Linear => i32::try_from(p).unwrap_or(i32::MAX),
            #[allow(clippy::cast_possible_wrap)]
            Self::Log2 => p.max(1).ilog2() as i32,
        }
    }

    /// Tick label for an axis position.
    #[must_use]
    pub fn label(self, position: i32) -> String {
        match self {
            Self::Linear => position.to_string(),
            Self::Log2 => u32::try_from(position)
                .ok()
                .and_then(|e| 1u32.checked_shl(e))
                .map_or_else(String::new, |p| p.to_string()),
        }
    }

    /// Axis range covering `counts`, widened around a single point.
    #[must_use]
    pub fn range(self, counts: &[u32]) -> Range<i32> {
        let positions = counts.iter().map(|&p| self.position(p));
        let lo = positions.clone().min().unwrap_or(0);
        let hi = positions.max().unwrap_or(0);
        if lo == hi {
            (lo - 1)..(hi + 1)
        } else {
            lo..hi
        }
    }

    /// Axis caption suffix.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Linear => "Number of processes",
            Self::Log2 => "Number of processes (log2 scale)",
        }
    }
}
