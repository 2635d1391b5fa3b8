//! Algorithm catalog and selection.
//!
//! Each entry names an algorithm the worker implements, the menu token that
//! selects it, and the rules the harness applies when planning its runs.

use serde::Serialize;

use crate::error::BenchError;

/// Shape of the arguments the worker expects after the protocol token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    /// Dataset path followed by a target value.
    Search,
    /// Lower and upper bound of a numeric range.
    PrimeRange,
    /// Dataset path alone.
    Sort,
}

/// Where the worker's input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A provisioned dataset file, padded to a power of two.
    Dataset,
    /// Numeric parameters derived from the requested size.
    Parameters,
}

/// Immutable description of one algorithm under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSpec {
    /// Display name.
    pub name: &'static str,
    /// Command-line selection key.
    pub key: &'static str,
    /// Menu token sent to the worker.
    pub token: &'static str,
    /// Argument shape.
    pub workload: Workload,
    /// Whether valid process counts are restricted to powers of two.
    pub power_of_two_only: bool,
}

impl AlgorithmSpec {
    /// Input mode implied by the workload.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match self.workload {
            Workload::PrimeRange => InputMode::Parameters,
            Workload::Search | Workload::Sort => InputMode::Dataset,
        }
    }

    /// Lowercase, underscore-separated form of the name, safe for file names.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Every algorithm the worker understands, in execution order.
pub const CATALOG: [AlgorithmSpec; 5] = [
    AlgorithmSpec {
        name: "Quick Search",
        key: "quick-search",
        token: "1",
        workload: Workload::Search,
        power_of_two_only: false,
    },
    AlgorithmSpec {
        name: "Prime Number Finding",
        key: "prime",
        token: "2",
        workload: Workload::PrimeRange,
        power_of_two_only: false,
    },
    AlgorithmSpec {
        name: "Bitonic Sort",
        key: "bitonic",
        token: "3",
        workload: Workload::Sort,
        power_of_two_only: true,
    },
    AlgorithmSpec {
        name: "Radix Sort",
        key: "radix",
        token: "4",
        workload: Workload::Sort,
        power_of_two_only: false,
    },
    AlgorithmSpec {
        name: "Sample Sort",
        key: "sample",
        token: "5",
        workload: Workload::Sort,
        power_of_two_only: true,
    },
];

/// Look up a catalog entry by its selection key.
pub fn find(key: &str) -> Result<&'static AlgorithmSpec, BenchError> {
    CATALOG
        .iter()
        .find(|spec| spec.key == key)
        .ok_or_else(|| BenchError::Config(format!("unknown algorithm: {key}")))
}

/// Resolve selection keys into catalog entries.
///
/// `"all"` selects the whole catalog. The result is deduplicated and keeps
/// catalog order regardless of the order the keys were given in.
pub fn select<S: AsRef<str>>(keys: &[S]) -> Result<Vec<AlgorithmSpec>, BenchError> {
    if keys.is_empty() {
        return Err(BenchError::Config("no algorithm selected".into()));
    }

    let mut wanted = [false; CATALOG.len()];
    for key in keys {
        let key = key.as_ref();
        if key == "all" {
            wanted = [true; CATALOG.len()];
            continue;
        }
        let spec = find(key)?;
        if let Some(idx) = CATALOG.iter().position(|s| s == spec) {
            wanted[idx] = true;
        }
    }

    Ok(CATALOG
        .iter()
        .zip(wanted)
        .filter_map(|(spec, on)| on.then_some(*spec))
        .collect())
}

/// All selection keys, for help output and completion.
#[must_use]
pub fn available() -> Vec<&'static str> {
    CATALOG.iter().map(|s| s.key).collect()
}
