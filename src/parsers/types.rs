use serde::Serialize;
use thiserror::Error;

/// Value LAS files use for missing samples when the `~Well` section does not
/// declare one
pub const DEFAULT_NULL_VALUE: f64 = -999.25;

/// A `MNEM.UNIT VALUE : DESCRIPTION` line from a LAS header section
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HeaderItem {
    pub mnemonic: String,
    pub unit: String,
    pub value: String,
    pub description: String,
}

impl HeaderItem {
    /// Header value as a number, if it parses as one
    pub fn value_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

/// A single log curve: one sample per depth step
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Curve {
    pub mnemonic: String,
    pub unit: String,
    pub description: String,
    pub samples: Vec<f64>,
}

impl Curve {
    pub fn new(
        mnemonic: impl Into<String>,
        unit: impl Into<String>,
        description: impl Into<String>,
        samples: Vec<f64>,
    ) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            unit: unit.into(),
            description: description.into(),
            samples,
        }
    }

    /// Minimum and maximum of the finite samples
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.samples)
    }
}

/// Minimum and maximum over the finite values of a slice (NaN-skipping).
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Parsed contents of a well-log file, before it becomes a [`crate::well::Well`]
#[derive(Clone, Debug, Default, Serialize)]
pub struct WellLog {
    /// `VERS` from the version section, empty if the section was absent
    pub version: String,
    /// Whether the data section was written in wrapped mode
    pub wrapped: bool,
    pub well_items: Vec<HeaderItem>,
    pub parameters: Vec<HeaderItem>,
    /// Curves in file order; all share the same sample count
    pub curves: Vec<Curve>,
}

impl WellLog {
    /// Find a `~Well` item by mnemonic (case-insensitive)
    pub fn well_item(&self, mnemonic: &str) -> Option<&HeaderItem> {
        self.well_items
            .iter()
            .find(|item| item.mnemonic.eq_ignore_ascii_case(mnemonic))
    }

    /// Well name declared in the header, if present and non-blank
    pub fn well_name(&self) -> Option<&str> {
        self.well_item("WELL")
            .map(|item| item.value.trim())
            .filter(|name| !name.is_empty())
    }

    /// Number of depth samples
    pub fn row_count(&self) -> usize {
        self.curves.first().map_or(0, |c| c.samples.len())
    }
}

/// Reasons a curve file can fail to load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("file is empty")]
    Empty,

    #[error("missing mandatory section ~{0}")]
    MissingSection(&'static str),

    #[error("no curves declared in ~Curve section")]
    NoCurves,

    #[error("line {line}: invalid number '{token}'")]
    BadNumber { line: usize, token: String },

    #[error("data section holds {values} values, not a multiple of {curves} curves")]
    RaggedData { values: usize, curves: usize },
}

/// Trait for well-log file parsers
pub trait Parseable {
    fn parse(&self, data: &str) -> Result<WellLog, LoadError>;
}
