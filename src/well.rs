//! Well data: curves of one well, and the collection of loaded wells.
//!
//! A [`Well`] owns its curves in file order. All curves share one sample
//! count, fixed when the file is parsed; derived curves computed from
//! existing ones keep it.

use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::parsers::{finite_range, Curve, HeaderItem, Las, LoadError, Parseable, WellLog};
use crate::petro::{self, DerivationError, DerivedCurve, PorosityParams, ShaleVolumeParams};
use crate::units::DensityUnit;

/// Depth curve candidates in priority order
pub const DEPTH_CANDIDATES: &[&str] = &["DEPT", "DEPTH", "MD", "TVD"];

/// One well's log data
#[derive(Clone, Debug, Default)]
pub struct Well {
    pub name: String,
    /// File the well was loaded from, if any
    pub source: Option<PathBuf>,
    /// LAS version string from the file header
    pub version: String,
    pub header: Vec<HeaderItem>,
    pub parameters: Vec<HeaderItem>,
    curves: Vec<Curve>,
}

impl Well {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style curve insertion, mostly for tests and tools
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.insert_curve(curve);
        self
    }

    /// Build a well from parsed file contents. The header's `WELL` value names
    /// the well; `fallback_name` is used when it is missing or blank.
    pub fn from_log(log: WellLog, fallback_name: &str) -> Self {
        let name = log
            .well_name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name.to_string());

        Self {
            name,
            source: None,
            version: log.version,
            header: log.well_items,
            parameters: log.parameters,
            curves: log.curves,
        }
    }

    /// Read and parse a LAS file. Nothing is returned on failure, so a
    /// partially parsed well is never observable.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let log = with_mapped_text(path, |text| Las.parse(text))?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown Well".to_string());

        let mut well = Self::from_log(log, &stem);
        well.source = Some(path.to_path_buf());
        Ok(well)
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Curve mnemonics in file order
    pub fn curve_names(&self) -> Vec<&str> {
        self.curves.iter().map(|c| c.mnemonic.as_str()).collect()
    }

    pub fn curve(&self, mnemonic: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.mnemonic == mnemonic)
    }

    pub fn has_curve(&self, mnemonic: &str) -> bool {
        self.curve(mnemonic).is_some()
    }

    /// Samples of a curve
    pub fn curve_data(&self, mnemonic: &str) -> Option<&[f64]> {
        self.curve(mnemonic).map(|c| c.samples.as_slice())
    }

    /// Insert a curve, replacing an existing one with the same mnemonic in place
    pub fn insert_curve(&mut self, curve: Curve) {
        match self.curves.iter_mut().find(|c| c.mnemonic == curve.mnemonic) {
            Some(existing) => *existing = curve,
            None => self.curves.push(curve),
        }
    }

    /// Number of depth samples
    pub fn sample_count(&self) -> usize {
        self.curves.first().map_or(0, |c| c.samples.len())
    }

    /// Name of the depth curve: the first of [`DEPTH_CANDIDATES`] present
    /// (ASCII-case-insensitive)
    pub fn depth_curve_name(&self) -> Option<&str> {
        DEPTH_CANDIDATES.iter().find_map(|candidate| {
            self.curves
                .iter()
                .find(|c| c.mnemonic.eq_ignore_ascii_case(candidate))
                .map(|c| c.mnemonic.as_str())
        })
    }

    pub fn depth_curve(&self) -> Option<&Curve> {
        self.depth_curve_name().and_then(|name| self.curve(name))
    }

    /// Depth samples, or the synthetic index `0..N-1` when no depth curve exists
    pub fn depth_values(&self) -> Cow<'_, [f64]> {
        match self.depth_curve() {
            Some(curve) => Cow::Borrowed(curve.samples.as_slice()),
            None => Cow::Owned((0..self.sample_count()).map(|i| i as f64).collect()),
        }
    }

    /// Unit of the depth curve (empty for the synthetic index)
    pub fn depth_unit(&self) -> &str {
        self.depth_curve().map_or("", |c| c.unit.as_str())
    }

    /// Finite min/max of the depth axis
    pub fn depth_extent(&self) -> Option<(f64, f64)> {
        finite_range(&self.depth_values())
    }

    /// Index of the sample whose depth is closest to `depth`
    pub fn nearest_index(&self, depth: f64) -> Option<usize> {
        if !depth.is_finite() {
            return None;
        }
        self.depth_values()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .min_by(|(_, a), (_, b)| (*a - depth).abs().total_cmp(&(*b - depth).abs()))
            .map(|(i, _)| i)
    }

    /// Shale volume from the gamma-ray curve named in `params`
    pub fn shale_volume(&self, params: &ShaleVolumeParams) -> Result<Vec<f64>, DerivationError> {
        params.validate()?;
        let gr = self
            .curve_data(&params.gr_curve)
            .ok_or_else(|| DerivationError::MissingCurve(params.gr_curve.clone()))?;
        Ok(petro::shale_volume(gr, params.gr_clean, params.gr_shale))
    }

    /// Density porosity from the bulk-density curve named in `params`.
    /// Samples in kg/m3 are converted to g/cc first.
    pub fn porosity(&self, params: &PorosityParams) -> Result<Vec<f64>, DerivationError> {
        params.validate()?;
        let curve = self
            .curve(&params.density_curve)
            .ok_or_else(|| DerivationError::MissingCurve(params.density_curve.clone()))?;

        let rhob: Cow<'_, [f64]> = match DensityUnit::from_las(&curve.unit) {
            Some(unit @ DensityUnit::KgPerM3) => {
                Cow::Owned(curve.samples.iter().map(|&v| unit.to_g_per_cc(v)).collect())
            }
            _ => Cow::Borrowed(curve.samples.as_slice()),
        };
        Ok(petro::porosity(&rhob, params.matrix_density, params.fluid_density))
    }

    /// Write a derived curve back into the well under its fixed mnemonic
    pub fn store_derived(&mut self, kind: DerivedCurve, samples: Vec<f64>) {
        tracing::info!("Storing {} on well {}", kind.mnemonic(), self.name);
        self.insert_curve(Curve::new(
            kind.mnemonic(),
            kind.unit(),
            kind.description(),
            samples,
        ));
    }
}

/// Map a file and hand its text to `f` without copying it. Only files that
/// need lossy decoding are copied.
fn with_mapped_text<T>(
    path: &Path,
    f: impl FnOnce(&str) -> Result<T, LoadError>,
) -> Result<T, LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    if file.metadata().map_err(io_err)?.len() == 0 {
        return Err(LoadError::Empty);
    }

    // SAFETY: the file is opened read-only and the mapping does not outlive
    // this call. Truncating the file while it is parsed is not supported.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    f(&Las::decode(&mmap))
}

/// All loaded wells, in load order, keyed by name
#[derive(Clone, Debug, Default)]
pub struct WellCollection {
    wells: Vec<Well>,
}

impl WellCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a well from file and register it. Returns the well's name.
    /// On failure the collection is left untouched.
    pub fn load_well(&mut self, path: &Path) -> Result<String, LoadError> {
        let well = Well::load(path)?;
        let name = well.name.clone();
        tracing::info!(
            "Loaded well {} from {}: {} curves, {} samples",
            name,
            path.display(),
            well.curves().len(),
            well.sample_count()
        );
        self.insert(well);
        Ok(name)
    }

    /// Register a well. A well with the same name is replaced in place and returned.
    pub fn insert(&mut self, well: Well) -> Option<Well> {
        match self.wells.iter_mut().find(|w| w.name == well.name) {
            Some(existing) => {
                tracing::warn!("Replacing previously loaded well {}", well.name);
                Some(std::mem::replace(existing, well))
            }
            None => {
                self.wells.push(well);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Well> {
        self.wells.iter().find(|w| w.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Well> {
        self.wells.iter_mut().find(|w| w.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.wells.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter()
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}
