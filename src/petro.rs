//! Petrophysical curve derivation.
//!
//! Closed-form, element-wise transforms over curve samples. The slice-level
//! functions are pure; [`crate::well::Well`] wraps them with curve lookup and
//! calibration checks.

use thiserror::Error;

/// Mnemonic under which shale volume is stored back into a well
pub const VSH_MNEMONIC: &str = "VSH";
/// Mnemonic under which porosity is stored back into a well
pub const PHI_MNEMONIC: &str = "PHI";

/// Reasons a derivation cannot produce a curve
#[derive(Debug, Error, PartialEq)]
pub enum DerivationError {
    #[error("{0} curve not found")]
    MissingCurve(String),

    #[error("degenerate calibration: {0}")]
    DegenerateCalibration(&'static str),
}

/// Gamma-ray shale volume calibration
#[derive(Clone, Debug, PartialEq)]
pub struct ShaleVolumeParams {
    pub gr_curve: String,
    pub gr_clean: f64,
    pub gr_shale: f64,
}

impl Default for ShaleVolumeParams {
    fn default() -> Self {
        Self {
            gr_curve: "GR".to_string(),
            gr_clean: 30.0,
            gr_shale: 150.0,
        }
    }
}

impl ShaleVolumeParams {
    pub fn validate(&self) -> Result<(), DerivationError> {
        if self.gr_shale == self.gr_clean || !(self.gr_shale - self.gr_clean).is_finite() {
            return Err(DerivationError::DegenerateCalibration(
                "gr_shale must differ from gr_clean",
            ));
        }
        Ok(())
    }
}

/// Density porosity calibration
#[derive(Clone, Debug, PartialEq)]
pub struct PorosityParams {
    pub density_curve: String,
    pub matrix_density: f64,
    pub fluid_density: f64,
}

impl Default for PorosityParams {
    fn default() -> Self {
        Self {
            density_curve: "RHOB".to_string(),
            matrix_density: 2.65,
            fluid_density: 1.0,
        }
    }
}

impl PorosityParams {
    pub fn validate(&self) -> Result<(), DerivationError> {
        if self.matrix_density == self.fluid_density
            || !(self.matrix_density - self.fluid_density).is_finite()
        {
            return Err(DerivationError::DegenerateCalibration(
                "matrix_density must differ from fluid_density",
            ));
        }
        Ok(())
    }
}

/// Derived curves that can be written back into a well
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivedCurve {
    ShaleVolume,
    Porosity,
}

impl DerivedCurve {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            DerivedCurve::ShaleVolume => VSH_MNEMONIC,
            DerivedCurve::Porosity => PHI_MNEMONIC,
        }
    }

    pub fn unit(&self) -> &'static str {
        "fraction"
    }

    pub fn description(&self) -> &'static str {
        match self {
            DerivedCurve::ShaleVolume => "Shale Volume",
            DerivedCurve::Porosity => "Porosity",
        }
    }
}

/// `Vsh = clip((GR - gr_clean) / (gr_shale - gr_clean), 0, 1)`.
/// NaN samples stay NaN.
pub fn shale_volume(gr: &[f64], gr_clean: f64, gr_shale: f64) -> Vec<f64> {
    let span = gr_shale - gr_clean;
    gr.iter()
        .map(|&g| ((g - gr_clean) / span).clamp(0.0, 1.0))
        .collect()
}

/// `Phi = clip((matrix_density - RHOB) / (matrix_density - fluid_density), 0, 1)`.
/// NaN samples stay NaN.
pub fn porosity(rhob: &[f64], matrix_density: f64, fluid_density: f64) -> Vec<f64> {
    let span = matrix_density - fluid_density;
    rhob.iter()
        .map(|&r| ((matrix_density - r) / span).clamp(0.0, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shale_volume_example() {
        assert_eq!(shale_volume(&[30.0, 90.0, 150.0], 30.0, 150.0), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_shale_volume_bounded_and_monotonic() {
        let gr: Vec<f64> = (-50..=300).map(|g| g as f64).collect();
        let vsh = shale_volume(&gr, 30.0, 150.0);
        assert!(vsh.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(vsh.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(vsh.first(), Some(&0.0));
        assert_eq!(vsh.last(), Some(&1.0));
    }

    #[test]
    fn test_porosity_bounded_and_monotonic() {
        let rhob: Vec<f64> = (50..=320).map(|r| r as f64 / 100.0).collect();
        let phi = porosity(&rhob, 2.65, 1.0);
        assert!(phi.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(phi.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(phi.first(), Some(&1.0));
        assert_eq!(phi.last(), Some(&0.0));
    }

    #[test]
    fn test_porosity_values() {
        let phi = porosity(&[2.65, 1.825, 1.0], 2.65, 1.0);
        assert_eq!(phi[0], 0.0);
        assert!((phi[1] - 0.5).abs() < 1e-12);
        assert_eq!(phi[2], 1.0);
    }

    #[test]
    fn test_nan_samples_stay_nan() {
        let vsh = shale_volume(&[f64::NAN, 60.0], 30.0, 150.0);
        assert!(vsh[0].is_nan());
        assert_eq!(vsh[1], 0.25);

        let phi = porosity(&[f64::NAN], 2.65, 1.0);
        assert!(phi[0].is_nan());
    }

    #[test]
    fn test_degenerate_calibration_rejected() {
        let params = ShaleVolumeParams {
            gr_clean: 80.0,
            gr_shale: 80.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(DerivationError::DegenerateCalibration(_))
        ));
        assert!(ShaleVolumeParams::default().validate().is_ok());

        let params = PorosityParams {
            matrix_density: 1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(PorosityParams::default().validate().is_ok());
    }

    #[test]
    fn test_derived_curve_names() {
        assert_eq!(DerivedCurve::ShaleVolume.mnemonic(), "VSH");
        assert_eq!(DerivedCurve::Porosity.mnemonic(), "PHI");
        assert_eq!(DerivedCurve::Porosity.unit(), "fraction");
        assert_eq!(DerivedCurve::ShaleVolume.description(), "Shale Volume");
    }
}
