//! Unit recognition and conversion utilities.
//!
//! LAS files spell units freely (`F`, `FT`, `FEET`, `M`, `METRES`, `G/C3`,
//! `K/M3`, ...). This module maps those spellings onto a few known units and
//! provides the user-selectable depth display unit.

use serde::{Deserialize, Serialize};

const FEET_PER_METER: f64 = 3.280_839_895;

/// Depth unit preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthUnit {
    #[default]
    Feet,
    Meters,
}

impl DepthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            DepthUnit::Feet => "ft",
            DepthUnit::Meters => "m",
        }
    }

    /// Recognise a depth unit from a LAS unit string
    pub fn from_las(unit: &str) -> Option<Self> {
        match unit.trim().to_ascii_uppercase().as_str() {
            "F" | "FT" | "FEET" | "FOOT" => Some(DepthUnit::Feet),
            "M" | "METER" | "METERS" | "METRE" | "METRES" => Some(DepthUnit::Meters),
            _ => None,
        }
    }

    /// Convert a depth expressed in `from` into this unit
    pub fn convert_from(&self, value: f64, from: DepthUnit) -> f64 {
        match (from, self) {
            (DepthUnit::Feet, DepthUnit::Meters) => value / FEET_PER_METER,
            (DepthUnit::Meters, DepthUnit::Feet) => value * FEET_PER_METER,
            _ => value,
        }
    }
}

/// Bulk-density units found on RHOB-type curves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DensityUnit {
    GramsPerCc,
    KgPerM3,
}

impl DensityUnit {
    pub fn from_las(unit: &str) -> Option<Self> {
        match unit.trim().to_ascii_uppercase().as_str() {
            "G/CC" | "G/C3" | "G/CM3" | "GM/CC" | "G/CM^3" => Some(DensityUnit::GramsPerCc),
            "K/M3" | "KG/M3" | "KG/M^3" => Some(DensityUnit::KgPerM3),
            _ => None,
        }
    }

    /// Convert a density in this unit to g/cc
    pub fn to_g_per_cc(&self, value: f64) -> f64 {
        match self {
            DensityUnit::GramsPerCc => value,
            DensityUnit::KgPerM3 => value / 1000.0,
        }
    }
}

/// User preferences for display units
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitPreferences {
    pub depth: DepthUnit,
}

impl UnitPreferences {
    /// Convert a depth value and get the display unit based on the source unit string.
    /// Unknown source units pass through unchanged.
    /// Returns (converted_value, display_unit)
    pub fn convert_depth<'a>(&self, value: f64, source_unit: &'a str) -> (f64, &'a str) {
        match DepthUnit::from_las(source_unit) {
            Some(from) => (self.depth.convert_from(value, from), self.depth.symbol()),
            None => (value, source_unit),
        }
    }
}
