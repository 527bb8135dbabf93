//! lightcurve::mission — mission tag and the optional mission-specific fields.
//!
//! Purpose
//! -------
//! Kepler, K2 and TESS products carry the same handful of extra per-cadence
//! fields (cadence number, quality bitmask, centroids, background). Instead
//! of one light-curve type per mission, a single [`LightCurve`] carries a
//! [`Mission`] tag plus [`MissionColumns`], where each field is optional.
//!
//! Key behaviors
//! -------------
//! - [`Mission::segment_key`] names the metadata key that identifies an
//!   observing segment (quarter, campaign, sector).
//! - [`MissionColumns`] applies the same row primitives as auxiliary columns
//!   so every transform keeps the mission fields aligned with flux.
//!
//! Conventions
//! -----------
//! - `quality` is a `u32` bitmask; `cadenceno` is a signed 64-bit counter.
//! - Column names exposed through the lookup layer are listed in
//!   [`MISSION_COLUMN_NAMES`].
//!
//! [`LightCurve`]: crate::lightcurve::LightCurve

use std::str::FromStr;

use ndarray::Array1;

use crate::lightcurve::errors::LightCurveError;
use crate::lightcurve::meta::keys;

/// Names under which mission fields are visible as columns.
pub const MISSION_COLUMN_NAMES: [&str; 5] =
    ["cadenceno", "quality", "centroid_col", "centroid_row", "background"];

/// Observing mission that produced a light curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mission {
    #[default]
    Generic,
    Kepler,
    K2,
    Tess,
}

impl Mission {
    /// Metadata key naming this mission's observing segment.
    pub fn segment_key(self) -> Option<&'static str> {
        match self {
            Mission::Kepler => Some(keys::QUARTER),
            Mission::K2 => Some(keys::CAMPAIGN),
            Mission::Tess => Some(keys::SECTOR),
            Mission::Generic => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mission::Generic => "Generic",
            Mission::Kepler => "Kepler",
            Mission::K2 => "K2",
            Mission::Tess => "TESS",
        }
    }
}

impl FromStr for Mission {
    type Err = LightCurveError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "generic" => Ok(Mission::Generic),
            "kepler" => Ok(Mission::Kepler),
            "k2" => Ok(Mission::K2),
            "tess" => Ok(Mission::Tess),
            _ => Err(LightCurveError::UnknownMission(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Mission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Optional per-cadence fields shared by the space-telescope missions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MissionColumns {
    pub cadenceno: Option<Array1<i64>>,
    pub quality: Option<Array1<u32>>,
    pub centroid_col: Option<Array1<f64>>,
    pub centroid_row: Option<Array1<f64>>,
    pub background: Option<Array1<f64>>,
}

impl MissionColumns {
    /// `(name, len)` for every present field, in [`MISSION_COLUMN_NAMES`] order.
    pub fn lengths(&self) -> Vec<(&'static str, usize)> {
        let mut out = Vec::new();
        if let Some(a) = &self.cadenceno {
            out.push(("cadenceno", a.len()));
        }
        if let Some(a) = &self.quality {
            out.push(("quality", a.len()));
        }
        for (name, col) in self.float_fields() {
            if let Some(a) = col {
                out.push((name, a.len()));
            }
        }
        out
    }

    /// The three floating-point fields, named.
    pub fn float_fields(&self) -> [(&'static str, Option<&Array1<f64>>); 3] {
        [
            ("centroid_col", self.centroid_col.as_ref()),
            ("centroid_row", self.centroid_row.as_ref()),
            ("background", self.background.as_ref()),
        ]
    }

    pub fn has(&self, name: &str) -> bool {
        match name {
            "cadenceno" => self.cadenceno.is_some(),
            "quality" => self.quality.is_some(),
            "centroid_col" => self.centroid_col.is_some(),
            "centroid_row" => self.centroid_row.is_some(),
            "background" => self.background.is_some(),
            _ => false,
        }
    }

    pub fn take(&self, indices: &[usize]) -> MissionColumns {
        MissionColumns {
            cadenceno: self.cadenceno.as_ref().map(|a| indices.iter().map(|&i| a[i]).collect()),
            quality: self.quality.as_ref().map(|a| indices.iter().map(|&i| a[i]).collect()),
            centroid_col: self.centroid_col.as_ref().map(|a| take_f64(a, indices)),
            centroid_row: self.centroid_row.as_ref().map(|a| take_f64(a, indices)),
            background: self.background.as_ref().map(|a| take_f64(a, indices)),
        }
    }

    /// Gather rows; `None` slots get cadence 0, quality 0, NaN floats.
    pub fn take_or_fill(&self, rows: &[Option<usize>]) -> MissionColumns {
        let fill_f64 = |a: &Array1<f64>| -> Array1<f64> {
            rows.iter().map(|r| r.map_or(f64::NAN, |i| a[i])).collect()
        };
        MissionColumns {
            cadenceno: self
                .cadenceno
                .as_ref()
                .map(|a| rows.iter().map(|r| r.map_or(0, |i| a[i])).collect()),
            quality: self
                .quality
                .as_ref()
                .map(|a| rows.iter().map(|r| r.map_or(0, |i| a[i])).collect()),
            centroid_col: self.centroid_col.as_ref().map(fill_f64),
            centroid_row: self.centroid_row.as_ref().map(fill_f64),
            background: self.background.as_ref().map(fill_f64),
        }
    }

    /// Drop every field not named in `keep`.
    pub fn retain(&self, keep: &[&str]) -> MissionColumns {
        let wanted = |name: &str| keep.contains(&name);
        MissionColumns {
            cadenceno: self.cadenceno.clone().filter(|_| wanted("cadenceno")),
            quality: self.quality.clone().filter(|_| wanted("quality")),
            centroid_col: self.centroid_col.clone().filter(|_| wanted("centroid_col")),
            centroid_row: self.centroid_row.clone().filter(|_| wanted("centroid_row")),
            background: self.background.clone().filter(|_| wanted("background")),
        }
    }
}

fn take_f64(values: &Array1<f64>, indices: &[usize]) -> Array1<f64> {
    indices.iter().map(|&i| values[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn segment_keys_follow_mission() {
        assert_eq!(Mission::Kepler.segment_key(), Some("QUARTER"));
        assert_eq!(Mission::K2.segment_key(), Some("CAMPAIGN"));
        assert_eq!(Mission::Tess.segment_key(), Some("SECTOR"));
        assert_eq!(Mission::Generic.segment_key(), None);
        assert_eq!("TESS".parse::<Mission>().unwrap(), Mission::Tess);
    }

    #[test]
    // Purpose
    // -------
    // Missing rows in mission fields get neutral fill values.
    //
    // Given
    // -----
    // - cadenceno [10, 11], quality [4, 8], background [1.0, 2.0].
    // - rows [None, Some(0)].
    //
    // Expect
    // ------
    // - cadenceno [0, 10], quality [0, 4], background [NaN, 1.0].
    fn take_or_fill_uses_neutral_values() {
        let cols = MissionColumns {
            cadenceno: Some(array![10, 11]),
            quality: Some(array![4, 8]),
            background: Some(array![1.0, 2.0]),
            ..Default::default()
        };

        let out = cols.take_or_fill(&[None, Some(0)]);

        assert_eq!(out.cadenceno, Some(array![0, 10]));
        assert_eq!(out.quality, Some(array![0, 4]));
        let bkg = out.background.unwrap();
        assert!(bkg[0].is_nan());
        assert_eq!(bkg[1], 1.0);
        assert!(out.centroid_col.is_none());
    }
}
