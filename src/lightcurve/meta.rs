//! lightcurve::meta — string-keyed scalar metadata attached to a light curve.
//!
//! Metadata travels unchanged through every derived light curve unless an
//! operation explicitly owns a flag (`NORMALIZED`, `FLUX_ORIGIN`). Keys are
//! case-sensitive; the documented keys in [`keys`] are upper-case, and the
//! three-tier lookup is the only place that maps a lower-case name onto them.

use std::collections::BTreeMap;

/// Documented metadata keys.
pub mod keys {
    pub const MISSION: &str = "MISSION";
    pub const SECTOR: &str = "SECTOR";
    pub const QUARTER: &str = "QUARTER";
    pub const CAMPAIGN: &str = "CAMPAIGN";
    pub const FLUX_ORIGIN: &str = "FLUX_ORIGIN";
    pub const NORMALIZED: &str = "NORMALIZED";
    pub const TARGETID: &str = "TARGETID";
    pub const LABEL: &str = "LABEL";
    pub const CCD: &str = "CCD";
    pub const CAMERA: &str = "CAMERA";
    pub const OBJECT: &str = "OBJECT";
    pub const TELESCOP: &str = "TELESCOP";
    pub const INSTRUME: &str = "INSTRUME";
    pub const CREATOR: &str = "CREATOR";
    pub const TSTART: &str = "TSTART";
    pub const TSTOP: &str = "TSTOP";

    /// Every key the lookup layer resolves case-insensitively.
    pub const KNOWN: [&str; 16] = [
        MISSION, SECTOR, QUARTER, CAMPAIGN, FLUX_ORIGIN, NORMALIZED, TARGETID, LABEL, CCD,
        CAMERA, OBJECT, TELESCOP, INSTRUME, CREATOR, TSTART, TSTOP,
    ];

    /// The documented key matching `name` ignoring ASCII case, if any.
    pub fn canonical(name: &str) -> Option<&'static str> {
        KNOWN.iter().copied().find(|k| k.eq_ignore_ascii_case(name))
    }
}

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetaValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Float(v) => Some(*v),
            MetaValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Bool(v) => write!(f, "{v}"),
            MetaValue::Int(v) => write!(f, "{v}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        MetaValue::Int(i64::from(v))
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

/// Ordered, case-sensitive metadata map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meta(BTreeMap<String, MetaValue>);

impl Meta {
    pub fn new() -> Self {
        Meta(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` only when `NORMALIZED` is present and set to `true`.
    pub fn is_normalized(&self) -> bool {
        self.get(keys::NORMALIZED).and_then(MetaValue::as_bool).unwrap_or(false)
    }

    /// Exact-case hit first, then the documented key matching `name`.
    ///
    /// Returns the key actually stored in the map together with its value.
    pub fn resolve(&self, name: &str) -> Option<(&str, &MetaValue)> {
        if let Some((k, v)) = self.0.get_key_value(name) {
            return Some((k.as_str(), v));
        }
        let canonical = keys::canonical(name)?;
        self.0.get_key_value(canonical).map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, MetaValue)> for Meta {
    fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
        Meta(iter.into_iter().collect())
    }
}
