//! Observer location from a GeoJSON point source.
//!
//! Accepts a `FeatureCollection`, a single `Feature`, or a bare `Point` /
//! `MultiPoint` geometry. The first feature with a point geometry wins;
//! features with no geometry or another geometry type are skipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{AlmanacError, Result};

/// Observer position in decimal degrees (X = longitude, Y = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObserverPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl ObserverPoint {
    pub fn new(longitude: f64, latitude: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self { longitude, latitude })
    }
}

/// "longitude, latitude", the order the report header uses.
impl fmt::Display for ObserverPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.longitude, self.latitude)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection { features: Vec<Feature> },
    Feature {
        #[serde(default)]
        geometry: Option<Geometry>,
    },
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
}

impl Geometry {
    fn first_position(&self) -> Option<&[f64]> {
        match self {
            Geometry::Point { coordinates } => Some(coordinates),
            Geometry::MultiPoint { coordinates } => coordinates.first().map(Vec::as_slice),
            Geometry::Other => None,
        }
    }
}

fn to_point(position: &[f64]) -> Option<ObserverPoint> {
    match position {
        [x, y, ..] => ObserverPoint::new(*x, *y),
        _ => None,
    }
}

fn first_point(doc: &Document) -> Option<ObserverPoint> {
    match doc {
        Document::FeatureCollection { features } => features
            .iter()
            .filter_map(|f| f.geometry.as_ref()?.first_position())
            .find_map(to_point),
        Document::Feature { geometry } => geometry.as_ref()?.first_position().and_then(to_point),
        Document::Point { coordinates } => to_point(coordinates),
        Document::MultiPoint { coordinates } => coordinates.first().and_then(|p| to_point(p)),
    }
}

/// Read the observer location from the first point feature in `path`.
pub fn read_first_point(path: &Path) -> Result<ObserverPoint> {
    let source_error = |message: String| AlmanacError::FeatureSource {
        path: path.to_path_buf(),
        message,
    };

    let text = fs::read_to_string(path).map_err(|e| source_error(e.to_string()))?;
    let doc: Document = serde_json::from_str(&text).map_err(|e| source_error(e.to_string()))?;

    let point = first_point(&doc).ok_or_else(|| AlmanacError::NoCoordinateFeature(path.to_path_buf()))?;
    debug!(path = %path.display(), %point, "observer point");
    Ok(point)
}
