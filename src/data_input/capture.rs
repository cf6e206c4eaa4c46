// src/data_input/capture.rs

use std::fmt;

use ndarray::{Array2, Array3, Axis};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{DEFAULT_FREQUENCY_HZ, METADATA_KEY_FREQUENCY};

/// Key/value pairs found above the column header line, kept verbatim and in
/// file order. A repeated key replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMetadata {
    entries: Vec<(String, String)>,
}

impl CaptureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sampling frequency in Hz, falling back to 100 Hz when `FREQUENCY` is
    /// absent or not a positive number.
    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz_or(DEFAULT_FREQUENCY_HZ)
    }

    /// Like [`frequency_hz`](Self::frequency_hz) with a caller-chosen fallback.
    pub fn frequency_hz_or(&self, fallback_hz: f64) -> f64 {
        self.get(METADATA_KEY_FREQUENCY)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(fallback_hz)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CaptureMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct CaptureMetadataVisitor;

impl<'de> Visitor<'de> for CaptureMetadataVisitor {
    type Value = CaptureMetadata;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of metadata strings")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut metadata = CaptureMetadata::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            metadata.insert(key, value);
        }
        Ok(metadata)
    }
}

impl<'de> Deserialize<'de> for CaptureMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CaptureMetadataVisitor)
    }
}

/// A parsed capture: metadata, marker labels and the (frame, marker, axis)
/// coordinate tensor in millimeters.
#[derive(Debug, Clone)]
pub struct MotionCapture {
    pub metadata: CaptureMetadata,
    /// Original marker labels, parallel to the marker axis of `frames`.
    pub marker_names: Vec<String>,
    /// Shape (frames, markers, 3).
    pub frames: Array3<f64>,
    /// Shape (frames, markers); `true` where a short row forced a zero fill.
    pub missing: Array2<bool>,
}

impl MotionCapture {
    pub fn num_frames(&self) -> usize {
        self.frames.len_of(Axis(0))
    }

    pub fn num_markers(&self) -> usize {
        self.frames.len_of(Axis(1))
    }

    pub fn frequency_hz(&self) -> f64 {
        self.metadata.frequency_hz()
    }

    pub fn missing_sample_count(&self) -> usize {
        self.missing.iter().filter(|&&m| m).count()
    }

    /// Mean position of every marker across all frames, shape (markers, 3).
    /// `None` when the capture holds no frames.
    pub fn mean_positions(&self) -> Option<Array2<f64>> {
        mean_positions(&self.frames)
    }
}

/// Per-marker mean over the frame axis of a (frame, marker, axis) tensor.
pub fn mean_positions(frames: &Array3<f64>) -> Option<Array2<f64>> {
    if frames.len_of(Axis(0)) == 0 {
        return None;
    }
    frames.mean_axis(Axis(0))
}
