// src/data_input/angle_export.rs

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::ANGLES_JSON_SUFFIX;
use crate::data_analysis::joint_angles::{FrameRange, JointAngles, SideAngles};
use crate::data_analysis::statistics::SeriesStatistics;
use crate::data_input::capture::CaptureMetadata;
use crate::error::{MocapError, MocapResult};

/// Frame window an export was restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRangeInfo {
    pub start_frame: usize,
    pub end_frame: usize,
    pub total_frames: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub frequency: f64,
    pub num_frames: usize,
    pub source_metadata: CaptureMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_range: Option<FrameRangeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RightAngleSeries {
    pub qr1: Vec<f64>,
    pub qr2: Vec<f64>,
    pub qr3: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeftAngleSeries {
    pub ql1: Vec<f64>,
    pub ql2: Vec<f64>,
    pub ql3: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSeries {
    pub right: RightAngleSeries,
    pub left: LeftAngleSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RightStatistics {
    pub qr1: Option<SeriesStatistics>,
    pub qr2: Option<SeriesStatistics>,
    pub qr3: Option<SeriesStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeftStatistics {
    pub ql1: Option<SeriesStatistics>,
    pub ql2: Option<SeriesStatistics>,
    pub ql3: Option<SeriesStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleStatistics {
    pub right: RightStatistics,
    pub left: LeftStatistics,
}

/// On-disk JSON form of a joint-angle computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnglesDocument {
    pub metadata: ExportMetadata,
    pub angles: AngleSeries,
    pub statistics: AngleStatistics,
}

impl AnglesDocument {
    /// Builds the document for `angles`, optionally restricted to `range`.
    pub fn new(
        angles: &JointAngles,
        frequency_hz: f64,
        source_metadata: &CaptureMetadata,
        range: FrameRange,
    ) -> Self {
        let total_frames = angles.num_frames();
        let (start, end) = range.resolve(total_frames);
        let angles = angles.slice_frames(range);
        let frame_range = (!range.is_full()).then_some(FrameRangeInfo {
            start_frame: start,
            end_frame: end,
            total_frames,
        });

        let stats = |series: &Array1<f64>| SeriesStatistics::from_series(series);
        Self {
            metadata: ExportMetadata {
                frequency: frequency_hz,
                num_frames: angles.num_frames(),
                source_metadata: source_metadata.clone(),
                frame_range,
            },
            angles: AngleSeries {
                right: RightAngleSeries {
                    qr1: angles.qr1().to_vec(),
                    qr2: angles.qr2().to_vec(),
                    qr3: angles.qr3().to_vec(),
                },
                left: LeftAngleSeries {
                    ql1: angles.ql1().to_vec(),
                    ql2: angles.ql2().to_vec(),
                    ql3: angles.ql3().to_vec(),
                },
            },
            statistics: AngleStatistics {
                right: RightStatistics {
                    qr1: stats(angles.qr1()),
                    qr2: stats(angles.qr2()),
                    qr3: stats(angles.qr3()),
                },
                left: LeftStatistics {
                    ql1: stats(angles.ql1()),
                    ql2: stats(angles.ql2()),
                    ql3: stats(angles.ql3()),
                },
            },
        }
    }

    /// The stored series as [`JointAngles`].
    pub fn joint_angles(&self) -> JointAngles {
        let right = &self.angles.right;
        let left = &self.angles.left;
        JointAngles {
            right: SideAngles {
                q1: Array1::from(right.qr1.clone()),
                q2: Array1::from(right.qr2.clone()),
                q3: Array1::from(right.qr3.clone()),
            },
            left: SideAngles {
                q1: Array1::from(left.ql1.clone()),
                q2: Array1::from(left.ql2.clone()),
                q3: Array1::from(left.ql3.clone()),
            },
        }
    }
}

/// `<dir>/<stem>_calculated_angles.json` for a capture file.
pub fn default_export_path(input_file: &Path, output_dir: &Path) -> PathBuf {
    let stem = input_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string());
    output_dir.join(format!("{stem}{ANGLES_JSON_SUFFIX}"))
}

/// Writes `document` as pretty-printed JSON, creating parent directories.
pub fn save_angles_json(path: &Path, document: &AnglesDocument) -> MocapResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Angles saved to {}", path.display());
    Ok(())
}

pub fn load_angles_json(path: &Path) -> MocapResult<AnglesDocument> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MocapError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => MocapError::Io(e),
    })?;
    let document = serde_json::from_reader(BufReader::new(file))?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_angles() -> JointAngles {
        JointAngles {
            right: SideAngles {
                q1: Array1::from(vec![10.0, 11.5, 12.25]),
                q2: Array1::from(vec![170.0, 160.1, 150.3]),
                q3: Array1::from(vec![1.0 / 3.0, 2.0, 3.0]),
            },
            left: SideAngles::zeros(3),
        }
    }

    #[test]
    fn test_document_layout() {
        let mut metadata = CaptureMetadata::new();
        metadata.insert("FREQUENCY", "100");
        let doc = AnglesDocument::new(&sample_angles(), 100.0, &metadata, FrameRange::default());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["metadata"]["num_frames"], 3);
        assert_eq!(value["metadata"]["source_metadata"]["FREQUENCY"], "100");
        assert!(value["metadata"].get("frame_range").is_none());
        assert_eq!(value["angles"]["right"]["qr1"][1], 11.5);
        assert_eq!(value["statistics"]["left"]["ql2"]["max"], 0.0);
    }

    #[test]
    fn test_frame_range_recorded() {
        let range = FrameRange::new(Some(1), Some(99));
        let doc = AnglesDocument::new(&sample_angles(), 100.0, &CaptureMetadata::new(), range);
        assert_eq!(
            doc.metadata.frame_range,
            Some(FrameRangeInfo {
                start_frame: 1,
                end_frame: 3,
                total_frames: 3
            })
        );
        assert_eq!(doc.angles.right.qr2, vec![160.1, 150.3]);
    }

    #[test]
    fn test_default_export_path() {
        assert_eq!(
            default_export_path(Path::new("data/Measurement1.tsv"), Path::new("out")),
            PathBuf::from("out/Measurement1_calculated_angles.json")
        );
    }
}
