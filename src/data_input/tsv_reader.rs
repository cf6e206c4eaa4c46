// src/data_input/tsv_reader.rs

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use ndarray::{Array2, Array3};
use tracing::{debug, info, warn};

use crate::axis_names::AXIS_COUNT;
use crate::constants::{
    COORDINATES_PER_MARKER, HEADER_TRIGGER, METADATA_KEY_FRAMES, METADATA_KEY_MARKERS,
    NON_COORDINATE_COLUMNS,
};
use crate::data_input::capture::{CaptureMetadata, MotionCapture};
use crate::error::{MocapError, MocapResult};

/// Parses a motion-capture TSV export.
///
/// Layout:
/// ```text
/// NO_OF_FRAMES<TAB>16722
/// FREQUENCY<TAB>100
/// Frame<TAB>Time<TAB>M1 X<TAB>M1 Y<TAB>M1 Z<TAB>M2 X ...
/// 0<TAB>0.000<TAB>123.4<TAB>56.7<TAB>89.0 ...
/// ```
///
/// Lines above the `Frame<TAB>` header become metadata (first two fields,
/// verbatim). Every following line is one frame. A row too short to carry a
/// marker's three coordinates leaves that marker at 0.0 and flags it in
/// [`MotionCapture::missing`].
///
/// Returns `FileNotFound` for a missing path and `MalformedHeader` when the
/// header line never appears.
pub fn read_capture(input_file_path: &Path) -> MocapResult<MotionCapture> {
    let file = File::open(input_file_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MocapError::FileNotFound {
            path: input_file_path.to_path_buf(),
        },
        _ => MocapError::Io(e),
    })?;
    let capture = read_capture_from(BufReader::new(file), input_file_path)?;

    info!(
        "Loaded {} frames with {} markers from {}",
        capture.num_frames(),
        capture.num_markers(),
        input_file_path.display()
    );
    Ok(capture)
}

/// Same as [`read_capture`] over any buffered source; `source` is only used
/// in error messages.
pub fn read_capture_from<R: BufRead>(mut reader: R, source: &Path) -> MocapResult<MotionCapture> {
    // --- Metadata Extraction ---
    let mut metadata = CaptureMetadata::new();
    let mut header_line: Option<String> = None;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.starts_with(HEADER_TRIGGER) {
            header_line = Some(line.clone());
            break;
        }
        parse_metadata_line(&line, &mut metadata);
    }

    let header_line = header_line.ok_or_else(|| MocapError::MalformedHeader {
        path: source.to_path_buf(),
    })?;
    debug!("Extracted {} metadata entries", metadata.len());

    let marker_names = parse_marker_names(&header_line);
    debug!("Markers found in header: {:?}", marker_names);

    // --- Data Reading and Storage ---
    let records = read_data_records(reader)?;
    let (frames, missing) = fill_frame_tensor(&records, marker_names.len())?;

    let capture = MotionCapture {
        metadata,
        marker_names,
        frames,
        missing,
    };

    check_declared_count(&capture.metadata, METADATA_KEY_FRAMES, capture.num_frames(), source);
    check_declared_count(&capture.metadata, METADATA_KEY_MARKERS, capture.num_markers(), source);

    let filled = capture.missing_sample_count();
    if filled > 0 {
        warn!(
            "{}: {} marker samples were missing from short rows and set to 0.0",
            source.display(),
            filled
        );
    }
    Ok(capture)
}

/// Stores `KEY<TAB>VALUE` lines; lines with fewer than two fields are ignored.
fn parse_metadata_line(line: &str, metadata: &mut CaptureMetadata) {
    let mut parts = line.trim().split('\t');
    if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
        metadata.insert(key, value);
    }
}

/// Warns when a count declared in the metadata block disagrees with the data.
fn check_declared_count(metadata: &CaptureMetadata, key: &str, actual: usize, source: &Path) {
    let Some(declared) = metadata.get(key).and_then(|v| v.trim().parse::<usize>().ok()) else {
        return;
    };
    if declared != actual {
        warn!(
            "{}: {} says {} but {} were read",
            source.display(),
            key,
            declared,
            actual
        );
    }
}

/// Extracts distinct marker labels, in first-appearance order, from the
/// `Frame<TAB>Time<TAB>Label X<TAB>Label Y ...` header.
pub fn parse_marker_names(header_line: &str) -> Vec<String> {
    let mut marker_names: Vec<String> = Vec::new();
    for column in header_line
        .trim()
        .split('\t')
        .skip(NON_COORDINATE_COLUMNS)
    {
        // Strip the trailing " X" / " Y" / " Z" suffix.
        let label = column
            .rsplit_once(' ')
            .map(|(label, _axis)| label)
            .unwrap_or(column);
        if !marker_names.iter().any(|existing| existing == label) {
            marker_names.push(label.to_string());
        }
    }
    marker_names
}

/// One record per line after the header. Blank lines, which the csv reader
/// skips, come back as empty records so they still count as (zero-filled)
/// frames.
fn read_data_records<R: Read>(mut reader: R) -> MocapResult<Vec<StringRecord>> {
    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    let line_count = body.lines().count();

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut records = vec![StringRecord::new(); line_count];
    for result in rdr.records() {
        let record = result?;
        // Positions count lines from 1.
        let line_idx = record
            .position()
            .map_or(0, |pos| pos.line().saturating_sub(1) as usize);
        if let Some(slot) = records.get_mut(line_idx) {
            *slot = record;
        }
    }

    let blank = records.iter().filter(|record| record.is_empty()).count();
    if blank > 0 {
        debug!("{} blank data lines kept as zero-filled frames", blank);
    }
    Ok(records)
}

/// Number of fields once trailing empty fields are dropped.
fn effective_len(record: &StringRecord) -> usize {
    (0..record.len())
        .rev()
        .find(|&i| !record[i].is_empty())
        .map_or(0, |last| last + 1)
}

fn fill_frame_tensor(
    records: &[StringRecord],
    num_markers: usize,
) -> MocapResult<(Array3<f64>, Array2<bool>)> {
    let mut frames = Array3::<f64>::zeros((records.len(), num_markers, AXIS_COUNT));
    let mut missing = Array2::<bool>::from_elem((records.len(), num_markers), false);

    for (frame_idx, record) in records.iter().enumerate() {
        let available = effective_len(record).saturating_sub(NON_COORDINATE_COLUMNS);

        for marker_idx in 0..num_markers {
            let first = marker_idx * COORDINATES_PER_MARKER;
            if first + COORDINATES_PER_MARKER > available {
                missing[[frame_idx, marker_idx]] = true;
                continue;
            }
            for axis in 0..AXIS_COUNT {
                let column = NON_COORDINATE_COLUMNS + first + axis;
                let raw = record.get(column).unwrap_or("");
                frames[[frame_idx, marker_idx, axis]] =
                    raw.parse::<f64>().map_err(|_| MocapError::InvalidValue {
                        row: frame_idx + 1,
                        column,
                        value: raw.to_string(),
                    })?;
            }
        }
    }
    Ok((frames, missing))
}
