//! Share arena layouts between runs as compact text strings.
//!
//! A layout string looks like `pursuit:v1:30x20:<payload>` where the payload
//! is the base64 encoding of a small JSON document carrying the cell size and
//! the blocked cells. The envelope keeps the dimensions readable so a string
//! can be sanity-checked at a glance before decoding.
#![allow(clippy::missing_errors_doc)]

use std::error::Error;
use std::fmt;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use grid_pursuit_core::CellCoord;
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "pursuit";
const SNAPSHOT_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Arena grid dimensions plus every blocked cell, ready for transport.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ArenaLayoutSnapshot {
    /// Number of columns in the arena grid.
    pub(crate) columns: u32,
    /// Number of rows in the arena grid.
    pub(crate) rows: u32,
    /// Side length of one square cell in world units.
    pub(crate) cell_size: f32,
    /// Cells blocked by obstacles, in any order.
    pub(crate) obstacles: Vec<CellCoord>,
}

/// JSON document carried inside the base64 payload segment.
#[derive(Debug, Deserialize, Serialize)]
struct SnapshotPayload {
    cell_size: f32,
    obstacles: Vec<CellCoord>,
}

impl ArenaLayoutSnapshot {
    /// Renders the snapshot as a transfer string.
    ///
    /// Obstacles are sorted before encoding so equal arenas always produce
    /// the same string regardless of insertion order.
    pub(crate) fn encode(&self) -> String {
        let mut obstacles = self.obstacles.clone();
        obstacles.sort_unstable();
        let payload = SnapshotPayload {
            cell_size: self.cell_size,
            obstacles,
        };
        let json = serde_json::to_string(&payload).expect("layout payload serializes to JSON");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!(
            "{SNAPSHOT_DOMAIN}{FIELD_DELIMITER}{SNAPSHOT_VERSION}{FIELD_DELIMITER}{columns}x{rows}{FIELD_DELIMITER}{encoded}",
            columns = self.columns,
            rows = self.rows,
        )
    }

    /// Parses a transfer string produced by [`ArenaLayoutSnapshot::encode`].
    pub(crate) fn decode(text: &str) -> Result<Self, ArenaTransferError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ArenaTransferError::EmptyText);
        }
        let mut segments = trimmed.split(FIELD_DELIMITER);
        let domain = segments
            .next()
            .ok_or(ArenaTransferError::MissingSegment("domain"))?;
        let version = segments
            .next()
            .ok_or(ArenaTransferError::MissingSegment("version"))?;
        let dimensions = segments
            .next()
            .ok_or(ArenaTransferError::MissingSegment("dimensions"))?;
        let payload = segments
            .next()
            .ok_or(ArenaTransferError::MissingSegment("payload"))?;
        if domain != SNAPSHOT_DOMAIN {
            return Err(ArenaTransferError::UnknownDomain(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(ArenaTransferError::UnsupportedVersion(version.to_owned()));
        }
        let (columns, rows) = parse_dimensions(dimensions)?;
        let raw = STANDARD_NO_PAD
            .decode(payload)
            .map_err(ArenaTransferError::InvalidEncoding)?;
        let payload: SnapshotPayload =
            serde_json::from_slice(&raw).map_err(ArenaTransferError::InvalidPayload)?;
        Ok(Self {
            columns,
            rows,
            cell_size: payload.cell_size,
            obstacles: payload.obstacles,
        })
    }
}

fn parse_dimensions(text: &str) -> Result<(u32, u32), ArenaTransferError> {
    let (columns, rows) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| ArenaTransferError::InvalidDimensions(text.to_owned()))?;
    let columns = columns
        .parse()
        .map_err(|_| ArenaTransferError::InvalidDimensions(text.to_owned()))?;
    let rows = rows
        .parse()
        .map_err(|_| ArenaTransferError::InvalidDimensions(text.to_owned()))?;
    Ok((columns, rows))
}

/// Reasons a transfer string can fail to decode.
#[derive(Debug)]
pub(crate) enum ArenaTransferError {
    /// The input was empty or whitespace.
    EmptyText,
    /// A segment of the colon-delimited envelope was absent.
    MissingSegment(&'static str),
    /// The leading domain tag named something other than a pursuit layout.
    UnknownDomain(String),
    /// The version tag names a format this build cannot read.
    UnsupportedVersion(String),
    /// The dimensions segment was not `<columns>x<rows>`.
    InvalidDimensions(String),
    /// The payload segment was not valid base64.
    InvalidEncoding(base64::DecodeError),
    /// The payload decoded to bytes that were not a layout document.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ArenaTransferError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(formatter, "layout string is empty"),
            Self::MissingSegment(segment) => {
                write!(formatter, "layout string is missing its {segment} segment")
            }
            Self::UnknownDomain(domain) => write!(
                formatter,
                "layout string starts with {domain:?} instead of {SNAPSHOT_DOMAIN:?}"
            ),
            Self::UnsupportedVersion(version) => {
                write!(formatter, "layout version {version:?} is not supported")
            }
            Self::InvalidDimensions(dimensions) => write!(
                formatter,
                "layout dimensions {dimensions:?} are not <columns>x<rows>"
            ),
            Self::InvalidEncoding(error) => {
                write!(formatter, "layout payload is not base64: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(formatter, "layout payload is not a layout document: {error}")
            }
        }
    }
}

impl Error for ArenaTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> ArenaLayoutSnapshot {
        ArenaLayoutSnapshot {
            columns: 30,
            rows: 20,
            cell_size: 40.0,
            obstacles: vec![
                CellCoord::new(12, 3),
                CellCoord::new(4, 17),
                CellCoord::new(4, 2),
            ],
        }
    }

    #[test]
    fn encode_produces_the_versioned_envelope() {
        let encoded = sample_snapshot().encode();
        assert!(
            encoded.starts_with("pursuit:v1:30x20:"),
            "unexpected envelope: {encoded}"
        );
    }

    #[test]
    fn snapshots_round_trip_with_sorted_obstacles() {
        let decoded = ArenaLayoutSnapshot::decode(&sample_snapshot().encode())
            .expect("round trip should decode");
        assert_eq!(decoded.columns, 30);
        assert_eq!(decoded.rows, 20);
        assert!((decoded.cell_size - 40.0).abs() < f32::EPSILON);
        assert_eq!(
            decoded.obstacles,
            vec![
                CellCoord::new(4, 2),
                CellCoord::new(4, 17),
                CellCoord::new(12, 3),
            ],
        );
    }

    #[test]
    fn an_empty_arena_round_trips() {
        let snapshot = ArenaLayoutSnapshot {
            columns: 8,
            rows: 5,
            cell_size: 32.0,
            obstacles: Vec::new(),
        };
        let decoded = ArenaLayoutSnapshot::decode(&snapshot.encode())
            .expect("an empty arena should decode");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn decode_rejects_foreign_domains() {
        let error =
            ArenaLayoutSnapshot::decode("snake:v1:4x4:AA").expect_err("domain should be checked");
        assert!(matches!(error, ArenaTransferError::UnknownDomain(domain) if domain == "snake"));
    }

    #[test]
    fn decode_rejects_future_versions() {
        let error = ArenaLayoutSnapshot::decode("pursuit:v9:4x4:AA")
            .expect_err("version should be checked");
        assert!(
            matches!(error, ArenaTransferError::UnsupportedVersion(version) if version == "v9")
        );
    }

    #[test]
    fn decode_rejects_malformed_dimensions() {
        let error = ArenaLayoutSnapshot::decode("pursuit:v1:4by4:AA")
            .expect_err("dimensions should be checked");
        assert!(matches!(error, ArenaTransferError::InvalidDimensions(text) if text == "4by4"));
    }

    #[test]
    fn decode_rejects_truncated_envelopes() {
        let error =
            ArenaLayoutSnapshot::decode("pursuit:v1").expect_err("truncation should be caught");
        assert!(matches!(
            error,
            ArenaTransferError::MissingSegment("dimensions")
        ));
        let blank = ArenaLayoutSnapshot::decode("   ").expect_err("blank input should be caught");
        assert!(matches!(blank, ArenaTransferError::EmptyText));
    }
}
