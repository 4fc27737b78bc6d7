//! Tolerant decoder for the Life RLE pattern format.
//!
//! ```text
//! #N Glider
//! x = 3, y = 3, rule = B3/S23
//! bo$2bo$3o!
//! ```
//!
//! Unrecognised characters are skipped rather than rejected, so odd or
//! partially damaged files still load as much as can be read. The only
//! failure is a source that cannot be read at all.

use crate::grid::Grid;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Where and how a decoded pattern is placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub offset_x: i64,
    pub offset_y: i64,
    /// Clear the whole grid before placing any cell
    pub clear_before: bool,
}

impl Placement {
    pub fn at(offset_x: i64, offset_y: i64) -> Self {
        Self {
            offset_x,
            offset_y,
            clear_before: false,
        }
    }

    pub fn clearing(mut self) -> Self {
        self.clear_before = true;
        self
    }
}

/// Errors raised while loading a pattern
#[derive(Debug)]
pub enum PatternLoadError {
    /// The source could not be opened or read; the grid was not modified
    SourceUnavailable { source_name: String, reason: io::Error },
}

impl PatternLoadError {
    pub fn unavailable(source_name: impl Into<String>, reason: io::Error) -> Self {
        PatternLoadError::SourceUnavailable {
            source_name: source_name.into(),
            reason,
        }
    }
}

impl fmt::Display for PatternLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternLoadError::SourceUnavailable { source_name, reason } => {
                write!(f, "Error loading rle: {}: {}", source_name, reason)
            }
        }
    }
}

impl Error for PatternLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PatternLoadError::SourceUnavailable { reason, .. } => Some(reason),
        }
    }
}

/// Parsed `x = <w>, y = <h>[, rule = <r>]` header line.
///
/// The declared size is informational only and never used to clip placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RleHeader {
    pub width: i64,
    pub height: i64,
    pub rule: Option<String>,
}

impl RleHeader {
    /// Parse the fields of a header line, `None` when x or y is missing or not a number
    fn parse(line: &str) -> Option<Self> {
        let mut width = None;
        let mut height = None;
        let mut rule = None;

        for field in line.split(',') {
            let Some((key, value)) = field.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "x" => width = value.parse().ok(),
                "y" => height = value.parse().ok(),
                "rule" => rule = Some(value.to_string()),
                _ => {}
            }
        }

        Some(Self {
            width: width?,
            height: height?,
            rule,
        })
    }
}

/// Horizontal run of live cells in pattern-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRun {
    pub x: u64,
    pub y: u64,
    pub len: u64,
}

/// A decoded pattern, not yet placed on any grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RlePattern {
    header: Option<RleHeader>,
    runs: Vec<LiveRun>,
}

fn is_comment(line: &[u8]) -> bool {
    line.trim_ascii_start().first() == Some(&b'#')
}

fn is_header(line: &[u8]) -> bool {
    let line = line.trim_ascii();
    line.first() == Some(&b'x') && line.contains(&b'=')
}

impl RlePattern {
    /// Decode pattern text
    pub fn parse(text: &str) -> Self {
        Self::parse_bytes(text.as_bytes())
    }

    /// Decode raw bytes; bytes that are not part of the grammar are ignored
    pub fn parse_bytes(data: &[u8]) -> Self {
        let mut lines = data
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !is_comment(line))
            .skip_while(|line| line.trim_ascii().is_empty())
            .peekable();

        let header = match lines.peek() {
            Some(line) if is_header(line) => {
                let parsed = RleHeader::parse(&String::from_utf8_lossy(line));
                lines.next();
                parsed
            }
            _ => None,
        };

        let mut runs = Vec::new();
        let mut cur_x: u64 = 0;
        let mut cur_y: u64 = 0;
        let mut run: u64 = 0;

        'lines: for line in lines {
            for &b in line {
                match b {
                    b'0'..=b'9' => {
                        run = run.saturating_mul(10).saturating_add(u64::from(b - b'0'));
                    }
                    b'o' | b'O' => {
                        let len = run.max(1);
                        runs.push(LiveRun { x: cur_x, y: cur_y, len });
                        cur_x = cur_x.saturating_add(len);
                        run = 0;
                    }
                    b'b' | b'.' => {
                        cur_x = cur_x.saturating_add(run.max(1));
                        run = 0;
                    }
                    b'$' => {
                        cur_y = cur_y.saturating_add(run.max(1));
                        cur_x = 0;
                        run = 0;
                    }
                    b'!' => break 'lines,
                    _ => {}
                }
            }
        }

        Self { header, runs }
    }

    /// Read a whole source and decode it
    pub fn read_from<R: Read>(mut source: R) -> io::Result<Self> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        Ok(Self::parse_bytes(&data))
    }

    pub fn header(&self) -> Option<&RleHeader> {
        self.header.as_ref()
    }

    pub fn runs(&self) -> &[LiveRun] {
        &self.runs
    }

    /// Number of live cells in the pattern
    pub fn population(&self) -> u64 {
        self.runs.iter().fold(0u64, |acc, r| acc.saturating_add(r.len))
    }

    /// Width and height of the live area, `None` for an empty pattern
    pub fn bounding_box(&self) -> Option<(u64, u64)> {
        let width = self.runs.iter().map(|r| r.x.saturating_add(r.len)).max()?;
        let height = self.runs.iter().map(|r| r.y.saturating_add(1)).max()?;
        Some((width, height))
    }

    /// Write the pattern's live cells into the grid.
    /// Cells falling outside the grid are dropped. Returns how many cells landed.
    pub fn stamp(&self, grid: &mut Grid, placement: Placement) -> usize {
        if placement.clear_before {
            grid.clear();
        }

        let to_i64 = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
        self.runs
            .iter()
            .map(|r| {
                grid.fill_run(
                    placement.offset_x.saturating_add(to_i64(r.x)),
                    placement.offset_y.saturating_add(to_i64(r.y)),
                    r.len,
                )
            })
            .sum()
    }
}

/// Decode a pattern from a named source and place it on the grid.
///
/// The source is read completely before the grid is touched, so a read
/// failure leaves the grid exactly as it was.
pub fn load_named<R: Read>(
    source_name: &str,
    source: R,
    placement: Placement,
    grid: &mut Grid,
) -> Result<(), PatternLoadError> {
    let pattern = RlePattern::read_from(source).map_err(|e| {
        warn!("Error loading rle: {}: {}", source_name, e);
        PatternLoadError::unavailable(source_name, e)
    })?;

    let placed = pattern.stamp(grid, placement);
    info!(
        "Loaded RLE: '{}' ({} of {} cells placed)",
        source_name,
        placed,
        pattern.population()
    );
    Ok(())
}

/// Decode a pattern from any reader and place it on the grid
pub fn load_pattern<R: Read>(
    source: R,
    placement: Placement,
    grid: &mut Grid,
) -> Result<(), PatternLoadError> {
    load_named("<input>", source, placement, grid)
}

/// Decode a pattern file and place it on the grid
pub fn load_pattern_file(
    path: &Path,
    placement: Placement,
    grid: &mut Grid,
) -> Result<(), PatternLoadError> {
    let name = path.display().to_string();
    let file = File::open(path).map_err(|e| {
        warn!("Error loading rle: {}: {}", name, e);
        PatternLoadError::unavailable(name.as_str(), e)
    })?;
    load_named(&name, file, placement, grid)
}
