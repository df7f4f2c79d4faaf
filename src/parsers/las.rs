//! LAS (Log ASCII Standard) well-log file parser.
//!
//! Handles LAS 1.2 and 2.0 files as written by logging contractors and
//! exported by interpretation packages:
//! - `~V` version section (`VERS`, `WRAP`)
//! - `~W` well section (`WELL`, `NULL`, `STRT`, `STOP`, `STEP`, ...)
//! - `~C` curve definitions, one line per curve in column order
//! - `~P` parameters, `~O` free text (ignored)
//! - `~A` numeric data, one depth step per line (or spread over several
//!   lines when `WRAP` is `YES`)

use rayon::prelude::*;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::types::{Curve, HeaderItem, LoadError, Parseable, WellLog, DEFAULT_NULL_VALUE};

/// `MNEM.UNIT <rest>`: the unit is everything between the first period and
/// the first whitespace after it
static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<mnem>[^.]*)\.(?<unit>\S*)(?<rest>.*)$").expect("valid header regex")
});

/// LAS header sections, keyed by the letter after `~`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Version,
    Well,
    Curve,
    Parameter,
    Other,
    Ascii,
    Unknown,
}

impl Section {
    fn from_marker(line: &str) -> Self {
        match line[1..].chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('V') => Section::Version,
            Some('W') => Section::Well,
            Some('C') => Section::Curve,
            Some('P') => Section::Parameter,
            Some('O') => Section::Other,
            Some('A') => Section::Ascii,
            _ => Section::Unknown,
        }
    }
}

/// LAS file parser
pub struct Las;

impl Las {
    /// Detect if file contents look like a LAS file (first real line is `~V...`)
    pub fn detect(contents: &str) -> bool {
        contents
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .and_then(|line| line.get(..2))
            .map(|prefix| prefix.eq_ignore_ascii_case("~v"))
            .unwrap_or(false)
    }

    /// Text of a LAS file. Files are frequently Latin-1, so invalid UTF-8 is
    /// replaced rather than rejected; valid files are borrowed as they are.
    pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
        String::from_utf8_lossy(bytes)
    }

    /// Split a header line into mnemonic, unit, value and description.
    ///
    /// The description is whatever follows the last colon, so values such as
    /// `13:45` survive intact.
    fn parse_header_line(line: &str) -> Option<HeaderItem> {
        let captures = HEADER_LINE.captures(line)?;
        let rest = &captures["rest"];
        let (value, description) = match rest.rfind(':') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };

        Some(HeaderItem {
            mnemonic: captures["mnem"].trim().to_string(),
            unit: captures["unit"].trim().to_string(),
            value: value.trim().to_string(),
            description: description.trim().to_string(),
        })
    }

    /// Tokenise one data line into numbers (whitespace or comma separated)
    fn tokenize_line(line_no: usize, line: &str) -> Result<Vec<f64>, LoadError> {
        line.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|_| LoadError::BadNumber {
                    line: line_no,
                    token: token.to_string(),
                })
            })
            .collect()
    }

    /// LAS 1.2 writes `~Well` lines as `MNEM.UNIT DESCRIPTION : VALUE`,
    /// except for the depth and null items
    fn swap_legacy_well_items(items: &mut [HeaderItem]) {
        for item in items.iter_mut() {
            let upper = item.mnemonic.to_ascii_uppercase();
            if matches!(upper.as_str(), "STRT" | "STOP" | "STEP" | "NULL") {
                continue;
            }
            // The value itself may hold colons (`LOG DATE: 13:45 12-DEC-86`),
            // so the split belongs at the first one
            let (description, value) = match item.value.split_once(':') {
                Some((description, head)) if !item.description.is_empty() => (
                    description.trim().to_string(),
                    format!("{}:{}", head.trim(), item.description),
                ),
                Some((description, head)) => {
                    (description.trim().to_string(), head.trim().to_string())
                }
                None => (item.value.clone(), item.description.clone()),
            };
            item.description = description;
            item.value = value;
        }
    }

    /// Make mnemonics unique in file order: the second `GR` becomes `GR:1`,
    /// the third `GR:2`, and so on. Blank mnemonics become `UNKNOWN`.
    fn unique_mnemonics(defs: &[HeaderItem]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        defs.iter()
            .map(|def| {
                let base = if def.mnemonic.is_empty() {
                    "UNKNOWN".to_string()
                } else {
                    def.mnemonic.clone()
                };
                let count = seen.entry(base.clone()).or_insert(0);
                let name = if *count == 0 {
                    base
                } else {
                    format!("{}:{}", base, count)
                };
                *count += 1;
                name
            })
            .collect()
    }
}

impl Parseable for Las {
    fn parse(&self, file_contents: &str) -> Result<WellLog, LoadError> {
        if file_contents.trim().is_empty() {
            return Err(LoadError::Empty);
        }

        let mut log = WellLog::default();
        let mut curve_defs: Vec<HeaderItem> = Vec::new();
        let mut data_lines: Vec<(usize, &str)> = Vec::new();

        let mut section: Option<Section> = None;
        let mut seen_version = false;
        let mut seen_curve = false;
        let mut seen_ascii = false;

        for (idx, raw_line) in file_contents.lines().enumerate() {
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('~') {
                let next = Section::from_marker(line);
                match next {
                    Section::Version => seen_version = true,
                    Section::Curve => seen_curve = true,
                    Section::Ascii => seen_ascii = true,
                    _ => {}
                }
                section = Some(next);
                continue;
            }

            match section {
                Some(Section::Ascii) => data_lines.push((idx + 1, line)),
                Some(Section::Version) | Some(Section::Well) | Some(Section::Curve)
                | Some(Section::Parameter) => {
                    let Some(item) = Self::parse_header_line(line) else {
                        tracing::warn!("Skipping malformed header line {}: {}", idx + 1, line);
                        continue;
                    };
                    match section {
                        Some(Section::Version) => match item.mnemonic.to_ascii_uppercase().as_str() {
                            "VERS" => log.version = item.value,
                            "WRAP" => log.wrapped = item.value.eq_ignore_ascii_case("YES"),
                            _ => {}
                        },
                        Some(Section::Well) => log.well_items.push(item),
                        Some(Section::Curve) => curve_defs.push(item),
                        _ => log.parameters.push(item),
                    }
                }
                // ~Other is free text; anything before the first section is noise
                _ => {}
            }
        }

        if !seen_version {
            tracing::warn!("LAS file has no ~Version section, assuming 2.0 unwrapped");
        }
        if !seen_curve {
            return Err(LoadError::MissingSection("Curve"));
        }
        if !seen_ascii {
            return Err(LoadError::MissingSection("ASCII"));
        }
        if curve_defs.is_empty() {
            return Err(LoadError::NoCurves);
        }

        if log.version.trim_start().starts_with("1.") {
            Self::swap_legacy_well_items(&mut log.well_items);
        }

        let null_value = log
            .well_item("NULL")
            .and_then(HeaderItem::value_f64)
            .unwrap_or(DEFAULT_NULL_VALUE);

        // Tokenise in parallel, then read the stream row-major. Wrapped and
        // unwrapped files differ only in where the line breaks fall.
        let rows: Vec<Vec<f64>> = data_lines
            .par_iter()
            .map(|(line_no, line)| Self::tokenize_line(*line_no, line))
            .collect::<Result<Vec<_>, _>>()?;
        let values: Vec<f64> = rows
            .into_iter()
            .flatten()
            .map(|v| if v == null_value { f64::NAN } else { v })
            .collect();

        let curve_count = curve_defs.len();
        if values.len() % curve_count != 0 {
            return Err(LoadError::RaggedData {
                values: values.len(),
                curves: curve_count,
            });
        }
        let row_count = values.len() / curve_count;

        let names = Self::unique_mnemonics(&curve_defs);
        log.curves = curve_defs
            .into_iter()
            .zip(names)
            .enumerate()
            .map(|(col, (def, name))| {
                let samples = (0..row_count)
                    .map(|row| values[row * curve_count + col])
                    .collect();
                Curve::new(name, def.unit, def.description, samples)
            })
            .collect();

        tracing::info!(
            "Parsed LAS log (version {}): {} curves, {} samples",
            if log.version.is_empty() { "?" } else { &log.version },
            log.curves.len(),
            row_count
        );

        Ok(log)
    }
}
