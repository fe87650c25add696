//! Evaluation of `NameStep` chains.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::HarvestError;
use crate::rules::NameStep;

lazy_static! {
    static ref COUNT_PREFIX: Regex = Regex::new(r"(?i)\d+\s+components").unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"\s*\(.*?\)").unwrap();
    static ref SYMBOLS: Regex = Regex::new(r"[^\w\s-]").unwrap();
}

/// A step chain whose step could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMismatch {
    pub step: &'static str,
}

#[derive(Debug, Clone)]
enum CompiledStep {
    Plain(NameStep),
    Capture(Regex),
}

/// `NameStep`s with their regexes compiled once per rule.
#[derive(Debug, Clone, Default)]
pub struct NamePipeline {
    steps: Vec<CompiledStep>,
}

impl NamePipeline {
    pub fn compile(library: &str, steps: &[NameStep]) -> Result<Self, HarvestError> {
        let steps = steps
            .iter()
            .map(|step| match step {
                NameStep::Capture { pattern } => Regex::new(pattern)
                    .map(CompiledStep::Capture)
                    .map_err(|e| HarvestError::invalid_rule(library, format!("pattern {pattern:?}: {e}"))),
                other => Ok(CompiledStep::Plain(other.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn apply(&self, input: &str) -> Result<String, StepMismatch> {
        let mut value = input.to_string();
        for step in &self.steps {
            value = match step {
                CompiledStep::Capture(re) => {
                    let caps = re.captures(&value).ok_or(StepMismatch { step: "capture" })?;
                    caps.get(1)
                        .or_else(|| caps.get(0))
                        .map(|m| m.as_str().to_string())
                        .ok_or(StepMismatch { step: "capture" })?
                }
                CompiledStep::Plain(step) => apply_plain(step, &value)?,
            };
        }
        Ok(value)
    }
}

fn apply_plain(step: &NameStep, value: &str) -> Result<String, StepMismatch> {
    Ok(match step {
        NameStep::StripCountPrefix   => COUNT_PREFIX.replace_all(value, "").into_owned(),
        NameStep::StripParenthetical => PARENTHETICAL.replacen(value, 1, "").into_owned(),
        NameStep::SplitCamelCase     => split_camel_case(value),
        NameStep::StripSymbols       => SYMBOLS.replace_all(value, "").into_owned(),
        NameStep::StripSuffix { suffix } => strip_suffix_ci(value.trim_end(), suffix).to_string(),
        NameStep::After { marker } => {
            let (_, rest) = value.split_once(marker.as_str()).ok_or(StepMismatch { step: "after" })?;
            let segment = rest.split(['/', '?', '#']).next().unwrap_or_default();
            if segment.is_empty() {
                return Err(StepMismatch { step: "after" });
            }
            segment.to_string()
        }
        NameStep::Segment { from_end } => {
            path_segments(value)
                .into_iter()
                .rev()
                .nth(*from_end)
                .ok_or(StepMismatch { step: "segment" })?
        }
        NameStep::SlugToTitle => slug_to_title(value),
        // Compiled into CompiledStep::Capture; never reaches here.
        NameStep::Capture { .. } => return Err(StepMismatch { step: "capture" }),
    })
}

/// Insert a space at each lower-to-upper boundary, and before the last
/// capital of an acronym that starts a new word ("QRCode" -> "QR Code").
pub fn split_camel_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

/// "date-picker" / "date_picker" -> "Date Picker".
pub fn slug_to_title(slug: &str) -> String {
    slug.trim_matches('/')
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_suffix_ci<'a>(value: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() || value.len() < suffix.len() {
        return value;
    }
    let cut = value.len() - suffix.len();
    match (value.get(cut..), value.get(..cut)) {
        (Some(tail), Some(head)) if tail.eq_ignore_ascii_case(suffix) => head,
        _ => value,
    }
}

/// Non-empty path segments of a URL (or of a bare path).
fn path_segments(value: &str) -> Vec<String> {
    let path = match url::Url::parse(value) {
        Ok(u) => u.path().to_string(),
        Err(_) => value.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect()
}
