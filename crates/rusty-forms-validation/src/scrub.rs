//! Scrub pipeline
//!
//! Named string normalizations applied, in order, to raw input before a field
//! validates it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

// Three or more line breaks collapse to two, i.e. at most one blank line survives.
static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\r?\n)(\r?\n)(?:\r?\n)+").unwrap());

/// A single named transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scrub {
    Strip,
    Upcase,
    Downcase,
    Squeeze,
    SqueezeLines,
}

impl Scrub {
    pub const ALL: [Scrub; 5] = [
        Scrub::Strip,
        Scrub::Upcase,
        Scrub::Downcase,
        Scrub::Squeeze,
        Scrub::SqueezeLines,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scrub::Strip => "strip",
            Scrub::Upcase => "upcase",
            Scrub::Downcase => "downcase",
            Scrub::Squeeze => "squeeze",
            Scrub::SqueezeLines => "squeeze_lines",
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            Scrub::Strip => input.trim().to_string(),
            Scrub::Upcase => input.to_uppercase(),
            Scrub::Downcase => input.to_lowercase(),
            Scrub::Squeeze => SPACE_RUNS.replace_all(input, " ").into_owned(),
            Scrub::SqueezeLines => BLANK_LINE_RUNS.replace_all(input, "$1$2").into_owned(),
        }
    }
}

impl fmt::Display for Scrub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a transform name outside the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScrub(pub String);

impl fmt::Display for UnknownScrub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scrub method: {}", self.0)
    }
}

impl std::error::Error for UnknownScrub {}

impl FromStr for Scrub {
    type Err = UnknownScrub;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scrub::ALL
            .into_iter()
            .find(|scrub| scrub.name() == s)
            .ok_or_else(|| UnknownScrub(s.to_string()))
    }
}

/// Folds the transforms left to right over `input`.
pub fn scrub(input: &str, pipeline: &[Scrub]) -> String {
    pipeline
        .iter()
        .fold(input.to_string(), |value, step| step.apply(&value))
}

/// Parses a list of transform names, failing on the first unknown one.
pub fn parse_pipeline<I, S>(names: I) -> Result<Vec<Scrub>, UnknownScrub>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|name| name.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Scrub::Strip, "  hi there \n", "hi there")]
    #[case(Scrub::Upcase, "straße", "STRASSE")]
    #[case(Scrub::Downcase, "HeLLo", "hello")]
    #[case(Scrub::Squeeze, "a   b  c", "a b c")]
    #[case(Scrub::Squeeze, "a\t\tb", "a\t\tb")]
    #[case(Scrub::SqueezeLines, "a\n\n\n\nb", "a\n\nb")]
    #[case(Scrub::SqueezeLines, "a\r\n\r\n\r\nb", "a\r\n\r\nb")]
    #[case(Scrub::SqueezeLines, "a\n\nb", "a\n\nb")]
    fn test_single_transform(#[case] scrub: Scrub, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(scrub.apply(input), expected);
    }

    #[test]
    fn test_pipeline_runs_in_order() {
        let pipeline = [Scrub::Strip, Scrub::Upcase];
        let once = scrub(" word \n\n", &pipeline);

        assert_eq!(once, "WORD");
        assert_eq!(scrub(&once, &pipeline), once);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        assert_eq!(scrub("  keep  ", &[]), "  keep  ");
    }

    #[test]
    fn test_parse_pipeline() {
        assert_eq!(
            parse_pipeline(["strip", "squeeze_lines"]).unwrap(),
            vec![Scrub::Strip, Scrub::SqueezeLines]
        );

        let err = parse_pipeline(["strip", "reverse"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown scrub method: reverse");
    }

    #[test]
    fn test_deserialize_names() {
        let parsed: Vec<Scrub> = serde_json::from_str(r#"["strip","squeeze_lines"]"#).unwrap();
        assert_eq!(parsed, vec![Scrub::Strip, Scrub::SqueezeLines]);
    }
}
