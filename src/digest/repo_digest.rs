use crate::Result;
use ohno::{IntoAppError, bail};
use serde::Deserialize;

/// Lowest accepted difficulty rating
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest accepted difficulty rating
pub const MAX_DIFFICULTY: u8 = 5;

/// A model-written summary of one repository.
///
/// Always holds a non-blank summary and rationale and a difficulty in
/// `MIN_DIFFICULTY..=MAX_DIFFICULTY`; both [`Digest::new`] and deserialization
/// enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDigest")]
pub struct Digest {
    summary: String,
    why_care: String,
    use_cases: Vec<String>,
    setup: Vec<String>,
    difficulty: u8,
}

/// Digest as it appears on the wire, before validation
#[derive(Debug, Deserialize)]
struct RawDigest {
    summary: String,
    why_care: String,
    #[serde(default)]
    use_cases: Vec<String>,
    #[serde(default)]
    setup: Vec<String>,
    difficulty: RawDifficulty,
}

/// Models sometimes quote the rating or emit it as a float
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDifficulty {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawDifficulty {
    /// The rating as a whole number; `3`, `3.0`, and `"3"` are all accepted
    fn whole_number(self) -> Result<i64> {
        match self {
            Self::Integer(n) => Ok(n),
            Self::Float(f) if f.fract() == 0.0 && (-1024.0..=1024.0).contains(&f) => {
                #[expect(clippy::cast_possible_truncation, reason = "whole number within a small range")]
                let n = f as i64;
                Ok(n)
            }
            Self::Float(f) => bail!("digest difficulty {f} is not a whole number"),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .into_app_err_with(|| format!("digest difficulty '{text}' is not a whole number")),
        }
    }
}

impl TryFrom<RawDigest> for Digest {
    type Error = ohno::AppError;

    fn try_from(raw: RawDigest) -> Result<Self> {
        let difficulty = raw.difficulty.whole_number()?;
        Self::new(raw.summary, raw.why_care, raw.use_cases, raw.setup, difficulty)
    }
}

impl Digest {
    /// Create a validated digest
    pub fn new(
        summary: impl Into<String>,
        why_care: impl Into<String>,
        use_cases: Vec<String>,
        setup: Vec<String>,
        difficulty: i64,
    ) -> Result<Self> {
        let summary = summary.into();
        let why_care = why_care.into();

        if summary.trim().is_empty() {
            bail!("digest summary is missing");
        }

        if why_care.trim().is_empty() {
            bail!("digest why_care is missing");
        }

        let difficulty = match u8::try_from(difficulty) {
            Ok(d) if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d) => d,
            _ => bail!("digest difficulty {difficulty} is outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"),
        };

        Ok(Self {
            summary,
            why_care,
            use_cases,
            setup,
            difficulty,
        })
    }

    /// Parse a digest from model output.
    ///
    /// The text must be a single JSON object. When the object sits in a Markdown code
    /// fence, only the first fenced block is read and any text around it is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(strip_code_fence(text)).into_app_err("model output is not a valid digest")
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn why_care(&self) -> &str {
        &self.why_care
    }

    #[must_use]
    pub fn use_cases(&self) -> &[String] {
        &self.use_cases
    }

    #[must_use]
    pub fn setup(&self) -> &[String] {
        &self.setup
    }

    #[must_use]
    pub const fn difficulty(&self) -> u8 {
        self.difficulty
    }
}

/// Contents of the first ```` ``` ```` or ```` ```json ```` block, or the whole text if there is none
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some((_, rest)) = trimmed.split_once("```") else {
        return trimmed;
    };

    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.split_once("```").map_or(body, |(inner, _)| inner).trim()
}
