use chrono::{Days, NaiveDate};
use core::fmt::{self, Display, Formatter};

/// Which repository timestamp the recency filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// Repository creation time
    Created,

    /// Time of the most recent push
    Pushed,
}

impl DateField {
    #[must_use]
    pub const fn from_use_created(use_created: bool) -> Self {
        if use_created { Self::Created } else { Self::Pushed }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Pushed => "pushed",
        }
    }
}

impl Display for DateField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository search filtered by language and recency.
///
/// Renders as `language:<L> <field>:>=<YYYY-MM-DD>` through [`Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    language: String,
    since: NaiveDate,
    date_field: DateField,
}

impl SearchQuery {
    /// Build a query covering the `days` days leading up to `today`.
    ///
    /// A window reaching past the earliest representable date saturates at that date.
    #[must_use]
    pub fn new(language: impl Into<String>, days: u32, date_field: DateField, today: NaiveDate) -> Self {
        let since = today.checked_sub_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MIN);

        Self {
            language: language.into(),
            since,
            date_field,
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub const fn since(&self) -> NaiveDate {
        self.since
    }

    #[must_use]
    pub const fn date_field(&self) -> DateField {
        self.date_field
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "language:{} {}:>={}", self.language, self.date_field, self.since.format("%Y-%m-%d"))
    }
}

/// Build the search query string for a language, a day window, and a date-field choice.
#[must_use]
pub fn build_query(language: &str, days: u32, use_created: bool, today: NaiveDate) -> String {
    SearchQuery::new(language, days, DateField::from_use_created(use_created), today).to_string()
}
