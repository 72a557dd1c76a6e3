use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::dates::parse_publish_time;
use crate::error::{ExplorerError, ExplorerResult};

/// Journal name substituted for missing or empty values.
pub const UNKNOWN_JOURNAL: &str = "Unknown";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["title", "authors", "journal", "publish_time", "abstract"];

// ---------------------------------------------------------------------------
// RawPaper – one row as read from the source, before normalization
// ---------------------------------------------------------------------------

/// One row of the source file with every field still optional.
///
/// Empty and whitespace-only cells are `None`; any other cell is kept
/// verbatim, surrounding whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPaper {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub publish_time: Option<String>,
    pub abstract_text: Option<String>,
}

impl RawPaper {
    /// Build a raw row from cell values, treating blank cells as absent.
    pub fn from_cells(
        title: Option<&str>,
        authors: Option<&str>,
        journal: Option<&str>,
        publish_time: Option<&str>,
        abstract_text: Option<&str>,
    ) -> Self {
        RawPaper {
            title: non_blank(title),
            authors: non_blank(authors),
            journal: non_blank(journal),
            publish_time: non_blank(publish_time),
            abstract_text: non_blank(abstract_text),
        }
    }
}

fn non_blank(cell: Option<&str>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty()).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Paper – a normalized, retained record
// ---------------------------------------------------------------------------

/// A single research paper that survived normalization.
///
/// `title` is non-empty and `journal` is never empty; `year` is always the
/// year of `publish_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paper {
    pub title: String,
    pub authors: Option<String>,
    pub journal: String,
    pub publish_time: NaiveDate,
    pub year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub abstract_word_count: usize,
}

/// Number of whitespace-separated tokens in an abstract. Absent counts as empty.
pub fn abstract_word_count(text: Option<&str>) -> usize {
    text.map_or(0, |t| t.split_whitespace().count())
}

// ---------------------------------------------------------------------------
// LoadReport – row-level anomalies tolerated during loading
// ---------------------------------------------------------------------------

/// Counts of row-level anomalies seen while normalizing a file.
///
/// A row can contribute to several counters; it is dropped at most once,
/// with a missing title taking precedence over a missing year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_retained: usize,
    /// `publish_time` present but not recognised as a date.
    pub unparsed_dates: usize,
    /// `journal` absent or empty, replaced by [`UNKNOWN_JOURNAL`].
    pub missing_journal: usize,
    pub dropped_missing_title: usize,
    pub dropped_missing_year: usize,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_title + self.dropped_missing_year
    }

    /// Whether any row needed a substitution or was dropped.
    pub fn has_anomalies(&self) -> bool {
        self.unparsed_dates > 0 || self.missing_journal > 0 || self.rows_dropped() > 0
    }
}

/// Normalize one raw row, updating `report`. Returns `None` for dropped rows.
pub fn normalize(raw: RawPaper, report: &mut LoadReport) -> Option<Paper> {
    report.rows_read += 1;

    let publish_time = match raw.publish_time.as_deref() {
        Some(text) => {
            let parsed = parse_publish_time(text);
            if parsed.is_none() {
                report.unparsed_dates += 1;
            }
            parsed
        }
        None => None,
    };

    let journal = match raw.journal {
        Some(j) => j,
        None => {
            report.missing_journal += 1;
            UNKNOWN_JOURNAL.to_string()
        }
    };

    let abstract_word_count = abstract_word_count(raw.abstract_text.as_deref());

    let Some(title) = raw.title else {
        report.dropped_missing_title += 1;
        return None;
    };
    let Some(publish_time) = publish_time else {
        report.dropped_missing_year += 1;
        return None;
    };

    report.rows_retained += 1;
    Some(Paper {
        title,
        authors: raw.authors,
        journal,
        year: publish_time.year(),
        publish_time,
        abstract_text: raw.abstract_text,
        abstract_word_count,
    })
}

// ---------------------------------------------------------------------------
// YearRange – an inclusive pair of years
// ---------------------------------------------------------------------------

/// Inclusive year interval with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> ExplorerResult<Self> {
        if min > max {
            return Err(ExplorerError::InvalidRange { min, max });
        }
        Ok(YearRange { min, max })
    }

    /// A single-year range.
    pub fn single(year: i32) -> Self {
        YearRange {
            min: year,
            max: year,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Pull both bounds into `bounds`. A range entirely outside collapses
    /// onto the nearest edge.
    pub fn clamp_to(&self, bounds: YearRange) -> YearRange {
        YearRange {
            min: self.min.clamp(bounds.min, bounds.max),
            max: self.max.clamp(bounds.min, bounds.max),
        }
    }

    fn widen(self, year: i32) -> YearRange {
        YearRange {
            min: self.min.min(year),
            max: self.max.max(year),
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full normalized dataset. Never mutated after construction; share it
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dataset {
    papers: Vec<Paper>,
    year_range: Option<YearRange>,
    source: PathBuf,
    report: LoadReport,
}

impl Dataset {
    /// Normalize raw rows from `source` into a dataset.
    pub fn from_raw(source: impl AsRef<Path>, rows: impl IntoIterator<Item = RawPaper>) -> Self {
        let mut report = LoadReport::default();
        let papers: Vec<Paper> = rows
            .into_iter()
            .filter_map(|raw| normalize(raw, &mut report))
            .collect();
        Self::with_report(source, papers, report)
    }

    fn with_report(source: impl AsRef<Path>, papers: Vec<Paper>, report: LoadReport) -> Self {
        let year_range = papers.iter().fold(None, |acc: Option<YearRange>, p| {
            Some(match acc {
                Some(r) => r.widen(p.year),
                None => YearRange::single(p.year),
            })
        });
        Dataset {
            papers,
            year_range,
            source: source.as_ref().to_path_buf(),
            report,
        }
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Observed min/max year, `None` when no row was retained.
    pub fn year_range(&self) -> Option<YearRange> {
        self.year_range
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilteredView – an order-preserving subsequence of a dataset
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] selected by a year range, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    /// `None` for an unfiltered view.
    range: Option<YearRange>,
    indices: Cow<'a, [usize]>,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn new(
        dataset: &'a Dataset,
        range: Option<YearRange>,
        indices: Cow<'a, [usize]>,
    ) -> Self {
        FilteredView {
            dataset,
            range,
            indices,
        }
    }

    pub fn range(&self) -> Option<YearRange> {
        self.range
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the selected rows in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn papers(&self) -> impl Iterator<Item = &'a Paper> + '_ {
        let papers = self.dataset.papers();
        self.indices.iter().map(move |&i| &papers[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Detach the selected indices, e.g. to keep them across frames.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices.into_owned()
    }
}
