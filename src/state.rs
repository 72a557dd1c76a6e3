use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Settings;
use crate::data::filter::filter_by_range;
use crate::data::model::{Dataset, FilteredView, LoadReport, YearRange};
use crate::data::stats::{
    overview, publications_by_year, summary, title_text, top_journals, JournalCount,
    OverviewRow, Summary, YearCount,
};
use crate::error::{ExplorerError, ExplorerResult};

// ---------------------------------------------------------------------------
// Explorer state
// ---------------------------------------------------------------------------

/// Per-process dashboard state, independent of rendering.
///
/// Holds the shared dataset and the current filter parameters; every
/// parameter change re-derives the visible rows before returning.
pub struct ExplorerState {
    dataset: Arc<Dataset>,

    /// Current year filter; `None` only while the dataset is empty.
    year_range: Option<YearRange>,

    /// Number of journals in the top-journals table.
    top_n: usize,

    /// Indices of papers passing the current filter (cached).
    visible_indices: Vec<usize>,

    settings: Settings,

    /// Validation message from the last rejected parameter change.
    pub status_message: Option<String>,
}

impl ExplorerState {
    /// Start with the full observed year range and the configured `top_n`.
    pub fn new(dataset: Arc<Dataset>, settings: Settings) -> ExplorerResult<Self> {
        settings.validate()?;
        let year_range = dataset.year_range();
        let mut state = ExplorerState {
            dataset,
            year_range,
            top_n: settings.top_n,
            visible_indices: Vec::new(),
            settings,
            status_message: None,
        };
        state.refilter();
        Ok(state)
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn year_range(&self) -> Option<YearRange> {
        self.year_range
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The currently visible papers.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(
            &self.dataset,
            self.year_range,
            Cow::Borrowed(self.visible_indices.as_slice()),
        )
    }

    /// Change the year filter.
    ///
    /// The range is clamped to the dataset's observed years. A rejected range
    /// leaves the current view untouched and is recorded in
    /// [`status_message`](Self::status_message).
    pub fn set_year_range(&mut self, min: i32, max: i32) -> ExplorerResult<()> {
        let requested = self.validated(YearRange::new(min, max))?;
        let range = match self.dataset.year_range() {
            Some(bounds) => {
                let clamped = requested.clamp_to(bounds);
                if clamped != requested {
                    log::warn!("year range {requested} clamped to {clamped}");
                }
                clamped
            }
            None => requested,
        };
        self.year_range = Some(range);
        self.refilter();
        Ok(())
    }

    /// Change the year filter with either end optional.
    ///
    /// A missing end defaults to the observed bound on that side, but never
    /// crosses the given end, so `--from` past the last year still selects a
    /// one-year range. Without either end this resets to the full range.
    pub fn set_open_year_range(&mut self, min: Option<i32>, max: Option<i32>) -> ExplorerResult<()> {
        let bounds = self.dataset.year_range();
        let (min, max) = match (min, max, bounds) {
            (Some(lo), Some(hi), _) => (lo, hi),
            (Some(lo), None, Some(b)) => (lo, lo.max(b.max())),
            (None, Some(hi), Some(b)) => (hi.min(b.min()), hi),
            (None, None, Some(b)) => (b.min(), b.max()),
            (Some(lo), None, None) => (lo, lo),
            (None, Some(hi), None) => (hi, hi),
            (None, None, None) => return Ok(()),
        };
        self.set_year_range(min, max)
    }

    /// Change the number of journals shown, within the configured bounds.
    pub fn set_top_n(&mut self, n: usize) -> ExplorerResult<()> {
        let (lo, hi) = (self.settings.top_n_min, self.settings.top_n_max);
        let checked = if (lo..=hi).contains(&n) {
            Ok(n)
        } else {
            Err(ExplorerError::InvalidArgument(format!(
                "journal count {n} is outside [{lo}, {hi}]"
            )))
        };
        self.top_n = self.validated(checked)?;
        self.status_message = None;
        Ok(())
    }

    /// Everything a dashboard renders for the current parameters.
    pub fn snapshot(&self) -> ExplorerResult<DashboardSnapshot> {
        let view = self.view();
        Ok(DashboardSnapshot {
            source: self.dataset.source().display().to_string(),
            year_bounds: self.dataset.year_range(),
            year_range: self.year_range,
            load_report: *self.dataset.report(),
            overview: overview(&view, self.settings.overview_rows),
            publications_by_year: publications_by_year(&view),
            top_n: self.top_n,
            top_journals: top_journals(&view, self.top_n)?,
            title_text: title_text(&view),
            summary: summary(&view),
        })
    }

    /// Recompute `visible_indices` after a filter change.
    fn refilter(&mut self) {
        self.visible_indices = match self.year_range {
            Some(range) => filter_by_range(&self.dataset, range).into_indices(),
            None => (0..self.dataset.len()).collect(),
        };
        self.status_message = None;
    }

    fn validated<T>(&mut self, result: ExplorerResult<T>) -> ExplorerResult<T> {
        if let Err(e) = &result {
            log::debug!("rejected parameter change: {e}");
            self.status_message = Some(e.to_string());
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Snapshot handed to the rendering layer
// ---------------------------------------------------------------------------

/// All derived outputs for one parameter set, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub source: String,
    /// Observed years in the dataset (slider limits).
    pub year_bounds: Option<YearRange>,
    /// Selected years.
    pub year_range: Option<YearRange>,
    pub load_report: LoadReport,
    pub overview: Vec<OverviewRow>,
    pub publications_by_year: Vec<YearCount>,
    pub top_n: usize,
    pub top_journals: Vec<JournalCount>,
    /// Input for the word cloud.
    pub title_text: String,
    pub summary: Summary,
}
