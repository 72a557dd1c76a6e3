use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::model::FilteredView;
use crate::error::{ExplorerError, ExplorerResult};

/// Number of papers per journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalCount {
    pub journal: String,
    pub count: usize,
}

/// Number of papers per publication year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Headline figures for a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub paper_count: usize,
    pub journal_count: usize,
    /// `0.0` for an empty view.
    pub mean_abstract_word_count: f64,
}

/// One line of the overview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewRow {
    pub title: String,
    pub authors: Option<String>,
    pub journal: String,
    pub year: i32,
}

/// The `n` journals with the most papers in `view`, most frequent first.
///
/// Ties keep the order in which the journals first appear in the view.
pub fn top_journals(view: &FilteredView<'_>, n: usize) -> ExplorerResult<Vec<JournalCount>> {
    if n < 1 {
        return Err(ExplorerError::InvalidArgument(format!(
            "journal count must be at least 1, got {n}"
        )));
    }

    // Counts stored in first-seen order; `position` maps name -> slot.
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<JournalCount> = Vec::new();
    for paper in view.papers() {
        match position.get(paper.journal.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                position.insert(&paper.journal, counts.len());
                counts.push(JournalCount {
                    journal: paper.journal.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    Ok(counts)
}

/// Paper count, distinct journal count and mean abstract length of `view`.
pub fn summary(view: &FilteredView<'_>) -> Summary {
    let mut journals: HashSet<&str> = HashSet::new();
    let mut words = 0usize;
    for paper in view.papers() {
        journals.insert(&paper.journal);
        words += paper.abstract_word_count;
    }

    let paper_count = view.len();
    let mean_abstract_word_count = if paper_count == 0 {
        0.0
    } else {
        words as f64 / paper_count as f64
    };

    Summary {
        paper_count,
        journal_count: journals.len(),
        mean_abstract_word_count,
    }
}

/// Papers per year, ascending, only for years present in `view`.
pub fn publications_by_year(view: &FilteredView<'_>) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for paper in view.papers() {
        *by_year.entry(paper.year).or_default() += 1;
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// The first `limit` rows of `view`, reduced to the overview columns.
pub fn overview(view: &FilteredView<'_>, limit: usize) -> Vec<OverviewRow> {
    view.papers()
        .take(limit)
        .map(|p| OverviewRow {
            title: p.title.clone(),
            authors: p.authors.clone(),
            journal: p.journal.clone(),
            year: p.year,
        })
        .collect()
}

/// All titles of `view` joined by single spaces, in view order.
pub fn title_text(view: &FilteredView<'_>) -> String {
    let mut text = String::new();
    for (i, paper) in view.papers().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&paper.title);
    }
    text
}
