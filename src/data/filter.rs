use std::borrow::Cow;

use super::model::{Dataset, FilteredView, YearRange};
use crate::error::ExplorerResult;

/// Select the papers published in `[min_year, max_year]`, preserving dataset
/// order.
///
/// Fails with [`InvalidRange`](crate::error::ExplorerError::InvalidRange)
/// when `min_year > max_year`. Bounds outside the observed years are
/// allowed and simply match nothing there; see [`YearRange::clamp_to`].
pub fn filter_by_year(dataset: &Dataset, min_year: i32, max_year: i32) -> ExplorerResult<FilteredView<'_>> {
    let range = YearRange::new(min_year, max_year)?;
    Ok(filter_by_range(dataset, range))
}

/// Like [`filter_by_year`] with an already validated range.
pub fn filter_by_range(dataset: &Dataset, range: YearRange) -> FilteredView<'_> {
    let indices: Vec<usize> = dataset
        .papers()
        .iter()
        .enumerate()
        .filter(|(_, p)| range.contains(p.year))
        .map(|(i, _)| i)
        .collect();
    log::debug!("year filter {range}: {} of {} papers", indices.len(), dataset.len());
    FilteredView::new(dataset, Some(range), Cow::Owned(indices))
}

/// An unfiltered view over every paper in the dataset.
pub fn full_view(dataset: &Dataset) -> FilteredView<'_> {
    FilteredView::new(dataset, None, Cow::Owned((0..dataset.len()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawPaper;
    use crate::error::ExplorerError;

    fn dataset(years: &[&str]) -> Dataset {
        let rows = years.iter().enumerate().map(|(i, y)| {
            RawPaper::from_cells(
                Some(format!("paper {i}").as_str()),
                None,
                Some("J"),
                Some(*y),
                None,
            )
        });
        Dataset::from_raw("mem", rows.collect::<Vec<_>>())
    }

    fn titles(view: &FilteredView<'_>) -> Vec<String> {
        view.papers().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn single_year_selects_exactly_that_year() {
        let ds = dataset(&["2019", "2020", "2020", "2021"]);
        let view = filter_by_year(&ds, 2020, 2020).unwrap();
        assert_eq!(view.len(), 2);
        assert!(view.papers().all(|p| p.year == 2020));
        assert_eq!(titles(&view), ["paper 1", "paper 2"]);
    }

    #[test]
    fn bounds_are_inclusive_and_order_preserved() {
        let ds = dataset(&["2021", "2019", "2020", "2018"]);
        let view = filter_by_year(&ds, 2019, 2021).unwrap();
        assert_eq!(titles(&view), ["paper 0", "paper 1", "paper 2"]);
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_dataset_untouched() {
        let ds = dataset(&["2019", "2020", "2021"]);
        let before = ds.papers().to_vec();
        let a = filter_by_year(&ds, 2020, 2021).unwrap().into_indices();
        let b = filter_by_year(&ds, 2020, 2021).unwrap().into_indices();
        assert_eq!(a, b);
        assert_eq!(ds.papers(), before.as_slice());
    }

    #[test]
    fn minimum_year_only() {
        let ds = dataset(&["2020", "2018", "2019", "2018"]);
        let min = ds.year_range().unwrap().min();
        let view = filter_by_year(&ds, min, min).unwrap();
        assert_eq!(view.len(), 2);
        assert!(view.papers().all(|p| p.year == 2018));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let ds = dataset(&["2020"]);
        let err = filter_by_year(&ds, 2021, 2020).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidRange { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn out_of_range_bounds_match_nothing() {
        let ds = dataset(&["2020"]);
        assert!(filter_by_year(&ds, 1900, 1950).unwrap().is_empty());
    }

    #[test]
    fn full_view_covers_everything() {
        let ds = dataset(&["2020", "2021"]);
        let view = full_view(&ds);
        assert_eq!(view.len(), 2);
        assert_eq!(view.range(), None);
    }
}
