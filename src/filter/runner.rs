//! Batch runner: drives a [`StreamFilter`] over a whole [`Dataset`].
//!
//! The output format is determined once, before any row is touched, so every
//! configuration problem surfaces up front. Rows are then processed in
//! order; the first failing row aborts the batch and nothing is returned.

use crate::dataset::Dataset;
use crate::errors::Result;
use crate::filter::observer::{BatchClock, BatchReport, FilterObserver};
use crate::filter::StreamFilter;

/// Run `filter` over every row of `dataset`.
///
/// The `observer` receives callbacks at the batch boundaries and after each
/// row. Pass [`NoopObserver`](crate::filter::NoopObserver) when nobody is
/// listening.
pub fn apply<F>(
    filter: &mut F,
    mut dataset: Dataset,
    observer: &mut impl FilterObserver,
) -> Result<(Dataset, BatchReport)>
where
    F: StreamFilter + ?Sized,
{
    dataset.validate()?;

    let span = tracing::info_span!("filter_batch", filter = filter.name(), relation = %dataset.relation);
    let _entered = span.enter();

    let clock = BatchClock::start();
    let attributes = filter.determine_output_format(&dataset.attributes)?;

    let mut report = BatchReport::new(filter.name())
        .attributes(attributes.len(), filter.target_columns().len());
    observer.on_batch_start(&report);

    for (index, row) in dataset.rows.iter_mut().enumerate() {
        let changed = filter.process(index, row)?;
        report.cells_changed += changed;
        observer.on_row(index, changed);
    }

    report.rows = dataset.rows.len();
    report.elapsed = clock.elapsed();
    observer.on_batch_end(&report);

    dataset.attributes = attributes;
    Ok((dataset, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Attribute, Value};
    use crate::errors::FilterError;
    use crate::filter::observer::{NoopObserver, RecordingObserver};
    use crate::filter::{ChangeCase, ChangeCaseOptions};

    fn dataset() -> Dataset {
        Dataset::new("docs", vec![Attribute::numeric("id"), Attribute::string("text")])
            .with_row(vec![Value::Number(1.0), "Hello".into()])
            .with_row(vec![Value::Number(2.0), Value::Missing])
            .with_row(vec![Value::Number(3.0), "lower".into()])
    }

    #[test]
    fn test_apply_change_case() {
        let mut filter = ChangeCase::new(ChangeCaseOptions::default());
        let mut observer = RecordingObserver::default();
        let (out, report) = apply(&mut filter, dataset(), &mut observer).unwrap();

        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.num_attributes(), 2);
        assert_eq!(out.rows[0][1], Value::from("hello"));
        assert!(out.rows[1][1].is_missing());
        assert_eq!(out.rows[2][1], Value::from("lower"));

        assert_eq!(report.rows, 3);
        assert_eq!(report.cells_changed, 1);
        assert_eq!(report.selected_attributes, 1);
        assert_eq!(observer.started.len(), 1);
        assert_eq!(observer.rows, vec![(0, 1), (1, 0), (2, 0)]);
        assert_eq!(observer.finished[0], report);
    }

    #[test]
    fn test_invalid_dataset_is_rejected_before_filtering() {
        let mut filter = ChangeCase::new(ChangeCaseOptions::default());
        let broken = dataset().with_row(vec![Value::Number(4.0)]);
        let err = apply(&mut filter, broken, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, FilterError::Dataset(_)));
    }

    #[test]
    fn test_config_error_aborts_before_rows() {
        let mut filter = ChangeCase::new(ChangeCaseOptions {
            range: "5".into(),
            ..ChangeCaseOptions::default()
        });
        let mut observer = RecordingObserver::default();
        let err = apply(&mut filter, dataset(), &mut observer).unwrap_err();
        assert!(matches!(err, FilterError::Config(_)));
        assert!(observer.started.is_empty());
        assert!(observer.rows.is_empty());
    }

    #[test]
    fn test_works_through_trait_objects() {
        let mut filter: Box<dyn StreamFilter> = Box::new(ChangeCase::new(ChangeCaseOptions::default()));
        let (out, _) = apply(filter.as_mut(), dataset(), &mut NoopObserver).unwrap();
        assert_eq!(out.rows[0][1], Value::from("hello"));
    }
}
