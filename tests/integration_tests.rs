use chrono::{NaiveDate, Weekday};
use traffic_volume_predictor::config::{INTERVAL_LABELS, PipelineConfig};
use traffic_volume_predictor::evaluation::{DayOutcome, SkipReason};
use traffic_volume_predictor::model::TrafficModel;
use traffic_volume_predictor::parser::load_table;
use traffic_volume_predictor::pipeline::features::day_name;
use traffic_volume_predictor::pipeline::prepare_datasets;
use traffic_volume_predictor::pipeline::split::DateRange;
use traffic_volume_predictor::pipeline::types::{RawRecord, RawTable, SegmentKey, VolumeCategory};
use traffic_volume_predictor::run::{fit_and_evaluate, run_file};

const FIXTURE: &str = "tests/fixtures/sample_counts.csv";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn single_hour_record(date: NaiveDate, hour: usize, volume: &str) -> RawRecord {
    let mut volumes = vec![None; 24];
    volumes[hour] = Some(volume.to_string());
    RawRecord {
        key: SegmentKey {
            id: date.to_string(),
            segment_id: "36705".into(),
            roadway_name: "BROADWAY".into(),
            from: "W 96 ST".into(),
            to: "W 97 ST".into(),
            direction: "NB".into(),
        },
        date,
        volumes,
    }
}

fn table(records: Vec<RawRecord>) -> RawTable {
    RawTable {
        interval_labels: INTERVAL_LABELS.iter().map(|l| l.to_string()).collect(),
        records,
    }
}

#[test]
fn test_training_row_scenario() {
    let t = table(vec![
        single_hour_record(date(2012, 1, 1), 8, "150"),
        single_hour_record(date(2018, 6, 1), 8, "150"),
    ]);

    let datasets = prepare_datasets(
        t,
        DateRange::new(date(2012, 1, 1), date(2017, 1, 1)),
        DateRange::new(date(2017, 1, 1), date(2019, 1, 1)),
    )
    .unwrap();

    assert_eq!(datasets.training.len(), 1);
    let row = &datasets.training[0];
    assert_eq!(day_name(row.day_of_week), "Sunday");
    assert_eq!(row.hour, 8);
    assert_eq!(row.category, VolumeCategory::Medium);

    assert_eq!(datasets.evaluation.len(), 1);
    assert!(datasets.evaluation.iter().all(|r| r.date != date(2012, 1, 1)));
}

#[test]
fn test_fixture_datasets() {
    let config = PipelineConfig::default();
    let raw = load_table(FIXTURE, &config.interval_labels, &config.segment_id).unwrap();
    // 14 training days, 6 evaluation days, 1 outside both ranges
    assert_eq!(raw.records.len(), 21);

    let datasets = prepare_datasets(raw, config.training, config.evaluation).unwrap();
    // two training cells are blank or non-numeric
    assert_eq!(datasets.training.len(), 14 * 24 - 2);
    assert_eq!(datasets.evaluation.len(), 6 * 24);
    assert!(
        datasets
            .training
            .iter()
            .all(|r| r.category != VolumeCategory::Undefined)
    );
}

#[test]
fn test_full_pipeline() {
    let run = run_file(FIXTURE, &PipelineConfig::default()).expect("pipeline should run");

    assert_eq!(run.model.days().len(), 7);
    assert_eq!(run.model.hours().len(), 24);
    assert_eq!(
        run.model.map_query(Weekday::Tue, 8).unwrap(),
        VolumeCategory::High
    );

    let report = &run.report;
    assert_eq!(report.days.len(), 7);
    assert_eq!(
        report.days[6],
        DayOutcome::Skipped {
            day: "Sunday".into(),
            reason: SkipReason::NoActualRows
        }
    );

    let scored: Vec<_> = report.days.iter().filter_map(|d| d.scored()).collect();
    assert_eq!(scored.len(), 6);
    for day in scored {
        assert_eq!(day.actual.len(), 24);
        assert_eq!(day.accuracy, 1.0);
        assert!(!day.is_misaligned());
    }
    assert_eq!(report.mean_accuracy, Some(1.0));
}

#[test]
fn test_unseen_day_predictions_are_missing() {
    // training only covers Mondays; evaluation has a Tuesday
    let t = table(vec![
        single_hour_record(date(2014, 3, 3), 8, "150"),
        single_hour_record(date(2018, 3, 6), 8, "150"),
    ]);

    let run = fit_and_evaluate(t, &PipelineConfig::default()).unwrap();
    let tuesday = run.report.days[1].scored().unwrap();

    assert_eq!(tuesday.actual, vec![VolumeCategory::Medium]);
    assert_eq!(tuesday.predicted, vec![None]);
    assert_eq!(tuesday.accuracy, 0.0);
    assert!(tuesday.is_misaligned());
    assert_eq!(tuesday.hour_aligned_accuracy, Some(0.0));
}

#[test]
fn test_empty_training_set_is_fatal() {
    let t = table(vec![single_hour_record(date(2018, 3, 6), 8, "150")]);
    let err = fit_and_evaluate(t, &PipelineConfig::default()).unwrap_err();
    assert!(err.to_string().contains("training set has no rows"));
}

#[test]
fn test_model_fit_matches_direct_fit() {
    let config = PipelineConfig::default();
    let raw = load_table(FIXTURE, &config.interval_labels, &config.segment_id).unwrap();
    let datasets = prepare_datasets(raw, config.training, config.evaluation).unwrap();

    let model = TrafficModel::fit(&datasets.training, config.equivalent_sample_size).unwrap();
    let cpds = model.cpds();
    assert_eq!(cpds[2].variable, "TrafficVolumeCategory");
    assert_eq!(cpds[2].columns.len(), 7 * 24);
}
