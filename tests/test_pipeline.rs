//! End-to-end tests: the `analyze` pipeline and the `GroceryTrends` facade.

mod common;

use common::{assert_close, date, series};
use grocery_trends::analysis::{self, analyze};
use grocery_trends::{DateWindow, GroceryTrends, Item, TimeEncoding, TrendError};

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn three_month_scenario() {
    let input = series(
        Item::Milk,
        &[("2020-01-01", 10.0), ("2020-02-01", 12.0), ("2020-03-01", 14.0)],
    );
    let window = DateWindow::between(date("2020-01-01"), date("2020-03-01")).unwrap();

    let report = analyze(&input, &window, TimeEncoding::Seconds).unwrap();

    assert_eq!(report.series, input);
    assert_eq!(report.insights.latest_price, 14.0);
    assert_close(report.insights.average_price, 12.0, 1e-12);
    assert_close(report.insights.change_pct, 40.0, 1e-9);

    assert!(report.trend.slope > 0.0);
    let fitted: Vec<f64> = report.trend.fitted_values().collect();
    assert!(fitted.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn change_pct_follows_the_window() {
    let input = series(
        Item::Milk,
        &[("2020-01-01", 10.0), ("2020-02-01", 12.0), ("2020-03-01", 15.0)],
    );

    let full = analyze(&input, &DateWindow::unbounded(), TimeEncoding::Days).unwrap();
    let later = analyze(
        &input,
        &DateWindow::since(date("2020-02-01")),
        TimeEncoding::Days,
    )
    .unwrap();

    assert_close(full.insights.change_pct, 50.0, 1e-9);
    assert_close(later.insights.change_pct, 25.0, 1e-9);
}

#[test]
fn pipeline_stops_at_first_failure() {
    let input = series(Item::Milk, &[("2020-01-01", 10.0), ("2020-02-01", 12.0)]);

    let reversed = DateWindow {
        start: Some(date("2020-02-01")),
        end: Some(date("2020-01-01")),
    };
    assert!(matches!(
        analyze(&input, &reversed, TimeEncoding::Days).unwrap_err(),
        TrendError::InvalidWindow { .. }
    ));

    let nothing = DateWindow::since(date("2021-01-01"));
    assert!(matches!(
        analyze(&input, &nothing, TimeEncoding::Days).unwrap_err(),
        TrendError::EmptySeries
    ));

    let one = DateWindow::until(date("2020-01-15"));
    assert!(matches!(
        analyze(&input, &one, TimeEncoding::Days).unwrap_err(),
        TrendError::InsufficientData { found: 1 }
    ));
}

#[test]
fn independent_series_analyze_in_parallel() {
    let inputs: Vec<_> = (1..=4)
        .map(|k| {
            series(
                Item::ALL[k - 1],
                &[
                    ("2020-01-01", k as f64),
                    ("2020-01-02", 2.0 * k as f64),
                    ("2020-01-03", 3.0 * k as f64),
                ],
            )
        })
        .collect();

    let slopes: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|s| {
                scope.spawn(move || {
                    analysis::fit_trend(s, TimeEncoding::Days).unwrap().slope
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (k, slope) in slopes.iter().enumerate() {
        assert_close(*slope, (k + 1) as f64, 1e-9);
    }
}

// ---------------------------------------------------------------------------
// GroceryTrends facade
// ---------------------------------------------------------------------------

#[test]
fn default_window_spans_milk_data() {
    let (trends, _tmp) = common::setup_sample_trends();
    let window = trends.default_window().unwrap();
    assert_eq!(window.start, Some(date("2020-01-01")));
    assert_eq!(window.end, Some(date("2020-03-01")));
}

#[test]
fn default_window_without_milk_rows_is_unbounded() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_csv(tmp.path(), Item::Milk, "Date,Milk_Price\n");
    let trends = GroceryTrends::builder().data_dir(tmp.path()).build().unwrap();
    assert_eq!(trends.default_window().unwrap(), DateWindow::unbounded());
}

#[test]
fn milk_report_from_files() {
    let (trends, _tmp) = common::setup_sample_trends();
    let window = trends.default_window().unwrap();

    let report = trends.report(Item::Milk, &window).unwrap();
    assert_eq!(report.item, Item::Milk);
    assert_eq!(report.window, window);
    assert_eq!(report.series.len(), 3);
    assert_close(report.insights.change_pct, 40.0, 1e-9);
    assert_eq!(report.trend.encoding, TimeEncoding::Days);
    assert!(report.trend.slope > 0.0);
}

#[test]
fn insights_and_trend_accessors_match_report() {
    let (trends, _tmp) = common::setup_sample_trends();
    let window = DateWindow::between(date("2020-01-01"), date("2020-10-01")).unwrap();

    let report = trends.report(Item::Eggs, &window).unwrap();
    assert_eq!(trends.insights(Item::Eggs, &window).unwrap(), report.insights);
    assert_eq!(trends.trend(Item::Eggs, &window).unwrap(), report.trend);
    assert_eq!(report.series.len(), 4);
    assert_eq!(report.insights.latest_price, 3.6);
}

#[test]
fn bread_report_skips_bad_rows() {
    let (trends, _tmp) = common::setup_sample_trends();
    let report = trends.report(Item::Bread, &DateWindow::unbounded()).unwrap();
    assert_eq!(report.series.len(), 3);
    assert_close(report.insights.change_pct, 20.0, 1e-9);
}

#[test]
fn flour_insights_surface_division_by_zero() {
    let (trends, _tmp) = common::setup_sample_trends();

    let err = trends
        .insights(Item::Flour, &DateWindow::unbounded())
        .unwrap_err();
    assert!(matches!(err, TrendError::DivisionByZero));

    // Moving the window past the zero row fixes the baseline.
    let insights = trends
        .insights(Item::Flour, &DateWindow::since(date("2020-02-01")))
        .unwrap();
    assert_close(insights.change_pct, 50.0, 1e-9);
}

#[test]
fn overview_returns_selected_items_in_order() {
    let (trends, _tmp) = common::setup_sample_trends();
    let window = DateWindow::between(date("2020-01-01"), date("2020-12-31")).unwrap();

    let combined = trends
        .overview(&[Item::Eggs, Item::Milk, Item::Eggs, Item::Bread], &window)
        .unwrap();

    let items: Vec<Item> = combined.iter().map(|s| s.item).collect();
    assert_eq!(items, vec![Item::Eggs, Item::Milk, Item::Bread]);
    assert_eq!(combined[0].len(), 4);
    assert_eq!(combined[1].len(), 3);
    assert!(combined[2].is_empty());
}

#[test]
fn overview_with_no_items_is_empty() {
    let (trends, _tmp) = common::setup_sample_trends();
    assert!(trends
        .overview(&[], &DateWindow::unbounded())
        .unwrap()
        .is_empty());
}

#[test]
fn overview_rejects_reversed_window() {
    let (trends, _tmp) = common::setup_sample_trends();
    let reversed = DateWindow {
        start: Some(date("2021-01-01")),
        end: Some(date("2020-01-01")),
    };
    let err = trends.overview(&Item::ALL, &reversed).unwrap_err();
    assert!(matches!(err, TrendError::InvalidWindow { .. }));
}

#[test]
fn missing_data_dir_file_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let trends = GroceryTrends::builder().data_dir(tmp.path()).build().unwrap();
    let err = trends.series(Item::Milk).unwrap_err();
    assert!(matches!(err, TrendError::NotFound(_)));
}

#[test]
fn sql_escape_hatch_sees_loaded_tables() {
    let (trends, _tmp) = common::setup_sample_trends();
    trends.series(Item::Eggs).unwrap();

    let rows = trends
        .sql("SELECT MAX(\"Egg_Price\") AS top FROM eggs", &[])
        .unwrap();
    assert_eq!(rows[0]["top"], 3.6);
    assert_eq!(trends.tables(), vec!["eggs".to_string()]);
}

#[test]
fn display_summarizes_state() {
    let (trends, _tmp) = common::setup_sample_trends();
    trends.report(Item::Milk, &DateWindow::unbounded()).unwrap();

    let text = trends.to_string();
    assert!(text.starts_with("GroceryTrends(data_dir="));
    assert!(text.contains("tables=[milk]"));
    assert!(text.contains("encoding=Days"));
    assert!(text.contains("cached_reports=1"));
}

#[test]
fn report_serializes_for_presentation() {
    let (trends, _tmp) = common::setup_sample_trends();
    let report = trends.report(Item::Milk, &DateWindow::unbounded()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["item"], "milk");
    assert_eq!(json["insights"]["latest_price"], 14.0);
    assert_eq!(json["trend"]["encoding"], "days");
    assert_eq!(json["trend"]["points"].as_array().unwrap().len(), 3);
}
