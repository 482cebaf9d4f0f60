//! End-to-end runs of the analysis over small cost tables.

mod utils;

use cost_analysis::derived::DISPOSABLE_INCOME_FIELD;
use cost_analysis::utils::test::{cost_table_csv, read_fixture, two_city_csv, write_fixture};
use cost_analysis::{
    AnalysisConfig, AnalysisError, CostFields, drop_incomplete_rows, non_numeric_fields,
    run_pipeline, split_by_quality, with_disposable_income,
};
use utils::{numbers, texts};

const IDS: [&str; 2] = ["city", "country"];

#[test]
fn test_disposable_income_two_cities() {
    let ds = read_fixture(&two_city_csv()).unwrap();
    let costed = with_disposable_income(&ds, &CostFields::default()).unwrap();
    assert_eq!(numbers(&costed, DISPOSABLE_INCOME_FIELD), vec![200.0, 750.0]);
}

#[test]
fn test_non_numeric_cell_reported_then_dropped() {
    let ds = read_fixture("city,country,x1,x2\nA,P,1,2\nB,Q,N/A,3\nC,R,4,5\n").unwrap();

    assert_eq!(non_numeric_fields(&ds, &IDS).unwrap(), vec!["x1"]);

    let cleaned = drop_incomplete_rows(&ds, &IDS).unwrap();
    assert_eq!(cleaned.removed, 1);
    assert_eq!(texts(&cleaned.dataset, "city"), vec!["A", "C"]);
}

#[test]
fn test_quality_split_sizes() {
    let ds = read_fixture("city,data_quality\nA,1\nB,0\nC,1\nD,1\nE,0\n").unwrap();
    let parts = split_by_quality(&ds, "data_quality").unwrap();
    assert_eq!(texts(&parts.good, "city"), vec!["A", "C", "D"]);
    assert_eq!(texts(&parts.bad, "city"), vec!["B", "E"]);
}

#[test]
fn test_full_pipeline_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "costs.csv", &cost_table_csv()).unwrap();

    let outcome = run_pipeline(&path, &AnalysisConfig::default()).unwrap();
    let report = &outcome.report;

    assert_eq!(report.source_rows, 6);
    assert_eq!((report.good.rows, report.bad.rows), (4, 2));
    assert_eq!(report.good.non_numeric_fields, vec!["x48"]);
    assert_eq!(report.good.fields_with_nulls, Vec::<String>::new());
    assert_eq!(report.bad.fields_with_nulls, vec!["x1"]);
    assert_eq!((report.good.cleaned_rows, report.bad.cleaned_rows), (3, 1));
    assert_eq!(report.bad_top_null_fields[0], ("x1".to_string(), 1));

    let countries: Vec<_> = report.good.top_countries.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(countries, vec!["Aland", "Bland", "Cland"]);

    assert_eq!(report.salary_summary.count, 3);
    assert!((report.salary_summary.mean.unwrap() - 1400.0).abs() < 1e-9);
    assert_eq!(report.lowest_salary[0].city, "Alpha");
    assert_eq!(report.highest_salary[0].city, "Beta");

    let most: Vec<_> = report.most_expensive.iter().map(|c| c.city.as_str()).collect();
    let least: Vec<_> = report.least_expensive.iter().map(|c| c.city.as_str()).collect();
    assert_eq!(most, vec!["Delta", "Alpha", "Beta"]);
    assert_eq!(least, vec!["Beta", "Alpha", "Delta"]);
    assert_eq!(report.most_expensive[0].disposable_income, -620.0);
    assert_eq!((report.affordability.negative, report.affordability.non_negative), (1, 2));

    let rent = report.cost_comparisons.iter().find(|c| c.field == "x48").unwrap();
    assert!((rent.mean.unwrap() - 600.0).abs() < 1e-9);
    assert!((rent.percent_of_salary.unwrap() - 600.0 / 1400.0 * 100.0).abs() < 1e-9);

    let meals = report.meal_comparison.unwrap();
    assert!((meals.inexpensive_mean - 9.0).abs() < 1e-9);
    assert!((meals.mid_range_per_person_mean - 55.0 / 3.0).abs() < 1e-9);
    assert!((meals.difference - (55.0 / 3.0 - 9.0)).abs() < 1e-9);

    let source_countries: Vec<_> =
        report.source_top_countries.iter().map(|c| (c.value.as_str(), c.count)).collect();
    assert_eq!(source_countries[0], ("Aland", 3));

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["good"]["cleaned_rows"], 3);
}

#[test]
fn test_pipeline_with_only_low_quality_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "costs.csv",
        "city,country,x1,x36,x48,x54,data_quality\nA,P,5,100,400,1000,0\nB,Q,10,150,500,2000,0\n",
    )
    .unwrap();

    let outcome = run_pipeline(&path, &AnalysisConfig::default()).unwrap();
    let report = &outcome.report;

    assert_eq!((report.good.rows, report.bad.rows), (0, 2));
    assert_eq!(report.salary_summary.count, 0);
    assert!(report.highest_salary.is_empty());
    assert!(report.least_expensive.is_empty());
    assert_eq!(outcome.tables.costed.num_rows(), 0);
    assert_eq!(outcome.tables.bad_clean.num_rows(), 2);
}

#[test]
fn test_pipeline_when_every_good_row_is_incomplete() {
    let source = read_fixture(
        "city,country,x1,x36,x48,x54,data_quality\nA,P,5,100,,1000,1\nB,Q,10,150,500,2000,0\n",
    )
    .unwrap();

    let report = cost_analysis::analyze(source, &AnalysisConfig::default()).unwrap().report;
    assert_eq!(report.good.removed_incomplete, 1);
    assert_eq!(report.disposable_income_summary.count, 0);
    assert_eq!(report.affordability.negative + report.affordability.non_negative, 0);
}

#[test]
fn test_pipeline_labels_fields_from_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_fixture(dir.path(), "costs.csv", &cost_table_csv()).unwrap();
    let dictionary = write_fixture(
        dir.path(),
        "Table.csv",
        ",Description\nx48,Apartment (1 bedroom) in City Centre (USD)\nx54,Average Monthly Net Salary (After Tax) (USD)\n",
    )
    .unwrap();

    let config = AnalysisConfig {
        dictionary_path: Some(dictionary),
        ..AnalysisConfig::default()
    };
    let report = run_pipeline(&table, &config).unwrap().report;

    assert_eq!(report.label("x54"), "Average Monthly Net Salary (After Tax) (USD)");
    assert_eq!(report.label("x48"), "Apartment (1 bedroom) in City Centre (USD)");
    assert_eq!(report.label("x36"), "x36");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["field_labels"]["x54"],
        "Average Monthly Net Salary (After Tax) (USD)"
    );
}

#[test]
fn test_pipeline_with_missing_dictionary_fails() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_fixture(dir.path(), "costs.csv", &cost_table_csv()).unwrap();
    let config = AnalysisConfig {
        dictionary_path: Some(dir.path().join("missing.csv")),
        ..AnalysisConfig::default()
    };
    assert!(matches!(run_pipeline(&table, &config), Err(AnalysisError::Io(_))));
}

#[test]
fn test_pipeline_without_quality_field_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "costs.csv", &two_city_csv()).unwrap();
    let err = run_pipeline(&path, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Schema(_)));
    assert!(err.to_string().contains("data_quality"));
}

#[test]
fn test_pipeline_with_empty_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "empty.csv", "").unwrap();
    assert!(matches!(
        run_pipeline(&path, &AnalysisConfig::default()),
        Err(AnalysisError::Format(_))
    ));
}

#[test]
fn test_exported_tables_reload() {
    use cost_analysis::{ExportFormat, LoaderConfig, export_tables, load_csv};

    let outcome = cost_analysis::analyze(
        read_fixture(&cost_table_csv()).unwrap(),
        &AnalysisConfig::default(),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths = export_tables(&outcome.tables.named(), dir.path(), ExportFormat::Csv).unwrap();
    assert_eq!(paths.len(), 5);

    let costed = load_csv(&dir.path().join("costed.csv"), &LoaderConfig::default()).unwrap();
    assert_eq!(costed.num_rows(), 3);
    assert_eq!(costed.field_names().last().unwrap(), DISPOSABLE_INCOME_FIELD);
}
