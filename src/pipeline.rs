//! End-to-end analysis of a cost-of-living table
//!
//! Runs the stages in order (load, split by quality, validate, drop
//! incomplete rows, summarise, derive disposable income) and collects the
//! figures into an [`AnalysisReport`]. Each stage consumes the previous
//! stage's dataset and produces a new one; any stage error aborts the run.
//! A partition left empty by cleaning is still reported, with empty
//! summaries and rankings.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::derived::{
    AffordabilitySplit, CityCost, DISPOSABLE_INCOME_FIELD, MealComparison, affordability_split,
    city_costs, meal_comparison, with_disposable_income,
};
use crate::error::Result;
use crate::filter::{drop_incomplete_rows, split_by_quality};
use crate::loader::load_csv;
use crate::schema::{
    FieldLabels, fields_with_nulls, load_field_labels, non_numeric_fields, null_counts,
};
use crate::stats::{
    ColumnSummary, Extreme, ValueCount, bottom_n, describe, mean, mean_ratio_percent,
    rows_at_extreme, top_n, top_value_counts,
};
use crate::utils::arrow::{numeric_values, text_values};
use crate::utils::logging::format_report_line;

/// Figures for one quality partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionReport {
    /// Rows before cleaning
    pub rows: usize,
    /// Fields holding non-numeric cells
    pub non_numeric_fields: Vec<String>,
    /// Fields with at least one missing cell
    pub fields_with_nulls: Vec<String>,
    /// Rows dropped for missing values
    pub removed_incomplete: usize,
    /// Rows after cleaning
    pub cleaned_rows: usize,
    /// Countries with the most cities after cleaning
    pub top_countries: Vec<ValueCount>,
}

/// A city with one field value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityValue {
    pub city: String,
    pub country: String,
    pub value: f64,
}

/// Mean of an expense field against the mean salary
///
/// Both figures are `None` when the cleaned partition has no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostComparison {
    pub field: String,
    pub mean: Option<f64>,
    pub percent_of_salary: Option<f64>,
}

/// Everything the analysis reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub source_rows: usize,
    /// Countries with the most cities across the whole table
    pub source_top_countries: Vec<ValueCount>,
    pub good: PartitionReport,
    pub bad: PartitionReport,
    /// Fields of the low-quality partition with the most missing cells
    pub bad_top_null_fields: Vec<(String, usize)>,
    pub salary_summary: ColumnSummary,
    pub lowest_salary: Vec<CityValue>,
    pub highest_salary: Vec<CityValue>,
    pub cost_comparisons: Vec<CostComparison>,
    pub meal_comparison: Option<MealComparison>,
    pub disposable_income_summary: ColumnSummary,
    /// Cities with the lowest disposable income, lowest first
    pub most_expensive: Vec<CityCost>,
    /// Cities with the highest disposable income, highest first
    pub least_expensive: Vec<CityCost>,
    pub affordability: AffordabilitySplit,
    /// Dictionary descriptions of the indicator fields named in this report
    pub field_labels: BTreeMap<String, String>,
}

/// Datasets produced along the way
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineTables {
    pub source: Dataset,
    pub good: Dataset,
    pub bad: Dataset,
    pub good_clean: Dataset,
    pub bad_clean: Dataset,
    /// Cleaned high-quality rows with `disposable_income` appended
    pub costed: Dataset,
}

impl PipelineTables {
    /// Tables with their export names
    #[must_use]
    pub fn named(&self) -> Vec<(&'static str, &Dataset)> {
        vec![
            ("good", &self.good),
            ("bad", &self.bad),
            ("good_clean", &self.good_clean),
            ("bad_clean", &self.bad_clean),
            ("costed", &self.costed),
        ]
    }
}

/// Report plus the intermediate tables
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub tables: PipelineTables,
}

/// Load `path`, and the data dictionary when configured, and run the full
/// analysis
pub fn run_pipeline(path: &Path, config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    let labels = match &config.dictionary_path {
        Some(dictionary) => load_field_labels(dictionary, &config.loader)?,
        None => FieldLabels::default(),
    };
    let source = load_csv(path, &config.loader)?;
    analyze_with_labels(source, config, &labels)
}

/// Run the analysis over an already loaded dataset, without field labels
pub fn analyze(source: Dataset, config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    analyze_with_labels(source, config, &FieldLabels::default())
}

/// Run the analysis over an already loaded dataset
pub fn analyze_with_labels(
    source: Dataset,
    config: &AnalysisConfig,
    labels: &FieldLabels,
) -> Result<AnalysisOutcome> {
    let start = Instant::now();
    let ids = &config.identifier_fields;

    let source_top_countries = top_value_counts(
        &source,
        &config.country_field,
        config.source_country_ranking_size,
    )?;

    let partition = split_by_quality(&source, &config.quality_field)?;

    let bad_top_null_fields = {
        let mut counts = null_counts(&partition.bad)?;
        counts.truncate(config.null_ranking_size);
        counts
    };

    let good_outcome = drop_incomplete_rows(&partition.good, ids)?;
    let bad_outcome = drop_incomplete_rows(&partition.bad, ids)?;

    let good_report = PartitionReport {
        rows: partition.good.num_rows(),
        non_numeric_fields: non_numeric_fields(&partition.good, ids)?,
        fields_with_nulls: fields_with_nulls(&partition.good)?,
        removed_incomplete: good_outcome.removed,
        cleaned_rows: good_outcome.dataset.num_rows(),
        top_countries: top_value_counts(
            &good_outcome.dataset,
            &config.country_field,
            config.country_ranking_size,
        )?,
    };
    let bad_report = PartitionReport {
        rows: partition.bad.num_rows(),
        non_numeric_fields: non_numeric_fields(&partition.bad, ids)?,
        fields_with_nulls: fields_with_nulls(&partition.bad)?,
        removed_incomplete: bad_outcome.removed,
        cleaned_rows: bad_outcome.dataset.num_rows(),
        top_countries: top_value_counts(
            &bad_outcome.dataset,
            &config.country_field,
            config.country_ranking_size,
        )?,
    };

    let good_clean = good_outcome.dataset;
    if good_clean.is_empty() {
        log::warn!("No complete high-quality rows; statistics and rankings are empty");
    }

    let cost_fields = &config.cost_fields;
    let salary = cost_fields.salary.as_str();

    let salary_summary = describe(&good_clean, salary)?;
    let lowest_salary = city_values(&rows_at_extreme(&good_clean, salary, Extreme::Min)?, salary)?;
    let highest_salary = city_values(&rows_at_extreme(&good_clean, salary, Extreme::Max)?, salary)?;

    let cost_comparisons = [&cost_fields.meal, &cost_fields.rent, &cost_fields.utilities]
        .into_iter()
        .map(|field| {
            Ok(CostComparison {
                field: field.clone(),
                mean: mean(&good_clean, field)?,
                percent_of_salary: mean_ratio_percent(&good_clean, field, salary)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let meals = meal_comparison(&good_clean, cost_fields)?;

    let costed = with_disposable_income(&good_clean, cost_fields)?;
    let disposable_income_summary = describe(&costed, DISPOSABLE_INCOME_FIELD)?;
    let n = config.city_ranking_size;
    let most_expensive = city_costs(&bottom_n(&costed, DISPOSABLE_INCOME_FIELD, n)?)?;
    let least_expensive = city_costs(&top_n(&costed, DISPOSABLE_INCOME_FIELD, n)?)?;
    let affordability = affordability_split(&costed)?;

    let field_labels = labels.subset(
        cost_fields
            .names()
            .into_iter()
            .chain([cost_fields.mid_range_meal.as_str()]),
    );

    log::info!("Analysis finished in {:?}", start.elapsed());

    Ok(AnalysisOutcome {
        report: AnalysisReport {
            source_rows: source.num_rows(),
            source_top_countries,
            good: good_report,
            bad: bad_report,
            bad_top_null_fields,
            salary_summary,
            lowest_salary,
            highest_salary,
            cost_comparisons,
            meal_comparison: meals,
            disposable_income_summary,
            most_expensive,
            least_expensive,
            affordability,
            field_labels,
        },
        tables: PipelineTables {
            source,
            good: partition.good,
            bad: partition.bad,
            good_clean,
            bad_clean: bad_outcome.dataset,
            costed,
        },
    })
}

/// `(city, country, field)` rows of a dataset
fn city_values(dataset: &Dataset, field: &str) -> Result<Vec<CityValue>> {
    let cities = text_values(dataset.column("city")?)?;
    let countries = text_values(dataset.column("country")?)?;
    let values = numeric_values(dataset.column(field)?, field)?;

    Ok(cities
        .into_iter()
        .zip(countries)
        .zip(values)
        .filter_map(|((city, country), value)| {
            Some(CityValue {
                city: city.unwrap_or_default(),
                country: country.unwrap_or_default(),
                value: value?,
            })
        })
        .collect())
}

impl AnalysisReport {
    /// Dictionary description of `field`, or the field name itself
    #[must_use]
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_labels.get(field).map_or(field, String::as_str)
    }

    /// Write the report to the log at info level
    pub fn log_summary(&self) {
        log::info!("Source rows: {}", self.source_rows);
        for vc in &self.source_top_countries {
            log::info!("  {:<30} {:>6}", vc.value, vc.count);
        }

        for (label, part) in [("good", &self.good), ("bad", &self.bad)] {
            log::info!(
                "{} quality: {} rows, {} removed as incomplete, {} remain",
                label,
                part.rows,
                part.removed_incomplete,
                part.cleaned_rows
            );
            if !part.non_numeric_fields.is_empty() {
                log::warn!(
                    "{} quality: non-numeric fields {:?}",
                    label,
                    part.non_numeric_fields
                );
            }
            for vc in &part.top_countries {
                log::info!("  {:<30} {:>6}", vc.value, vc.count);
            }
        }

        for (field, count) in &self.bad_top_null_fields {
            log::info!("  missing in bad quality: {field:<10} {count:>6}");
        }

        self.log_column_summary(&self.salary_summary);

        for cv in &self.lowest_salary {
            log::info!("Lowest salary: {}, {} ({:.2})", cv.city, cv.country, cv.value);
        }
        for cv in &self.highest_salary {
            log::info!("Highest salary: {}, {} ({:.2})", cv.city, cv.country, cv.value);
        }

        for c in &self.cost_comparisons {
            let name = self.label(&c.field);
            if let Some(mean) = c.mean {
                log::info!("{}", format_report_line(&format!("mean {name}"), mean));
            }
            if let Some(pct) = c.percent_of_salary {
                log::info!("{}", format_report_line(&format!("{name} as % of salary"), pct));
            }
        }

        if let Some(meals) = &self.meal_comparison {
            log::info!("{}", format_report_line("mean inexpensive meal", meals.inexpensive_mean));
            log::info!(
                "{}",
                format_report_line("mean mid-range meal per person", meals.mid_range_per_person_mean)
            );
            log::info!("{}", format_report_line("mid-range premium per person", meals.difference));
        }

        self.log_column_summary(&self.disposable_income_summary);
        log::info!(
            "Cities with negative disposable income: {}, non-negative: {}",
            self.affordability.negative,
            self.affordability.non_negative
        );
        for c in &self.most_expensive {
            log::info!("Most expensive: {}, {} ({:.2})", c.city, c.country, c.disposable_income);
        }
        for c in &self.least_expensive {
            log::info!("Least expensive: {}, {} ({:.2})", c.city, c.country, c.disposable_income);
        }
    }

    fn log_column_summary(&self, s: &ColumnSummary) {
        log::info!("'{}' over {} cities", self.label(&s.field), s.count);
        let rows = [
            ("mean", s.mean),
            ("std", s.std),
            ("min", s.min),
            ("25%", s.q1),
            ("50%", s.median),
            ("75%", s.q3),
            ("max", s.max),
        ];
        for (name, value) in rows {
            if let Some(value) = value {
                log::info!("{}", format_report_line(name, value));
            }
        }
    }
}
