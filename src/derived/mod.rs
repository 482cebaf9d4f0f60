//! Derived per-city metrics.
//!
//! The disposable income of a city is its average net salary minus the rent
//! of a one-bedroom flat in the centre, basic utilities, and two cheap
//! restaurant meals a day for a month:
//!
//! `salary - rent - utilities - meal * MEALS_PER_MONTH`
//!
//! It is a rough comparison figure, not an economic statistic.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::DataType;
use arrow_schema::Field;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::stats::mean;
use crate::utils::arrow::numeric_values;

/// Restaurant meals counted per month (two a day)
pub const MEALS_PER_MONTH: f64 = 60.0;

/// People sharing the mid-range restaurant meal
pub const DINERS_PER_MID_RANGE_MEAL: f64 = 2.0;

/// Name of the appended field
pub const DISPOSABLE_INCOME_FIELD: &str = "disposable_income";

/// Source fields of the disposable income formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostFields {
    /// Average monthly net salary (after tax)
    pub salary: String,
    /// Apartment (1 bedroom) in city centre
    pub rent: String,
    /// Basic utilities for an 85m2 apartment
    pub utilities: String,
    /// Meal at an inexpensive restaurant
    pub meal: String,
    /// Meal for two at a mid-range restaurant, three courses
    pub mid_range_meal: String,
}

impl Default for CostFields {
    fn default() -> Self {
        Self {
            salary: "x54".to_string(),
            rent: "x48".to_string(),
            utilities: "x36".to_string(),
            meal: "x1".to_string(),
            mid_range_meal: "x2".to_string(),
        }
    }
}

impl CostFields {
    /// Disposable income inputs in formula order: salary, rent, utilities, meal
    #[must_use]
    pub fn names(&self) -> [&str; 4] {
        [&self.salary, &self.rent, &self.utilities, &self.meal]
    }
}

/// Disposable income for a single set of figures
#[must_use]
pub fn disposable_income(salary: f64, rent: f64, utilities: f64, meal: f64) -> f64 {
    salary - rent - utilities - meal * MEALS_PER_MONTH
}

/// Append the `disposable_income` field to a dataset
///
/// Rows missing any input value get a null result.
///
/// # Errors
/// Returns a `FieldError` if a source field is absent or non-numeric, or if
/// the dataset already has a `disposable_income` field.
pub fn with_disposable_income(dataset: &Dataset, fields: &CostFields) -> Result<Dataset> {
    let missing: Vec<&str> = fields
        .names()
        .into_iter()
        .filter(|name| !dataset.has_field(name))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::field(format!(
            "Fields required for disposable income not found: {}",
            missing.join(", ")
        )));
    }

    let [salary, rent, utilities, meal] = fields
        .names()
        .map(|name| dataset.column(name).and_then(|c| numeric_values(c, name)));
    let (salary, rent, utilities, meal) = (salary?, rent?, utilities?, meal?);

    let income: Float64Array = (0..dataset.num_rows())
        .map(|row| {
            Some(disposable_income(
                salary[row]?,
                rent[row]?,
                utilities[row]?,
                meal[row]?,
            ))
        })
        .collect();

    let nullable = income.null_count() > 0;
    let array: ArrayRef = Arc::new(income);

    dataset.with_field(
        Field::new(DISPOSABLE_INCOME_FIELD, DataType::Float64, nullable),
        array,
    )
}

/// A city with its computed disposable income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCost {
    pub city: String,
    pub country: String,
    pub disposable_income: f64,
}

/// Extract `(city, country, disposable_income)` records from a costed dataset
pub fn city_costs(dataset: &Dataset) -> Result<Vec<CityCost>> {
    let projected = dataset.project(&["city", "country", DISPOSABLE_INCOME_FIELD])?;
    Ok(serde_arrow::from_record_batch(projected.batch())?)
}

/// Cities with negative vs non-negative disposable income
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AffordabilitySplit {
    pub negative: usize,
    pub non_negative: usize,
}

/// Count rows on either side of zero disposable income; nulls are skipped
pub fn affordability_split(dataset: &Dataset) -> Result<AffordabilitySplit> {
    let values = numeric_values(
        dataset.column(DISPOSABLE_INCOME_FIELD)?,
        DISPOSABLE_INCOME_FIELD,
    )?;

    Ok(values
        .into_iter()
        .flatten()
        .fold(AffordabilitySplit::default(), |mut split, v| {
            if v < 0.0 {
                split.negative += 1;
            } else {
                split.non_negative += 1;
            }
            split
        }))
}

/// One person's inexpensive meal against their share of a mid-range meal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealComparison {
    pub inexpensive_mean: f64,
    pub mid_range_per_person_mean: f64,
    /// Extra paid per person at the mid-range restaurant
    pub difference: f64,
}

/// Compare mean meal prices
///
/// `None` when the dataset has no mid-range meal field, or either field has
/// no values.
pub fn meal_comparison(
    dataset: &Dataset,
    fields: &CostFields,
) -> Result<Option<MealComparison>> {
    if !dataset.has_field(&fields.mid_range_meal) {
        log::warn!(
            "Field '{}' not found; meal comparison skipped",
            fields.mid_range_meal
        );
        return Ok(None);
    }

    let inexpensive = mean(dataset, &fields.meal)?;
    let mid_range = mean(dataset, &fields.mid_range_meal)?;

    Ok(inexpensive.zip(mid_range).map(|(inexpensive, for_two)| {
        let per_person = for_two / DINERS_PER_MID_RANGE_MEAL;
        MealComparison {
            inexpensive_mean: inexpensive,
            mid_range_per_person_mean: per_person,
            difference: per_person - inexpensive,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::loader::read_csv;
    use std::io::Cursor;

    fn read(text: &str) -> Dataset {
        read_csv(Cursor::new(text.to_string()), &LoaderConfig::default()).unwrap()
    }

    const TWO_CITIES: &str =
        "city,country,x54,x48,x36,x1\nA,P,1000,400,100,5\nB,Q,2000,500,150,10\n";

    #[test]
    fn test_disposable_income_values() {
        let ds = with_disposable_income(&read(TWO_CITIES), &CostFields::default()).unwrap();
        let values = numeric_values(ds.column(DISPOSABLE_INCOME_FIELD).unwrap(), "d").unwrap();
        assert_eq!(values, vec![Some(200.0), Some(750.0)]);
        assert_eq!(ds.num_rows(), 2);
        assert_eq!(ds.field_names().last().map(String::as_str), Some(DISPOSABLE_INCOME_FIELD));
    }

    #[test]
    fn test_missing_source_field() {
        let ds = read("city,country,x54,x48\nA,P,1,1\n");
        let err = with_disposable_income(&ds, &CostFields::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Field(_)));
        assert!(err.to_string().contains("x36"));
        assert!(err.to_string().contains("x1"));
    }

    #[test]
    fn test_missing_cell_gives_null() {
        let ds = read("city,country,x54,x48,x36,x1\nA,P,1000,,100,5\n");
        let ds = with_disposable_income(&ds, &CostFields::default()).unwrap();
        let values = numeric_values(ds.column(DISPOSABLE_INCOME_FIELD).unwrap(), "d").unwrap();
        assert_eq!(values, vec![None]);
    }

    #[test]
    fn test_city_costs_and_split() {
        let ds = read("city,country,x54,x48,x36,x1\nA,P,100,400,100,5\nB,Q,2000,500,150,10\n");
        let ds = with_disposable_income(&ds, &CostFields::default()).unwrap();

        let costs = city_costs(&ds).unwrap();
        assert_eq!(costs.len(), 2);
        assert_eq!(costs[0].city, "A");
        assert_eq!(costs[0].disposable_income, -700.0);

        let split = affordability_split(&ds).unwrap();
        assert_eq!(split, AffordabilitySplit { negative: 1, non_negative: 1 });
    }

    #[test]
    fn test_meal_comparison() {
        let ds = read("city,country,x1,x2\nA,P,5,20\nB,Q,10,40\n");
        let cmp = meal_comparison(&ds, &CostFields::default()).unwrap().unwrap();
        assert_eq!(cmp.inexpensive_mean, 7.5);
        assert_eq!(cmp.mid_range_per_person_mean, 15.0);
        assert_eq!(cmp.difference, 7.5);
    }

    #[test]
    fn test_meal_comparison_without_values() {
        let fields = CostFields::default();
        assert_eq!(meal_comparison(&read(TWO_CITIES), &fields).unwrap(), None);
        assert_eq!(meal_comparison(&read("x1,x2\n"), &fields).unwrap(), None);
        assert!(matches!(
            meal_comparison(&read("city,x2\nA,3\n"), &fields),
            Err(AnalysisError::Field(_))
        ));
    }

    #[test]
    fn test_meals_constant() {
        assert_eq!(disposable_income(0.0, 0.0, 0.0, 1.0), -MEALS_PER_MONTH);
    }
}
