//! Configuration for the analysis pipeline.

use std::path::PathBuf;

use crate::derived::CostFields;

/// Default number of rows per CSV read batch
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Name of the quality flag column in the source table
pub const DEFAULT_QUALITY_FIELD: &str = "data_quality";

/// Identifier columns that are text rather than numeric indicators
pub const DEFAULT_IDENTIFIER_FIELDS: [&str; 2] = ["city", "country"];

/// Configuration for reading delimited input
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Field delimiter
    pub delimiter: u8,
    /// Rows per read batch; batches are concatenated after reading
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Configuration for a full analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Input reading options
    pub loader: LoaderConfig,
    /// Name of the boolean quality column
    pub quality_field: String,
    /// Columns excluded from numeric validation and conversion
    pub identifier_fields: Vec<String>,
    /// Column holding the country name, used for frequency rankings
    pub country_field: String,
    /// Columns feeding the disposable income formula
    pub cost_fields: CostFields,
    /// Number of cities listed at each end of the disposable income ranking
    pub city_ranking_size: usize,
    /// Number of countries listed in the city-count ranking of each partition
    pub country_ranking_size: usize,
    /// Number of countries listed in the city-count ranking of the whole table
    pub source_country_ranking_size: usize,
    /// Number of columns listed in the missing-value ranking
    pub null_ranking_size: usize,
    /// Data dictionary mapping field names to indicator descriptions
    pub dictionary_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            quality_field: DEFAULT_QUALITY_FIELD.to_string(),
            identifier_fields: DEFAULT_IDENTIFIER_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            country_field: "country".to_string(),
            cost_fields: CostFields::default(),
            city_ranking_size: 5,
            country_ranking_size: 10,
            source_country_ranking_size: 5,
            null_ranking_size: 5,
            dictionary_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Build a configuration from defaults overridden by `COST_ANALYSIS_*`
    /// environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(delimiter) = env_var("COST_ANALYSIS_DELIMITER")
            .and_then(|s| s.bytes().next())
        {
            config.loader.delimiter = delimiter;
        }
        if let Some(batch_size) = env_parse::<usize>("COST_ANALYSIS_BATCH_SIZE") {
            config.loader.batch_size = batch_size.max(1);
        }
        if let Some(field) = env_var("COST_ANALYSIS_QUALITY_FIELD") {
            config.quality_field = field;
        }
        if let Some(n) = env_parse::<usize>("COST_ANALYSIS_TOP_N") {
            config.city_ranking_size = n;
        }
        if let Some(path) = env_var("COST_ANALYSIS_DICTIONARY") {
            config.dictionary_path = Some(PathBuf::from(path));
        }

        config
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_var(key).and_then(|s| s.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.quality_field, "data_quality");
        assert_eq!(config.identifier_fields, vec!["city", "country"]);
        assert_eq!(config.dictionary_path, None);
        assert_eq!(config.loader.delimiter, b',');
        assert_eq!(config.cost_fields.salary, "x54");
    }
}
