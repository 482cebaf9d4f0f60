use cost_analysis::Dataset;
use cost_analysis::utils::arrow::{numeric_values, text_values};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Text of a column, missing cells as empty strings
pub fn texts(dataset: &Dataset, field: &str) -> Vec<String> {
    text_values(dataset.column(field).unwrap())
        .unwrap()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

/// Present numbers of a column
pub fn numbers(dataset: &Dataset, field: &str) -> Vec<f64> {
    numeric_values(dataset.column(field).unwrap(), field)
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

/// Random cost table with unique city names, some blank and some `N/A` cells
pub fn random_cost_csv(seed: u64, rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::from("city,country,x1,x36,x48,x54,data_quality\n");

    for i in 0..rows {
        let country = format!("K{}", rng.random_range(0..4));
        out.push_str(&format!("C{i},{country}"));
        for _ in 0..4 {
            let roll: f64 = rng.random();
            let cell = if roll < 0.1 {
                String::new()
            } else if roll < 0.13 {
                "N/A".to_string()
            } else {
                format!("{:.2}", rng.random_range(0.0..5000.0))
            };
            out.push(',');
            out.push_str(&cell);
        }
        out.push_str(if rng.random_bool(0.4) { ",1\n" } else { ",0\n" });
    }

    out
}
