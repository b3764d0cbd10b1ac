//! Numeric sequences: the unit of sorting.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ParseError;
use crate::input::parse_number_list;

/// Upper bound on sequence length accepted by the sorting engines.
pub const MAX_SEQUENCE_LEN: usize = 500;

/// Minimum number of values in a custom array.
pub const MIN_CUSTOM_LEN: usize = 2;

/// Configuration for random array generation.
#[derive(Debug, Clone)]
pub struct ArrayConfig {
    /// Number of bars
    pub size: usize,
    /// Smallest generated value (inclusive)
    pub min: u32,
    /// Largest generated value (exclusive)
    pub max: u32,
    /// Seed for deterministic generation
    pub seed: u64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            size: 50,
            min: 10,
            max: 310,
            seed: 42,
        }
    }
}

/// Generate a random sequence of whole numbers in `[min, max)`.
pub fn generate_sequence(config: &ArrayConfig) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let size = config.size.min(MAX_SEQUENCE_LEN);
    let hi = config.max.saturating_sub(1).max(config.min);
    (0..size)
        .map(|_| f64::from(rng.gen_range(config.min..=hi)))
        .collect()
}

/// Parse a custom array typed by the user.
pub fn parse_custom_sequence(text: &str) -> Result<Vec<f64>, ParseError> {
    let values = parse_number_list(text, MIN_CUSTOM_LEN)?;
    if values.len() > MAX_SEQUENCE_LEN {
        return Err(ParseError::TooMany {
            max: MAX_SEQUENCE_LEN,
            got: values.len(),
        });
    }
    Ok(values)
}

/// Whether the values are in non-decreasing order.
pub fn is_sorted(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Number of pairs `(i, j)` with `i < j` and `values[i] > values[j]`.
pub fn count_inversions(values: &[f64]) -> usize {
    let mut count = 0;
    for i in 0..values.len() {
        for j in i + 1..values.len() {
            if values[i] > values[j] {
                count += 1;
            }
        }
    }
    count
}

/// Format a value for display, dropping a trailing `.0`.
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let config = ArrayConfig { size: 20, ..Default::default() };
        let a = generate_sequence(&config);
        let b = generate_sequence(&config);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert!(a.iter().all(|v| (10.0..310.0).contains(v)));
    }

    #[test]
    fn generation_clamps_size() {
        let config = ArrayConfig { size: 10_000, ..Default::default() };
        assert_eq!(generate_sequence(&config).len(), MAX_SEQUENCE_LEN);
    }

    #[test]
    fn generation_tolerates_degenerate_ranges() {
        let top = ArrayConfig { size: 3, min: u32::MAX, max: u32::MAX, seed: 1 };
        assert_eq!(generate_sequence(&top), vec![f64::from(u32::MAX); 3]);

        let inverted = ArrayConfig { size: 4, min: 50, max: 5, seed: 1 };
        assert_eq!(generate_sequence(&inverted), vec![50.0; 4]);

        let wide = ArrayConfig { size: 30, min: 0, max: u32::MAX, seed: 9 };
        assert!(generate_sequence(&wide).iter().all(|v| *v < f64::from(u32::MAX)));
    }

    #[test]
    fn custom_sequence_bounds() {
        assert_eq!(parse_custom_sequence("3 1 2").unwrap(), vec![3.0, 1.0, 2.0]);
        assert!(parse_custom_sequence("3").is_err());
    }

    #[test]
    fn inversions() {
        assert_eq!(count_inversions(&[1.0, 2.0, 3.0]), 0);
        assert_eq!(count_inversions(&[3.0, 2.0, 1.0]), 3);
        assert_eq!(count_inversions(&[2.0, 2.0, 1.0]), 2);
    }

    #[test]
    fn display_format() {
        assert_eq!(format_value(5.0), "5");
        assert_eq!(format_value(2.5), "2.5");
    }
}
