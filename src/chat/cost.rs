//! Usage accounting and monetary cost of chat exchanges.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::Deserialize;

/// Token usage reported by the provider for one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// USD prices per million tokens: (model prefix, input, output).
///
/// Dated snapshots (`gpt-4o-2024-08-06`) resolve through the longest
/// matching prefix, so `gpt-4o-mini` never falls back to `gpt-4o`.
const PRICING: &[(&str, f64, f64)] = &[
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4.1-nano", 0.10, 0.40),
    ("gpt-4.1-mini", 0.40, 1.60),
    ("gpt-4.1", 2.00, 8.00),
    ("gpt-4-turbo", 10.00, 30.00),
    ("gpt-4", 30.00, 60.00),
    ("gpt-3.5-turbo", 0.50, 1.50),
    ("o3-mini", 1.10, 4.40),
    ("o1-mini", 1.10, 4.40),
    ("o1", 15.00, 60.00),
];

fn price_for(model: &str) -> Option<(f64, f64)> {
    PRICING
        .iter()
        .filter(|(prefix, _, _)| model.starts_with(prefix))
        .max_by_key(|(prefix, _, _)| prefix.len())
        .map(|&(_, input, output)| (input, output))
}

/// A non-negative amount of money in USD.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);

    /// Create a cost; negative or non-finite amounts collapse to zero.
    pub fn new(usd: f64) -> Self {
        if usd.is_finite() && usd > 0.0 {
            Cost(usd)
        } else {
            Cost::ZERO
        }
    }

    /// Price a usage report for the given model.
    ///
    /// Returns `None` when the model has no known price.
    pub fn from_usage(model: &str, usage: &Usage) -> Option<Self> {
        let (input_rate, output_rate) = price_for(model)?;
        let input = usage.prompt_tokens as f64 / 1_000_000.0 * input_rate;
        let output = usage.completion_tokens as f64 / 1_000_000.0 * output_rate;
        Some(Cost::new(input + output))
    }

    pub fn usd(self) -> f64 {
        self.0
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.4}", self.0)
    }
}
