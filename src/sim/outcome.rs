//! Outcome selection
//!
//! The round's bucket and multiplier are decided here, before the ball
//! ever moves. A Box-Muller draw gives a bell-shaped distribution over
//! bucket indices so that the extreme, high-multiplier buckets stay rare.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ROWS, MIN_ROWS};

/// Variance profile selecting a multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" | "med" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// The committed result of a round, produced once and immutable after
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub bucket_index: usize,
    pub multiplier: f32,
}

impl Outcome {
    /// Payout for a bet resolved by this outcome
    pub fn payout(&self, bet: f32) -> f32 {
        bet * self.multiplier
    }
}

/// Symmetric house-edge multiplier tables, one row per bucket count.
/// Extremes always pay at least as much as the center.
const TABLE_8_LOW: [f32; 9] = [5.6, 2.1, 1.1, 1.0, 0.5, 1.0, 1.1, 2.1, 5.6];
const TABLE_8_MED: [f32; 9] = [13.0, 3.0, 1.3, 0.7, 0.4, 0.7, 1.3, 3.0, 13.0];
const TABLE_8_HIGH: [f32; 9] = [29.0, 4.0, 1.5, 0.3, 0.2, 0.3, 1.5, 4.0, 29.0];
const TABLE_9_LOW: [f32; 10] = [5.6, 2.0, 1.6, 1.0, 0.7, 0.7, 1.0, 1.6, 2.0, 5.6];
const TABLE_9_MED: [f32; 10] = [18.0, 4.0, 1.7, 0.9, 0.5, 0.5, 0.9, 1.7, 4.0, 18.0];
const TABLE_9_HIGH: [f32; 10] = [43.0, 7.0, 2.0, 0.6, 0.2, 0.2, 0.6, 2.0, 7.0, 43.0];
const TABLE_10_LOW: [f32; 11] = [8.9, 3.0, 1.4, 1.1, 1.0, 0.5, 1.0, 1.1, 1.4, 3.0, 8.9];
const TABLE_10_MED: [f32; 11] = [22.0, 5.0, 2.0, 1.4, 0.6, 0.4, 0.6, 1.4, 2.0, 5.0, 22.0];
const TABLE_10_HIGH: [f32; 11] = [76.0, 10.0, 3.0, 0.9, 0.3, 0.2, 0.3, 0.9, 3.0, 10.0, 76.0];
const TABLE_11_LOW: [f32; 12] = [8.4, 3.0, 1.9, 1.3, 1.0, 0.7, 0.7, 1.0, 1.3, 1.9, 3.0, 8.4];
const TABLE_11_MED: [f32; 12] = [24.0, 6.0, 3.0, 1.8, 0.7, 0.5, 0.5, 0.7, 1.8, 3.0, 6.0, 24.0];
const TABLE_11_HIGH: [f32; 12] = [
    120.0, 14.0, 5.2, 1.4, 0.4, 0.2, 0.2, 0.4, 1.4, 5.2, 14.0, 120.0,
];
const TABLE_12_LOW: [f32; 13] = [
    10.0, 3.0, 1.6, 1.4, 1.1, 1.0, 0.5, 1.0, 1.1, 1.4, 1.6, 3.0, 10.0,
];
const TABLE_12_MED: [f32; 13] = [
    33.0, 11.0, 4.0, 2.0, 1.1, 0.6, 0.4, 0.6, 1.1, 2.0, 4.0, 11.0, 33.0,
];
const TABLE_12_HIGH: [f32; 13] = [
    170.0, 24.0, 8.1, 2.0, 0.7, 0.2, 0.2, 0.2, 0.7, 2.0, 8.1, 24.0, 170.0,
];

/// Multiplier table for a board configuration, length `rows + 1`.
///
/// Out-of-range `rows` is a caller contract violation, not a runtime
/// condition; user input is validated before it reaches the engine.
pub fn multiplier_table(rows: usize, risk: RiskLevel) -> &'static [f32] {
    assert!(
        (MIN_ROWS..=MAX_ROWS).contains(&rows),
        "unsupported row count: {rows}"
    );
    match (rows, risk) {
        (8, RiskLevel::Low) => &TABLE_8_LOW,
        (8, RiskLevel::Medium) => &TABLE_8_MED,
        (8, RiskLevel::High) => &TABLE_8_HIGH,
        (9, RiskLevel::Low) => &TABLE_9_LOW,
        (9, RiskLevel::Medium) => &TABLE_9_MED,
        (9, RiskLevel::High) => &TABLE_9_HIGH,
        (10, RiskLevel::Low) => &TABLE_10_LOW,
        (10, RiskLevel::Medium) => &TABLE_10_MED,
        (10, RiskLevel::High) => &TABLE_10_HIGH,
        (11, RiskLevel::Low) => &TABLE_11_LOW,
        (11, RiskLevel::Medium) => &TABLE_11_MED,
        (11, RiskLevel::High) => &TABLE_11_HIGH,
        (12, RiskLevel::Low) => &TABLE_12_LOW,
        (12, RiskLevel::Medium) => &TABLE_12_MED,
        (12, RiskLevel::High) => &TABLE_12_HIGH,
        _ => unreachable!(),
    }
}

/// Draw the round's bucket from a centered bell curve.
///
/// Box-Muller turns two uniform samples into one normal sample, re-centered
/// to mean 0.5 with sigma 1/6 so nearly all mass lands in [0, 1]. A tail
/// sample outside the unit interval is replaced by one flat uniform draw
/// rather than redrawn, which caps the distortion from retries.
pub fn select_outcome<R: Rng>(rows: usize, risk: RiskLevel, rng: &mut R) -> Outcome {
    let multipliers = multiplier_table(rows, risk);
    let bucket_count = rows + 1;

    let mut u = 0.0f32;
    while u == 0.0 {
        u = rng.random();
    }
    let mut v = 0.0f32;
    while v == 0.0 {
        v = rng.random();
    }
    let mut num = (-2.0 * u.ln()).sqrt() * (std::f32::consts::TAU * v).cos();
    num = num / 6.0 + 0.5;
    if !(0.0..=1.0).contains(&num) {
        num = rng.random();
    }

    let bucket_index = ((num * bucket_count as f32).floor() as usize).min(bucket_count - 1);
    Outcome {
        bucket_index,
        multiplier: multipliers[bucket_index],
    }
}
