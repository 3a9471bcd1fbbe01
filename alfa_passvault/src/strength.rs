//! ALFA PassVault - Password Strength Scoring
//!
//! Deterministic heuristic: one point per length threshold reached and one
//! point per character class present, eight points at most.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::generator::CharClass;

/// Length thresholds, one point each
const LENGTH_THRESHOLDS: [usize; 4] = [8, 12, 16, 20];

const MAX_POINTS: u32 = (LENGTH_THRESHOLDS.len() + CharClass::ALL.len()) as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthLabel {
    None,
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLabel {
    fn from_points(points: u32) -> Self {
        match points {
            0 => Self::None,
            1..=2 => Self::Weak,
            3..=4 => Self::Fair,
            5..=6 => Self::Good,
            _ => Self::Strong,
        }
    }

    pub fn tier(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Weak => "weak",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Strong => "strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    /// 0..=100
    pub value: u8,
    pub label: StrengthLabel,
    pub tier: u8,
}

/// Score a password
pub fn score(password: &str) -> StrengthReport {
    let length = password.chars().count();
    let classes: BTreeSet<CharClass> = password.chars().map(CharClass::of).collect();

    let length_points = LENGTH_THRESHOLDS.iter().filter(|&&t| length >= t).count() as u32;
    let points = length_points + classes.len() as u32;

    let label = StrengthLabel::from_points(points);
    StrengthReport {
        value: (points * 100 / MAX_POINTS) as u8,
        label,
        tier: label.tier(),
    }
}
