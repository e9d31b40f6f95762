use serde::{Serialize, Serializer};

use crate::analysis::rules::{word_count, RULES};

/// Qualitative tier chosen from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtsStatus {
    Excellent,
    Good,
    HighRisk,
}

impl AtsStatus {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => AtsStatus::Excellent,
            60..=79 => AtsStatus::Good,
            _ => AtsStatus::HighRisk,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AtsStatus::Excellent => {
                "Excellent! Highly optimized and likely to pass modern ATS with ease."
            }
            AtsStatus::Good => {
                "Good. Will pass, but address recommendations for maximum visibility."
            }
            AtsStatus::HighRisk => {
                "High Risk. Your resume may be filtered by ATS. Address the critical red flags immediately."
            }
        }
    }
}

impl Serialize for AtsStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub status: AtsStatus,
    pub recommendations: Vec<String>,
    pub word_count: usize,
}

/// Scores resume text against the fixed rule set. Total over all inputs.
///
/// Rule points accumulate as a real number; the final score is the floor of the
/// sum clamped to 0..=100.
pub fn analyze(text: &str) -> AnalysisResult {
    let text = text.to_lowercase();
    let word_count = word_count(&text);

    let (total, recommendations) = RULES.iter().fold(
        (0.0_f64, Vec::with_capacity(RULES.len())),
        |(total, mut recommendations), rule| {
            let outcome = rule(&text, word_count);
            recommendations.extend(outcome.recommendation);
            (total + outcome.points, recommendations)
        },
    );

    let score = total.floor().clamp(0.0, 100.0) as u32;

    AnalysisResult {
        score,
        status: AtsStatus::from_score(score),
        recommendations,
        word_count,
    }
}
