// Health Grading - Convert anomaly scores to letter grades

use serde::{Deserialize, Serialize};

/// Letter grade shown next to a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl HealthGrade {
    /// Get color for grade
    pub fn color(&self) -> &'static str {
        match self {
            HealthGrade::APlus | HealthGrade::A => "green",
            HealthGrade::B => "blue",
            HealthGrade::C => "yellow",
            HealthGrade::D | HealthGrade::F => "red",
        }
    }

    /// Get description
    pub fn description(&self) -> &'static str {
        match self {
            HealthGrade::APlus => "Excellent - No certificate findings",
            HealthGrade::A => "Good - Minor findings",
            HealthGrade::B => "Fair - Findings worth scheduling",
            HealthGrade::C => "Weak - Several findings",
            HealthGrade::D => "Poor - Serious findings",
            HealthGrade::F => "Failing - Certificate unusable or scan failed",
        }
    }

    /// Convert score to grade
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => HealthGrade::APlus,
            80..=89 => HealthGrade::A,
            70..=79 => HealthGrade::B,
            60..=69 => HealthGrade::C,
            50..=59 => HealthGrade::D,
            _ => HealthGrade::F,
        }
    }
}

impl std::fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthGrade::APlus => write!(f, "A+"),
            HealthGrade::A => write!(f, "A"),
            HealthGrade::B => write!(f, "B"),
            HealthGrade::C => write!(f, "C"),
            HealthGrade::D => write!(f, "D"),
            HealthGrade::F => write!(f, "F"),
        }
    }
}
