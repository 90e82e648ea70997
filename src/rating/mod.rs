// Rating module - Health grades derived from anomaly scores

pub mod grader;

pub use grader::HealthGrade;
