use serde::{Deserialize, Serialize};

/// Applicant and vehicle details submitted for an EV loan risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRiskRequest {
    pub income: i64,
    pub credit_score: i64,
    pub employment_years: i64,
    pub ev_model: String,
    /// Battery state of health, as a percentage.
    pub battery_health: f64,
    pub annual_mileage: i64,
    pub charging_pattern: String,
    pub location: String,
    pub driving_behavior: String,
    pub alternative_credit: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub loan_risk_assessment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
