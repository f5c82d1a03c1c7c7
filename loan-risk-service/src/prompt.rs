use crate::models::LoanRiskRequest;

/// Render the applicant details into the instruction sent to the model.
///
/// The model is asked to answer with `{ "risk_percentage": X, "reason": "..." }`, but nothing
/// downstream relies on it doing so.
pub fn render_loan_risk_prompt(request: &LoanRiskRequest) -> String {
    format!(
        "Evaluate the loan risk for an EV buyer and provide a risk percentage (0-100%) along with a brief reason. \
         Respond in this format: {{ \"risk_percentage\": X, \"reason\": \"Your brief reason here.\" }} \
         Details: Income: {}, Credit Score: {}, Employment: {} years, EV Model: {}, Battery Health: {:.2}%, \
         Annual Mileage: {} km, Charging Pattern: {}, Location: {}, Driving Behavior: {}, \
         Alternative Credit Considered: {}.",
        request.income,
        request.credit_score,
        request.employment_years,
        request.ev_model,
        request.battery_health,
        request.annual_mileage,
        request.charging_pattern,
        request.location,
        request.driving_behavior,
        request.alternative_credit,
    )
}
