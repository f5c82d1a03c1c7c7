use tracing::info;

use crate::error::Result;
use crate::llm::{ChatCompletionRequest, CompletionClient};
use crate::models::LoanRiskRequest;
use crate::prompt::render_loan_risk_prompt;

/// Answer returned when the completion service replies without any choice.
pub const NO_RESPONSE_FALLBACK: &str = "No response from AI";

/// Ask the model for a risk assessment and return its reply untouched.
///
/// Exactly one completion call is made. The reply is expected to be a JSON fragment with
/// `risk_percentage` and `reason`, but it is relayed as opaque text.
pub async fn assess(client: &dyn CompletionClient, request: &LoanRiskRequest) -> Result<String> {
    let prompt = render_loan_risk_prompt(request);
    let payload = ChatCompletionRequest::single_prompt(client.model(), prompt);

    let completion = client.complete(&payload).await?;

    let assessment = match completion.first_content() {
        Some(content) => content.to_string(),
        None => {
            info!("Completion service returned no choices");
            NO_RESPONSE_FALLBACK.to_string()
        }
    };

    info!(length = assessment.len(), "Loan risk assessment received");
    Ok(assessment)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::RelayError;
    use crate::llm::{ChatCompletionResponse, Choice, ResponseMessage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned completion client that records every payload it receives.
    pub(crate) struct MockCompletionClient {
        reply: Option<Vec<&'static str>>,
        pub(crate) requests: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl MockCompletionClient {
        pub(crate) fn replying(choices: Vec<&'static str>) -> Self {
            Self {
                reply: Some(choices),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Fails every call with a decode error.
        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for MockCompletionClient {
        fn model(&self) -> &str {
            "llama-3.3-70b-versatile"
        }

        async fn complete(
            &self,
            request: &ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse> {
            self.requests.lock().unwrap().push(request.clone());

            match &self.reply {
                Some(choices) => Ok(ChatCompletionResponse {
                    choices: choices
                        .iter()
                        .map(|content| Choice {
                            message: ResponseMessage {
                                role: "assistant".to_string(),
                                content: Some(content.to_string()),
                            },
                        })
                        .collect(),
                }),
                None => Err(RelayError::Decode(
                    serde_json::from_str::<serde_json::Value>("<html>bad gateway").unwrap_err(),
                )),
            }
        }
    }

    pub(crate) fn sample_request() -> LoanRiskRequest {
        LoanRiskRequest {
            income: 50000,
            credit_score: 700,
            employment_years: 3,
            ev_model: "Model Y".to_string(),
            battery_health: 92.5,
            annual_mileage: 15000,
            charging_pattern: "home".to_string(),
            location: "urban".to_string(),
            driving_behavior: "moderate".to_string(),
            alternative_credit: false,
        }
    }

    #[tokio::test]
    async fn test_first_choice_is_passed_through_verbatim() {
        let reply = "  { \"risk_percentage\": 18, \"reason\": \"Solid credit.\" }\n";
        let client = MockCompletionClient::replying(vec![reply, "second"]);

        let assessment = assess(&client, &sample_request()).await.unwrap();

        assert_eq!(assessment, reply);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_not_validated() {
        let client = MockCompletionClient::replying(vec!["I cannot assess this applicant."]);

        let assessment = assess(&client, &sample_request()).await.unwrap();

        assert_eq!(assessment, "I cannot assess this applicant.");
    }

    #[tokio::test]
    async fn test_empty_choices_fall_back() {
        let client = MockCompletionClient::replying(vec![]);

        let assessment = assess(&client, &sample_request()).await.unwrap();

        assert_eq!(assessment, NO_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn test_payload_settings_are_fixed() {
        let client = MockCompletionClient::replying(vec!["ok"]);
        let mut request = sample_request();

        assess(&client, &request).await.unwrap();
        request.income = 1;
        request.battery_health = 47.123;
        request.alternative_credit = true;
        assess(&client, &request).await.unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for payload in requests.iter() {
            assert_eq!(payload.model, "llama-3.3-70b-versatile");
            assert_eq!(payload.temperature, 1.0);
            assert_eq!(payload.max_completion_tokens, 1024);
            assert_eq!(payload.top_p, 1.0);
            assert!(!payload.stream);
            assert!(payload.stop.is_none());
            assert_eq!(payload.messages.len(), 1);
            assert_eq!(payload.messages[0].role, "user");
        }
        assert!(requests[0].messages[0].content.contains("Battery Health: 92.50%"));
        assert!(requests[1].messages[0].content.contains("Battery Health: 47.12%"));
        assert!(requests[1].messages[0]
            .content
            .contains("Alternative Credit Considered: true"));
    }

    #[tokio::test]
    async fn test_client_failure_propagates() {
        let client = MockCompletionClient::failing();

        let err = assess(&client, &sample_request()).await.unwrap_err();

        assert!(matches!(err, RelayError::Decode(_)));
        assert_eq!(client.calls(), 1);
    }
}
