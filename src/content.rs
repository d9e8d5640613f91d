use crate::config::ProviderConfig;
use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::future::Future;

// Open Trivia DB structures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriviaRecord {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// Root envelope matching the Open Trivia DB response
#[derive(Debug, Clone, Deserialize)]
struct OpenTdbResponse {
    response_code: u32,
    #[serde(default)]
    results: Vec<TriviaRecord>,
}

/// A provider of one fixed batch of trivia records.
pub trait QuestionSource: Send + Sync + 'static {
    fn fetch_questions(
        &self,
    ) -> impl Future<Output = Result<Vec<TriviaRecord>, ProviderError>> + Send;
}

pub struct OpenTdbParser;

impl OpenTdbParser {
    #[tracing::instrument(skip(content), fields(content.length = content.len()))]
    pub fn parse_batch(content: &str) -> Result<Vec<TriviaRecord>, ProviderError> {
        tracing::debug!("Parsing Open Trivia DB payload");

        let response: OpenTdbResponse = serde_json::from_str(content)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse JSON: {}", e)))?;

        if response.response_code != 0 {
            return Err(ProviderError::ResponseCode {
                code: response.response_code,
                reason: describe_response_code(response.response_code),
            });
        }

        Ok(response.results)
    }
}

fn describe_response_code(code: u32) -> &'static str {
    match code {
        1 => "not enough questions for the query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limited",
        _ => "unknown response code",
    }
}

/// Fetches a question batch from Open Trivia DB (or any endpoint speaking its format).
#[derive(Debug, Clone)]
pub struct OpenTdbClient {
    client: reqwest::Client,
    url: String,
}

impl OpenTdbClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ProviderError::Client)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QuestionSource for OpenTdbClient {
    #[tracing::instrument(skip(self), fields(http.url = %self.url))]
    async fn fetch_questions(&self) -> Result<Vec<TriviaRecord>, ProviderError> {
        tracing::debug!("Fetching question batch");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProviderError::HttpFetch {
                url: self.url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ProviderError::HttpFetch {
            url: self.url.clone(),
            source: e,
        })?;

        let records = OpenTdbParser::parse_batch(&body)?;
        tracing::info!(questions.count = records.len(), "Fetched question batch");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_tdb_payload() {
        let content = r#"{
  "response_code": 0,
  "results": [
    {
      "type": "multiple",
      "difficulty": "easy",
      "category": "Geography",
      "question": "What is the capital of Sweden?",
      "correct_answer": "Stockholm",
      "incorrect_answers": ["Oslo", "Copenhagen", "Helsinki"]
    },
    {
      "type": "boolean",
      "difficulty": "medium",
      "category": "Science &amp; Nature",
      "question": "The sun is a star.",
      "correct_answer": "True",
      "incorrect_answers": ["False"]
    }
  ]
}"#;

        let records = OpenTdbParser::parse_batch(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "What is the capital of Sweden?");
        assert_eq!(records[0].correct_answer, "Stockholm");
        assert_eq!(records[0].incorrect_answers.len(), 3);
        assert_eq!(records[0].kind.as_deref(), Some("multiple"));
        assert_eq!(records[1].incorrect_answers, vec!["False"]);
        assert_eq!(records[1].difficulty.as_deref(), Some("medium"));
    }

    #[test]
    fn test_parse_rejects_non_zero_response_code() {
        let content = r#"{"response_code": 5, "results": []}"#;
        let err = OpenTdbParser::parse_batch(content).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ResponseCode {
                code: 5,
                reason: "rate limited"
            }
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = OpenTdbParser::parse_batch("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_parse_tolerates_missing_metadata() {
        let content = r#"{"response_code": 0, "results": [
            {"question": "2+2?", "correct_answer": "4", "incorrect_answers": ["3", "5"]}
        ]}"#;
        let records = OpenTdbParser::parse_batch(content).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].category.is_none());
        assert!(records[0].kind.is_none());
    }

    #[test]
    fn test_client_uses_configured_url() {
        let config = ProviderConfig {
            url: "http://localhost:9999/api.php?amount=10".to_string(),
            timeout_seconds: Some(5),
        };
        let client = OpenTdbClient::new(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:9999/api.php?amount=10");
    }
}
