//! Chat-completions categorizer.
//!
//! Directions are already settled by the parser; the model only picks a
//! label per transaction. Whatever it answers is validated downstream by
//! `apply_categories`.

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use sift_finance::{CategorizeError, CategoryRequest, Categorizer};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::LlmSection;

const SYSTEM_PROMPT: &str = "\
You label bank statement transactions. Each input item has an index, a \
direction (credit = money in, debit = money out) and the bank's narration. \
Never change the direction.

Credits may only be labelled income or dividend. Use dividend only when the \
narration says DIVIDEND.

Debits may be labelled food, bills, shopping, transport, health, \
entertainment, investment, transfer, emi or other:
- food: groceries, supermarkets, restaurants, Zomato, Swiggy
- bills: utilities, rent, mobile recharge, subscriptions
- shopping: Amazon, Flipkart, retail stores
- transport: Uber, Ola, metro, railways, fuel
- health: hospitals, pharmacies, clinics
- entertainment: movies, streaming, gaming
- investment: brokers, mutual funds, SIPs
- transfer: UPI/IMPS/NEFT payments to individuals
- emi: loan and EMI repayments
- other: nothing else fits

Answer with JSON only: {\"categories\": [{\"index\": 0, \"category\": \"food\"}]}";

#[derive(Debug, Clone)]
pub struct LlmCategorizer {
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
    timeout: Duration,
}

impl LlmCategorizer {
    /// Build from `[llm]`, reading the key from the configured env var.
    pub fn from_config(section: &LlmSection) -> Result<Self, CategorizeError> {
        let api_key = std::env::var(&section.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CategorizeError::MissingApiKey {
                env: section.api_key_env.clone(),
            })?;
        Ok(Self {
            base_url: section.base_url.trim_end_matches('/').to_string(),
            model: section.model.clone(),
            temperature: section.temperature,
            api_key,
            timeout: Duration::from_secs(section.timeout_secs.max(1)),
        })
    }

    fn complete(&self, user: &str) -> Result<String, CategorizeError> {
        // `#[tokio::main]` means we are usually inside a runtime already;
        // nested `block_on` would panic.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(user)))
        } else {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| CategorizeError::Transport(format!("create tokio runtime: {e}")))?;
            rt.block_on(self.complete_async(user))
        }
    }

    async fn complete_async(&self, user: &str) -> Result<String, CategorizeError> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            t: &'static str,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            response_format: ResponseFormat,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat { t: "json_object" },
        };

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CategorizeError::Transport(e.to_string()))?;
        let resp = client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CategorizeError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CategorizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| CategorizeError::Malformed(format!("response body: {e}")))?;
        out.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CategorizeError::Malformed("no message content".to_string()))
    }
}

impl Categorizer for LlmCategorizer {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn categorize(
        &self,
        requests: &[CategoryRequest],
    ) -> Result<HashMap<usize, String>, CategorizeError> {
        if requests.is_empty() {
            return Ok(HashMap::new());
        }
        info!(model = %self.model, transactions = requests.len(), "requesting categories");
        let content = self.complete(&user_prompt(requests)?)?;
        let labels = parse_labels(&content)?;
        debug!(labelled = labels.len(), "categories received");
        Ok(labels)
    }
}

fn user_prompt(requests: &[CategoryRequest]) -> Result<String, CategorizeError> {
    let items = serde_json::to_string(requests)
        .map_err(|e| CategorizeError::Malformed(format!("encode request: {e}")))?;
    Ok(format!("Label these transactions:\n{items}"))
}

/// Read `{"categories": [{"index", "category"}]}`, tolerating a code fence.
fn parse_labels(content: &str) -> Result<HashMap<usize, String>, CategorizeError> {
    #[derive(Deserialize)]
    struct Labels {
        categories: Vec<Label>,
    }

    #[derive(Deserialize)]
    struct Label {
        index: usize,
        category: String,
    }

    let json = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let labels: Labels =
        serde_json::from_str(json).map_err(|e| CategorizeError::Malformed(e.to_string()))?;
    Ok(labels
        .categories
        .into_iter()
        .map(|l| (l.index, l.category))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::Direction;

    #[test]
    fn test_parse_labels() {
        let labels = parse_labels(
            r#"{"categories": [{"index": 0, "category": "income"}, {"index": 2, "category": "food"}]}"#,
        )
        .unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[&2], "food");
    }

    #[test]
    fn test_parse_labels_in_code_fence() {
        let labels =
            parse_labels("```json\n{\"categories\": [{\"index\": 1, \"category\": \"emi\"}]}\n```")
                .unwrap();
        assert_eq!(labels[&1], "emi");
    }

    #[test]
    fn test_malformed_answer() {
        let err = parse_labels("Sure! Here are your categories: food").unwrap_err();
        assert!(matches!(err, CategorizeError::Malformed(_)));
    }

    #[test]
    fn test_prompt_lists_requests() {
        let prompt = user_prompt(&[CategoryRequest {
            index: 3,
            direction: Direction::Debit,
            description: "UPI/SWIGGY/1".to_string(),
        }])
        .unwrap();
        assert!(prompt.contains(r#""index":3"#));
        assert!(prompt.contains(r#""direction":"debit""#));
    }

    #[test]
    fn test_missing_key() {
        let section = LlmSection {
            api_key_env: "SIFT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmSection::default()
        };
        let err = LlmCategorizer::from_config(&section).unwrap_err();
        assert!(matches!(err, CategorizeError::MissingApiKey { .. }));
    }
}
