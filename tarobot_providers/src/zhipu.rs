use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tarobot_core::{ChatMessage, Interpreter, Role};
use tracing::info;

use crate::retry::retry_with_backoff;

const DEFAULT_MODEL: &str = "glm-4-flash";

/// Zhipu GLM chat-completions client used to elaborate on a retained draw.
pub struct ZhipuClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ZhipuClient {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        info!("Creating ZhipuClient");
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
            .to_string();

        Ok(content)
    }
}

#[async_trait]
impl Interpreter for ZhipuClient {
    async fn interpret(&self, prompt: &str) -> anyhow::Result<String> {
        let messages = vec![ChatMessage {
            role: Role::User,
            content: prompt.to_string(),
        }];
        let request = json!({
            "model": self.model,
            "messages": messages,
        });

        info!("Sending interpretation request to Zhipu API: model={}", self.model);

        // Backoff schedule: 2s, 4s, 6s, 8s, then a final attempt
        let delays: [u64; 4] = [2, 4, 6, 8];
        let content = retry_with_backoff(|| self.try_send(&request), &delays).await?;

        info!("Received interpretation from Zhipu API");
        Ok(content)
    }
}
