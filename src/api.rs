use async_trait::async_trait;
use reqwest::Client;

use crate::config::ApiConfig;
use crate::error::{LecternError, Result};
use crate::source::LectureSource;
use crate::types::Lecture;

/// HTTP client for the lecture list endpoint.
pub struct LectureApi {
    client: Client,
    config: ApiConfig,
    token: Option<String>,
}

impl std::fmt::Debug for LectureApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LectureApi")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl LectureApi {
    pub fn new(config: ApiConfig, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            token,
        }
    }

    fn api_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let endpoint = self.config.endpoint.trim_start_matches('/');
        format!("{}/{}", base, endpoint)
    }
}

/// Decode a page body. The endpoint answers with a bare JSON array.
fn decode_page(body: &str) -> Result<Vec<Lecture>> {
    serde_json::from_str(body).map_err(|e| LecternError::Fetch(format!("bad page body: {}", e)))
}

#[async_trait]
impl LectureSource for LectureApi {
    fn name(&self) -> &str {
        &self.config.base_url
    }

    async fn fetch_lectures(&self, page: u32, page_size: u32) -> Result<Vec<Lecture>> {
        let url = self.api_url();
        tracing::debug!(%url, page, page_size, "fetching lectures");

        let mut request = self.client.get(&url).query(&[
            (self.config.page_param.as_str(), page.to_string()),
            (self.config.size_param.as_str(), page_size.to_string()),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LecternError::Fetch(format!("lecture API {}: {}", status, text)));
        }

        let body = response.text().await?;
        decode_page(&body)
    }
}
