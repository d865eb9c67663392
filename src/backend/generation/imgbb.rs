//! ImgBB image hosting
//!
//! Uploads a generated image (base64, form-encoded) and returns its public URL.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;

use crate::backend::error::{BackendError, BackendResult};

#[derive(Deserialize)]
struct UploadResponse {
    data: UploadedImage,
}

#[derive(Deserialize)]
struct UploadedImage {
    url: String,
}

pub struct ImgbbClient<'a> {
    client: &'a Client,
    api_url: &'a str,
    api_key: &'a str,
}

impl<'a> ImgbbClient<'a> {
    pub fn new(client: &'a Client, api_url: &'a str, api_key: &'a str) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    pub async fn upload(&self, image: &[u8]) -> BackendResult<String> {
        let encoded = STANDARD.encode(image);

        let response = self
            .client
            .post(self.api_url)
            .query(&[("key", self.api_key)])
            .form(&[("image", encoded.as_str())])
            .send()
            .await
            .map_err(|e| BackendError::generation(format!("Upload network error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(BackendError::generation(format!(
                "Upload failed: {} - {}",
                status, error_text
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| BackendError::generation(format!("Failed to parse upload response: {}", e)))?;

        Ok(uploaded.data.url)
    }
}
