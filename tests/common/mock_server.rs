//! Mock server helpers for integration tests
//!
//! One wiremock server per external API. Mocks mounted with `.expect(n)`
//! are verified when the server is dropped at the end of the test.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bytes returned by the fake image model
pub const FAKE_PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

pub const HOSTED_IMAGE_URL: &str = "https://i.ibb.co/test/room.png";

pub struct MockUpstreams {
    pub huggingface: MockServer,
    pub imgbb: MockServer,
    pub stripe: MockServer,
}

impl MockUpstreams {
    pub async fn start() -> Self {
        Self {
            huggingface: MockServer::start().await,
            imgbb: MockServer::start().await,
            stripe: MockServer::start().await,
        }
    }

    /// Model answers with an image, exactly `times` times
    pub async fn expect_images(&self, times: u64) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
            .expect(times)
            .mount(&self.huggingface)
            .await;
    }

    /// Image host accepts uploads, exactly `times` times
    pub async fn expect_uploads(&self, times: u64) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "url": HOSTED_IMAGE_URL },
                "success": true,
                "status": 200
            })))
            .expect(times)
            .mount(&self.imgbb)
            .await;
    }

    /// Model is still loading
    pub async fn model_loading(&self, estimated_time: f64) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model is currently loading",
                "estimated_time": estimated_time
            })))
            .mount(&self.huggingface)
            .await;
    }

    pub async fn upload_fails(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&self.imgbb)
            .await;
    }

    pub async fn expect_stripe_customers(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "cus_test_1" })),
            )
            .expect(times)
            .mount(&self.stripe)
            .await;
    }

    pub async fn expect_checkout_sessions(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .expect(times)
            .mount(&self.stripe)
            .await;
    }
}
