/**
 * Stripe API Client
 *
 * Minimal form-encoded client for the two calls the checkout flow needs:
 * creating a customer and creating a subscription checkout session.
 * Authentication is HTTP basic with the secret key as the user name.
 */

use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};

#[derive(Debug, Deserialize)]
struct Customer {
    id: String,
}

/// Checkout session as returned to the browser
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Everything needed to open a subscription checkout
#[derive(Debug, Clone)]
pub struct CheckoutParams<'a> {
    pub customer_id: &'a str,
    pub price_id: &'a str,
    pub account_id: Uuid,
    pub success_url: String,
    pub cancel_url: String,
}

pub struct StripeClient<'a> {
    client: &'a Client,
    api_base: &'a str,
    secret_key: &'a str,
}

impl<'a> StripeClient<'a> {
    pub fn new(client: &'a Client, api_base: &'a str, secret_key: &'a str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/'),
            secret_key,
        }
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> BackendResult<T> {
        let url = format!("{}{}", self.api_base, path);

        let response = self
            .client
            .post(&url)
            .basic_auth(self.secret_key, Some(""))
            .form(form)
            .send()
            .await
            .map_err(|e| BackendError::payment(format!("Stripe error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::payment(format!("Stripe error {}: {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::payment(format!("Unexpected Stripe response: {}", e)))
    }

    /// Create a customer tagged with the account id
    pub async fn create_customer(&self, email: &str, account_id: Uuid) -> BackendResult<String> {
        let form = [
            ("email", email.to_string()),
            ("metadata[userId]", account_id.to_string()),
        ];
        let customer: Customer = self.post_form("/v1/customers", &form).await?;
        Ok(customer.id)
    }

    /// Create a subscription checkout session for one price
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams<'_>,
    ) -> BackendResult<CheckoutSession> {
        let form = [
            ("mode", "subscription".to_string()),
            ("customer", params.customer_id.to_string()),
            ("payment_method_types[]", "card".to_string()),
            ("line_items[0][price]", params.price_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", params.success_url.clone()),
            ("cancel_url", params.cancel_url.clone()),
            ("metadata[userId]", params.account_id.to_string()),
            ("metadata[priceId]", params.price_id.to_string()),
        ];
        self.post_form("/v1/checkout/sessions", &form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .and(header_exists("authorization"))
            .and(body_string_contains("email=buyer%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "cus_123" })))
            .expect(1)
            .mount(&server)
            .await;

        let http = Client::new();
        let base = server.uri();
        let stripe = StripeClient::new(&http, &base, "sk_test");

        let id = stripe.create_customer("buyer@example.com", Uuid::new_v4()).await.unwrap();
        assert_eq!(id, "cus_123");
    }

    #[tokio::test]
    async fn test_create_checkout_session_carries_price_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(body_string_contains("mode=subscription"))
            .and(body_string_contains("metadata%5BpriceId%5D=price_yearly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http = Client::new();
        let base = server.uri();
        let stripe = StripeClient::new(&http, &base, "sk_test");

        let session = stripe
            .create_checkout_session(&CheckoutParams {
                customer_id: "cus_123",
                price_id: "price_yearly",
                account_id: Uuid::new_v4(),
                success_url: "http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}".to_string(),
                cancel_url: "http://localhost:3000/pricing".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_1");
    }

    #[tokio::test]
    async fn test_stripe_error_is_payment_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_string("card declined"))
            .mount(&server)
            .await;

        let http = Client::new();
        let base = server.uri();
        let stripe = StripeClient::new(&http, &base, "sk_test");

        assert!(matches!(
            stripe.create_customer("a@b.c", Uuid::new_v4()).await,
            Err(BackendError::Payment(_))
        ));
    }
}
