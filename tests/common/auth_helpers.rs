//! Authentication test helpers
//!
//! Provides utilities for registering accounts through the API and for
//! forcing account state directly in the database.

use axum_test::TestServer;
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use roomcraft::backend::auth::accounts::{get_account_by_id, Account};
use roomcraft::shared::Plan;

pub const TEST_PASSWORD: &str = "password123";

/// Test account credentials
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Register an account through the API
pub async fn register_user(server: &TestServer, email: &str) -> TestUser {
    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": email,
            "password": TEST_PASSWORD,
            "name": "Test User"
        }))
        .await;

    assert_eq!(response.status_code().as_u16(), 201, "register failed: {}", response.text());
    let body: Value = response.json();

    TestUser {
        id: Uuid::parse_str(body["user"]["id"].as_str().expect("user id")).expect("uuid"),
        email: body["user"]["email"].as_str().expect("email").to_string(),
        password: TEST_PASSWORD.to_string(),
        token: body["token"].as_str().expect("token").to_string(),
    }
}

/// Register an account with a unique email
pub async fn register_unique_user(server: &TestServer) -> TestUser {
    let email = format!("test_{}@example.com", Uuid::new_v4().simple());
    register_user(server, &email).await
}

/// Force an account onto a plan, bypassing billing
pub async fn set_plan(pool: &SqlitePool, account_id: Uuid, plan: Plan) {
    sqlx::query("UPDATE accounts SET plan = $1 WHERE id = $2")
        .bind(plan.as_str())
        .bind(account_id)
        .execute(pool)
        .await
        .expect("Failed to set plan");
}

pub async fn load_account(pool: &SqlitePool, account_id: Uuid) -> Account {
    get_account_by_id(pool, account_id)
        .await
        .expect("Failed to load account")
        .expect("Account missing")
}
