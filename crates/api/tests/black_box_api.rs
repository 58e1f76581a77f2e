use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use orgkit_api::app::build_app;
use orgkit_api::token::StaticTokenAuthenticator;
use orgkit_gateway::GatewayConfig;

const TOKEN: &str = "test-token";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the app exactly as prod does, but bind to an ephemeral port.
        let config = GatewayConfig::new("/api");
        let authenticator = Arc::new(StaticTokenAuthenticator::new().with_token(TOKEN, "subject-1"));
        let app = build_app(config, authenticator);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_user(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    name: &str,
) -> Value {
    let res = client
        .post(format!("{base_url}/api/users"))
        .json(&json!({ "email": email, "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["requestId"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn deleting_member_without_credentials_is_unauthorized() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .delete(format!(
            "{}/api/organizations/org-1/members/user-1",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert!(body["error"]["requestId"].is_string());
}

#[tokio::test]
async fn invalid_user_body_aggregates_validation_issues() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .json(&json!({ "email": "invalid" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let issues = body["error"]["details"]["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["field"] == "body.email"));
    assert!(issues.iter().any(|i| i["field"] == "body.name"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/unknown", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn request_id_propagates_into_error_envelopes() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .header("x-request-id", "corr-123")
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["x-request-id"].to_str().unwrap(), "corr-123");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["requestId"], "corr-123");
}

#[tokio::test]
async fn user_lifecycle_create_get_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create (public signup route).
    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "name": "Ada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.headers().contains_key("location"));
    let created: Value = res.json().await.unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["email"], "ada@example.com");

    // Duplicate email conflicts.
    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "name": "Other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");

    // Read it back (authenticated).
    let res = client
        .get(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Update the name.
    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(TOKEN)
        .json(&json!({ "name": "Ada Lovelace" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["name"], "Ada Lovelace");

    // Delete, then reads are 404 with structured details.
    let res = client
        .delete(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["details"]["resource"], "user");
    assert_eq!(body["error"]["details"]["identifier"], id);
}

#[tokio::test]
async fn malformed_user_id_is_a_validation_error() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/users/not-a-uuid", srv.base_url))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["field"], "params.userId");
}

#[tokio::test]
async fn user_listing_paginates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 0..3 {
        create_user(&client, &srv.base_url, &format!("user{i}@example.com"), "User").await;
    }

    let res = client
        .get(format!("{}/api/users?pageSize=2", srv.base_url))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["pageSize"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);

    let res = client
        .get(format!("{}/api/users?page=2&pageSize=2", srv.base_url))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 2);
}

#[tokio::test]
async fn non_numeric_page_is_a_validation_error() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/users?page=abc", srv.base_url))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let issues = body["error"]["details"]["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["field"] == "query.page"));
}

#[tokio::test]
async fn membership_rules_are_enforced() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = create_user(&client, &srv.base_url, "owner@example.com", "Owner").await;
    let owner_id = owner["data"]["id"].as_str().unwrap().to_string();
    let member = create_user(&client, &srv.base_url, "member@example.com", "Member").await;
    let member_id = member["data"]["id"].as_str().unwrap().to_string();

    // Create the organization; the referenced user becomes its owner.
    let res = client
        .post(format!("{}/api/organizations", srv.base_url))
        .bearer_auth(TOKEN)
        .json(&json!({ "name": "Acme", "slug": "acme", "ownerUserId": owner_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let org: Value = res.json().await.unwrap();
    let org_id = org["data"]["id"].as_str().unwrap().to_string();

    // Add a regular member.
    let res = client
        .post(format!("{}/api/organizations/{}/members", srv.base_url, org_id))
        .bearer_auth(TOKEN)
        .json(&json!({ "userId": member_id, "role": "member" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Adding the same member again conflicts.
    let res = client
        .post(format!("{}/api/organizations/{}/members", srv.base_url, org_id))
        .bearer_auth(TOKEN)
        .json(&json!({ "userId": member_id, "role": "member" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Listing shows both memberships.
    let res = client
        .get(format!("{}/api/organizations/{}/members", srv.base_url, org_id))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["pagination"]["total"], 2);

    // The owner cannot be removed.
    let res = client
        .delete(format!(
            "{}/api/organizations/{}/members/{}",
            srv.base_url, org_id, owner_id
        ))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");
    assert_eq!(body["error"]["details"]["rule"], "owner-removal");

    // The last owner cannot be demoted either.
    let res = client
        .put(format!(
            "{}/api/organizations/{}/members/{}",
            srv.base_url, org_id, owner_id
        ))
        .bearer_auth(TOKEN)
        .json(&json!({ "role": "member" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["details"]["rule"], "last-owner");

    // A regular member can be removed.
    let res = client
        .delete(format!(
            "{}/api/organizations/{}/members/{}",
            srv.base_url, org_id, member_id
        ))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_organization_reports_structured_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user = create_user(&client, &srv.base_url, "someone@example.com", "Someone").await;
    let user_id = user["data"]["id"].as_str().unwrap().to_string();
    let missing_org = uuid::Uuid::now_v7().to_string();

    let res = client
        .post(format!(
            "{}/api/organizations/{}/members",
            srv.base_url, missing_org
        ))
        .bearer_auth(TOKEN)
        .json(&json!({ "userId": user_id, "role": "member" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["details"]["resource"], "organization");
    assert_eq!(body["error"]["details"]["identifier"], missing_org);
}

#[tokio::test]
async fn invalid_role_reports_the_allowed_options() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user = create_user(&client, &srv.base_url, "x@example.com", "X").await;
    let user_id = user["data"]["id"].as_str().unwrap().to_string();
    let org_id = uuid::Uuid::now_v7().to_string();

    // Validation runs before the handler, so the bogus role is reported even
    // though the organization does not exist.
    let res = client
        .post(format!("{}/api/organizations/{}/members", srv.base_url, org_id))
        .bearer_auth(TOKEN)
        .json(&json!({ "userId": user_id, "role": "superuser" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let issues = body["error"]["details"]["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["code"] == "invalid_option"));
}
