mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn protected_routes_reject_anonymous_requests() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in ["/api/conversations", "/api/users", "/api/auth/me", "/api/files"] {
        let resp = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }

    Ok(())
}

#[tokio::test]
async fn bogus_tokens_are_rejected() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/auth/me", server.base_url))
        .header("authorization", "Bearer not-a-real-token")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn login_with_unknown_credentials_is_unauthorized() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({
            "email": "nobody@example.com",
            "password": "wrong",
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
