mod common;

use anyhow::Result;

#[tokio::test]
async fn health_and_root_respond() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let health: serde_json::Value = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "ok");

    let root: serde_json::Value = client
        .get(format!("{}/", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(root["name"], "GenAI Suite API");

    Ok(())
}
