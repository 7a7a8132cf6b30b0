//! Log in and page through every curriculum
//!
//! Usage:
//!   MEMBER_API_URL=http://localhost:8080 cargo run --example browse

use member_rs_client::auth_client::AuthClient;
use member_rs_client::{ApiClient, ClientConfig, DevLoginRequest, FileStorage, PageQuery, TokenStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env()?;
    let storage_path = std::env::var("MEMBER_STORAGE").unwrap_or_else(|_| "member-session.json".to_string());

    println!("=== Member Client Example ===");
    println!("API: {}", config.base_url);
    println!("Session file: {}", storage_path);
    println!();

    let tokens = TokenStore::new(FileStorage::open(&storage_path)?);
    let client = ApiClient::new(config, Arc::new(tokens))?;

    if client.is_authenticated() {
        println!("✓ Reusing stored session");
    } else {
        let session = client.login(Some(&DevLoginRequest::with_roles(["admin"]))).await?;
        println!("✓ Logged in as {} (expires {})", session.subject, session.expires_at);
    }
    println!();

    let mut pages = client.curriculums().paginate(PageQuery::new().limit(10));
    let mut page_number = 1;
    while let Some(page) = pages.next_page().await? {
        println!("Page {} ({} items)", page_number, page.items.len());
        for curriculum in page.items {
            println!("  - {} {}", curriculum.id, curriculum.name);
        }
        page_number += 1;
    }

    println!();
    println!("Done!");

    Ok(())
}
