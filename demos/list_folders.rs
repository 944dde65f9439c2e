//! Walks every page of the caller's folders and lists each folder's posts.
//!
//! Configuration comes from the environment:
//! - `POSTE_BASE_URL` (optional, defaults to the hosted API)
//! - `POSTE_TOKEN` (optional bearer token)
//!
//! Run with: `cargo run --example list_folders`

use poste_client::{Client, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("poste_client=debug,list_folders=info")
        .init();

    let mut builder = Client::builder();
    if let Ok(base_url) = std::env::var("POSTE_BASE_URL") {
        builder = builder.base_url(base_url)?;
    }
    if let Ok(token) = std::env::var("POSTE_TOKEN") {
        builder = builder.auth_token(token);
    }
    let client = builder.build()?;

    match client.health().health().await {
        Ok(health) => println!("API status: {}", health.status),
        Err(e) => eprintln!("Health check failed: {}", e),
    }

    let folders = client.folders();
    let posts = client.posts();
    let mut after: Option<String> = None;

    loop {
        let page = match folders.list_my_folders(Some(20), after.as_deref()).await {
            Ok(page) => page,
            Err(Error::Unauthorized(message)) => {
                eprintln!("Set POSTE_TOKEN to a valid token: {}", message);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for folder in &page.data {
            let visibility = folder
                .visibility_level()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("== {} [{}]", folder.title, visibility);

            let folder_posts = posts.list_posts(Some(folder.id.as_str()), Some(5), None).await?;
            for post in &folder_posts.data {
                println!("   - {} {}", post.title, post.url.as_deref().unwrap_or(""));
            }
        }

        match page.next_cursor() {
            Some(cursor) => after = Some(cursor.to_string()),
            None => break,
        }
    }

    Ok(())
}
