//! # poste-client - A typed client for the Poste bookmarking API
//!
//! Poste stores posts (saved links with notes and tags) organized into
//! folders. This crate wraps its REST API: one [`Client`] executes every
//! request, and thin services expose one method per endpoint with typed
//! payloads, typed results and a closed set of typed errors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use poste_client::{dto::{FolderCreateDto, Visibility}, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), poste_client::Error> {
//!     let client = Client::builder()
//!         .base_url("https://api.example.com")?
//!         .auth_token("token-123")
//!         .build()?;
//!
//!     let folder = client
//!         .folders()
//!         .create_folder(&FolderCreateDto::new("Reading").with_visibility(Visibility::Unlisted))
//!         .await?;
//!
//!     let page = client.posts().list_posts(Some(folder.id.as_str()), Some(20), None).await?;
//!     for post in &page.data {
//!         println!("{}: {:?}", post.title, post.url);
//!     }
//!     if let Some(cursor) = page.next_cursor() {
//!         println!("more after {}", cursor);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed endpoints** - `PostService`, `FolderService` and `HealthService` cover the whole API
//! - **Closed error taxonomy** - every non-2xx status and transport failure maps to exactly one [`Error`] variant
//! - **Cursor pagination** - [`dto::Paged`] with `next_cursor()` / `has_more()`
//! - **Runtime configuration** - base URL and bearer token can change while requests are in flight
//! - **Pluggable transport** - reqwest by default, any [`transport::Transport`] for tests or embedding
//! - **Automatic logging** - structured logging with `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use poste_client::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().base_url("https://api.example.com")?.build()?;
//! match client.posts().get_post("p-1").await {
//!     Ok(post) => println!("Found: {}", post.title),
//!     Err(Error::NotFound(message)) => eprintln!("Gone: {}", message),
//!     Err(Error::Unauthorized(_)) => client.clear_auth_token(),
//!     Err(e) if e.is_retryable() => eprintln!("Try again later: {}", e),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod codec;
pub mod config;
pub mod dto;
mod error;
pub mod metadata;
mod response;
pub mod services;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use codec::NoContent;
pub use error::{Error, Result, FALLBACK_MESSAGE};
pub use response::Response;
pub use services::{FolderService, HealthService, PostService};
