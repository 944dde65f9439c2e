//! Wire shapes exchanged with the Poste API.
//!
//! Response types ignore fields they do not declare and decode absent
//! optional fields to `None`, so older clients keep working when the server
//! grows new fields. Create types are serialize-only: the server assigns
//! `id` and `createdAt`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A saved link with notes and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Tags in the order the server returned them.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// Payload for `POST /api/v1/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreateDto {
    pub folder_id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PostCreateDto {
    /// Creates a payload with no notes and no tags.
    pub fn new(
        folder_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            folder_id: folder_id.into(),
            title: title.into(),
            url: url.into(),
            notes: None,
            tags: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Who can see a folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Unlisted,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "unlisted" => Ok(Visibility::Unlisted),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

/// A folder of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDto {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw visibility as sent by the server; see [`FolderDto::visibility_level`].
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl FolderDto {
    /// Parses `visibility`, returning `None` when absent or unrecognized.
    pub fn visibility_level(&self) -> Option<Visibility> {
        self.visibility.as_deref()?.parse().ok()
    }
}

/// Payload for `POST /api/v1/folders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCreateDto {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: Visibility,
}

impl FolderCreateDto {
    /// Creates a private folder without a description.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            visibility: Visibility::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A grant of access to a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderShareDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub shared_with_user_id: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub shared_at: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// Permission granted when none is given.
pub const DEFAULT_SHARE_PERMISSION: &str = "view";

/// Payload for `POST /api/v1/folders/{id}/shares`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderShareCreateDto {
    pub user_email: String,
    pub permission: String,
}

impl FolderShareCreateDto {
    /// Shares with `user_email` using the default `view` permission.
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            permission: DEFAULT_SHARE_PERMISSION.to_string(),
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = permission.into();
        self
    }
}

/// One page of a cursor-paginated listing.
///
/// `data` keeps the server's order. The next page is requested by passing
/// [`Paged::next_cursor`] as `after`; no cursor means this was the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub meta: PageMeta,
    /// Older servers nest the page metadata under `page`.
    #[serde(default, deserialize_with = "lenient_meta", skip_serializing_if = "Option::is_none")]
    pub page: Option<PageMeta>,
    /// Some servers nest the page metadata under `links`.
    #[serde(default, deserialize_with = "lenient_meta", skip_serializing_if = "Option::is_none")]
    pub links: Option<PageMeta>,
}

/// Reads a metadata object, yielding `None` for any other shape.
fn lenient_meta<'de, D>(deserializer: D) -> Result<Option<PageMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Pagination metadata nested inside [`Paged`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Paged<T> {
    /// Returns the cursor for the next page, if any.
    ///
    /// Checked in order: the top-level cursor, then `meta`, `page` and
    /// `links`. Empty strings count as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use poste_client::dto::{Paged, PostDto};
    ///
    /// let page: Paged<PostDto> =
    ///     serde_json::from_str(r#"{"data":[],"meta":{"nextCursor":"c2"}}"#).unwrap();
    /// assert_eq!(page.next_cursor(), Some("c2"));
    /// assert!(page.has_more());
    /// ```
    pub fn next_cursor(&self) -> Option<&str> {
        let nested = [Some(&self.meta), self.page.as_ref(), self.links.as_ref()];
        self.next_cursor
            .as_deref()
            .into_iter()
            .chain(nested.into_iter().flatten().filter_map(|m| m.next_cursor.as_deref()))
            .find(|c| !c.is_empty())
    }

    /// Returns `true` if another page can be requested.
    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for Paged<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Body of a non-2xx response, when the server sends one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<ValidationDetail>>,
}

/// One field-level validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_ignores_undeclared_fields() {
        let post: PostDto = serde_json::from_value(json!({
            "id": "p1",
            "title": "Rust",
            "url": "https://rust-lang.org",
            "likes": 12,
            "author": {"name": "ferris"}
        }))
        .unwrap();

        assert_eq!(post.id, "p1");
        assert_eq!(post.url.as_deref(), Some("https://rust-lang.org"));
        assert!(post.tags.is_empty());
        assert_eq!(post.notes, None);
    }

    #[test]
    fn post_without_title_fails() {
        let result = serde_json::from_value::<PostDto>(json!({ "id": "p1" }));
        assert!(result.unwrap_err().to_string().contains("title"));
    }

    #[test]
    fn post_create_omits_empty_optionals() {
        let body = serde_json::to_value(PostCreateDto::new("f1", "Rust", "https://rust-lang.org"))
            .unwrap();
        assert_eq!(
            body,
            json!({ "folderId": "f1", "title": "Rust", "url": "https://rust-lang.org" })
        );
    }

    #[test]
    fn post_create_keeps_tag_order() {
        let dto = PostCreateDto::new("f1", "Rust", "https://rust-lang.org")
            .with_notes("read later")
            .with_tags(["zeta", "alpha", "mid"]);
        let body = serde_json::to_value(&dto).unwrap();
        assert_eq!(body["notes"], "read later");
        assert_eq!(body["tags"], json!(["zeta", "alpha", "mid"]));
    }

    #[test]
    fn folder_create_defaults_to_private() {
        let body = serde_json::to_value(FolderCreateDto::new("Reading")).unwrap();
        assert_eq!(body, json!({ "title": "Reading", "visibility": "private" }));

        let body = serde_json::to_value(
            FolderCreateDto::new("Reading").with_visibility(Visibility::Unlisted),
        )
        .unwrap();
        assert_eq!(body["visibility"], "unlisted");
    }

    #[test]
    fn folder_visibility_level_tolerates_unknown_values() {
        let mut folder: FolderDto =
            serde_json::from_value(json!({ "id": "f1", "title": "A", "visibility": "PUBLIC" }))
                .unwrap();
        assert_eq!(folder.visibility_level(), Some(Visibility::Public));

        folder.visibility = Some("team-only".to_string());
        assert_eq!(folder.visibility_level(), None);

        folder.visibility = None;
        assert_eq!(folder.visibility_level(), None);
    }

    #[test]
    fn share_create_defaults_to_view() {
        let body = serde_json::to_value(FolderShareCreateDto::new("a@b.com")).unwrap();
        assert_eq!(body, json!({ "userEmail": "a@b.com", "permission": "view" }));
    }

    #[test]
    fn paged_reads_meta_under_any_known_key() {
        for key in ["meta", "page", "links"] {
            let raw = format!(r#"{{"data":[],"{}":{{"size":20,"nextCursor":"c9"}}}}"#, key);
            let page: Paged<FolderDto> = serde_json::from_str(&raw).unwrap();
            assert_eq!(page.next_cursor(), Some("c9"), "key {}", key);
        }
    }

    #[test]
    fn paged_accepts_links_next_to_meta() {
        let page: Paged<PostDto> = serde_json::from_str(
            r#"{"data":[{"id":"p1","title":"a"}],"meta":{"size":1},"links":{"self":"/api/v1/posts"}}"#,
        )
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.meta.size, Some(1));
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn paged_ignores_links_of_another_shape() {
        let page: Paged<PostDto> = serde_json::from_str(r#"{"data":[],"links":["next"]}"#).unwrap();
        assert_eq!(page.links, None);
        assert!(!page.has_more());

        let page: Paged<PostDto> =
            serde_json::from_str(r#"{"data":[],"page":"2","links":{"nextCursor":"c3"}}"#).unwrap();
        assert_eq!(page.page, None);
        assert_eq!(page.next_cursor(), Some("c3"));
    }

    #[test]
    fn paged_prefers_top_level_cursor() {
        let page: Paged<FolderDto> = serde_json::from_value(json!({
            "data": [],
            "nextCursor": "top",
            "meta": { "nextCursor": "nested" }
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), Some("top"));
    }

    #[test]
    fn paged_without_cursor_is_last_page() {
        let page: Paged<FolderDto> =
            serde_json::from_value(json!({ "data": [], "nextCursor": "" })).unwrap();
        assert_eq!(page.next_cursor(), None);
        assert!(!page.has_more());
        assert_eq!(page.meta, PageMeta::default());
    }

    #[test]
    fn paged_keeps_server_order() {
        let page: Paged<PostDto> = serde_json::from_value(json!({
            "data": [
                { "id": "3", "title": "c" },
                { "id": "1", "title": "a" },
                { "id": "2", "title": "b" }
            ]
        }))
        .unwrap();
        let ids: Vec<_> = page.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }
}
