use crate::{
    dto::{Paged, PostCreateDto, PostDto},
    metadata::{path_segment, RequestMetadata},
    Client, Result,
};
use http::Method;

const POSTS_PATH: &str = "/api/v1/posts";

/// Post endpoints under `/api/v1/posts`.
#[derive(Debug, Clone)]
pub struct PostService {
    client: Client,
}

impl PostService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists posts, optionally restricted to one folder.
    ///
    /// Pass the previous page's [`Paged::next_cursor`] as `after` to continue.
    /// Parameters that are `None` or empty are left out of the query.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: poste_client::Client) -> Result<(), poste_client::Error> {
    /// let posts = client.posts();
    /// let mut page = posts.list_posts(Some("f-1"), Some(50), None).await?;
    /// loop {
    ///     for post in &page.data {
    ///         println!("{}", post.title);
    ///     }
    ///     let Some(cursor) = page.next_cursor().map(str::to_string) else {
    ///         break;
    ///     };
    ///     page = posts.list_posts(Some("f-1"), Some(50), Some(&cursor)).await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_posts(
        &self,
        folder_id: Option<&str>,
        page_size: Option<u32>,
        after: Option<&str>,
    ) -> Result<Paged<PostDto>> {
        let metadata = RequestMetadata::new(Method::GET, POSTS_PATH)
            .with_optional_query_param("folderId", folder_id)
            .with_optional_query_param("pageSize", page_size)
            .with_optional_query_param("after", after);
        self.client.request::<(), _>(metadata, None).await
    }

    pub async fn create_post(&self, dto: &PostCreateDto) -> Result<PostDto> {
        let metadata = RequestMetadata::new(Method::POST, POSTS_PATH);
        self.client.request(metadata, Some(dto)).await
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PostDto> {
        let path = format!("{}/{}", POSTS_PATH, path_segment(post_id));
        self.client
            .request::<(), _>(RequestMetadata::new(Method::GET, path), None)
            .await
    }
}
