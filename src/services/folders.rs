use crate::{
    codec::NoContent,
    dto::{FolderCreateDto, FolderDto, FolderShareCreateDto, FolderShareDto, Paged},
    metadata::{path_segment, RequestMetadata},
    Client, Result,
};
use http::Method;

const FOLDERS_PATH: &str = "/api/v1/folders";

/// Folder and sharing endpoints under `/api/v1/folders`.
#[derive(Debug, Clone)]
pub struct FolderService {
    client: Client,
}

impl FolderService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists folders owned by the current user, one page at a time.
    ///
    /// `pageSize` precedes `after` in the query string.
    pub async fn list_my_folders(
        &self,
        page_size: Option<u32>,
        after: Option<&str>,
    ) -> Result<Paged<FolderDto>> {
        let metadata = RequestMetadata::new(Method::GET, FOLDERS_PATH)
            .with_optional_query_param("pageSize", page_size)
            .with_optional_query_param("after", after);
        self.client.request::<(), _>(metadata, None).await
    }

    pub async fn create_folder(&self, dto: &FolderCreateDto) -> Result<FolderDto> {
        let metadata = RequestMetadata::new(Method::POST, FOLDERS_PATH);
        self.client.request(metadata, Some(dto)).await
    }

    pub async fn get_folder(&self, folder_id: &str) -> Result<FolderDto> {
        self.get(folder_path(folder_id)).await
    }

    /// Folders other users shared with the current user. Not paginated.
    pub async fn shared_folders(&self) -> Result<Vec<FolderDto>> {
        self.get(format!("{}/shared", FOLDERS_PATH)).await
    }

    /// Grants `dto.user_email` access to a folder.
    pub async fn share_folder(
        &self,
        folder_id: &str,
        dto: &FolderShareCreateDto,
    ) -> Result<FolderShareDto> {
        let metadata = RequestMetadata::new(Method::POST, shares_path(folder_id));
        self.client.request(metadata, Some(dto)).await
    }

    pub async fn list_shares(&self, folder_id: &str) -> Result<Vec<FolderShareDto>> {
        self.get(shares_path(folder_id)).await
    }

    /// Revokes the share held by `user_email`. Any 2xx counts as success.
    pub async fn unshare_folder(&self, folder_id: &str, user_email: &str) -> Result<()> {
        let path = format!("{}/{}", shares_path(folder_id), path_segment(user_email));
        self.client
            .request::<(), NoContent>(RequestMetadata::new(Method::DELETE, path), None)
            .await?;
        Ok(())
    }

    async fn get<Res>(&self, path: String) -> Result<Res>
    where
        Res: serde::de::DeserializeOwned + 'static,
    {
        self.client
            .request::<(), _>(RequestMetadata::new(Method::GET, path), None)
            .await
    }
}

fn folder_path(folder_id: &str) -> String {
    format!("{}/{}", FOLDERS_PATH, path_segment(folder_id))
}

fn shares_path(folder_id: &str) -> String {
    format!("{}/shares", folder_path(folder_id))
}
