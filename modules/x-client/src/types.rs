use serde::{Deserialize, Serialize};

/// Every v2 success body is wrapped in `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub data: T,
}

/// Result of a completed media upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreatePostRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<PostMedia<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PostMedia<'a> {
    pub media_ids: &'a [String],
}

/// Confirmation returned after a post is created.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    pub text: String,
}
