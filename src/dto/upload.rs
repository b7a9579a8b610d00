use serde::Deserialize;

/// One file destined for `POST /upload/multiple` (multipart field `images`).
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_paths: Vec<String>,
}
