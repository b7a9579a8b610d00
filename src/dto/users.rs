use serde::Serialize;

/// Body for `PUT /users/me`.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub username: String,
    pub bio: String,
    pub location: String,
    pub phone: String,
    pub profile_image: String,
}
