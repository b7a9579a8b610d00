//! Profile editor over the session/identity surface.

use std::sync::Arc;

use crate::dto::users::ProfileUpdateRequest;
use crate::gateway::MarketGateway;
use crate::models::User;
use crate::session::Session;

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub bio: String,
    pub location: String,
    pub phone: String,
    pub profile_image: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            phone: user.phone.clone(),
            profile_image: user.profile_image.clone(),
        }
    }
}

pub struct ProfileEditor<G> {
    gateway: Arc<G>,
    pub form: ProfileForm,
    saving: bool,
    message: Option<String>,
}

impl<G: MarketGateway> ProfileEditor<G> {
    pub fn new(gateway: Arc<G>, session: &Session) -> Self {
        let form = session.user().map(ProfileForm::from_user).unwrap_or_default();
        Self {
            gateway,
            form,
            saving: false,
            message: None,
        }
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    /// Save the form; on success the session's user is replaced with the
    /// server's view. The save control is single-flight.
    pub async fn save(&mut self, session: &mut Session) {
        if self.saving {
            return;
        }
        if self.form.username.trim().is_empty() {
            self.message = Some("Missing username".to_string());
            return;
        }

        self.saving = true;
        let req = ProfileUpdateRequest {
            username: self.form.username.trim().to_string(),
            bio: self.form.bio.clone(),
            location: self.form.location.clone(),
            phone: self.form.phone.clone(),
            profile_image: self.form.profile_image.clone(),
        };
        let result = self.gateway.update_profile(&req).await;
        self.saving = false;

        match result {
            Ok(user) => {
                session.authenticate(user);
                self.message = Some("Profile updated successfully".to_string());
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to update profile"));
            }
        }
    }
}

impl<G> std::fmt::Debug for ProfileEditor<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileEditor")
            .field("saving", &self.saving)
            .finish()
    }
}
