//! Listing manager: CRUD over the signed-in user's own products.
//!
//! Edits happen in place (an inline form replaces the card) and only the
//! editable field subset is sent; the server's response is merged into
//! local state without re-fetching the whole listing set. Deletion is
//! confirmed and only applied locally after the server acknowledges it.

use std::sync::Arc;

use uuid::Uuid;

use crate::dto::upload::ImageFile;
use crate::forms::ListingForm;
use crate::gateway::MarketGateway;
use crate::models::Product;
use crate::prompt::ConfirmPrompt;

pub struct ListingManager<G> {
    gateway: Arc<G>,
    products: Vec<Product>,
    editing: Option<(Uuid, ListingForm)>,
    message: Option<String>,
}

impl<G: MarketGateway> ListingManager<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            products: Vec::new(),
            editing: None,
            message: None,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut ListingForm> {
        self.editing.as_mut().map(|(_, form)| form)
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub async fn load(&mut self) {
        match self.gateway.my_products().await {
            Ok(products) => self.products = products,
            Err(err) => {
                tracing::warn!(error = %err, "listing fetch failed");
                self.message = Some(err.user_message("Failed to load products"));
            }
        }
    }

    /// Swap in the inline edit form, populated from the listing.
    pub fn begin_edit(&mut self, product_id: Uuid) {
        if let Some(product) = self.products.iter().find(|p| p.id == product_id) {
            self.editing = Some((product_id, ListingForm::from_product(product)));
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Validate and send the editable subset, then merge the server's
    /// response into local state.
    pub async fn submit_edit(&mut self) {
        let Some((product_id, form)) = self.editing.as_ref() else {
            return;
        };
        let product_id = *product_id;
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(err) => {
                self.message = Some(err.to_string());
                return;
            }
        };

        match self.gateway.update_product(product_id, &payload).await {
            Ok(updated) => {
                if let Some(slot) = self.products.iter_mut().find(|p| p.id == product_id) {
                    *slot = updated;
                }
                self.editing = None;
                self.message = Some("Product updated successfully".to_string());
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to update product"));
            }
        }
    }

    /// Delete after confirmation; local state changes only once the
    /// server acknowledges (no optimistic removal).
    pub async fn delete(&mut self, product_id: Uuid, prompt: &dyn ConfirmPrompt) {
        if !prompt.confirm("Are you sure you want to delete this product?") {
            return;
        }
        match self.gateway.delete_product(product_id).await {
            Ok(()) => {
                self.products.retain(|p| p.id != product_id);
                self.message = Some("Product deleted successfully".to_string());
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to delete product"));
            }
        }
    }

    /// Create a listing: upload image files first, then post the product
    /// with the combined image URLs. At least one image is required.
    pub async fn create(
        &mut self,
        form: &ListingForm,
        image_urls: Vec<String>,
        files: Vec<ImageFile>,
    ) -> Option<Uuid> {
        let mut images: Vec<String> = image_urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect();

        if !files.is_empty() {
            match self.gateway.upload_images(files).await {
                Ok(uploaded) => images.extend(uploaded),
                Err(err) => {
                    self.message = Some(err.user_message("Image upload failed"));
                    return None;
                }
            }
        }

        let payload = match form.validate_new(images) {
            Ok(payload) => payload,
            Err(err) => {
                self.message = Some(err.to_string());
                return None;
            }
        };

        match self.gateway.create_product(&payload).await {
            Ok(product) => {
                let id = product.id;
                self.products.push(product);
                self.message = Some("Product listed successfully".to_string());
                Some(id)
            }
            Err(err) => {
                self.message = Some(err.user_message("Failed to create product"));
                None
            }
        }
    }
}

impl<G> std::fmt::Debug for ListingManager<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingManager")
            .field("products", &self.products.len())
            .field("editing", &self.editing.as_ref().map(|(id, _)| *id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::models::{Category, Condition};
    use crate::prompt::FixedAnswer;

    async fn manager_with_lamp() -> (Arc<MockGateway>, ListingManager<MockGateway>, Uuid) {
        let lamp_id = Uuid::new_v4();
        let gateway = Arc::new(MockGateway::new(vec![MockGateway::product(
            lamp_id, "Lamp", 12.0, 2,
        )]));
        let mut manager = ListingManager::new(Arc::clone(&gateway));
        manager.load().await;
        (gateway, manager, lamp_id)
    }

    #[tokio::test]
    async fn edit_merges_response_without_refetch() {
        let (gateway, mut manager, lamp_id) = manager_with_lamp().await;
        let fetches_after_load = gateway.calls_to("my_products");

        manager.begin_edit(lamp_id);
        {
            let form = manager.edit_form_mut().unwrap();
            form.title = "Brass Lamp".to_string();
            form.price = "15".to_string();
        }
        manager.submit_edit().await;

        assert_eq!(manager.editing(), None);
        assert_eq!(manager.products()[0].title, "Brass Lamp");
        assert_eq!(manager.products()[0].price, 15.0);
        assert_eq!(gateway.calls_to("my_products"), fetches_after_load);
    }

    #[tokio::test]
    async fn negative_price_edit_never_reaches_the_server() {
        let (gateway, mut manager, lamp_id) = manager_with_lamp().await;
        manager.begin_edit(lamp_id);
        manager.edit_form_mut().unwrap().price = "-1".to_string();

        manager.submit_edit().await;

        assert_eq!(gateway.calls_to("update_product"), 0);
        assert_eq!(manager.editing(), Some(lamp_id));
        assert!(manager.take_message().unwrap().contains("negative"));
    }

    #[tokio::test]
    async fn delete_requires_confirmation_and_server_ack() {
        let (gateway, mut manager, lamp_id) = manager_with_lamp().await;

        manager.delete(lamp_id, &FixedAnswer(false)).await;
        assert_eq!(gateway.calls_to("delete_product"), 0);
        assert_eq!(manager.products().len(), 1);

        manager.delete(lamp_id, &FixedAnswer(true)).await;
        assert_eq!(gateway.calls_to("delete_product"), 1);
        assert!(manager.products().is_empty());
    }

    #[tokio::test]
    async fn create_uploads_files_then_posts_listing() {
        let gateway = Arc::new(MockGateway::new(Vec::new()));
        let mut manager = ListingManager::new(Arc::clone(&gateway));
        let form = ListingForm {
            title: "Bike".to_string(),
            description: "Road bike".to_string(),
            category: Some(Category::Sports),
            price: "120".to_string(),
            condition: Some(Condition::Good),
            location: "Denver".to_string(),
            quantity: "1".to_string(),
        };

        let id = manager
            .create(
                &form,
                Vec::new(),
                vec![ImageFile {
                    file_name: "bike.jpg".to_string(),
                    bytes: vec![0xff, 0xd8],
                }],
            )
            .await;

        assert!(id.is_some());
        assert_eq!(gateway.calls_to("upload_images"), 1);
        assert_eq!(manager.products()[0].images, vec!["/uploads/bike.jpg"]);
    }

    #[tokio::test]
    async fn create_without_any_image_is_rejected() {
        let gateway = Arc::new(MockGateway::new(Vec::new()));
        let mut manager = ListingManager::new(Arc::clone(&gateway));
        let form = ListingForm {
            title: "Bike".to_string(),
            description: String::new(),
            category: Some(Category::Sports),
            price: "120".to_string(),
            condition: Some(Condition::Good),
            location: String::new(),
            quantity: "1".to_string(),
        };

        let id = manager.create(&form, vec!["   ".to_string()], Vec::new()).await;

        assert!(id.is_none());
        assert_eq!(gateway.calls_to("create_product"), 0);
        assert!(manager.take_message().unwrap().contains("image"));
    }
}
