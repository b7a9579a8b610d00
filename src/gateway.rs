use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::dto::cart::{CartMutationRequest, RemoveCartItemRequest};
use crate::dto::products::{
    CategoryFilter, NewProductRequest, ProductListResponse, ProductQuery, UpdateProductRequest,
};
use crate::dto::purchases::{BuyNowRequest, CheckoutRequest};
use crate::dto::upload::{ImageFile, UploadResponse};
use crate::dto::users::ProfileUpdateRequest;
use crate::error::{ClientError, ClientResult};
use crate::models::{Cart, Product, Purchase, User};

/// Remote data gateway over the marketplace REST surface.
///
/// Flows depend on this trait rather than on the HTTP client so they can
/// be exercised against canned responses in tests.
#[async_trait]
pub trait MarketGateway: Send + Sync {
    async fn list_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>>;
    async fn get_product(&self, id: Uuid) -> ClientResult<Product>;
    async fn create_product(&self, req: &NewProductRequest) -> ClientResult<Product>;
    async fn update_product(&self, id: Uuid, req: &UpdateProductRequest) -> ClientResult<Product>;
    async fn delete_product(&self, id: Uuid) -> ClientResult<()>;
    async fn my_products(&self) -> ClientResult<Vec<Product>>;
    async fn upload_images(&self, files: Vec<ImageFile>) -> ClientResult<Vec<String>>;

    async fn fetch_cart(&self) -> ClientResult<Cart>;
    async fn add_to_cart(&self, product_id: Uuid, quantity: u32) -> ClientResult<()>;
    async fn update_cart_item(&self, product_id: Uuid, quantity: u32) -> ClientResult<()>;
    async fn remove_cart_item(&self, product_id: Uuid) -> ClientResult<()>;
    async fn clear_cart(&self) -> ClientResult<()>;

    async fn checkout_cart(&self, req: &CheckoutRequest) -> ClientResult<()>;
    async fn buy_now(&self, req: &BuyNowRequest) -> ClientResult<()>;
    async fn list_purchases(&self) -> ClientResult<Vec<Purchase>>;

    async fn current_user(&self) -> ClientResult<User>;
    async fn update_profile(&self, req: &ProfileUpdateRequest) -> ClientResult<User>;
}

/// Error payload shape returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// `MarketGateway` backed by `reqwest`, attaching the ambient session
/// credential as a bearer token when one is configured.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    auth_token: Option<String>,
    http: Client,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::error_for(status, &text));
        }
        Ok(response.json().await?)
    }

    async fn send_expect_ok(&self, builder: RequestBuilder) -> ClientResult<()> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::error_for(status, &text));
        }
        Ok(())
    }

    fn error_for(status: StatusCode, body: &str) -> ClientError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::CONFLICT => ClientError::Conflict(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl MarketGateway for HttpGateway {
    async fn list_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let CategoryFilter::Only(category) = query.category {
            params.push(("category", category.as_str().to_string()));
        }
        if !query.search.is_empty() {
            params.push(("search", query.search.clone()));
        }
        let builder = self.http.get(self.url("/products")).query(&params);
        let body: ProductListResponse = self.send_json(builder).await?;
        Ok(body.products)
    }

    async fn get_product(&self, id: Uuid) -> ClientResult<Product> {
        self.send_json(self.http.get(self.url(&format!("/products/{id}"))))
            .await
    }

    async fn create_product(&self, req: &NewProductRequest) -> ClientResult<Product> {
        self.send_json(self.http.post(self.url("/products")).json(req))
            .await
    }

    async fn update_product(&self, id: Uuid, req: &UpdateProductRequest) -> ClientResult<Product> {
        self.send_json(self.http.put(self.url(&format!("/products/{id}"))).json(req))
            .await
    }

    async fn delete_product(&self, id: Uuid) -> ClientResult<()> {
        self.send_expect_ok(self.http.delete(self.url(&format!("/products/{id}"))))
            .await
    }

    async fn my_products(&self) -> ClientResult<Vec<Product>> {
        self.send_json(self.http.get(self.url("/products/user/me")))
            .await
    }

    async fn upload_images(&self, files: Vec<ImageFile>) -> ClientResult<Vec<String>> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            form = form.part("images", part);
        }
        let builder = self.http.post(self.url("/upload/multiple")).multipart(form);
        let body: UploadResponse = self.send_json(builder).await?;
        Ok(body.image_paths)
    }

    async fn fetch_cart(&self) -> ClientResult<Cart> {
        self.send_json(self.http.get(self.url("/cart"))).await
    }

    async fn add_to_cart(&self, product_id: Uuid, quantity: u32) -> ClientResult<()> {
        let body = CartMutationRequest {
            product_id,
            quantity,
        };
        self.send_expect_ok(self.http.post(self.url("/cart/add")).json(&body))
            .await
    }

    async fn update_cart_item(&self, product_id: Uuid, quantity: u32) -> ClientResult<()> {
        let body = CartMutationRequest {
            product_id,
            quantity,
        };
        self.send_expect_ok(self.http.put(self.url("/cart/update")).json(&body))
            .await
    }

    async fn remove_cart_item(&self, product_id: Uuid) -> ClientResult<()> {
        let body = RemoveCartItemRequest { product_id };
        self.send_expect_ok(self.http.delete(self.url("/cart/remove")).json(&body))
            .await
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        self.send_expect_ok(self.http.delete(self.url("/cart/clear")))
            .await
    }

    async fn checkout_cart(&self, req: &CheckoutRequest) -> ClientResult<()> {
        self.send_expect_ok(self.http.post(self.url("/purchases/checkout")).json(req))
            .await
    }

    async fn buy_now(&self, req: &BuyNowRequest) -> ClientResult<()> {
        self.send_expect_ok(self.http.post(self.url("/purchases/single")).json(req))
            .await
    }

    async fn list_purchases(&self) -> ClientResult<Vec<Purchase>> {
        self.send_json(self.http.get(self.url("/purchases"))).await
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.send_json(self.http.get(self.url("/users/me"))).await
    }

    async fn update_profile(&self, req: &ProfileUpdateRequest) -> ClientResult<User> {
        self.send_json(self.http.put(self.url("/users/me")).json(req))
            .await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory gateway with server-side cart semantics (duplicate adds
    //! merge, totals recomputed on every fetch) for flow unit tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::models::{
        CartItem, Category, Condition, PaymentMethod, ProductSnapshot, Purchase, PurchaseStatus,
        SellerRef, ShippingAddress,
    };

    pub(crate) struct MockGateway {
        pub products: Mutex<Vec<Product>>,
        pub cart_items: Mutex<Vec<(Uuid, u32)>>,
        pub purchases: Mutex<Vec<Purchase>>,
        pub calls: Mutex<HashMap<&'static str, u32>>,
        pub fail_next: Mutex<Option<ClientError>>,
        pub fail_method: Mutex<Option<(&'static str, ClientError)>>,
    }

    impl MockGateway {
        pub(crate) fn new(products: Vec<Product>) -> Self {
            Self {
                products: Mutex::new(products),
                cart_items: Mutex::new(Vec::new()),
                purchases: Mutex::new(Vec::new()),
                calls: Mutex::new(HashMap::new()),
                fail_next: Mutex::new(None),
                fail_method: Mutex::new(None),
            }
        }

        pub(crate) fn product(id: Uuid, title: &str, price: f64, quantity: u32) -> Product {
            Product {
                id,
                title: title.to_string(),
                description: String::new(),
                category: Category::Electronics,
                price,
                condition: Condition::Good,
                location: "Testville".to_string(),
                quantity,
                images: Vec::new(),
                is_available: true,
                seller: SellerRef {
                    id: Uuid::new_v4(),
                    username: "seller".to_string(),
                },
                date_created: Utc::now(),
                date_updated: Utc::now(),
            }
        }

        pub(crate) fn fail_next_with(&self, err: ClientError) {
            *self.fail_next.lock().unwrap() = Some(err);
        }

        /// Fail the next call to the named operation, letting other
        /// operations through.
        pub(crate) fn fail_calls_to(&self, name: &'static str, err: ClientError) {
            *self.fail_method.lock().unwrap() = Some((name, err));
        }

        pub(crate) fn calls_to(&self, name: &'static str) -> u32 {
            self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
        }

        fn record(&self, name: &'static str) -> ClientResult<()> {
            *self.calls.lock().unwrap().entry(name).or_insert(0) += 1;
            if let Some(err) = self.fail_next.lock().unwrap().take() {
                return Err(err);
            }
            let mut fail_method = self.fail_method.lock().unwrap();
            if fail_method.as_ref().is_some_and(|(target, _)| *target == name)
                && let Some((_, err)) = fail_method.take()
            {
                return Err(err);
            }
            Ok(())
        }

        fn find_product(&self, id: Uuid) -> ClientResult<Product> {
            self.products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(ClientError::NotFound)
        }
    }

    #[async_trait]
    impl MarketGateway for MockGateway {
        async fn list_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
            self.record("list_products")?;
            let products = self.products.lock().unwrap();
            Ok(products
                .iter()
                .filter(|p| match query.category {
                    CategoryFilter::All => true,
                    CategoryFilter::Only(c) => p.category == c,
                })
                .filter(|p| {
                    query.search.is_empty()
                        || p.title.to_lowercase().contains(&query.search.to_lowercase())
                })
                .cloned()
                .collect())
        }

        async fn get_product(&self, id: Uuid) -> ClientResult<Product> {
            self.record("get_product")?;
            self.find_product(id)
        }

        async fn create_product(&self, req: &NewProductRequest) -> ClientResult<Product> {
            self.record("create_product")?;
            let mut product = Self::product(Uuid::new_v4(), &req.title, req.price, req.quantity);
            product.description = req.description.clone();
            product.category = req.category;
            product.condition = req.condition;
            product.location = req.location.clone();
            product.images = req.images.clone();
            self.products.lock().unwrap().push(product.clone());
            Ok(product)
        }

        async fn update_product(
            &self,
            id: Uuid,
            req: &UpdateProductRequest,
        ) -> ClientResult<Product> {
            self.record("update_product")?;
            let mut products = self.products.lock().unwrap();
            let product = products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(ClientError::NotFound)?;
            product.title = req.title.clone();
            product.description = req.description.clone();
            product.category = req.category;
            product.price = req.price;
            product.condition = req.condition;
            product.location = req.location.clone();
            product.quantity = req.quantity;
            product.date_updated = Utc::now();
            Ok(product.clone())
        }

        async fn delete_product(&self, id: Uuid) -> ClientResult<()> {
            self.record("delete_product")?;
            let mut products = self.products.lock().unwrap();
            let before = products.len();
            products.retain(|p| p.id != id);
            if products.len() == before {
                return Err(ClientError::NotFound);
            }
            Ok(())
        }

        async fn my_products(&self) -> ClientResult<Vec<Product>> {
            self.record("my_products")?;
            Ok(self.products.lock().unwrap().clone())
        }

        async fn upload_images(&self, files: Vec<ImageFile>) -> ClientResult<Vec<String>> {
            self.record("upload_images")?;
            Ok(files
                .into_iter()
                .map(|f| format!("/uploads/{}", f.file_name))
                .collect())
        }

        async fn fetch_cart(&self) -> ClientResult<Cart> {
            self.record("fetch_cart")?;
            let cart_items = self.cart_items.lock().unwrap();
            let items: Vec<CartItem> = cart_items
                .iter()
                .map(|(product_id, quantity)| {
                    let product = self.find_product(*product_id)?;
                    Ok(CartItem {
                        product,
                        quantity: *quantity,
                        added_at: Utc::now(),
                    })
                })
                .collect::<ClientResult<_>>()?;
            let total_amount = items.iter().map(CartItem::subtotal).sum();
            Ok(Cart {
                id: Uuid::new_v4(),
                user: Uuid::new_v4(),
                items,
                total_amount,
                last_updated: Utc::now(),
            })
        }

        async fn add_to_cart(&self, product_id: Uuid, quantity: u32) -> ClientResult<()> {
            self.record("add_to_cart")?;
            let product = self.find_product(product_id)?;
            if !product.is_available {
                return Err(ClientError::Conflict(
                    "Product is no longer available".to_string(),
                ));
            }
            let mut cart_items = self.cart_items.lock().unwrap();
            match cart_items.iter_mut().find(|(id, _)| *id == product_id) {
                Some((_, existing)) => *existing += quantity,
                None => cart_items.push((product_id, quantity)),
            }
            Ok(())
        }

        async fn update_cart_item(&self, product_id: Uuid, quantity: u32) -> ClientResult<()> {
            self.record("update_cart_item")?;
            let mut cart_items = self.cart_items.lock().unwrap();
            let entry = cart_items
                .iter_mut()
                .find(|(id, _)| *id == product_id)
                .ok_or(ClientError::NotFound)?;
            entry.1 = quantity;
            Ok(())
        }

        async fn remove_cart_item(&self, product_id: Uuid) -> ClientResult<()> {
            self.record("remove_cart_item")?;
            let mut cart_items = self.cart_items.lock().unwrap();
            let before = cart_items.len();
            cart_items.retain(|(id, _)| *id != product_id);
            if cart_items.len() == before {
                return Err(ClientError::NotFound);
            }
            Ok(())
        }

        async fn clear_cart(&self) -> ClientResult<()> {
            self.record("clear_cart")?;
            self.cart_items.lock().unwrap().clear();
            Ok(())
        }

        async fn checkout_cart(&self, req: &CheckoutRequest) -> ClientResult<()> {
            self.record("checkout_cart")?;
            let items: Vec<(Uuid, u32)> = {
                let cart_items = self.cart_items.lock().unwrap();
                cart_items.clone()
            };
            if items.is_empty() {
                return Err(ClientError::Server {
                    status: 400,
                    message: "Cart is empty".to_string(),
                });
            }
            for (product_id, quantity) in items {
                let product = self.find_product(product_id)?;
                self.push_purchase(&product, quantity, &req.shipping_address, req.payment_method);
            }
            self.cart_items.lock().unwrap().clear();
            Ok(())
        }

        async fn buy_now(&self, req: &BuyNowRequest) -> ClientResult<()> {
            self.record("buy_now")?;
            let product = self.find_product(req.product_id)?;
            if !product.is_available {
                return Err(ClientError::Conflict(
                    "Product is no longer available".to_string(),
                ));
            }
            self.push_purchase(
                &product,
                req.quantity,
                &req.shipping_address,
                req.payment_method,
            );
            Ok(())
        }

        async fn list_purchases(&self) -> ClientResult<Vec<Purchase>> {
            self.record("list_purchases")?;
            Ok(self.purchases.lock().unwrap().clone())
        }

        async fn current_user(&self) -> ClientResult<User> {
            self.record("current_user")?;
            Ok(User {
                id: Uuid::new_v4(),
                username: "buyer".to_string(),
                email: "buyer@example.com".to_string(),
                profile_image: String::new(),
                bio: String::new(),
                location: String::new(),
                phone: String::new(),
                date_joined: Utc::now(),
            })
        }

        async fn update_profile(&self, req: &ProfileUpdateRequest) -> ClientResult<User> {
            self.record("update_profile")?;
            Ok(User {
                id: Uuid::new_v4(),
                username: req.username.clone(),
                email: "buyer@example.com".to_string(),
                profile_image: req.profile_image.clone(),
                bio: req.bio.clone(),
                location: req.location.clone(),
                phone: req.phone.clone(),
                date_joined: Utc::now(),
            })
        }
    }

    impl MockGateway {
        fn push_purchase(
            &self,
            product: &Product,
            quantity: u32,
            shipping_address: &ShippingAddress,
            payment_method: PaymentMethod,
        ) {
            self.purchases.lock().unwrap().push(Purchase {
                id: Uuid::new_v4(),
                buyer: Uuid::new_v4(),
                seller: product.seller.clone(),
                product: ProductSnapshot {
                    id: product.id,
                    title: product.title.clone(),
                    price: product.price,
                    images: product.images.clone(),
                    category: product.category,
                },
                quantity,
                total_amount: product.price * f64::from(quantity),
                purchase_date: Utc::now(),
                status: PurchaseStatus::Pending,
                shipping_address: shipping_address.clone(),
                payment_method,
            });
        }
    }
}
