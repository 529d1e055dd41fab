// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory storefront store.
//!
//! Holds principals (username + password hash), the item catalog, one cart
//! per user and submitted orders. Shared through `AppState` as
//! `Arc<RwLock<InMemoryStore>>`. The authentication core never touches it;
//! only the login/registration and resource handlers do.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Cart, Item, User, UserOrder};

/// Most units a single cart may hold.
pub const MAX_CART_ITEMS: usize = 1_000;

#[derive(Clone)]
struct UserRecord {
    id: u64,
    username: String,
    password_hash: String,
}

impl UserRecord {
    fn view(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<String, UserRecord>,
    items: BTreeMap<u64, Item>,
    carts: HashMap<String, Cart>,
    orders: HashMap<String, Vec<UserOrder>>,
    next_user_id: u64,
    next_item_id: u64,
    next_cart_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the demo catalog already loaded.
    pub fn with_catalog() -> Self {
        let mut store = Self::new();
        store.seed_catalog();
        store
    }

    pub fn seed_catalog(&mut self) {
        self.insert_item("Round Widget", 299, "A widget that is round");
        self.insert_item("Square Widget", 199, "A widget that is square");
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Register a principal with an already-hashed password and give it an
    /// empty cart.
    pub fn create_user(
        &mut self,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<User, ApiError> {
        let username = username.into();
        if self.users.contains_key(&username) {
            return Err(ApiError::conflict("Username is already taken"));
        }

        self.next_user_id += 1;
        let record = UserRecord {
            id: self.next_user_id,
            username: username.clone(),
            password_hash: password_hash.into(),
        };

        self.next_cart_id += 1;
        self.carts.insert(
            username.clone(),
            Cart {
                id: self.next_cart_id,
                username: username.clone(),
                items: Vec::new(),
                total_cents: 0,
            },
        );

        let user = record.view();
        self.users.insert(username, record);
        Ok(user)
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.users.get(username).map(UserRecord::view)
    }

    pub fn user_by_id(&self, id: u64) -> Option<User> {
        self.users
            .values()
            .find(|record| record.id == id)
            .map(UserRecord::view)
    }

    /// Stored password hash, for login verification only.
    pub fn password_hash(&self, username: &str) -> Option<&str> {
        self.users
            .get(username)
            .map(|record| record.password_hash.as_str())
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    pub fn insert_item(
        &mut self,
        name: impl Into<String>,
        price_cents: u64,
        description: impl Into<String>,
    ) -> Item {
        self.next_item_id += 1;
        let item = Item {
            id: self.next_item_id,
            name: name.into(),
            price_cents,
            description: description.into(),
        };
        self.items.insert(item.id, item.clone());
        item
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn item_by_id(&self, id: u64) -> Option<Item> {
        self.items.get(&id).cloned()
    }

    pub fn items_by_name(&self, name: &str) -> Vec<Item> {
        self.items
            .values()
            .filter(|item| item.name == name)
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Carts
    // -------------------------------------------------------------------------

    pub fn cart(&self, username: &str) -> Option<Cart> {
        self.carts.get(username).cloned()
    }

    /// Add `quantity` units of the item. The cart never grows past
    /// [`MAX_CART_ITEMS`]; a request that would is refused unchanged.
    pub fn add_to_cart(
        &mut self,
        username: &str,
        item_id: u64,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let (cart, item) = self.cart_and_item(username, item_id)?;
        let quantity = usize::try_from(quantity).unwrap_or(usize::MAX);
        if quantity > MAX_CART_ITEMS.saturating_sub(cart.items.len()) {
            return Err(ApiError::bad_request(format!(
                "A cart holds at most {MAX_CART_ITEMS} items"
            )));
        }
        cart.items.extend(std::iter::repeat(item).take(quantity));
        recompute_total(cart);
        Ok(cart.clone())
    }

    /// Remove up to `quantity` units of the item from the cart.
    pub fn remove_from_cart(
        &mut self,
        username: &str,
        item_id: u64,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let (cart, _) = self.cart_and_item(username, item_id)?;
        let mut remaining = quantity;
        cart.items.retain(|entry| {
            if remaining > 0 && entry.id == item_id {
                remaining -= 1;
                false
            } else {
                true
            }
        });
        recompute_total(cart);
        Ok(cart.clone())
    }

    fn cart_and_item(
        &mut self,
        username: &str,
        item_id: u64,
    ) -> Result<(&mut Cart, Item), ApiError> {
        if !self.users.contains_key(username) {
            return Err(ApiError::not_found("User not found"));
        }
        let item = self
            .items
            .get(&item_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Item not found"))?;
        let cart = self
            .carts
            .get_mut(username)
            .ok_or_else(|| ApiError::not_found("Cart not found"))?;
        Ok((cart, item))
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Record the user's current cart as an order.
    pub fn submit_order(&mut self, username: &str) -> Result<UserOrder, ApiError> {
        let cart = self
            .carts
            .get(username)
            .filter(|_| self.users.contains_key(username))
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let order = UserOrder {
            id: Uuid::new_v4(),
            username: username.to_string(),
            items: cart.items.clone(),
            total_cents: cart.total_cents,
            created_at: Utc::now(),
        };
        self.orders
            .entry(username.to_string())
            .or_default()
            .push(order.clone());
        Ok(order)
    }

    pub fn order_history(&self, username: &str) -> Result<Vec<UserOrder>, ApiError> {
        if !self.users.contains_key(username) {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(self.orders.get(username).cloned().unwrap_or_default())
    }
}

fn recompute_total(cart: &mut Cart) {
    cart.total_cents = cart.items.iter().map(|item| item.price_cents).sum();
}
