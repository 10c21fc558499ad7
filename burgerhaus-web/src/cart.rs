use std::sync::Arc;

use bigdecimal::BigDecimal;
use burgerhaus_types::{catalog::Burger, orders::OrderItemRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WebResult;
use crate::storage::{load_json, save_json, Storage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i32,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
}

/// Shopping cart of one user. Every change is written through to storage
/// under a key derived from the user id, so carts of different users never
/// mix and a cart survives a restart.
pub struct Cart {
    storage: Arc<dyn Storage>,
    user_id: i32,
    items: Vec<CartItem>,
}

pub fn cart_key(user_id: i32) -> String {
    format!("shoppingCart-{user_id}")
}

impl Cart {
    pub fn load(storage: Arc<dyn Storage>, user_id: i32) -> WebResult<Self> {
        let items = load_json(storage.as_ref(), &cart_key(user_id))?.unwrap_or_default();
        Ok(Self {
            storage,
            user_id,
            items,
        })
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit, incrementing an existing line of the same burger.
    pub fn add(&mut self, id: i32, name: &str, price: BigDecimal) -> WebResult<()> {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                id,
                name: name.to_string(),
                price,
                quantity: 1,
            }),
        }
        self.save()
    }

    pub fn add_burger(&mut self, burger: &Burger) -> WebResult<()> {
        self.add(burger.id, &burger.name, burger.price.clone())
    }

    /// Removes one unit; the line disappears when its quantity reaches zero.
    /// Unknown ids are ignored.
    pub fn remove(&mut self, id: i32) -> WebResult<()> {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return Ok(());
        };
        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            self.items.remove(index);
        }
        self.save()
    }

    pub fn total(&self) -> BigDecimal {
        self.items
            .iter()
            .map(|item| &item.price * BigDecimal::from(item.quantity))
            .sum()
    }

    pub fn clear(&mut self) -> WebResult<()> {
        self.items.clear();
        self.storage.remove(&cart_key(self.user_id))?;
        Ok(())
    }

    /// Lines in the shape the order item endpoint expects.
    pub fn order_items(&self) -> Vec<OrderItemRequest> {
        self.items
            .iter()
            .map(|item| OrderItemRequest {
                id: item.id,
                quantity: item.quantity,
            })
            .collect()
    }

    fn save(&self) -> WebResult<()> {
        save_json(self.storage.as_ref(), &cart_key(self.user_id), &self.items)?;
        debug!(user_id = self.user_id, lines = self.items.len(), "cart saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::storage::MemoryStorage;

    fn price(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_add_increments_and_remove_decrements() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut cart = Cart::load(storage, 1).unwrap();
        cart.add(10, "Classic", price("8.50")).unwrap();
        cart.add(10, "Classic", price("8.50")).unwrap();
        cart.add(11, "Veggie", price("9.00")).unwrap();
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), price("26.00"));

        cart.remove(10).unwrap();
        assert_eq!(cart.items()[0].quantity, 1);
        cart.remove(10).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id, 11);

        cart.remove(99).unwrap();
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_cart_persists_per_user() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut alice = Cart::load(storage.clone(), 1).unwrap();
        alice.add(10, "Classic", price("8.50")).unwrap();

        let bob = Cart::load(storage.clone(), 2).unwrap();
        assert!(bob.is_empty());

        let reloaded = Cart::load(storage.clone(), 1).unwrap();
        assert_eq!(reloaded.items(), alice.items());
        assert_eq!(
            reloaded.order_items(),
            vec![OrderItemRequest { id: 10, quantity: 1 }]
        );

        alice.clear().unwrap();
        assert_eq!(storage.get(&cart_key(1)).unwrap(), None);
        assert!(Cart::load(storage, 1).unwrap().is_empty());
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::load(Arc::new(MemoryStorage::new()), 1).unwrap();
        assert_eq!(cart.total(), BigDecimal::from(0));
    }
}
