//! Shopping cart module.
//!
//! Contains types for the cart, its lines, and the wishlist.

mod cart;
mod wishlist;

pub use cart::{check_quantity, Cart, CartLine, CartSummary, MAX_QUANTITY_PER_ITEM};
pub use wishlist::{WishlistItem, WishlistToggle};
