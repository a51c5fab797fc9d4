//! Domain models and input types for the server.

pub mod audit;
pub mod cart;
pub mod contact;
pub mod customer;
pub mod delivery_zone;
pub mod inventory;
pub mod order;
pub mod product;
pub mod promotion;
pub mod schedule;

pub use customer::CurrentCustomer;
