//! Business services: authentication, email, payments, orders, stock
//! analytics and file uploads.

pub mod auth;
pub mod email;
pub mod orders;
pub mod payment;
pub mod stock;
pub mod uploads;
