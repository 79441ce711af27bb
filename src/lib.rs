pub mod bootstrap;
pub mod config;
pub mod customers;
pub mod error;
pub mod hubspot;
pub mod invoices;
pub mod server;
pub mod sync;
