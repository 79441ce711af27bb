pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{DetailedInvoice, Invoice};
pub use repository::InvoiceRepository;
