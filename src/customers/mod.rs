pub mod handlers;
pub mod models;
pub mod repository;

pub use models::Customer;
pub use repository::CustomerRepository;
