pub mod handlers;
pub mod items;
pub mod routes;

pub use routes::create_router;
