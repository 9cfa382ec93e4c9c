pub mod error;
pub mod params;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod cars;
    pub mod health;
}

pub use error::AppError;
pub use router::create_router;
pub use types::AppState;
