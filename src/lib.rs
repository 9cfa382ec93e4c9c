pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;
pub mod view;

// Convenience re-exports (keeps call-sites clean)
pub use app::car_service::CarService;
pub use domain::{Car, CarDraft};
pub use infra::config::Settings;
pub use storage::{CarStore, MemoryCarStore, PgCarRepository};
