//! Domain types: the car record, its validation, and pagination math.

pub mod car;
pub mod pagination;

pub use car::{Car, CarDraft, ValidationError};
pub use pagination::{PageRequest, PageWindow, PAGE_SIZE};
