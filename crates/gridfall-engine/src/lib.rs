pub use self::{core::*, engine::*, save::SaveFormatError};

pub mod core;
pub mod engine;
pub mod save;
