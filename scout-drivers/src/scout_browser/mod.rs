pub mod consent;
pub mod context;
pub mod driver;
pub mod page;
pub mod wait;
