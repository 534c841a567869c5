pub mod breakdown;
pub mod calculate;
pub mod impact;
pub mod price;
pub mod sensitivity;
pub mod setup;
pub mod target;
pub mod ui;
