pub mod clock;
pub mod reports;
pub mod services;
