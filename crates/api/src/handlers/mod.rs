pub mod readings;
pub mod stream;
