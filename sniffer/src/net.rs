pub mod capture;
pub mod interface;
