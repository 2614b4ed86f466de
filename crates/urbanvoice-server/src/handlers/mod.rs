pub mod admin;
pub mod citizen;
pub mod register;
