pub mod dose;
pub mod drug;
pub mod session;
pub mod user;
