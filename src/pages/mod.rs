pub mod content;
pub mod home;
pub mod not_found;
