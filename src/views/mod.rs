//! Server-rendered HTML pages

pub mod dashboard;
pub mod faq;
pub mod home;
pub mod layout;
pub mod problem;
