//! HTTP handlers

pub mod business;
pub mod health;
pub mod pages;

pub use business::{
    action_panic_response, business_dashboard, create_business, create_business_page,
    dashboard_home,
};
pub use pages::Pages;
pub use health::{health_check, not_found};
