//! HTTP request handlers.

mod auth;
mod links;
mod pages;
mod redirect;

pub use auth::{login_handler, logout_handler, signup_handler};
pub use links::{create_link_handler, list_links_handler};
pub use pages::{create_page_handler, index_handler, login_page_handler, signup_page_handler};
pub use redirect::redirect_handler;
