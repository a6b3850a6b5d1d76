//! Terminal front end: the landing page, both form pages, and the email
//! preview, driven by one key-event loop.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
