//! Pages
//!
//! Top-level views: the login prompt, and the two routes of the signed-in shell.

pub mod dashboard;
pub mod login;
pub mod opportunities;

pub use dashboard::Dashboard;
pub use login::Login;
pub use opportunities::Opportunities;
