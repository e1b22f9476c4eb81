pub mod category;
pub mod config;
pub mod error;
pub mod money;
pub mod notification;

pub use category::Category;
pub use config::Config;
pub use error::*;
pub use money::Milliunits;
pub use notification::{NotificationPayload, Priority};
