//! Static observer-UI assets, embedded at compile time.

pub const INDEX_HTML: &str = include_str!("assets/index.html");
pub const STYLES_CSS: &str = include_str!("assets/styles.css");
pub const APP_JS: &str = include_str!("assets/app.js");
