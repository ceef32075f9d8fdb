// Utility functions
// Stateless helpers shared by the page actions and the JS bindings

pub mod clipboard;
pub mod template;
pub mod time;
pub mod timing;

pub use clipboard::{copy_to_clipboard, BrowserClipboard, Clipboard};
pub use template::render;
pub use time::{format_date, relative_time, RelativeTime};
pub use timing::{Debounced, GlooTimer, ManualTimer, Throttled, Timer};
