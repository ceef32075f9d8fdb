pub mod toast;

pub use toast::{DomToaster, ToastKind, Toaster};
