pub mod error_boundary;
pub mod layout;
pub mod progress_bar;
pub mod toast;

pub use error_boundary::{ErrorBoundary, use_error_reporter};
pub use layout::MainLayout;
pub use progress_bar::ProgressBar;
pub use toast::ToastContainer;
