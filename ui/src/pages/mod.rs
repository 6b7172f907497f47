pub mod dashboard;
pub mod documents;
pub mod login;
pub mod not_found;
pub mod search;
pub mod tasks;

pub use dashboard::DashboardPage;
pub use documents::DocumentsPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use search::SearchPage;
pub use tasks::TasksPage;
