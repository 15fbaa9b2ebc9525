mod auth_screen;
mod dashboard;
mod task_list;
mod toast;

pub use auth_screen::AuthScreen;
pub use dashboard::Dashboard;
pub use task_list::TaskList;
pub use toast::Toast;
