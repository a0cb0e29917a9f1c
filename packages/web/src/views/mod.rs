mod landing;
pub use landing::Landing;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::{AdminDashboard, DonorDashboard, StudentDashboard, TeacherDashboard};
