pub mod activity;
pub mod employee;
pub mod product;
pub mod user;

pub use activity::DailyActivity;
pub use employee::Employee;
pub use product::{Product, ProductMeta};
pub use user::User;
