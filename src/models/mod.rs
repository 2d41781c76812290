pub mod internship;
pub mod order;
pub mod question;
pub mod test_result;
pub mod user;
