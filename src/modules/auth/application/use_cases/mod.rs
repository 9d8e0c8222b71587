pub mod complete_profile;
pub mod confirm_email;
pub mod create_user;
pub mod login_user;
pub mod logout_user;
