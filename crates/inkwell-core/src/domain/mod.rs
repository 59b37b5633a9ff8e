//! Domain entities - the core business objects.

mod comment;
mod password;
mod post;
mod user;

pub use comment::{COMMENT_BODY_MAX_LEN, Comment, NewComment};
pub use password::PasswordHash;
pub use post::{DEFAULT_POST_IMAGE, NewPost, POST_TITLE_MAX_LEN, Post};
pub use user::{
    ABOUT_ME_MAX_LEN, DEFAULT_PROFILE_IMAGE, NewUser, Role, USERNAME_MAX_LEN, USERNAME_MIN_LEN,
    User, mask_email,
};
