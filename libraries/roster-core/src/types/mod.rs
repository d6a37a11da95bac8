mod ids;
mod micropost;
mod page;
mod session;
mod user;

pub use ids::{MicropostId, UserId};
pub use micropost::{Micropost, NewMicropost};
pub use page::{Page, PageInfo, PageRequest};
pub use session::NewSession;
pub use user::{Identity, NewUser, User, UserChanges};
