mod error;
mod traits;

pub use error::{RepositoryError, Result};
pub use traits::{
    BookmarkRepository, LikeRepository, MovieRepository, ReviewRepository, StoreConnection,
    StoreRepository, UserRepository,
};
