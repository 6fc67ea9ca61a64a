pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::{Album, CreateAlbumRequest, UpdateAlbumRequest};
pub use router::init_albums_router;
