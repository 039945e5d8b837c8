pub mod catalog;
pub mod format;
pub mod handlers;
pub mod keys;
pub mod normalize;
mod render;
pub mod view;

use crate::state::FilesState;
use axum::Router;

pub fn router() -> Router<FilesState> {
    handlers::file_routes()
}
