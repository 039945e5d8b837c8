pub mod dto;
pub mod handlers;
pub mod model;
pub mod password;
pub mod repo;

use crate::state::UsersState;
use axum::Router;

pub fn router() -> Router<UsersState> {
    handlers::user_routes()
}
