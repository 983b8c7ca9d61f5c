mod http;
mod websocket;

pub use http::{get_group_detail, get_groups, get_users, health_check};
pub use websocket::{WELCOME, websocket_handler};
