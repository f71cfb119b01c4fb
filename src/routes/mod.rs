mod administrators;
mod auth;
mod health_check;
mod vehicles;

pub use administrators::{
    create_administrator, delete_administrator, get_administrator, list_administrators,
    update_administrator,
};
pub use auth::{get_current_administrator, login, logout, refresh};
pub use health_check::{health_check, home};
pub use vehicles::{create_vehicle, delete_vehicle, get_vehicle, list_vehicles, update_vehicle};
