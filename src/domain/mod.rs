/// Domain types shared by the stores, the auth core and the routes.

mod administrator;
mod pagination;
mod refresh_token;
mod role;
mod vehicle;

pub use administrator::{Administrator, AdministratorChanges, AdministratorView, NewAdministrator};
pub use pagination::{Page, PageRequest, ITEMS_PER_PAGE};
pub use refresh_token::RefreshTokenRecord;
pub use role::Role;
pub use vehicle::{Vehicle, VehicleData, VehicleFilter};
