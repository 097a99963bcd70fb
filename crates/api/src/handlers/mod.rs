pub mod car_items;
pub mod user;
