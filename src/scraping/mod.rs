pub mod balance;
pub mod login;
pub mod scraper_driver;
pub mod service_type;
