pub mod json;
pub mod postgres;

pub use json::JsonFileDrugRepository;
pub use json::JsonFileUserRepository;
pub use postgres::PostgresDrugRepository;
pub use postgres::PostgresUserRepository;
