pub mod drug;
pub mod user;

pub use drug::PostgresDrugRepository;
pub use user::PostgresUserRepository;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Name of the constraint a database error tripped, if any.
fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    err.as_database_error().and_then(|db_err| db_err.constraint())
}
