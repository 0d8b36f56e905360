//! Database layer
//!
//! Connection pooling, migrations, and repository implementations for
//! both SQLite and MySQL backends.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
