//! Data-access layer for the `users` table: CRUD over sqlx with mandatory
//! password hashing before any write that carries a password. Read paths
//! share one column projection that never includes the password hash.

pub mod config;
pub mod db;
pub mod error;
pub mod users;

pub use config::{HashParams, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use users::model::{NewUser, User, UserFilter, UserPatch};
pub use users::password::{hash_password, verify_password};
pub use users::repo::UserRepository;
