use crate::{database::Database, error::Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteQueryResult;

/// A trait implemented by objects that can be loaded from (and removed from)
/// the database by their primary id
#[async_trait]
pub trait Loadable: Sized {
    type Id: Copy + Send + Sync;

    /// The sentinel id given to objects that have not been stored yet
    fn invalid_id() -> Self::Id;

    fn id(&self) -> Self::Id;
    fn set_id(&mut self, id: Self::Id);

    async fn load(id: Self::Id, db: &Database) -> Result<Self>;
    async fn delete_id(id: &Self::Id, db: &Database) -> Result<SqliteQueryResult>;

    /// Remove this object from the database and reset its id so that it can no
    /// longer be mistaken for a stored row
    async fn delete(&mut self, db: &Database) -> Result<SqliteQueryResult> {
        let res = Self::delete_id(&self.id(), db).await?;
        self.set_id(Self::invalid_id());
        Ok(res)
    }
}
