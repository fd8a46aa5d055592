//! Objects to manage named geographic locations
use crate::{
    Database,
    error::{Error, Result},
    loadable::Loadable,
    query::{self, Cmp, DynFilterPart, FilterPart},
    timeofday::TimeOfDay,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use sqlx::QueryBuilder;
use sqlx::Sqlite;
use sqlx::{prelude::*, sqlite::SqliteQueryResult};
use std::sync::Arc;

/// A type for specifying fields that can be used for filtering a database
/// query for locations
#[derive(Clone)]
pub enum Filter {
    /// Match the ID of the location to the given value
    Id(i64),

    /// Match any location except the one with the given ID
    NotId(i64),

    /// Compare the name of the location to the given value
    Name(Cmp, String),

    /// Compare the time of day of the location to the given value
    Time(Cmp, TimeOfDay),
}

impl From<Filter> for DynFilterPart {
    fn from(value: Filter) -> Self {
        Arc::new(value)
    }
}

impl From<Filter> for Option<DynFilterPart> {
    fn from(value: Filter) -> Self {
        Some(Arc::new(value))
    }
}

impl FilterPart for Filter {
    fn add_to_query(&self, builder: &mut sqlx::QueryBuilder<sqlx::Sqlite>) {
        match self {
            Self::Id(id) => _ = builder.push(" L.locid = ").push_bind(*id),
            Self::NotId(id) => _ = builder.push(" L.locid != ").push_bind(*id),
            Self::Name(cmp, frag) => {
                let s = match cmp {
                    Cmp::Like => format!("%{frag}%"),
                    _ => frag.to_string(),
                };
                builder.push(" L.locname ").push(cmp).push_bind(s);
            }
            Self::Time(cmp, time) => {
                builder.push(" L.loctime ").push(cmp).push_bind(*time);
            }
        }
    }
}

/// A data type that represents a named point on the map, annotated with the
/// time of day at which it is relevant.
#[derive(Debug, sqlx::FromRow, Deserialize, Serialize, PartialEq, Clone)]
pub struct Location {
    /// A unique ID that identifies this location in the database
    #[sqlx(rename = "locid")]
    pub id: i64,

    /// The name of the location. Names are unique across the whole table.
    #[sqlx(rename = "locname")]
    pub name: String,

    /// The latitude of the location
    #[serde(rename = "lat")]
    pub latitude: f64,

    /// The longitude of the location
    #[serde(rename = "long")]
    pub longitude: f64,

    /// The time of day associated with this location
    #[sqlx(rename = "loctime")]
    pub time: TimeOfDay,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[async_trait]
impl Loadable for Location {
    type Id = i64;

    fn invalid_id() -> Self::Id {
        -1
    }

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id
    }

    async fn load(id: Self::Id, db: &Database) -> Result<Self> {
        Self::build_query(Some(Filter::Id(id).into()))
            .build_query_as()
            .fetch_one(db.pool())
            .await
            .map_err(|e| e.into())
    }

    async fn delete_id(id: &Self::Id, db: &Database) -> Result<SqliteQueryResult> {
        sqlx::query(r#"DELETE FROM locations WHERE locid=?1"#)
            .bind(id)
            .execute(db.pool())
            .await
            .map_err(|e| e.into())
    }
}

impl Location {
    fn build_query(filter: Option<DynFilterPart>) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(
            r#"SELECT L.locid, L.locname, L.latitude, L.longitude, L.loctime
            FROM locations L"#,
        );
        if let Some(f) = filter {
            qb.push(" WHERE ");
            f.add_to_query(&mut qb);
        }
        qb.push(" ORDER BY L.locid ASC");
        qb
    }

    fn build_count(filter: Option<DynFilterPart>) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) as nlocations FROM locations L");
        if let Some(f) = filter {
            qb.push(" WHERE ");
            f.add_to_query(&mut qb);
        }
        qb
    }

    /// Loads all matching locations from the database
    pub async fn load_all(filter: Option<DynFilterPart>, db: &Database) -> Result<Vec<Location>> {
        Self::build_query(filter)
            .build_query_as()
            .fetch_all(db.pool())
            .await
            .map_err(|e| e.into())
    }

    /// Loads all locations whose time of day falls within the inclusive range
    /// `[begin, end]`
    pub async fn load_between(
        begin: TimeOfDay,
        end: TimeOfDay,
        db: &Database,
    ) -> Result<Vec<Location>> {
        let filter = query::and()
            .push(Filter::Time(Cmp::NotLessThan, begin))
            .push(Filter::Time(Cmp::NotGreaterThan, end))
            .build();
        Self::load_all(Some(filter), db).await
    }

    pub async fn count(filter: Option<DynFilterPart>, db: &Database) -> Result<i64> {
        Self::build_count(filter)
            .build()
            .fetch_one(db.pool())
            .await?
            .try_get("nlocations")
            .map_err(|e| e.into())
    }

    /// Checks whether the given name is already taken by a stored location,
    /// optionally ignoring one record (so that an update can keep its own
    /// name without tripping the uniqueness rule)
    pub async fn name_in_use(name: &str, exclude: Option<i64>, db: &Database) -> Result<bool> {
        let mut fbuilder = query::and().push(Filter::Name(Cmp::Equal, name.to_string()));
        if let Some(id) = exclude {
            fbuilder = fbuilder.push(Filter::NotId(id));
        }
        Ok(Self::count(Some(fbuilder.build()), db).await? > 0)
    }

    /// Add this location to the database. If this call completes successfully,
    /// the id of this object will be updated to the ID of the inserted row in
    /// the database
    pub async fn insert(&mut self, db: &Database) -> Result<SqliteQueryResult> {
        if self.id != Self::invalid_id() {
            return Err(Error::InvalidInsertObjectAlreadyExists(self.id));
        }

        sqlx::query(
            r#"INSERT INTO locations
          (locname, latitude, longitude, loctime)
          VALUES (?, ?, ?, ?)"#,
        )
        .bind(&self.name)
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(self.time)
        .execute(db.pool())
        .await
        .inspect(|r| self.id = r.last_insert_rowid())
        .map_err(|e| e.into())
    }

    /// Update the location in the database such that it matches this object
    pub async fn update(&self, db: &Database) -> Result<SqliteQueryResult> {
        if self.id < 0 {
            return Err(Error::InvalidUpdateObjectNotFound);
        }

        sqlx::query(
            "UPDATE locations SET locname=?, latitude=?, longitude=?, loctime=? WHERE locid=?",
        )
        .bind(self.name.clone())
        .bind(self.latitude)
        .bind(self.longitude)
        .bind(self.time)
        .bind(self.id)
        .execute(db.pool())
        .await
        .map_err(|e| e.into())
    }

    /// Creates a new location object with the given data. It will initially
    /// have an invalid ID until it is inserted into the database
    pub fn new(name: String, latitude: f64, longitude: f64, time: TimeOfDay) -> Self {
        Self {
            id: Self::invalid_id(),
            name,
            latitude,
            longitude,
            time,
        }
    }
}
