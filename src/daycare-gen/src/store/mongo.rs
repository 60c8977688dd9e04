use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use bson::Bson;
use bson::Document;
use mongodb::options::ClientOptions;
use mongodb::options::Credential;
use mongodb::options::ServerAddress;
use mongodb::Client;
use mongodb::Database;
use tracing::debug;
use tracing::info;

use crate::error::Error;
use crate::error::Result;
use crate::store::Store;

pub const APP_NAME: &str = "daycare-gen";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Credentials {
    pub fn client_options(&self) -> ClientOptions {
        let mut credential = Credential::default();
        credential.username = Some(self.user.clone());
        credential.password = Some(self.password.clone());

        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::Tcp {
            host: self.host.clone(),
            port: Some(self.port),
        }];
        options.credential = Some(credential);
        options.app_name = Some(APP_NAME.to_string());

        options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub database: String,
    pub credentials: Credentials,
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn connect(conn: &Connection) -> Result<Self> {
        debug!(
            "connecting to {}:{} as {}",
            conn.credentials.host, conn.credentials.port, conn.credentials.user
        );
        let client = Client::with_options(conn.credentials.client_options())?;
        let db = client.database(&conn.database);
        db.run_command(doc! { "ping": 1 }, None).await?;
        info!("connected to database {}", conn.database);

        Ok(Self::new(db))
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<ObjectId>> {
        // the driver refuses empty bulk writes
        if docs.is_empty() {
            return Ok(vec![]);
        }

        let len = docs.len();
        let res = self
            .db
            .collection::<Document>(collection)
            .insert_many(docs, None)
            .await?;

        ordered_ids(len, &res.inserted_ids, collection)
    }
}

/// Rebuilds input order from the driver's index→id map.
fn ordered_ids(
    len: usize,
    inserted_ids: &HashMap<usize, Bson>,
    collection: &str,
) -> Result<Vec<ObjectId>> {
    (0..len)
        .map(|idx| match inserted_ids.get(&idx) {
            Some(Bson::ObjectId(id)) => Ok(*id),
            _ => Err(Error::MissingIdentity(idx, collection.to_string())),
        })
        .collect()
}
