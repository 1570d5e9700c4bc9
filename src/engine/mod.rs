mod fleet_api;
mod helpers;
mod ledger_api;
mod ride_api;

use oso::Oso;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    api::API,
    auth::authorizor,
    error::{unauthorized_error, Error},
};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        // fleet registry
        pool.execute(
            "CREATE TABLE IF NOT EXISTS bikes (id UUID PRIMARY KEY, status VARCHAR NOT NULL, data JSONB NOT NULL)",
        )
        .await?;

        // ride store
        pool.execute(
            "CREATE TABLE IF NOT EXISTS rides (id UUID PRIMARY KEY, status VARCHAR NOT NULL, data JSONB NOT NULL)",
        )
        .await?;

        // ledger; balance is a real column so a debit commits as one
        // conditional row update under the wallet's row lock
        pool.execute(
            "CREATE TABLE IF NOT EXISTS wallets (id UUID PRIMARY KEY, user_id UUID NOT NULL UNIQUE, balance DOUBLE PRECISION NOT NULL, updated_at TIMESTAMPTZ NOT NULL)",
        )
        .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS transactions (id UUID PRIMARY KEY, user_id UUID NOT NULL, wallet_id UUID, amount DOUBLE PRECISION NOT NULL, kind VARCHAR NOT NULL, created_at TIMESTAMPTZ NOT NULL)",
        )
        .await?;

        Ok(Self {
            pool,
            authorizor: authorizor::new(),
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl API for Engine {}
