use super::helpers::{
    deadline, fetch_transactions, fetch_wallet, fetch_wallet_for_update, insert_transaction,
    insert_wallet, update_wallet,
};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Acquire;
use uuid::Uuid;

use crate::{
    api::LedgerAPI,
    auth::{Platform, User},
    entities::{Transaction as Entry, Wallet},
    error::{insufficient_funds_error, invalid_input_error, Error},
};

#[async_trait]
impl LedgerAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_wallet(&self, user: User, owner_id: Uuid) -> Result<Wallet, Error> {
        self.authorize(user, "create_wallet", Platform::default())?;

        let wallet = Wallet::new(owner_id);

        let mut conn = deadline(self.pool.acquire()).await?;
        insert_wallet(&mut conn, &wallet).await?;

        tracing::info!(wallet_id = %wallet.id, user_id = %wallet.user_id, "wallet created");

        Ok(wallet)
    }

    #[tracing::instrument(skip(self))]
    async fn find_wallet(&self, user: User) -> Result<Wallet, Error> {
        self.authorize(user.clone(), "read_wallet", Platform::default())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        fetch_wallet(&mut conn, &user.id).await
    }

    #[tracing::instrument(skip(self))]
    async fn credit_wallet(&self, user: User, amount: f64) -> Result<Entry, Error> {
        self.authorize(user.clone(), "credit_wallet", Platform::default())?;

        if amount <= 0.0 {
            return Err(invalid_input_error());
        }

        let mut conn = deadline(self.pool.acquire()).await?;
        let mut tx = deadline(conn.begin()).await?;

        let mut wallet = fetch_wallet_for_update(&mut tx, &user.id).await?;

        wallet.balance += amount;
        wallet.updated_at = Utc::now();

        let entry = Entry::credit(user.id, wallet.id, amount);

        update_wallet(&mut tx, &wallet).await?;
        insert_transaction(&mut tx, &entry).await?;

        deadline(tx.commit()).await?;

        Ok(entry)
    }

    // Invoked by the ride engine to capture the unlock fee; the balance is
    // re-read under the wallet's row lock so racing debits cannot drive the
    // committed balance below zero. The balance update and the ledger entry
    // commit together.
    #[tracing::instrument(skip(self))]
    async fn debit_wallet(&self, user_id: Uuid, amount: f64) -> Result<Entry, Error> {
        if amount <= 0.0 {
            return Err(invalid_input_error());
        }

        let mut conn = deadline(self.pool.acquire()).await?;
        let mut tx = deadline(conn.begin()).await?;

        let mut wallet = fetch_wallet_for_update(&mut tx, &user_id).await?;

        if wallet.balance < amount {
            return Err(insufficient_funds_error());
        }

        wallet.balance -= amount;
        wallet.updated_at = Utc::now();

        let entry = Entry::debit(user_id, wallet.id, amount);

        update_wallet(&mut tx, &wallet).await?;
        insert_transaction(&mut tx, &entry).await?;

        deadline(tx.commit()).await?;

        Ok(entry)
    }

    #[tracing::instrument(skip(self))]
    async fn wallet_history(&self, user: User) -> Result<Vec<Entry>, Error> {
        self.authorize(user.clone(), "read_wallet", Platform::default())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        fetch_transactions(&mut conn, &user.id).await
    }
}
