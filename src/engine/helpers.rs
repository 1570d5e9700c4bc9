use super::Database;

use core::future::Future;
use sqlx::{pool::PoolConnection, types::Json, Executor, Row, Transaction};
use std::time::Duration;
use uuid::Uuid;

use crate::{
    entities::{Bike, Ride, Transaction as Entry, TransactionKind, Wallet},
    error::{database_error, not_found_error, timeout_error, Error},
};

const STORAGE_TIMEOUT: Duration = Duration::from_secs(10);

// Every storage call runs under this deadline so a stalled connection
// surfaces as a timeout instead of hanging the request.
pub async fn deadline<T, E, F>(fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, E>>,
    Error: From<E>,
{
    match tokio::time::timeout(STORAGE_TIMEOUT, fut).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => Err(timeout_error()),
    }
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_bike(conn: &mut PoolConnection<Database>, id: &Uuid) -> Result<Bike, Error> {
    let Json(bike): Json<Bike> = deadline(
        conn.fetch_optional(sqlx::query("SELECT data FROM bikes WHERE id = $1").bind(id)),
    )
    .await?
    .ok_or_else(|| not_found_error())?
    .try_get("data")?;

    Ok(bike)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_bike_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Bike, Error> {
    let Json(bike): Json<Bike> = deadline(
        tx.fetch_optional(sqlx::query("SELECT data FROM bikes WHERE id = $1 FOR UPDATE").bind(id)),
    )
    .await?
    .ok_or_else(|| not_found_error())?
    .try_get("data")?;

    Ok(bike)
}

#[tracing::instrument(skip(conn))]
pub async fn insert_bike(conn: &mut PoolConnection<Database>, bike: &Bike) -> Result<(), Error> {
    deadline(
        conn.execute(
            sqlx::query("INSERT INTO bikes (id, status, data) VALUES ($1, $2, $3)")
                .bind(&bike.id)
                .bind(bike.status.name())
                .bind(Json(bike)),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_bike(tx: &mut Transaction<'_, Database>, bike: &Bike) -> Result<(), Error> {
    deadline(
        tx.execute(
            sqlx::query("UPDATE bikes SET status = $2, data = $3 WHERE id = $1")
                .bind(&bike.id)
                .bind(bike.status.name())
                .bind(Json(bike)),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_bikes(
    conn: &mut PoolConnection<Database>,
    status: Option<&str>,
) -> Result<Vec<Bike>, Error> {
    let query = match status {
        Some(status) => sqlx::query("SELECT data FROM bikes WHERE status = $1").bind(status),
        None => sqlx::query("SELECT data FROM bikes"),
    };

    let rows = deadline(conn.fetch_all(query)).await?;

    let mut bikes = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let Json(bike): Json<Bike> = row.try_get("data")?;
        bikes.push(bike);
    }

    Ok(bikes)
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_ride(conn: &mut PoolConnection<Database>, id: &Uuid) -> Result<Ride, Error> {
    let Json(ride): Json<Ride> = deadline(
        conn.fetch_optional(sqlx::query("SELECT data FROM rides WHERE id = $1").bind(id)),
    )
    .await?
    .ok_or_else(|| not_found_error())?
    .try_get("data")?;

    Ok(ride)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_ride_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Ride, Error> {
    let Json(ride): Json<Ride> = deadline(
        tx.fetch_optional(sqlx::query("SELECT data FROM rides WHERE id = $1 FOR UPDATE").bind(id)),
    )
    .await?
    .ok_or_else(|| not_found_error())?
    .try_get("data")?;

    Ok(ride)
}

#[tracing::instrument(skip(conn))]
pub async fn insert_ride(conn: &mut PoolConnection<Database>, ride: &Ride) -> Result<(), Error> {
    deadline(
        conn.execute(
            sqlx::query("INSERT INTO rides (id, status, data) VALUES ($1, $2, $3)")
                .bind(&ride.id)
                .bind(ride.status.name())
                .bind(Json(ride)),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_ride(tx: &mut Transaction<'_, Database>, ride: &Ride) -> Result<(), Error> {
    deadline(
        tx.execute(
            sqlx::query("UPDATE rides SET status = $2, data = $3 WHERE id = $1")
                .bind(&ride.id)
                .bind(ride.status.name())
                .bind(Json(ride)),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_rides(
    conn: &mut PoolConnection<Database>,
    status: Option<&str>,
) -> Result<Vec<Ride>, Error> {
    let query = match status {
        Some(status) => sqlx::query("SELECT data FROM rides WHERE status = $1").bind(status),
        None => sqlx::query("SELECT data FROM rides"),
    };

    let rows = deadline(conn.fetch_all(query)).await?;

    let mut rides = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let Json(ride): Json<Ride> = row.try_get("data")?;
        rides.push(ride);
    }

    Ok(rides)
}

fn wallet_from_row(row: &sqlx::postgres::PgRow) -> Result<Wallet, Error> {
    Ok(Wallet {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        balance: row.try_get("balance")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_wallet(
    conn: &mut PoolConnection<Database>,
    user_id: &Uuid,
) -> Result<Wallet, Error> {
    let row = deadline(conn.fetch_optional(
        sqlx::query("SELECT id, user_id, balance, updated_at FROM wallets WHERE user_id = $1")
            .bind(user_id),
    ))
    .await?
    .ok_or_else(|| not_found_error())?;

    wallet_from_row(&row)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_wallet_for_update(
    tx: &mut Transaction<'_, Database>,
    user_id: &Uuid,
) -> Result<Wallet, Error> {
    let row = deadline(tx.fetch_optional(
        sqlx::query(
            "SELECT id, user_id, balance, updated_at FROM wallets WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id),
    ))
    .await?
    .ok_or_else(|| not_found_error())?;

    wallet_from_row(&row)
}

#[tracing::instrument(skip(conn))]
pub async fn insert_wallet(
    conn: &mut PoolConnection<Database>,
    wallet: &Wallet,
) -> Result<(), Error> {
    deadline(
        conn.execute(
            sqlx::query(
                "INSERT INTO wallets (id, user_id, balance, updated_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(&wallet.id)
            .bind(&wallet.user_id)
            .bind(wallet.balance)
            .bind(wallet.updated_at),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_wallet(
    tx: &mut Transaction<'_, Database>,
    wallet: &Wallet,
) -> Result<(), Error> {
    deadline(
        tx.execute(
            sqlx::query("UPDATE wallets SET balance = $2, updated_at = $3 WHERE id = $1")
                .bind(&wallet.id)
                .bind(wallet.balance)
                .bind(wallet.updated_at),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn insert_transaction(
    tx: &mut Transaction<'_, Database>,
    entry: &Entry,
) -> Result<(), Error> {
    deadline(
        tx.execute(
            sqlx::query(
                "INSERT INTO transactions (id, user_id, wallet_id, amount, kind, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&entry.id)
            .bind(&entry.user_id)
            .bind(&entry.wallet_id)
            .bind(entry.amount)
            .bind(entry.kind.name())
            .bind(entry.created_at),
        ),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_transactions(
    conn: &mut PoolConnection<Database>,
    user_id: &Uuid,
) -> Result<Vec<Entry>, Error> {
    let rows = deadline(conn.fetch_all(
        sqlx::query(
            "SELECT id, user_id, wallet_id, amount, kind, created_at FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id),
    ))
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let kind: String = row.try_get("kind")?;
        let kind =
            TransactionKind::from_name(&kind).ok_or_else(|| database_error("unknown kind"))?;

        entries.push(Entry {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            wallet_id: row.try_get("wallet_id")?,
            amount: row.try_get("amount")?,
            kind,
            created_at: row.try_get("created_at")?,
        });
    }

    Ok(entries)
}

#[test]
fn deadline_passes_through_completed_calls_test() {
    let ok: Result<i32, Error> = tokio_test::block_on(deadline(async { Ok::<_, sqlx::Error>(7) }));
    assert_eq!(ok.unwrap(), 7);

    let err: Result<i32, Error> =
        tokio_test::block_on(deadline(async { Err::<i32, _>(sqlx::Error::RowNotFound) }));
    assert_eq!(err.unwrap_err().code, 2);
}

#[test]
fn deadline_times_out_stalled_call_test() {
    // paused clock advances past the deadline as soon as the runtime idles
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();

    let result: Result<(), Error> =
        rt.block_on(deadline(std::future::pending::<Result<(), sqlx::Error>>()));
    assert_eq!(result.unwrap_err().code, 110);
}
