use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: f64,
    pub updated_at: DateTime<Utc>,
}

// Immutable once written; the ledger is append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Option<Uuid>,
    pub amount: f64,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn name(&self) -> String {
        match self {
            Self::Credit => "credit".into(),
            Self::Debit => "debit".into(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }
}

impl Wallet {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: 0.0,
            updated_at: Utc::now(),
        }
    }
}

impl Transaction {
    pub fn credit(user_id: Uuid, wallet_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            wallet_id: Some(wallet_id),
            amount,
            kind: TransactionKind::Credit,
            created_at: Utc::now(),
        }
    }

    pub fn debit(user_id: Uuid, wallet_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            wallet_id: Some(wallet_id),
            amount: -amount,
            kind: TransactionKind::Debit,
            created_at: Utc::now(),
        }
    }
}

#[test]
fn transaction_sign_conventions_test() {
    let user_id = Uuid::new_v4();
    let wallet_id = Uuid::new_v4();

    let credit = Transaction::credit(user_id, wallet_id, 10.0);
    assert_eq!(credit.kind, TransactionKind::Credit);
    assert_eq!(credit.amount, 10.0);

    let debit = Transaction::debit(user_id, wallet_id, 5.0);
    assert_eq!(debit.kind, TransactionKind::Debit);
    assert_eq!(debit.amount, -5.0);
}

#[test]
fn transaction_kind_names_round_trip_test() {
    for kind in [TransactionKind::Credit, TransactionKind::Debit] {
        assert_eq!(TransactionKind::from_name(&kind.name()), Some(kind));
    }

    assert!(TransactionKind::from_name("refund").is_none());
}

#[test]
fn new_wallet_starts_empty_test() {
    let user_id = Uuid::new_v4();
    let wallet = Wallet::new(user_id);

    assert_eq!(wallet.user_id, user_id);
    assert_eq!(wallet.balance, 0.0);
}
