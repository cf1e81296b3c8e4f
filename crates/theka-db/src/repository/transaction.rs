//! # Transaction Repository
//!
//! Persistence for completed sales.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  transactions (header)            transaction_items (lines)         │
//! │  ┌──────────────────────┐         ┌──────────────────────────┐      │
//! │  │ id                   │ 1     N │ transaction_id (FK)      │      │
//! │  │ kind: single | multi │◄────────│ brand snapshot + qty     │      │
//! │  │ total_amount_paise   │         │ line_total_paise         │      │
//! │  │ payment_method       │         │ position (ring-up order) │      │
//! │  └──────────────────────┘         └──────────────────────────┘      │
//! │                                                                     │
//! │  kind='single' ⇒ exactly one line row                               │
//! │  kind='multi'  ⇒ one line row per cart item                         │
//! │                                                                     │
//! │  Loading re-assembles the tagged TransactionItems variant, so       │
//! │  consumers never see a half-shaped record.                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::sqlite::Sqlite;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use theka_core::{PaymentMethod, SaleLine, Transaction, TransactionItems, TransactionKind};

const TX_COLUMNS: &str =
    "id, kind, total_amount_paise, payment_method, customer_name, customer_phone, created_at";

const LINE_COLUMNS: &str =
    "brand_id, brand_name, brand_type, quantity, price_paise, line_total_paise";

/// Raw header row; lines are loaded separately and the two are assembled
/// into the domain [`Transaction`].
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    kind: TransactionKind,
    total_amount_paise: i64,
    payment_method: PaymentMethod,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    /// Combines a header row with its lines into the tagged domain type.
    fn assemble(self, mut lines: Vec<SaleLine>) -> DbResult<Transaction> {
        let items = match self.kind {
            TransactionKind::Single => {
                if lines.len() != 1 {
                    return Err(DbError::Internal(format!(
                        "single transaction {} has {} line rows",
                        self.id,
                        lines.len()
                    )));
                }
                TransactionItems::Single(lines.remove(0))
            }
            TransactionKind::Multi => {
                if lines.is_empty() {
                    return Err(DbError::Internal(format!(
                        "multi transaction {} has no line rows",
                        self.id
                    )));
                }
                TransactionItems::Multi(lines)
            }
        };

        Ok(Transaction {
            id: self.id,
            items,
            total_amount_paise: self.total_amount_paise,
            payment_method: self.payment_method,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            created_at: self.created_at,
        })
    }
}

/// Repository for sale records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a transaction (with its lines) by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let mut conn = self.pool.acquire().await?;
        fetch_with_items(&mut conn, id).await
    }

    /// Lists transactions in an inclusive date window, newest first.
    ///
    /// Either bound may be omitted. This is the query analytics runs over,
    /// so it is unbounded in size.
    pub async fn list_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions \
             WHERE (?1 IS NULL OR created_at >= ?1) \
               AND (?2 IS NULL OR created_at <= ?2) \
             ORDER BY created_at DESC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_all(rows).await
    }

    /// Lists the most recent transactions, optionally within a date window.
    ///
    /// The history page shows the latest sales; 50 is its default page size.
    pub async fn list_recent(
        &self,
        limit: u32,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions \
             WHERE (?1 IS NULL OR created_at >= ?1) \
               AND (?2 IS NULL OR created_at <= ?2) \
             ORDER BY created_at DESC \
             LIMIT ?3"
        ))
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_all(rows).await
    }

    /// Lists today's transactions (since UTC midnight), newest first.
    pub async fn list_today(&self) -> DbResult<Vec<Transaction>> {
        let start_of_day = Utc::now()
            .date_naive()
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();

        self.list_in_range(Some(start_of_day), None).await
    }

    /// Counts sale records (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Loads lines for each header row and assembles domain transactions.
    async fn assemble_all(&self, rows: Vec<TransactionRow>) -> DbResult<Vec<Transaction>> {
        let mut transactions = Vec::with_capacity(rows.len());

        for row in rows {
            let lines = fetch_lines(&self.pool, &row.id).await?;
            transactions.push(row.assemble(lines)?);
        }

        Ok(transactions)
    }
}

/// Generates a new transaction ID.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Query functions (shared between repository and ledger transactions)
// =============================================================================

/// Fetches the line rows for one transaction, in ring-up order.
async fn fetch_lines<'e, E>(exec: E, transaction_id: &str) -> DbResult<Vec<SaleLine>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let lines = sqlx::query_as::<_, SaleLine>(&format!(
        "SELECT {LINE_COLUMNS} FROM transaction_items \
         WHERE transaction_id = ?1 \
         ORDER BY position"
    ))
    .bind(transaction_id)
    .fetch_all(exec)
    .await?;

    Ok(lines)
}

/// Fetches a transaction with its lines.
///
/// Takes a connection because it issues two queries that must see the same
/// snapshot when called inside a ledger transaction.
pub(crate) async fn fetch_with_items(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Transaction>> {
    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        "SELECT {TX_COLUMNS} FROM transactions WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let lines = fetch_lines(&mut *conn, &row.id).await?;
    row.assemble(lines).map(Some)
}

/// Inserts a transaction header plus all of its line rows.
pub(crate) async fn insert(conn: &mut SqliteConnection, tx: &Transaction) -> DbResult<()> {
    debug!(
        id = %tx.id,
        kind = ?tx.kind(),
        total = %tx.total_amount_paise,
        "Inserting transaction"
    );

    sqlx::query(
        "INSERT INTO transactions ( \
             id, kind, total_amount_paise, payment_method, \
             customer_name, customer_phone, created_at \
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&tx.id)
    .bind(tx.kind())
    .bind(tx.total_amount_paise)
    .bind(tx.payment_method)
    .bind(&tx.customer_name)
    .bind(&tx.customer_phone)
    .bind(tx.created_at)
    .execute(&mut *conn)
    .await?;

    for (position, line) in tx.lines().iter().enumerate() {
        sqlx::query(
            "INSERT INTO transaction_items ( \
                 id, transaction_id, brand_id, brand_name, brand_type, \
                 quantity, price_paise, line_total_paise, position \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&tx.id)
        .bind(&line.brand_id)
        .bind(&line.brand_name)
        .bind(&line.brand_type)
        .bind(line.quantity)
        .bind(line.price_paise)
        .bind(line.line_total_paise)
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Deletes a transaction row; its line rows cascade.
///
/// ## Returns
/// `true` if a row was deleted.
pub(crate) async fn delete<'e, E>(exec: E, id: &str) -> DbResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, "Deleting transaction");

    let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
        .bind(id)
        .execute(exec)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================
