//! Transaction helper macro.
//!
//! A `tokio_postgres::Transaction` is itself a [`Runner`](crate::Runner), so a session over
//! `&tx` runs statements inside the transaction. [`transaction!`] handles commit/rollback.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::{dialect, eq, update, Session, SqlResult, Statement};
//! use tokio_postgres::NoTls;
//!
//! # async fn demo() -> SqlResult<()> {
//! let (mut client, connection) = tokio_postgres::connect("postgres://...", NoTls).await?;
//! tokio::spawn(async move { let _ = connection.await; });
//!
//! sqlweave::transaction!(&mut client, tx, {
//!     let session = Session::new(&tx, dialect::POSTGRES);
//!     update("accounts")
//!         .set_expr("balance", "balance - ?", [100])
//!         .where_(eq("id", 1))
//!         .exec(&session)
//!         .await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$client.transaction().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`.
///
/// The block must evaluate to `sqlweave::SqlResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client)
            .transaction()
            .await
            .map_err($crate::SqlError::from_db_error)?;

        let __sqlweave_tx_body_result = async { $body }.await;
        match __sqlweave_tx_body_result {
            Ok(value) => {
                $tx.commit()
                    .await
                    .map_err($crate::SqlError::from_db_error)?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::SqlError::Driver(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}
