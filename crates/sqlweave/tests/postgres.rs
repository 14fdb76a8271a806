#![allow(dead_code)]

use sqlweave::{
    Runner, Session, SqlError, SqlResult, Statement, Value, dialect, eq, select_by_sql, update,
};
use tokio_postgres::NoTls;

async fn _transaction_macro_compiles(client: &mut tokio_postgres::Client) -> SqlResult<()> {
    sqlweave::transaction!(client, tx, {
        let session = Session::new(&tx, dialect::POSTGRES);
        update("accounts")
            .set_expr("balance", "balance - ?", [100])
            .where_(eq("id", 1))
            .exec(&session)
            .await?;
        Ok::<(), SqlError>(())
    })?;
    Ok(())
}

async fn connect() -> SqlResult<Option<tokio_postgres::Client>> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Ok(Some(client))
}

#[tokio::test]
async fn pg_rows_decode_into_values() -> SqlResult<()> {
    let Some(client) = connect().await? else {
        eprintln!("DATABASE_URL is not set; skipping pg_rows_decode_into_values");
        return Ok(());
    };

    let rows = Runner::query(
        &client,
        "SELECT 1::int8 AS id, 'a'::text AS name, NULL::text AS note, 2.5::float8 AS score",
        &[],
    )
    .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].columns(), ["id", "name", "note", "score"]);
    assert_eq!(
        rows[0].values(),
        [
            Value::Int(1),
            Value::Text("a".into()),
            Value::Null,
            Value::Float(2.5)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn pg_binds_values_through_session() -> SqlResult<()> {
    let Some(client) = connect().await? else {
        eprintln!("DATABASE_URL is not set; skipping pg_binds_values_through_session");
        return Ok(());
    };
    let session = Session::new(client, dialect::POSTGRES);

    let n: i32 = session
        .fetch_one(&select_by_sql("SELECT ?::int4 + 1", [41]))
        .await?;
    assert_eq!(n, 42);

    let err = session
        .fetch_one::<i64, _>(&select_by_sql("SELECT ?::int8", [1.5]))
        .await
        .unwrap_err();
    assert!(matches!(err, SqlError::Query(_)), "{err}");
    Ok(())
}

#[tokio::test]
async fn pg_transaction_rolls_back_on_error() -> SqlResult<()> {
    let Some(mut client) = connect().await? else {
        eprintln!("DATABASE_URL is not set; skipping pg_transaction_rolls_back_on_error");
        return Ok(());
    };
    client
        .batch_execute("CREATE TEMP TABLE sqlweave_tx (id int8 PRIMARY KEY)")
        .await?;

    let result: SqlResult<()> = async {
        sqlweave::transaction!(&mut client, tx, {
            let session = Session::new(&tx, dialect::POSTGRES);
            sqlweave::insert_into("sqlweave_tx")
                .columns(["id"])
                .values([1])
                .exec(&session)
                .await?;
            Err::<(), SqlError>(SqlError::validation("abort"))
        })
    }
    .await;
    assert!(matches!(result, Err(SqlError::Validation(_))));

    let session = Session::new(client, dialect::POSTGRES);
    let count: i64 = session
        .fetch_one(&select_by_sql("SELECT COUNT(*) FROM sqlweave_tx", Vec::<Value>::new()))
        .await?;
    assert_eq!(count, 0);
    Ok(())
}
