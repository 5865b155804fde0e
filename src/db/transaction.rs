//! # 트랜잭션 헬퍼
//!
//! 순서가 있는 SQL 문장 목록을 하나의 커넥션, 하나의 트랜잭션에서 실행합니다.
//!
//! ```text
//! begin ─→ stmt[0] ─→ stmt[1] ─→ ... ─→ commit  → Ok(결과 목록)
//!             └── 실패 ───────────────→ rollback → Err(원래 에러)
//! ```
//!
//! 결과 목록은 입력과 같은 순서입니다. 실패하면 앞서 실행된 문장까지 모두 되돌리므로
//! 호출자는 일부만 반영된 상태를 볼 수 없습니다.

use super::query::{execute_on, Statement, StatementOutcome};
use crate::error::AppError;
use sqlx::SqlitePool;

/// 문장들을 트랜잭션으로 실행합니다.
///
/// 뒤쪽 문장은 `SqlParam::InsertedId(n)`으로 앞선 n번째 문장이 삽입한 ID를 참조할 수 있습니다.
pub async fn run_transaction(
    pool: &SqlitePool,
    statements: &[Statement],
) -> Result<Vec<StatementOutcome>, AppError> {
    if statements.is_empty() {
        return Ok(Vec::new());
    }

    // pool.begin(): 풀에서 커넥션 하나를 꺼내 BEGIN을 실행합니다.
    // 커밋하지 않은 Transaction이 drop되면 자동으로 롤백됩니다.
    let mut tx = pool.begin().await?;
    let mut outcomes = Vec::with_capacity(statements.len());

    for (index, stmt) in statements.iter().enumerate() {
        match execute_on(&mut *tx, stmt, &outcomes).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                tracing::warn!(
                    statement = index,
                    total = statements.len(),
                    error = %err,
                    "Transaction statement failed, rolling back"
                );
                // 롤백 실패보다 원래 에러를 호출자에게 돌려줍니다.
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                return Err(err);
            }
        }
    }

    tx.commit().await?;
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, query::SqlParam};

    async fn count_users(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn insert_user(name: &str) -> Statement {
        Statement::new("INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(format!("{}@example.com", name))
            .bind("hash")
    }

    #[tokio::test]
    async fn commits_all_and_reports_in_order() {
        let pool = db::connect_in_memory().await.unwrap();
        let outcomes = run_transaction(
            &pool,
            &[
                insert_user("a"),
                insert_user("b"),
                Statement::new("UPDATE users SET role = 'hr'"),
            ],
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].rows_affected, 1);
        assert_eq!(outcomes[1].last_insert_id, outcomes[0].last_insert_id + 1);
        assert_eq!(outcomes[2].rows_affected, 2);
        assert_eq!(count_users(&pool).await, 2);
    }

    #[tokio::test]
    async fn second_failure_rolls_back_the_batch() {
        let pool = db::connect_in_memory().await.unwrap();
        let result = run_transaction(
            &pool,
            &[
                insert_user("a"),
                // 같은 username: UNIQUE 위반
                insert_user("a"),
                insert_user("c"),
            ],
        )
        .await;

        assert!(result.is_err());
        assert_eq!(count_users(&pool).await, 0);

        // 실패 후에도 커넥션은 정상적으로 재사용됩니다.
        run_transaction(&pool, &[insert_user("d")]).await.unwrap();
        assert_eq!(count_users(&pool).await, 1);
    }

    #[tokio::test]
    async fn later_statements_reference_inserted_ids() {
        let pool = db::connect_in_memory().await.unwrap();
        let outcomes = run_transaction(
            &pool,
            &[
                insert_user("owner"),
                Statement::new(
                    "INSERT INTO employees (user_id, employee_code, first_name, last_name) VALUES (?, ?, ?, ?)",
                )
                .bind(SqlParam::InsertedId(0))
                .bind("E-1")
                .bind("Owner")
                .bind("Kim"),
            ],
        )
        .await
        .unwrap();

        let user_id: Option<i64> =
            sqlx::query_scalar("SELECT user_id FROM employees WHERE id = ?")
                .bind(outcomes[1].last_insert_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(user_id, Some(outcomes[0].last_insert_id));
    }

    #[tokio::test]
    async fn forward_reference_is_rejected() {
        let pool = db::connect_in_memory().await.unwrap();
        let result = run_transaction(
            &pool,
            &[
                insert_user("a"),
                Statement::new("UPDATE users SET last_login = ? WHERE id = ?")
                    .bind("2026-01-01")
                    .bind(SqlParam::InsertedId(5)),
            ],
        )
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(count_users(&pool).await, 0);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let pool = db::connect_in_memory().await.unwrap();
        assert!(run_transaction(&pool, &[]).await.unwrap().is_empty());
    }
}
