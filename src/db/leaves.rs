//! # 휴가 승인/반려 쿼리
//!
//! 휴가 자체의 CRUD는 `db::records`가 처리하고, 여기서는 심사(review)만 다룹니다.

use super::records;
use crate::{
    error::AppError,
    models::{Leave, LeaveStatus},
};
use sqlx::SqlitePool;

/// 대기 중인 휴가를 승인 또는 반려합니다.
///
/// - 휴가가 없으면 `NotFound`
/// - 이미 심사된(또는 취소된) 휴가면 `Conflict`
pub async fn review_leave(
    pool: &SqlitePool,
    id: i64,
    status: LeaveStatus,
    reviewer_id: i64,
) -> Result<Leave, AppError> {
    // 상태 조건을 WHERE에 넣어, 동시에 들어온 두 심사 중 하나만 적용되게 합니다.
    let result = sqlx::query(
        r#"
        UPDATE leaves
        SET status = ?, reviewed_by = ?,
            reviewed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(reviewer_id)
    .bind(id)
    .execute(pool)
    .await?;

    let leave = records::get::<Leave>(pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(format!(
            "Leave is already {}",
            leave.status.as_str()
        )));
    }

    tracing::info!(leave_id = id, reviewer_id, status = status.as_str(), "Leave reviewed");
    Ok(leave)
}
