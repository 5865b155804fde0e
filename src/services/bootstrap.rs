use crate::{
    config::BootstrapAdmin, db::users as db_users, error::AppError, models::Role,
    services::password,
};
use sqlx::SqlitePool;

/// users 테이블이 비어 있으면 설정의 관리자 계정을 만듭니다.
///
/// 반환값은 계정을 새로 만들었는지 여부입니다.
pub async fn ensure_admin(pool: &SqlitePool, admin: &BootstrapAdmin) -> Result<bool, AppError> {
    if db_users::count_users(pool).await? > 0 {
        return Ok(false);
    }

    let password_hash = password::hash_password(&admin.password)?;
    let user = db_users::create_user(
        pool,
        &admin.username,
        &admin.email,
        &password_hash,
        Role::Admin,
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created bootstrap admin account");
    Ok(true)
}
