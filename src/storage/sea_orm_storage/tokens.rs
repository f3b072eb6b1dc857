//! Refresh token 吊销记录

use super::SeaOrmStorage;
use crate::entity::revoked_tokens::{ActiveModel, Column, Entity as RevokedTokens};
use crate::errors::{Result, SchoolSysError};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 以 jti 为主键插入，插入冲突即说明令牌已被使用过
    pub async fn revoke_refresh_token_impl(
        &self,
        jti: &str,
        user_id: i64,
        expires_at: i64,
    ) -> Result<bool> {
        let model = ActiveModel {
            jti: Set(jti.to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            revoked_at: Set(chrono::Utc::now().timestamp()),
        };

        match RevokedTokens::insert(model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = SchoolSysError::database_operation(format!("吊销令牌失败: {e}"));
                if err.is_unique_violation() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn purge_expired_revocations_impl(&self, now: i64) -> Result<u64> {
        let result = RevokedTokens::delete_many()
            .filter(Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("清理吊销记录失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
