use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::auth::application::domain::entities::{
    Identifier, NewUser, RefreshToken, User, VerificationCode,
};
use crate::auth::application::ports::outgoing::{AccountStore, AccountStoreError};
use crate::auth::application::services::hash_token;

use super::sea_orm_entity::refresh_tokens::{
    ActiveModel as RefreshTokenActiveModel, Column as RefreshTokenColumn,
    Entity as RefreshTokenEntity, Model as RefreshTokenModel,
};
use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct AccountStorePostgres {
    db: Arc<DatabaseConnection>,
}

impl AccountStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_user(model: UserModel) -> Result<User, AccountStoreError> {
        let verification_code = model
            .verification_code
            .map(VerificationCode::try_new)
            .transpose()
            .map_err(|e| AccountStoreError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            is_verified: model.is_verified,
            verification_code,
            verification_expire_time: model
                .verification_expire_time
                .map(|t| t.with_timezone(&Utc)),
            is_premium: model.is_premium,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }

    /// The raw token is not stored, so it is carried over from the lookup key.
    fn to_refresh_token(token: &str, model: RefreshTokenModel) -> RefreshToken {
        RefreshToken {
            token: token.to_string(),
            user_id: model.user_id,
            expiry_time: model.expiry_time.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }

    fn refresh_token_row(token: &RefreshToken) -> RefreshTokenActiveModel {
        RefreshTokenActiveModel {
            token_hash: Set(hash_token(&token.token)),
            user_id: Set(token.user_id),
            expiry_time: Set(token.expiry_time.into()),
            created_at: Set(token.created_at.into()),
        }
    }
}

fn map_db_err(e: DbErr) -> AccountStoreError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
    {
        return AccountStoreError::Duplicate;
    }
    AccountStoreError::DatabaseError(e.to_string())
}

fn expect_one_row(rows_affected: u64) -> Result<(), AccountStoreError> {
    if rows_affected == 0 {
        return Err(AccountStoreError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl AccountStore for AccountStorePostgres {
    async fn create_user(&self, user: NewUser) -> Result<User, AccountStoreError> {
        let now = Utc::now();
        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            is_verified: Set(false),
            verification_code: Set(Some(user.verification_code.value())),
            verification_expire_time: Set(Some(user.verification_expire_time.into())),
            is_premium: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let inserted = active_user.insert(&*self.db).await.map_err(map_db_err)?;

        Self::to_user(inserted)
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AccountStoreError> {
        let condition = match Identifier::parse(identifier) {
            Identifier::Email(email) => UserColumn::Email.eq(email),
            Identifier::Username(username) => UserColumn::Username.eq(username),
        };

        let model = UserEntity::find()
            .filter(condition)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        model.map(Self::to_user).transpose()
    }

    async fn set_verification_code(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let result = UserEntity::update_many()
            .col_expr(UserColumn::VerificationCode, Expr::value(code.value()))
            .col_expr(
                UserColumn::VerificationExpireTime,
                Expr::value(expires_at.fixed_offset()),
            )
            .col_expr(UserColumn::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(UserColumn::Id.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one_row(result.rows_affected)
    }

    /// Conditional on the pending state, so concurrent verifies and a resend
    /// racing a verify cannot both win.
    async fn mark_verified(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountStoreError> {
        let result = UserEntity::update_many()
            .col_expr(UserColumn::IsVerified, Expr::value(true))
            .col_expr(UserColumn::VerificationCode, Expr::value(Option::<i32>::None))
            .col_expr(
                UserColumn::VerificationExpireTime,
                Expr::value(Option::<DateTime<chrono::FixedOffset>>::None),
            )
            .col_expr(UserColumn::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(UserColumn::Id.eq(user_id))
            .filter(UserColumn::IsVerified.eq(false))
            .filter(UserColumn::VerificationCode.eq(code.value()))
            .filter(UserColumn::VerificationExpireTime.gt(now.fixed_offset()))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AccountStoreError> {
        RefreshTokenEntity::insert(Self::refresh_token_row(token))
            .exec_without_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>, AccountStoreError> {
        let model = RefreshTokenEntity::find_by_id(hash_token(token))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(|m| Self::to_refresh_token(token, m)))
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, AccountStoreError> {
        let result = RefreshTokenEntity::delete_by_id(hash_token(token))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_refresh_tokens_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<u64, AccountStoreError> {
        let result = RefreshTokenEntity::delete_many()
            .filter(RefreshTokenColumn::UserId.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    /// Delete and insert commit together, so a user is never left with zero
    /// or two live refresh tokens.
    async fn replace_refresh_tokens_for_user(
        &self,
        user_id: Uuid,
        token: &RefreshToken,
    ) -> Result<(), AccountStoreError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        RefreshTokenEntity::delete_many()
            .filter(RefreshTokenColumn::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if let Err(e) = RefreshTokenEntity::insert(Self::refresh_token_row(token))
            .exec_without_returning(&txn)
            .await
        {
            error!(user_id = %user_id, error = %e, "Refresh token insert failed; rolling back");
            txn.rollback().await.map_err(map_db_err)?;
            return Err(map_db_err(e));
        }

        txn.commit().await.map_err(map_db_err)
    }

    /// The presented row is deleted inside the same transaction, so two
    /// concurrent rotations of one token cannot both succeed.
    async fn rotate_refresh_token(
        &self,
        presented: &str,
        next: &RefreshToken,
    ) -> Result<bool, AccountStoreError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let consumed = RefreshTokenEntity::delete_by_id(hash_token(presented))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if consumed.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(false);
        }

        RefreshTokenEntity::delete_many()
            .filter(RefreshTokenColumn::UserId.eq(next.user_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        RefreshTokenEntity::insert(Self::refresh_token_row(next))
            .exec_without_returning(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(true)
    }
}
