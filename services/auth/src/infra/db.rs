use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use booknet_auth_schema::{tokens, users};

use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::types::{Token, TokenPurpose, User};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            account_locked: Set(user.account_locked),
            enabled: Set(user.enabled),
            role: Set(user.role.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AuthServiceError::EmailAlreadyRegistered),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        password_hash: model.password_hash,
        account_locked: model.account_locked,
        enabled: model.enabled,
        role: model.role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Token repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Token>, AuthServiceError> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::Code.eq(code))
            .order_by_desc(tokens::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find token by code")?;
        model.map(token_from_model).transpose()
    }

    async fn find_by_code_and_purpose(
        &self,
        code: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<Token>, AuthServiceError> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::Code.eq(code))
            .filter(tokens::Column::Purpose.eq(purpose.as_str()))
            .order_by_desc(tokens::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find token by code and purpose")?;
        model.map(token_from_model).transpose()
    }

    async fn create(&self, token: &Token) -> Result<(), AuthServiceError> {
        tokens::ActiveModel {
            id: Set(token.id),
            user_id: Set(token.user_id),
            code: Set(token.code.clone()),
            purpose: Set(token.purpose.as_str().to_owned()),
            created_at: Set(token.created_at),
            expires_at: Set(token.expires_at),
            validated_at: Set(token.validated_at),
            consumed_at: Set(token.consumed_at),
        }
        .insert(&self.db)
        .await
        .context("create token")?;
        Ok(())
    }

    async fn mark_validated(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError> {
        tokens::ActiveModel {
            id: Set(id),
            validated_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark token validated")?;
        Ok(())
    }

    async fn activate_account(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        enabled: Set(true),
                        updated_at: Set(at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    tokens::ActiveModel {
                        id: Set(token_id),
                        validated_at: Set(Some(at)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("activate account")?;
        Ok(())
    }

    async fn reset_password(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let password_hash = password_hash.to_owned();
        let consumed = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let claimed = tokens::Entity::update_many()
                        .col_expr(tokens::Column::ConsumedAt, Expr::value(at))
                        .filter(tokens::Column::Id.eq(token_id))
                        .filter(tokens::Column::ConsumedAt.is_null())
                        .exec(txn)
                        .await?;
                    if claimed.rows_affected == 0 {
                        return Ok(false);
                    }
                    users::ActiveModel {
                        id: Set(user_id),
                        password_hash: Set(password_hash),
                        updated_at: Set(at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(true)
                })
            })
            .await
            .context("reset password")?;
        if !consumed {
            return Err(AuthServiceError::InvalidToken);
        }
        Ok(())
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, AuthServiceError> {
        let result = tokens::Entity::delete_many()
            .filter(tokens::Column::ExpiresAt.lt(before))
            .exec(&self.db)
            .await
            .context("purge expired tokens")?;
        Ok(result.rows_affected)
    }
}

fn token_from_model(model: tokens::Model) -> Result<Token, AuthServiceError> {
    Ok(Token {
        id: model.id,
        user_id: model.user_id,
        purpose: model.purpose.parse()?,
        code: model.code,
        created_at: model.created_at,
        expires_at: model.expires_at,
        validated_at: model.validated_at,
        consumed_at: model.consumed_at,
    })
}
