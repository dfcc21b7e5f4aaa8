// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

// Validade da sessão emitida
const TOKEN_TTL_DAYS: i64 = 7;

/// Gera o hash bcrypt fora do executor assíncrono.
pub(crate) async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn register_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let hashed_password = hash_password(password).await?;

        let new_user = self
            .user_repo
            .create_user(self.user_repo.pool(), email.trim(), &hashed_password)
            .await?;

        tracing::info!("Usuário registrado: {}", new_user.id);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.decode_token(token)?;

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn decode_token(&self, token: &str) -> Result<Uuid, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims.sub)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    // Pool preguiçosa: nenhum teste abaixo chega a abrir conexão
    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/financeiro_test")
            .unwrap();
        AuthService::new(UserRepository::new(pool), secret.into())
    }

    #[tokio::test]
    async fn issued_token_decodes_to_the_same_user() {
        let auth = service("segredo");
        let user_id = Uuid::new_v4();
        let token = auth.create_token(user_id).unwrap();
        assert_eq!(auth.decode_token(&token).unwrap(), user_id);
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let token = service("um").create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(service("outro").decode_token(&token), Err(AppError::InvalidToken)));
        assert!(matches!(service("um").decode_token("lixo"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("segredo123").await.unwrap();
        assert!(verify("segredo123", &hashed).unwrap());
        assert!(!verify("outra", &hashed).unwrap());
    }
}
