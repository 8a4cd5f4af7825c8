use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{LoginRequest, PublicUser, RegisterRequest};
use super::repo::{Role, User};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtKeys;
use crate::error::AppError;
use crate::store::{keys, KvStore};

// Same message for unknown email and wrong password, deliberately: the
// response must not reveal which of the two failed.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
}

pub async fn register(store: &dyn KvStore, req: RegisterRequest) -> Result<PublicUser, AppError> {
    if store.get(&keys::user_email(&req.email)).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = User {
        id: Uuid::new_v4(),
        username: req.username,
        email: req.email,
        password_hash,
        role: req.role.unwrap_or_default(),
    };
    user.insert(store).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(PublicUser::from(&user))
}

pub async fn login(
    store: &dyn KvStore,
    jwt: &JwtKeys,
    req: LoginRequest,
) -> Result<LoginOutcome, AppError> {
    let Some(user) = User::find_by_email(store, &req.email).await? else {
        warn!(email = %req.email, "login for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = jwt.sign(user.id, user.role, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok(LoginOutcome {
        token,
        role: user.role,
    })
}

pub async fn get_profile(store: &dyn KvStore, user_id: Uuid) -> Result<PublicUser, AppError> {
    let user = User::fetch(store, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(PublicUser::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::store::MemoryStore;
    use axum::extract::FromRef;

    fn register_req(email: &str, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            username: "bob".into(),
            email: email.into(),
            password: "secret1".into(),
            role,
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let store = MemoryStore::new();
        register(&store, register_req("bob@x.com", None))
            .await
            .unwrap();
        let err = register(&store, register_req("bob@x.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_defaults_role_to_user() {
        let store = MemoryStore::new();
        let user = register(&store, register_req("bob@x.com", None))
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let state = AppState::for_tests();
        let jwt = JwtKeys::from_ref(&state);
        let store = state.store.as_ref();
        register(store, register_req("bob@x.com", None)).await.unwrap();

        let unknown = login(store, &jwt, login_req("nobody@x.com", "secret1"))
            .await
            .unwrap_err();
        let wrong = login(store, &jwt, login_req("bob@x.com", "wrong-password"))
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(unknown, AppError::Unauthorized(_)));
        assert!(matches!(wrong, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let state = AppState::for_tests();
        let jwt = JwtKeys::from_ref(&state);
        let store = state.store.as_ref();
        let user = register(store, register_req("admin@x.com", Some(Role::Admin)))
            .await
            .unwrap();

        let outcome = login(store, &jwt, login_req("admin@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(outcome.role, Role::Admin);
        let claims = jwt.verify(&outcome.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email, "admin@x.com");
    }

    #[tokio::test]
    async fn profile_of_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = get_profile(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
