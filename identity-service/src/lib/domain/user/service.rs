use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessToken;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Identity;
use auth::TokenError;
use chrono::Utc;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token signing
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        // Hash outside the repository so slow hashing never holds its lock
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash = run_blocking(move || authenticator.hash_password(password.expose()))
            .await?
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let user = self.repository.find_by_username(&command.username).await?;

        let identity = match &user {
            Some(user) => Identity::new(user.id, &user.username),
            None => Identity::new("", &command.username),
        };
        let stored_hash = user.map(|user| user.password_hash);

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        run_blocking(move || {
            authenticator.authenticate(
                password.expose(),
                stored_hash.as_deref(),
                &identity,
                Utc::now(),
            )
        })
        .await?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            AuthenticationError::PasswordError(err) => {
                tracing::error!(error = %err, "Stored password hash is unreadable");
                UserError::Hashing(err.to_string())
            }
            AuthenticationError::TokenError(err) => {
                UserError::Unknown(format!("Token generation failed: {}", err))
            }
        })
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username.as_str())
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn authorize(&self, token: &str) -> Result<AuthenticatedUser, UserError> {
        let identity = self.authenticator.validate_token(token, Utc::now())?;

        let user_id = UserId::from_string(&identity.subject)
            .map_err(|e| TokenError::Malformed(format!("invalid subject: {}", e)))?;

        Ok(AuthenticatedUser {
            user_id,
            username: identity.username,
        })
    }
}

/// Run Argon2 work on the blocking pool instead of a runtime worker.
async fn run_blocking<F, T>(work: F) -> Result<T, UserError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| UserError::Unknown(format!("Blocking task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use auth::WorkFactor;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Password;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(
                SECRET,
                WorkFactor {
                    memory_cost_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            )
            .expect("Failed to create authenticator"),
        )
    }

    fn register_command(username: &str, password: &str) -> RegisterUserCommand {
        RegisterUserCommand::new(
            Username::new(username.to_string()).unwrap(),
            Password::new(password.to_string()).unwrap(),
        )
    }

    fn stored_user(authenticator: &Authenticator, username: &str, password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|user| Ok(user));

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let user = service
            .register_user(register_command("alice", "s3cret!"))
            .await
            .expect("Registration failed");

        assert_eq!(user.username.as_str(), "alice");
        assert_ne!(user.password_hash, "s3cret!");
        assert!(auth::PasswordHasher::new()
            .verify("s3cret!", &user.password_hash)
            .unwrap());
    }

    // Runs on the single-threaded test runtime: the ticker only advances
    // if hashing yields the runtime thread while it works.
    #[tokio::test]
    async fn test_password_work_leaves_runtime_responsive() {
        let authenticator = Arc::new(
            Authenticator::new(
                SECRET,
                WorkFactor {
                    memory_cost_kib: 8192,
                    iterations: 2,
                    parallelism: 1,
                },
            )
            .unwrap(),
        );
        let user = stored_user(&authenticator, "alice", "s3cret!");

        let mut repository = MockTestUserRepository::new();
        repository.expect_create().returning(|user| Ok(user));
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                }
            })
        };

        service
            .register_user(register_command("bob", "hunter2"))
            .await
            .expect("Registration failed");
        let after_register = ticks.load(Ordering::SeqCst);

        service
            .login(LoginCommand::new("alice".to_string(), "s3cret!".to_string()))
            .await
            .expect("Login failed");
        let after_login = ticks.load(Ordering::SeqCst);

        ticker.abort();

        assert!(after_register > 0);
        assert!(after_login > after_register);
    }

    #[tokio::test]
    async fn test_register_user_duplicate() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::UsernameAlreadyExists(user.username.to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .register_user(register_command("alice", "s3cret!"))
            .await;

        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "alice", "s3cret!");
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let token = service
            .login(LoginCommand::new("alice".to_string(), "s3cret!".to_string()))
            .await
            .expect("Login failed");

        assert_eq!(token.username, "alice");
        assert_eq!(token.subject, user_id.to_string());
        assert_eq!(token.expires_at - token.issued_at, Duration::hours(1));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "alice", "s3cret!");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service
            .login(LoginCommand::new("alice".to_string(), "wrong".to_string()))
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_matches_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_username().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .login(LoginCommand::new("ghost".to_string(), "s3cret!".to_string()))
            .await;

        let err = result.expect_err("Login should fail");
        assert!(matches!(err, UserError::InvalidCredentials));
        assert_eq!(err.to_string(), UserError::InvalidCredentials.to_string());
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_username().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .get_user_by_username(&Username::new("ghost".to_string()).unwrap())
            .await;

        assert!(matches!(result, Err(UserError::NotFoundByUsername(_))));
    }

    #[tokio::test]
    async fn test_authorize_issued_token() {
        let authenticator = authenticator();
        let user_id = UserId::new();
        let token = authenticator
            .issue_token(&Identity::new(user_id, "alice"), Utc::now())
            .unwrap();

        let service = UserService::new(
            Arc::new(MockTestUserRepository::new()),
            Arc::clone(&authenticator),
        );

        let user = service.authorize(&token.token).await.expect("Authorize failed");
        assert_eq!(
            user,
            AuthenticatedUser {
                user_id,
                username: "alice".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_authorize_expired_token() {
        let authenticator = authenticator();
        let token = authenticator
            .issue_token(
                &Identity::new(UserId::new(), "alice"),
                Utc::now() - Duration::hours(2),
            )
            .unwrap();

        let service = UserService::new(Arc::new(MockTestUserRepository::new()), authenticator);

        let result = service.authorize(&token.token).await;
        assert!(matches!(
            result,
            Err(UserError::Unauthorized(TokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_authorize_rejects_non_uuid_subject() {
        let authenticator = authenticator();
        let token = authenticator
            .issue_token(&Identity::new("not-a-uuid", "alice"), Utc::now())
            .unwrap();

        let service = UserService::new(Arc::new(MockTestUserRepository::new()), authenticator);

        let result = service.authorize(&token.token).await;
        assert!(matches!(
            result,
            Err(UserError::Unauthorized(TokenError::Malformed(_)))
        ));
    }
}
