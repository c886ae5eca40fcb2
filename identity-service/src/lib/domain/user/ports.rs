use async_trait::async_trait;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// The password is hashed before the registry is touched.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Hashing` - Password hashing failed
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Exchange credentials for an access token.
    ///
    /// # Arguments
    /// * `command` - Raw username and password
    ///
    /// # Returns
    /// Signed access token bound to the user's id and username
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    async fn login(&self, command: LoginCommand) -> Result<auth::AccessToken, UserError>;

    /// Retrieve user by unique username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Resolve a bearer token into the identity it asserts.
    ///
    /// # Arguments
    /// * `token` - Token as presented by the client, without the `Bearer ` prefix
    ///
    /// # Errors
    /// * `Unauthorized` - Token is malformed, forged or expired
    async fn authorize(&self, token: &str) -> Result<AuthenticatedUser, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// The uniqueness check and the insert happen as one atomic step.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by username (exact, case-sensitive match).
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;
}
