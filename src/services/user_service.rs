use crate::{
    database::Store,
    models::{normalize_email, LoginRequest, RegisterUserRequest, Role, User, UserResponse},
    utils::AppError,
};

/// Looks a user up by email. No password: the demo trusts the caller.
pub async fn login(store: &dyn Store, request: &LoginRequest) -> Result<UserResponse, AppError> {
    let email = normalize_email(&request.email);

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(role) = request.role.as_deref().filter(|r| !r.is_empty()) {
        if role != user.role.as_str() {
            return Err(AppError::Forbidden("Role mismatch".to_string()));
        }
    }

    Ok(UserResponse::from(user))
}

/// Creates a user and returns its id.
pub async fn register(store: &dyn Store, request: RegisterUserRequest) -> Result<String, AppError> {
    let (name, email, role) = match (request.name, request.email, request.role) {
        (Some(name), Some(email), Some(role)) => (name, email, role),
        _ => return Err(AppError::InvalidRequest("Missing required fields".to_string())),
    };

    let email = normalize_email(&email);
    if name.trim().is_empty() || email.is_empty() {
        return Err(AppError::InvalidRequest("Missing required fields".to_string()));
    }
    let role: Role = role.parse().map_err(AppError::InvalidRequest)?;

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let user = User {
        id: None,
        name: name.trim().to_string(),
        email,
        role,
        location_zone: request.location_zone.filter(|z| !z.is_empty()),
    };

    // the store re-checks uniqueness, so a concurrent duplicate still ends in Conflict
    store.insert_user(user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;

    fn registration(email: &str, role: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: Some("Aditi Rao".into()),
            email: Some(email.into()),
            role: Some(role.into()),
            location_zone: Some("Central Delhi".into()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = InMemoryStore::new();
        let id = register(&store, registration("Aditi.Rao@Example.com", "Citizen")).await.unwrap();

        let request = LoginRequest { email: " aditi.rao@example.com".into(), role: Some("Citizen".into()) };
        let user = login(&store, &request).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "aditi.rao@example.com");
        assert_eq!(user.role, Role::Citizen);
        assert_eq!(user.location_zone.as_deref(), Some("Central Delhi"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let store = InMemoryStore::new();
        register(&store, registration("kavya@traffic.gov", "Officer")).await.unwrap();

        let err = register(&store, registration("KAVYA@traffic.gov", "Citizen")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_missing_or_unknown_fields() {
        let store = InMemoryStore::new();

        let mut missing = registration("a@example.com", "Citizen");
        missing.name = None;
        assert!(matches!(register(&store, missing).await, Err(AppError::InvalidRequest(_))));

        let unknown_role = registration("a@example.com", "Admin");
        assert!(matches!(register(&store, unknown_role).await, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_login_errors() {
        let store = InMemoryStore::new();
        register(&store, registration("a@example.com", "Citizen")).await.unwrap();

        let unknown = LoginRequest { email: "b@example.com".into(), role: None };
        assert!(matches!(login(&store, &unknown).await, Err(AppError::NotFound(_))));

        let wrong_role = LoginRequest { email: "a@example.com".into(), role: Some("Officer".into()) };
        assert!(matches!(login(&store, &wrong_role).await, Err(AppError::Forbidden(_))));

        let no_role = LoginRequest { email: "a@example.com".into(), role: None };
        assert!(login(&store, &no_role).await.is_ok());
    }
}
