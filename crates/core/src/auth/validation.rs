use super::AuthError;

/// Maximum username length, in characters.
pub const MAX_USERNAME_LEN: usize = 150;

/// Validates a post-login `next` target so sign-in cannot redirect off-site.
///
/// Returns `Some(url)` only for local absolute paths: a single leading `/`, no
/// scheme, no control characters.
///
/// # Examples
///
/// ```
/// use newsdesk_core::auth::validate_return_to;
///
/// assert_eq!(validate_return_to("/news/3/edit"), Some("/news/3/edit"));
/// assert_eq!(validate_return_to("//evil.com"), None);
/// assert_eq!(validate_return_to("https://evil.com"), None);
/// ```
pub fn validate_return_to(url: &str) -> Option<&str> {
    if !url.starts_with('/') || url.starts_with("//") {
        return None;
    }
    if url.chars().any(|c| c.is_control()) {
        return None;
    }
    if url.contains("://") || url.contains('\\') {
        return None;
    }
    Some(url)
}

/// Validates and normalizes a username submitted at sign-in.
///
/// Usernames are trimmed; letters, digits and `@ . + - _` are allowed.
pub fn validate_username(raw: &str) -> Result<String, AuthError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidUsername("username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthError::InvalidUsername(format!(
            "username is longer than {MAX_USERNAME_LEN} characters"
        )));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
    {
        return Err(AuthError::InvalidUsername(format!(
            "username contains '{bad}'"
        )));
    }
    Ok(username.to_string())
}
