//! Field validation for inbound payloads.
//!
//! Deliberately thin: required fields, length caps, and a minimal email
//! shape check. Anything richer belongs to the transport boundary.

use crate::error::ValidationError;
use crate::post::{NewPost, PostPatch};
use crate::principal::{AdminPatch, NewAdmin};

/// Maximum title length, matching the storage column cap.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum email length.
pub const MAX_EMAIL_LEN: usize = 255;

type Result<T> = std::result::Result<T, ValidationError>;

/// Validate fields for post creation: title and content required, title
/// capped at [`MAX_TITLE_LEN`].
pub fn validate_new_post(input: &NewPost) -> Result<()> {
    check_title(&input.title)?;
    if input.content.trim().is_empty() {
        return Err(ValidationError::Required("content"));
    }
    Ok(())
}

/// Validate a post patch. At least one field must be present; present
/// fields must pass the same checks as creation.
pub fn validate_post_patch(patch: &PostPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch("post"));
    }
    if let Some(title) = &patch.title {
        check_title(title)?;
    }
    if let Some(content) = &patch.content {
        if content.trim().is_empty() {
            return Err(ValidationError::Required("content"));
        }
    }
    Ok(())
}

/// Validate fields for admin account creation.
pub fn validate_new_admin(input: &NewAdmin) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::Required("name"));
    }
    check_email(&input.email)
}

/// Validate an admin account patch. At least one field must be present.
pub fn validate_admin_patch(patch: &AdminPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch("admin"));
    }
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
    }
    if let Some(email) = &patch.email {
        check_email(email)?;
    }
    Ok(())
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_LEN,
            len,
        });
    }
    Ok(())
}

fn check_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required("email"));
    }
    if email.chars().count() > MAX_EMAIL_LEN || !email.contains('@') {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostStatus;

    #[test]
    fn test_valid_new_post() {
        let input = NewPost::new("Title", "Body").status(PostStatus::Published);
        assert!(validate_new_post(&input).is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let input = NewPost::new("   ", "Body");
        assert_eq!(
            validate_new_post(&input),
            Err(ValidationError::Required("title"))
        );
    }

    #[test]
    fn test_empty_content_rejected() {
        let input = NewPost::new("Title", "");
        assert_eq!(
            validate_new_post(&input),
            Err(ValidationError::Required("content"))
        );
    }

    #[test]
    fn test_overlong_title_rejected() {
        let input = NewPost::new("x".repeat(256), "Body");
        assert!(matches!(
            validate_new_post(&input),
            Err(ValidationError::TooLong { field: "title", .. })
        ));
    }

    #[test]
    fn test_title_at_cap_accepted() {
        let input = NewPost::new("x".repeat(255), "Body");
        assert!(validate_new_post(&input).is_ok());
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert_eq!(
            validate_post_patch(&PostPatch::default()),
            Err(ValidationError::EmptyPatch("post"))
        );
        assert_eq!(
            validate_admin_patch(&AdminPatch::default()),
            Err(ValidationError::EmptyPatch("admin"))
        );
    }

    #[test]
    fn test_single_field_patch_is_valid() {
        assert!(validate_post_patch(&PostPatch::default().status(PostStatus::Published)).is_ok());
        assert!(validate_admin_patch(&AdminPatch::default().name("Ada")).is_ok());
    }

    #[test]
    fn test_patch_with_bad_title_rejected() {
        let patch = PostPatch::default().title("");
        assert!(validate_post_patch(&patch).is_err());
    }

    #[test]
    fn test_bad_admin_email_rejected() {
        let input = NewAdmin {
            name: "Ada".into(),
            email: "not-an-email".into(),
        };
        assert!(matches!(
            validate_new_admin(&input),
            Err(ValidationError::InvalidEmail(_))
        ));
    }
}
