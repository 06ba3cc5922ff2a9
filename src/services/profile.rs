//! Profile viewing and editing for the signed-in user.

use validator::Validate;

use crate::domain::types::{Email, PhoneNumber};
use crate::domain::user::{UpdateProfile, User};
use crate::forms::profile::ProfileForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn load_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;
    repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)
}

/// Applies profile edits. Email and phone are validated and normalized; the
/// rest is stored as posted (empty fields clear the value).
pub fn save_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &ProfileForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;

    let mut updates = UpdateProfile::from(form);
    if let Some(raw) = updates.email.take() {
        updates.email = Some(Email::new(raw)?.into_inner());
    }
    if let Some(raw) = updates.phone.take() {
        updates.phone = Some(PhoneNumber::new(raw)?.into_inner());
    }

    repo.update_profile(user_id, &updates).map_err(|err| {
        log::error!("Failed to update profile: {err}");
        ServiceError::from(err)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::{Role, UserType};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::authed;
    use chrono::Utc;

    fn stored_user(id: i32) -> User {
        User {
            id,
            username: "aziz".into(),
            email: None,
            role: Role::Customer,
            user_type: UserType::Individual,
            fio: None,
            phone: None,
            address: None,
            company_name: None,
            inn: None,
            bank_details: None,
            legal_address: None,
            responsible_person: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn empty_form() -> ProfileForm {
        ProfileForm {
            email: String::new(),
            fio: String::new(),
            phone: String::new(),
            address: String::new(),
            company_name: String::new(),
            inn: String::new(),
            bank_details: String::new(),
            legal_address: String::new(),
            responsible_person: String::new(),
        }
    }

    #[test]
    fn save_profile_normalizes_contact_fields() {
        let mut repo = MockRepository::new();
        repo.expect_update_profile()
            .times(1)
            .withf(|user_id, updates| {
                *user_id == 5
                    && updates.email.as_deref() == Some("aziz@example.com")
                    && updates.phone.as_deref() == Some("+998901234567")
            })
            .returning(|id, _| Ok(stored_user(id)));

        let mut form = empty_form();
        form.email = " Aziz@Example.Com ".into();
        form.phone = "+998 90 123 45 67".into();

        let user = authed(5, Role::Customer);
        save_profile(&repo, &user, &form).unwrap();
    }

    #[test]
    fn save_profile_rejects_bad_email() {
        let repo = MockRepository::new();
        let mut form = empty_form();
        form.email = "not-an-email".into();

        let user = authed(5, Role::Customer);
        assert!(matches!(
            save_profile(&repo, &user, &form),
            Err(ServiceError::Form(_))
        ));
    }
}
