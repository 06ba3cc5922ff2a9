//! Cart operations for both anonymous visitors and signed-in customers.

use chrono::NaiveDateTime;

use crate::domain::cart::{CartKey, CartView};
use crate::domain::types::Quantity;
use crate::forms::cart::CartItemForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CartReader, CartWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult, ensure_customer};

/// Resolves whose cart is being touched. Admin accounts have no cart.
pub fn resolve_cart_key(
    user: Option<&AuthenticatedUser>,
    session_key: &str,
) -> ServiceResult<CartKey> {
    match user {
        Some(user) => {
            ensure_customer(user)?;
            let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;
            Ok(CartKey::User(user_id))
        }
        None => Ok(CartKey::Session(session_key.to_string())),
    }
}

/// Loads the active cart. For signed-in customers any anonymous cart left
/// from before login is folded in first, quantities adding up.
pub fn load_cart<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    session_key: &str,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + ?Sized,
{
    let key = resolve_cart_key(user, session_key)?;
    if let CartKey::User(user_id) = &key {
        repo.merge_session_cart(session_key, *user_id)?;
    }
    repo.get_cart(&key).map_err(ServiceError::from)
}

/// Sets a line to the posted quantity (replacing any previous value) and
/// returns the refreshed cart.
pub fn set_item<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    session_key: &str,
    form: &CartItemForm,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + ProductReader + ?Sized,
{
    let quantity = Quantity::new(form.quantity)?;

    let product = repo
        .get_product_by_id(form.product_id)?
        .ok_or(ServiceError::NotFound)?;
    if !product.status {
        return Err(ServiceError::Form(
            "this product is currently unavailable".to_string(),
        ));
    }

    let key = resolve_cart_key(user, session_key)?;
    if let CartKey::User(user_id) = &key {
        repo.merge_session_cart(session_key, *user_id)?;
    }
    repo.set_cart_item(&key, product.id, quantity)?;
    repo.get_cart(&key).map_err(ServiceError::from)
}

/// Drops a line from the cart and returns the refreshed cart.
pub fn remove_item<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    session_key: &str,
    product_id: i32,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + ?Sized,
{
    let key = resolve_cart_key(user, session_key)?;
    repo.remove_cart_item(&key, product_id)?;
    repo.get_cart(&key).map_err(ServiceError::from)
}

/// Reaps session carts past their TTL. Called from the worker loop.
pub fn cleanup_expired_session_carts<R>(repo: &R, now: NaiveDateTime) -> ServiceResult<usize>
where
    R: CartWriter + ?Sized,
{
    repo.delete_expired_session_carts(now)
        .map_err(ServiceError::from)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::product::Product;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::authed;
    use chrono::Utc;

    fn product(id: i32, status: bool) -> Product {
        Product {
            id,
            name_uz: "Tovuq filesi".into(),
            name_ru: "Куриное филе".into(),
            category_id: 1,
            supplier_id: 1,
            image_url: None,
            description: None,
            status,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn admins_have_no_cart() {
        let repo = MockRepository::new();
        let admin = authed(1, Role::Admin);
        assert!(matches!(
            load_cart(&repo, Some(&admin), "sess"),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn login_merges_session_cart_before_reading() {
        let mut repo = MockRepository::new();
        let customer = authed(5, Role::Customer);

        repo.expect_merge_session_cart()
            .times(1)
            .withf(|session_key, user_id| session_key == "sess" && *user_id == 5)
            .returning(|_, _| Ok(()));
        repo.expect_get_cart()
            .times(1)
            .withf(|key| *key == CartKey::User(5))
            .returning(|_| Ok(CartView::default()));

        load_cart(&repo, Some(&customer), "sess").unwrap();
    }

    #[test]
    fn anonymous_cart_uses_session_key() {
        let mut repo = MockRepository::new();
        repo.expect_get_cart()
            .times(1)
            .withf(|key| *key == CartKey::Session("sess".to_string()))
            .returning(|_| Ok(CartView::default()));

        load_cart(&repo, None, "sess").unwrap();
    }

    #[test]
    fn set_item_rejects_tiny_quantities() {
        let repo = MockRepository::new();
        let form = CartItemForm {
            product_id: 1,
            quantity: 0.05,
        };
        assert!(matches!(
            set_item(&repo, None, "sess", &form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn set_item_rejects_inactive_product() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(product(id, false))));

        let form = CartItemForm {
            product_id: 2,
            quantity: 1.0,
        };
        assert!(matches!(
            set_item(&repo, None, "sess", &form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn set_item_replaces_quantity() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(product(id, true))));
        repo.expect_set_cart_item()
            .times(1)
            .withf(|key, product_id, quantity| {
                *key == CartKey::Session("sess".to_string())
                    && *product_id == 2
                    && quantity.get() == 1.5
            })
            .returning(|_, _, _| Ok(()));
        repo.expect_get_cart()
            .returning(|_| Ok(CartView::default()));

        let form = CartItemForm {
            product_id: 2,
            quantity: 1.5,
        };
        set_item(&repo, None, "sess", &form).unwrap();
    }
}
