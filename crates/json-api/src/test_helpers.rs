//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, prelude::*};

use trolley_app::{
    carts::{
        MockCartsAdminService, MockCartsService,
        models::{Cart, CartUuid, UserUuid},
    },
    context::AppContext,
};

use crate::{admin, state::State};

pub(crate) const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// A mock that fails the test on any call.
fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_or_create_cart().never();
    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_soft_delete_cart().never();

    carts
}

fn strict_admin_mock() -> MockCartsAdminService {
    let mut admin = MockCartsAdminService::new();

    admin.expect_list_carts().never();
    admin.expect_restore_cart().never();
    admin.expect_force_delete_cart().never();
    admin.expect_export_carts().never();

    admin
}

pub(crate) fn state_with(carts: MockCartsService, admin: MockCartsAdminService) -> Arc<State> {
    State::shared(
        AppContext {
            carts: Arc::new(carts),
            admin: Arc::new(admin),
        },
        TEST_ADMIN_TOKEN,
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(carts, strict_admin_mock())))
            .push(route),
    )
}

/// Mounts `route` behind the admin token guard.
pub(crate) fn admin_service(admin: MockCartsAdminService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(strict_carts_mock(), admin)))
            .hoop(admin::middleware::handler)
            .push(route),
    )
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub(crate) fn make_cart(uuid: CartUuid) -> Cart {
    let now = Timestamp::UNIX_EPOCH;

    Cart {
        uuid,
        user_uuid: UserUuid::new(),
        version: 1,
        items: Vec::new(),
        expires_at: now
            .checked_add(SignedDuration::from_hours(168))
            .unwrap_or(Timestamp::MAX),
        last_activity_at: now,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
