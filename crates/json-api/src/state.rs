//! State

use std::sync::Arc;

use trolley_app::context::AppContext;

use crate::admin::token::AdminToken;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) admin_token: AdminToken,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, admin_token: &str) -> Self {
        Self {
            app,
            admin_token: AdminToken::new(admin_token),
        }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, admin_token: &str) -> Arc<Self> {
        Arc::new(Self::new(app, admin_token))
    }
}
