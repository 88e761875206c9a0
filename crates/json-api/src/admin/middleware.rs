//! Admin token middleware.

use salvo::{http::header::AUTHORIZATION, prelude::*};

use crate::extensions::*;

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let authorized = match depot.state_or_500() {
        Ok(state) => state.admin_token.matches(token),
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    if !authorized {
        tracing::warn!("rejected admin request with invalid token");

        res.render(StatusError::unauthorized().brief("Invalid admin token"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use trolley_app::{
        carts::{MockCartsAdminService, MockCartsService},
        context::AppContext,
    };

    use crate::{
        state::State,
        test_helpers::{TEST_ADMIN_TOKEN, bearer},
    };

    use super::*;

    #[salvo::handler]
    async fn ok(res: &mut Response) {
        res.render("ok");
    }

    fn make_service(admin_token: &str) -> Service {
        let state = State::shared(
            AppContext {
                carts: Arc::new(MockCartsService::new()),
                admin: Arc::new(MockCartsAdminService::new()),
            },
            admin_token,
        );

        Service::new(
            Router::new()
                .hoop(inject(state))
                .hoop(handler)
                .push(Router::with_path("admin").get(ok)),
        )
    }

    #[tokio::test]
    async fn test_valid_token_passes_through() -> TestResult {
        let mut res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, bearer(TEST_ADMIN_TOKEN), true)
            .send(&make_service(TEST_ADMIN_TOKEN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK), "status");
        assert_eq!(res.take_string().await?, "ok", "body");

        Ok(())
    }

    #[tokio::test]
    async fn test_scheme_is_case_insensitive() {
        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, format!("bearer {TEST_ADMIN_TOKEN}"), true)
            .send(&make_service(TEST_ADMIN_TOKEN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK), "status");
    }

    #[tokio::test]
    async fn test_missing_header_returns_401() {
        let res = TestClient::get("http://example.com/admin")
            .send(&make_service(TEST_ADMIN_TOKEN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "status");
    }

    #[tokio::test]
    async fn test_wrong_token_returns_401() {
        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, bearer("not-the-token"), true)
            .send(&make_service(TEST_ADMIN_TOKEN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "status");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_returns_401() {
        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, format!("Basic {TEST_ADMIN_TOKEN}"), true)
            .send(&make_service(TEST_ADMIN_TOKEN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "status");
    }

    #[tokio::test]
    async fn test_unconfigured_token_rejects_everything() {
        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, bearer("anything"), true)
            .send(&make_service(""))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "status");
    }

    #[test]
    fn extract_bearer_token_trims_whitespace() {
        let mut req = Request::new();

        if let Ok(value) = "Bearer   abc  ".parse() {
            req.headers_mut().insert(AUTHORIZATION, value);
        }

        assert_eq!(extract_bearer_token(&req), Some("abc"), "trimmed token");
    }
}
