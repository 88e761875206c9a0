//! App Router

use salvo::Router;

use crate::{admin, carts};

/// Cart and admin routes. State injection and request middleware are added by the caller.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("users/{user}/cart").post(carts::get_or_create::handler))
        .push(
            Router::with_path("carts/{cart}")
                .get(carts::get::handler)
                .delete(carts::delete::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .delete(carts::items::clear::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("admin/carts")
                .hoop(admin::middleware::handler)
                .get(admin::index::handler)
                .push(Router::with_path("export").get(admin::export::handler))
                .push(
                    Router::with_path("{cart}")
                        .delete(admin::delete::handler)
                        .push(Router::with_path("restore").post(admin::restore::handler)),
                ),
        )
}
