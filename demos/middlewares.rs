//! Request logging and a lookup middleware that can short-circuit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use microroute::{HttpServer, Router, ServerConfig, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let users: Arc<HashMap<String, String>> =
        Arc::new(HashMap::from([("123".to_string(), "bar".to_string())]));

    let mut router = Router::new();

    router.use_middleware(|ctx, next| {
        let started = Instant::now();
        let result = next.run(ctx);
        info!(
            "{} {} -> {} in {:?}",
            ctx.method(),
            ctx.path(),
            ctx.response().status.as_u16(),
            started.elapsed()
        );
        result
    });

    router.use_middleware(move |ctx, next| {
        let Some(user) = ctx.param("id").and_then(|id| users.get(id)).cloned() else {
            return ctx.not_found();
        };
        ctx.set_header("X-User", user);
        next.run(ctx)
    });

    router.get("/users/:id", |ctx| {
        ctx.write_string(StatusCode::Ok, "the user middleware is responsible for setting the X-User header")
    });

    HttpServer::new(ServerConfig::default(), router).start().await?;

    Ok(())
}
