//! Versioned API routes registered through nested groups.

use microroute::{HttpServer, Router, ServerConfig, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut router = Router::new();

    let mut api = router.group("/api");
    api.get("/health", |ctx| ctx.write_string(StatusCode::Ok, "ok"));

    let mut v1 = api.group("/v1");
    v1.get("/users/:id", |ctx| {
        let id = ctx.param("id").unwrap_or_default().to_string();
        ctx.write_string(StatusCode::Ok, format!("v1 user {id}"))
    });

    let mut v2 = api.group("/v2");
    v2.get("/users/:id", |ctx| {
        let body = serde_json::json!({ "id": ctx.param("id"), "version": 2 });
        ctx.json(StatusCode::Ok, &body)
    });

    HttpServer::new(ServerConfig::default(), router).start().await?;

    Ok(())
}
