//! The smallest useful server: a couple of routes and a path parameter.

use microroute::{HttpServer, Router, ServerConfig, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut router = Router::new();

    router.get("/", |ctx| ctx.html(StatusCode::Ok, "<h1>Welcome to microroute!</h1>"));

    router.get("/hello/:name", |ctx| {
        let name = ctx.param("name").unwrap_or("World").to_string();
        ctx.write_string(StatusCode::Ok, format!("Hello, {name}!"))
    });

    router.get("/old-home", |ctx| ctx.redirect("/"));

    let config = ServerConfig::with_addr("127.0.0.1:8080")?;
    HttpServer::new(config, router).start().await?;

    Ok(())
}
