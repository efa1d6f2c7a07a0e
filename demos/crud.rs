//! A tiny user registry kept in the shared store.
//!
//! ```text
//! curl -d 'id=1&name=ada' localhost:8080/create
//! curl localhost:8080/users/1
//! curl -d 'name=grace' localhost:8080/users/1/update
//! curl localhost:8080/users
//! curl -X DELETE localhost:8080/users/1
//! ```

use microroute::{HttpServer, Router, ServerConfig, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut router = Router::new();

    router.get("/users", |ctx| {
        let users = ctx.store().snapshot();
        ctx.json(StatusCode::Ok, &users)
    });

    router.get("/users/:id", |ctx| {
        let Some(id) = ctx.param("id").filter(|id| !id.is_empty()) else {
            return ctx.bad_request();
        };
        match ctx.store().get(id) {
            Some(user) => ctx.json(StatusCode::Ok, &user),
            None => ctx.not_found(),
        }
    });

    router.post("/create", |ctx| {
        let (Some(id), Some(name)) = (ctx.form_value("id"), ctx.form_value("name")) else {
            return ctx.bad_request();
        };
        ctx.store().set(id, name.clone());
        ctx.write_string(StatusCode::Created, format!("user created: {name}"))
    });

    router.post("/users/:id/update", |ctx| {
        let Some(id) = ctx.param("id").map(str::to_string) else {
            return ctx.bad_request();
        };
        let Some(name) = ctx.form_value("name") else {
            return ctx.bad_request();
        };
        if !ctx.store().contains(&id) {
            return ctx.not_found();
        }
        ctx.store().set(id, name.clone());
        ctx.write_string(StatusCode::Ok, format!("user updated: {name}"))
    });

    router.delete("/users/:id", |ctx| {
        let removed = ctx.param("id").and_then(|id| ctx.store().remove(id));
        match removed {
            Some(_) => ctx.set_status(StatusCode::NoContent),
            None => ctx.not_found(),
        }
    });

    HttpServer::new(ServerConfig::default(), router).start().await?;

    Ok(())
}
