//! Serves the files under `demos/public` at `/`.

use microroute::{HttpServer, Router, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/public");

    let mut router = Router::new();
    router.static_dir("", dir)?;

    HttpServer::new(ServerConfig::default(), router).start().await?;

    Ok(())
}
