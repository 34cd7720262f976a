//! `voxhire serve` — start the interview API server

use anyhow::Result;

use voxhire_core::paths;

/// Run the serve command.
pub async fn run(port: u16) -> Result<()> {
    let config = voxhire_server::ServerConfig {
        port,
        db_path: paths::db_path(),
    };

    println!("Voxhire API server");
    println!("  http://localhost:{port}");
    println!("  database: {}", config.db_path.display());
    println!();

    voxhire_server::start_server(config).await
}
