// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings, starts logging and hands over to the crate's library.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config()?;
    let _guard = configuration::logging::init_tracing(&config.logging)?;

    let addr = web_server::server_addr(&config)?;
    web_server::run_server(addr, config).await
}
