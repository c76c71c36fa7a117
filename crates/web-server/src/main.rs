// This main function is the entry point when running `cargo run -p web-server`.
// It loads the configuration, sets up logging and hands over to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configuration::load_config()?;
    let _guard = configuration::init_tracing(&settings.logging)?;
    let addr = settings.server.socket_addr()?;
    web_server::run_server(addr, &settings).await
}
