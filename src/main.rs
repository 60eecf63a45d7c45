use color_eyre::eyre::WrapErr;
use homework_bot::app_init::initialize_app;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut components = initialize_app().wrap_err("Failed to start homework bot")?;

    components
        .poller
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    tracing::info!("Homework bot stopped");
    Ok(())
}
