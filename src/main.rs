use anyhow::Context;
use primer_app::modules;
use primer_kernel::settings::Settings;
use primer_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load primer settings")?;
    primer_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        "primer-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("primer-app bootstrap complete");

    primer_http::start_server(&registry, &settings).await?;

    registry.stop_modules().await?;
    Ok(())
}
