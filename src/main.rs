use anyhow::Result;
use nimbus_core::{AppError, Config};
use nimbus_ui::NimbusApp;

fn main() -> Result<()> {
    // Initialize core
    nimbus_core::init()?;

    let (config, _validation) = Config::load_validated().map_err(|e| {
        let err = AppError::from(e);
        tracing::error!("{} ({})", err, err.user_message());
        err
    })?;
    tracing::info!("Nimbus starting ({})", config.ui.window_title);

    let title = config.ui.window_title.clone();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width as f32, config.ui.window_height as f32])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(NimbusApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Window event loop failed: {}", e))?;

    tracing::info!("Nimbus shut down");
    Ok(())
}
