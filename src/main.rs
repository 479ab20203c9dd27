use anyhow::Context;
use plane_editor::{Editor, EditorApp, EditorConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => EditorConfig::default(),
    };

    let mut editor = Editor::new(&config);
    editor
        .seed(&config.objects)
        .context("invalid object in configuration")?;

    EditorApp::new(config, editor)
        .context("failed to create event loop")?
        .run()
        .context("editor stopped with an error")?;

    Ok(())
}
