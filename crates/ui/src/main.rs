use std::sync::Arc;

use gpui::*;
use gpui_component::{Root, ThemeRegistry};
use tracing_subscriber::EnvFilter;

use chatroom::app::{ChatRoomShell, Quit, default_themes_path};
use chatroom::settings::SettingsStore;

/// Application entry point.
///
/// Bootstraps tracing, loads settings, initializes gpui-component, watches the
/// themes directory and opens the single chat window.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings_store = Arc::new(SettingsStore::load());
    tracing::info!("using settings from {:?}", settings_store.config_path());

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        // Required before any Root usage: sets up themes and the component registry.
        gpui_component::init(cx);

        // A missing themes directory is not fatal; built-in themes remain available.
        let watched_store = settings_store.clone();
        if let Err(err) = ThemeRegistry::watch_dir(default_themes_path(), cx, move |cx| {
            watched_store.reload().apply_theme(None, cx);
            tracing::info!("theme directory watch initialized");
        }) {
            tracing::warn!(
                "failed to watch themes directory: {}. using default themes",
                err
            );
            settings_store.settings().apply_theme(None, cx);
        }

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("ctrl-q", Quit, None),
        ]);

        let settings = settings_store.settings();
        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        settings.window_size(),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some(SharedString::from(settings.title.clone())),
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(9.), px(9.))),
                        ..Default::default()
                    }),
                    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
                    window_decorations: Some(WindowDecorations::Client),
                    #[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
                    window_decorations: None,
                    ..Default::default()
                };

                // Root is required by gpui-component for its overlay layers.
                let shell_settings = settings.clone();
                let opened = cx.open_window(options, move |window, cx| {
                    let shell = cx.new(|cx| ChatRoomShell::new(&shell_settings, window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                });

                match opened {
                    Ok(_) => cx.activate(true),
                    Err(error) => {
                        tracing::error!("failed to open chat window: {}", error);
                        cx.quit();
                    }
                }
            })
        })
        .detach();
    });
}
