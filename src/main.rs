use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

mod host;

use host::{HostEvent, TerminalHost};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    hearth_core::init()?;

    let (config, _validation) = hearth_core::Config::load_validated()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let terminal = Arc::new(TerminalHost::new(tx));

    let mut app = hearth_core::App::new(config, terminal.clone());
    app.register_widget(Box::new(hearth_weather::WeatherWidget::new()));

    if let Err(e) = app.start() {
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    tracing::info!("Hearth dashboard started");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(HostEvent::Redraw) => draw(&app, &terminal),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Graceful shutdown
    app.shutdown()?;

    Ok(())
}

fn draw(app: &hearth_core::App, terminal: &TerminalHost) {
    for panel in app.render_panels() {
        if terminal.is_hidden(&panel.id) {
            continue;
        }
        if let Some(header) = &panel.header {
            println!("== {header} ==");
        }
        print!("{}", panel.tree.to_text());
    }
}
