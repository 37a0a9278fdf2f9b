use admitui::{App, AppConfig, AppEvent, Args, ConfigManager, APP_NAME};
use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &Args, config: AppConfig) -> Result<()> {
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new(tx.clone(), args.service, config)?;

    let size = terminal.size()?;
    tx.send(AppEvent::Resize(size.width, size.height))?;
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        // Deliver debounced work that has come due
        for event in app.due_events(Instant::now()) {
            tx.send(event)?;
        }

        let mut updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if app.tick(Instant::now()) {
            updated = true;
        }

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.write_default_config {
        match ConfigManager::new(APP_NAME) {
            Ok(config) => match config.write_default_config(args.force) {
                Ok(path) => {
                    println!("Default config written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing default config: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.clear_session {
        match ConfigManager::new(APP_NAME) {
            Ok(config) => {
                let store = admitui::session::UserStore::new(config);
                if let Err(e) = store.clear_session() {
                    eprintln!("Error clearing session: {}", e);
                    std::process::exit(1);
                }
                println!("Session cleared");
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn init_logging(debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }
    let manager = ConfigManager::new(APP_NAME)?;
    manager.ensure_config_dir()?;
    let file = std::fs::File::create(manager.config_path("admitui.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    init_logging(args.debug)?;

    let mut config = AppConfig::load(APP_NAME)?;
    if let Some(base_url) = &args.base_url {
        config.server.base_url = base_url.clone();
    }
    if let Some(download_dir) = &args.download_dir {
        config.downloads.dir = Some(download_dir.clone());
    }
    config.validate()?;

    let terminal = ratatui::init();
    let result = run(terminal, &args, config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
