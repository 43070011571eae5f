mod app;
mod braille;
mod color;
mod config;
mod error;
mod forces;
mod grid;
mod integrator;
mod interaction;
mod logging;
mod picker;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus, MatrixPaths};
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use simulation::Simulation;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "particle-life")]
#[command(about = "Particle life simulation in the terminal")]
struct Args {
    /// Matrix file applied after the base matrix (replaces the fallback)
    matrix: Option<PathBuf>,

    /// Base matrix loaded first at startup and on reset
    #[arg(long)]
    base: Option<PathBuf>,

    /// Matrix loaded after the base when no MATRIX is given
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Destination of Ctrl+S
    #[arg(long)]
    save: Option<PathBuf>,

    /// Number of particles (capped to the particle buffer size)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Grid buckets along x (>= 3)
    #[arg(long = "grid-width")]
    grid_width: Option<usize>,

    /// Grid buckets along y (>= 3)
    #[arg(long = "grid-height")]
    grid_height: Option<usize>,

    /// Velocity damping coefficient
    #[arg(long)]
    damping: Option<f32>,

    /// Time scale (0.25-4.0)
    #[arg(long = "time-scale")]
    time_scale: Option<f32>,

    /// Start with motion trails enabled
    #[arg(long)]
    trails: bool,

    /// JSON settings file (see --dump-config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "dump-config")]
    dump_config: bool,

    /// Log file
    #[arg(long = "log-file", default_value = "particle-life.log")]
    log_file: PathBuf,
}

impl Args {
    /// Layer CLI flags over a config file (or the defaults)
    fn into_config(self) -> Result<AppConfig, error::ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(base) = self.base {
            config.base_matrix = base;
        }
        if let Some(fallback) = self.fallback {
            config.fallback_matrix = fallback;
        }
        if let Some(save) = self.save {
            config.save_matrix = save;
        }

        let settings = &mut config.settings;
        if let Some(particles) = self.particles {
            settings.num_particles = particles;
        }
        if let Some(width) = self.grid_width {
            settings.grid_width = width;
        }
        if let Some(height) = self.grid_height {
            settings.grid_height = height;
        }
        if let Some(damping) = self.damping {
            settings.damping = damping;
        }
        if let Some(time_scale) = self.time_scale {
            settings.time_scale = time_scale.clamp(0.25, 4.0);
        }
        config.settings = config.settings.clone().sanitized();
        config.show_trails |= self.trails;

        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let dump_config = args.dump_config;
    let log_file = args.log_file.clone();
    let override_path = args.matrix.clone();
    let config = args.into_config()?;

    if dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init(&log_file)?;
    info!("Starting with {:?}", config.settings);

    let paths = MatrixPaths {
        base: config.base_matrix.clone(),
        override_path,
        fallback: config.fallback_matrix.clone(),
        save: config.save_matrix.clone(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = ratatui::layout::Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(
        Simulation::new(config.settings.clone()),
        paths,
        canvas_width,
        canvas_height,
    );
    app.show_trails = config.show_trails;
    app.load_startup_matrices();

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    info!("Exiting");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    let mut last_frame = Instant::now();

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && ctrl {
                        return Ok(());
                    }

                    // === Handle popup keys first (if popup is open) ===
                    if app.file_picker.is_some() {
                        match key.code {
                            KeyCode::Up => app.popup_nav_up(),
                            KeyCode::Down => app.popup_nav_down(),
                            KeyCode::Enter => app.confirm_file_picker(),
                            KeyCode::Esc => app.close_file_picker(),
                            _ => {}
                        }
                        // Time spent in the picker is not simulated
                        last_frame = Instant::now();
                        continue;
                    }

                    if ctrl {
                        match key.code {
                            KeyCode::Char('s') => app.save_matrix(),
                            KeyCode::Char('l') => app.open_file_picker(),
                            _ => {}
                        }
                        continue;
                    }

                    // === Process normal key events ===
                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Enter => app.randomize_matrix(),
                        KeyCode::Char('m') | KeyCode::Char('M') => app.reshuffle_kinds(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('l') | KeyCode::Char('L') => app.open_file_picker(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_trails(),
                        KeyCode::Char('f') | KeyCode::Char('F') => {
                            app.toggle_fullscreen();
                            resize_canvas(terminal, app)?;
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_selected_cell(1.0),
                        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_selected_cell(-1.0),
                        KeyCode::Char('[') => app.adjust_time_scale(-0.25),
                        KeyCode::Char(']') => app.adjust_time_scale(0.25),

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
                            if app.focus == Focus::Matrix && !app.show_help =>
                        {
                            let (dx, dy) = match key.code {
                                KeyCode::Up => (0, -1),
                                KeyCode::Down => (0, 1),
                                KeyCode::Left => (-1, 0),
                                _ => (1, 0),
                            };
                            app.move_matrix_cursor(dx, dy);
                        }
                        KeyCode::Up | KeyCode::Right => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else if key.code == KeyCode::Up {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down | KeyCode::Left => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else if key.code == KeyCode::Down {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(
                                        term_size.height,
                                        app.simulation.model.kinds(),
                                    );
                                    app.scroll_controls_down(
                                        ui::CONTROLS_CONTENT_LINES.saturating_sub(visible),
                                    );
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus != Focus::Controls {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(..) => resize_canvas(terminal, app)?,
                _ => {}
            }
        }

        // Run simulation tick with the real elapsed time
        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        app.tick(frame_time);
    }
}

fn resize_canvas<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let size = terminal.size()?;
    let (canvas_width, canvas_height) = ui::get_canvas_size(
        ratatui::layout::Rect {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        },
        app.fullscreen_mode,
    );
    app.resize(canvas_width, canvas_height);
    Ok(())
}
