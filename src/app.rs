use crate::braille::DotCanvas;
use crate::interaction::InteractionModel;
use crate::picker::{self, FilePicker};
use crate::simulation::Simulation;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Particle count change per adjust step
const PARTICLE_STEP: i32 = 128;
/// Radius change per adjust step
const RADIUS_STEP: f32 = 2.0;

/// Focus state for editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    /// Matrix editor: arrows move the cell cursor
    Matrix,
    Particles,
    TimeScale,
    Damping,
    InnerRadius,
    OuterRadius,
    TrailLength,
    // Controls box (not a param)
    #[default]
    Controls,
}

impl Focus {
    /// Tab cycles down the sidebar
    pub fn next(&self) -> Focus {
        match self {
            Focus::Controls => Focus::Matrix,
            Focus::Matrix => Focus::Particles,
            Focus::Particles => Focus::TimeScale,
            Focus::TimeScale => Focus::Damping,
            Focus::Damping => Focus::InnerRadius,
            Focus::InnerRadius => Focus::OuterRadius,
            Focus::OuterRadius => Focus::TrailLength,
            Focus::TrailLength => Focus::Matrix, // Loop back
        }
    }

    /// Shift+Tab cycles up the sidebar
    pub fn prev(&self) -> Focus {
        match self {
            Focus::Controls => Focus::TrailLength,
            Focus::Matrix => Focus::TrailLength, // Loop back
            Focus::Particles => Focus::Matrix,
            Focus::TimeScale => Focus::Particles,
            Focus::Damping => Focus::TimeScale,
            Focus::InnerRadius => Focus::Damping,
            Focus::OuterRadius => Focus::InnerRadius,
            Focus::TrailLength => Focus::OuterRadius,
        }
    }

    /// Line index in the parameters box
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::Matrix | Focus::Controls => 0,
            Focus::Particles => 0,
            Focus::TimeScale => 1,
            Focus::Damping => 2,
            Focus::InnerRadius => 3,
            Focus::OuterRadius => 4,
            Focus::TrailLength => 5,
        }
    }

    /// Check if focus is on a parameter line
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::Matrix | Focus::Controls)
    }
}

/// Matrix files used at startup, on reset and on save
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPaths {
    pub base: PathBuf,
    pub override_path: Option<PathBuf>,
    pub fallback: PathBuf,
    pub save: PathBuf,
}

impl MatrixPaths {
    /// Files applied on top of the built-in neutral matrix, in order
    pub fn startup_layers(&self) -> [&Path; 2] {
        let second = self.override_path.as_deref().unwrap_or(&self.fallback);
        [self.base.as_path(), second]
    }
}

/// Main application state
pub struct App {
    pub simulation: Simulation,
    pub canvas: DotCanvas,
    pub paths: MatrixPaths,
    pub focus: Focus,
    pub matrix_cursor: (usize, usize),
    pub show_trails: bool,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    pub file_picker: Option<FilePicker>,
    pub status_message: Option<String>,
    pub fps: f32,
    fps_frames: u32,
    fps_elapsed: f32,
}

impl App {
    pub fn new(simulation: Simulation, paths: MatrixPaths, canvas_width: u16, canvas_height: u16) -> Self {
        Self {
            simulation,
            canvas: DotCanvas::new(canvas_width, canvas_height),
            paths,
            focus: Focus::Controls,
            matrix_cursor: (0, 0),
            show_trails: false,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            file_picker: None,
            status_message: None,
            fps: 0.0,
            fps_frames: 0,
            fps_elapsed: 0.0,
        }
    }

    /// Advance one rendered frame and redraw the dot canvas
    pub fn tick(&mut self, frame_time: f32) {
        if self.file_picker.is_none() {
            self.simulation.tick(frame_time);
        }

        self.fps_frames += 1;
        self.fps_elapsed += frame_time;
        if self.fps_elapsed >= 1.0 {
            self.fps = self.fps_frames as f32 / self.fps_elapsed;
            debug!("{:.1} fps, {} particles", self.fps, self.simulation.particles().len());
            self.fps_frames = 0;
            self.fps_elapsed = 0.0;
        }

        if self.show_trails {
            self.canvas.age(self.simulation.settings.trail_length);
        } else {
            self.canvas.clear();
        }
        let domain = self.simulation.domain();
        self.canvas.plot(self.simulation.particles(), domain);
    }

    /// Apply the startup matrix layers onto a neutral matrix. Failed layers are skipped.
    pub fn load_startup_matrices(&mut self) {
        let mut model = InteractionModel::new(self.simulation.settings.kinds);
        for path in self.paths.startup_layers() {
            match model.load(path) {
                Ok(()) => {}
                Err(err) => warn!("Skipping startup matrix: {}", err),
            }
        }
        self.simulation.model = model;
        self.simulation.check_interaction_range();
    }

    /// Reload the startup matrices and respawn every particle
    pub fn reset(&mut self) {
        self.load_startup_matrices();
        self.simulation.respawn_particles();
        self.canvas.clear();
        info!("Reset simulation");
        self.status_message = Some("Reset".to_string());
    }

    pub fn randomize_matrix(&mut self) {
        self.simulation.randomize_matrix();
        self.status_message = Some("Randomized matrix".to_string());
    }

    pub fn reshuffle_kinds(&mut self) {
        self.simulation.reshuffle_kinds();
        self.status_message = Some("Reshuffled kinds".to_string());
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.simulation.toggle_pause();
    }

    pub fn toggle_trails(&mut self) {
        self.show_trails = !self.show_trails;
    }

    /// Write the matrix to the configured save path
    pub fn save_matrix(&mut self) {
        let path = self.paths.save.clone();
        match self.simulation.model.save(&path) {
            Ok(()) => {
                self.status_message = Some(format!("Saved {}", picker::display_name(&path)));
            }
            Err(err) => {
                warn!("Save failed: {}", err);
                self.status_message = Some(format!("Save failed: {}", err));
            }
        }
    }

    /// Load a matrix file over the current one, keeping it on failure
    pub fn load_matrix(&mut self, path: &Path) {
        match self.simulation.model.load(path) {
            Ok(()) => {
                self.simulation.check_interaction_range();
                self.status_message = Some(format!("Loaded {}", picker::display_name(path)));
            }
            Err(err) => {
                warn!("Load failed: {}", err);
                self.status_message = Some(format!("Load failed: {}", err));
            }
        }
    }

    // === Matrix editor ===

    /// Move the matrix cursor, wrapping at the edges
    pub fn move_matrix_cursor(&mut self, dx: i32, dy: i32) {
        let kinds = self.simulation.model.kinds() as i32;
        let (col, row) = self.matrix_cursor;
        self.matrix_cursor = (
            (col as i32 + dx).rem_euclid(kinds) as usize,
            (row as i32 + dy).rem_euclid(kinds) as usize,
        );
    }

    /// Nudge the cell under the cursor by `steps` edit steps. Columns are the
    /// reacting kind, rows the kind it reacts to.
    pub fn adjust_selected_cell(&mut self, steps: f32) {
        let (col, row) = self.matrix_cursor;
        let delta = steps * self.simulation.settings.matrix_step;
        self.simulation.model.adjust(col, row, delta);
        self.focus = Focus::Matrix;
    }

    // === Parameters ===

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::Matrix | Focus::Controls => {}
            Focus::Particles => self.simulation.adjust_particles(PARTICLE_STEP),
            Focus::TimeScale => self.simulation.settings.adjust_time_scale(0.25),
            Focus::Damping => self.simulation.settings.adjust_damping(1.0),
            Focus::InnerRadius => self.simulation.adjust_inner_radius(RADIUS_STEP),
            Focus::OuterRadius => self.simulation.adjust_outer_radius(RADIUS_STEP),
            Focus::TrailLength => self.simulation.settings.adjust_trail_length(2),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::Matrix | Focus::Controls => {}
            Focus::Particles => self.simulation.adjust_particles(-PARTICLE_STEP),
            Focus::TimeScale => self.simulation.settings.adjust_time_scale(-0.25),
            Focus::Damping => self.simulation.settings.adjust_damping(-1.0),
            Focus::InnerRadius => self.simulation.adjust_inner_radius(-RADIUS_STEP),
            Focus::OuterRadius => self.simulation.adjust_outer_radius(-RADIUS_STEP),
            Focus::TrailLength => self.simulation.settings.adjust_trail_length(-2),
        }
    }

    /// Adjust the running time scale and focus its line
    pub fn adjust_time_scale(&mut self, delta: f32) {
        self.simulation.settings.adjust_time_scale(delta);
        self.focus = Focus::TimeScale;
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous focus (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    // === View ===

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Resize the dot canvas to match the new terminal size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        self.canvas.resize(canvas_width, canvas_height);
    }

    // === File picker popup ===

    /// Scan for matrix files and open the picker
    pub fn open_file_picker(&mut self) {
        self.open_file_picker_in(&picker::search_dirs());
    }

    pub fn open_file_picker_in(&mut self, dirs: &[PathBuf]) {
        let picker = FilePicker::open(dirs);
        if picker.is_empty() {
            self.status_message = Some("No .csv files found".to_string());
        } else {
            self.file_picker = Some(picker);
        }
    }

    /// Close the picker without loading
    pub fn close_file_picker(&mut self) {
        self.file_picker = None;
    }

    /// Load the highlighted file and close the picker
    pub fn confirm_file_picker(&mut self) {
        let selected = self
            .file_picker
            .take()
            .and_then(|picker| picker.selected().map(Path::to_path_buf));
        if let Some(path) = selected {
            self.load_matrix(&path);
        }
    }

    /// Navigate up in popup
    pub fn popup_nav_up(&mut self) {
        if let Some(picker) = &mut self.file_picker {
            picker.nav_up();
        }
    }

    /// Navigate down in popup
    pub fn popup_nav_down(&mut self) {
        if let Some(picker) = &mut self.file_picker {
            picker.nav_down();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimulationSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::tempdir;

    fn app_with_paths(paths: MatrixPaths) -> App {
        let settings = SimulationSettings {
            num_particles: 64,
            ..Default::default()
        };
        let simulation = Simulation::with_rng(settings, StdRng::seed_from_u64(7));
        App::new(simulation, paths, 40, 20)
    }

    fn paths_in(dir: &Path) -> MatrixPaths {
        MatrixPaths {
            base: dir.join("base.csv"),
            override_path: None,
            fallback: dir.join("blank.csv"),
            save: dir.join("save.csv"),
        }
    }

    fn uniform_line(coef: f32, inner: f32, outer: f32) -> String {
        let mut line = String::new();
        for _ in 0..36 {
            line.push_str(&format!("{};", coef));
        }
        line.push_str(&format!("{};{};", inner, outer));
        line
    }

    #[test]
    fn test_focus_cycle_visits_every_param() {
        let mut focus = Focus::Controls;
        let mut seen = Vec::new();
        for _ in 0..7 {
            focus = focus.next();
            seen.push(focus);
        }
        assert_eq!(seen[0], Focus::Matrix);
        assert_eq!(focus.next(), Focus::Matrix);
        for f in &seen {
            assert_eq!(f.next().prev(), *f);
        }
    }

    #[test]
    fn test_matrix_cursor_wraps() {
        let mut app = app_with_paths(paths_in(Path::new("/nonexistent")));
        app.move_matrix_cursor(-1, 0);
        assert_eq!(app.matrix_cursor, (5, 0));
        app.move_matrix_cursor(1, -1);
        assert_eq!(app.matrix_cursor, (0, 5));
    }

    #[test]
    fn test_adjust_selected_cell_steps_and_clamps() {
        let mut app = app_with_paths(paths_in(Path::new("/nonexistent")));
        app.matrix_cursor = (2, 1);
        app.adjust_selected_cell(1.0);
        assert_eq!(app.simulation.model.get(2, 1), 0.25);
        assert_eq!(app.simulation.model.get(1, 2), 0.0);
        for _ in 0..10 {
            app.adjust_selected_cell(-1.0);
        }
        assert_eq!(app.simulation.model.get(2, 1), -1.0);
        assert_eq!(app.focus, Focus::Matrix);
    }

    #[test]
    fn test_startup_layers_prefer_override() {
        let dir = tempdir().unwrap();
        let mut paths = paths_in(dir.path());
        assert_eq!(paths.startup_layers()[1], dir.path().join("blank.csv"));
        paths.override_path = Some(dir.path().join("mine.csv"));
        assert_eq!(paths.startup_layers()[1], dir.path().join("mine.csv"));
    }

    #[test]
    fn test_reset_reloads_startup_matrices() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("base.csv"), uniform_line(0.5, 20.0, 80.0)).unwrap();
        // An empty fallback keeps every base value
        fs::write(dir.path().join("blank.csv"), "").unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.load_startup_matrices();
        assert_eq!(app.simulation.model.get(3, 3), 0.5);

        app.randomize_matrix();
        app.simulation.model.set(3, 3, -0.9);
        app.reset();
        assert_eq!(app.simulation.model.get(3, 3), 0.5);
        assert_eq!(app.simulation.model.inner_radius(), 20.0);
        assert_eq!(app.simulation.particles().len(), 64);
    }

    #[test]
    fn test_override_wins_over_base() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("base.csv"), uniform_line(0.5, 20.0, 80.0)).unwrap();
        // Only the first two coefficients; the rest stay at the base values
        fs::write(dir.path().join("mine.csv"), "-1;0.25;").unwrap();
        let mut paths = paths_in(dir.path());
        paths.override_path = Some(dir.path().join("mine.csv"));
        let mut app = app_with_paths(paths);
        app.load_startup_matrices();
        assert_eq!(app.simulation.model.get(0, 0), -1.0);
        assert_eq!(app.simulation.model.get(1, 0), 0.25);
        assert_eq!(app.simulation.model.get(0, 1), 0.5);
        assert_eq!(app.simulation.model.get(5, 5), 0.5);
        assert_eq!(app.simulation.model.outer_radius(), 80.0);
    }

    #[test]
    fn test_wide_radius_survives_load_and_save() {
        let dir = tempdir().unwrap();
        let wide = dir.path().join("wide.csv");
        fs::write(&wide, uniform_line(0.5, 24.0, 200.0)).unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.load_matrix(&wide);
        assert_eq!(app.simulation.model.outer_radius(), 200.0);

        app.save_matrix();
        let saved = fs::read_to_string(dir.path().join("save.csv")).unwrap();
        assert!(saved.ends_with(";24;200;"));
    }

    #[test]
    fn test_wide_radius_survives_startup() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("base.csv"), uniform_line(0.5, 24.0, 200.0)).unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.load_startup_matrices();
        assert_eq!(app.simulation.model.outer_radius(), 200.0);
    }

    #[test]
    fn test_missing_layers_leave_neutral_matrix() {
        let dir = tempdir().unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.simulation.model.set(0, 0, 1.0);
        app.load_startup_matrices();
        assert_eq!(app.simulation.model, InteractionModel::new(6));
    }

    #[test]
    fn test_save_then_pick_and_load() {
        let dir = tempdir().unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.simulation.model.set(1, 4, 0.75);
        app.save_matrix();
        assert!(dir.path().join("save.csv").exists());
        assert!(app.status_message.as_deref().unwrap_or("").starts_with("Saved"));

        app.simulation.model.set(1, 4, 0.0);
        app.open_file_picker_in(&[dir.path().to_path_buf()]);
        assert!(app.file_picker.is_some());
        app.confirm_file_picker();
        assert!(app.file_picker.is_none());
        assert!((app.simulation.model.get(1, 4) - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_empty_picker_does_not_open() {
        let dir = tempdir().unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.open_file_picker_in(&[dir.path().to_path_buf()]);
        assert!(app.file_picker.is_none());
        assert_eq!(app.status_message.as_deref(), Some("No .csv files found"));
    }

    #[test]
    fn test_failed_load_keeps_matrix() {
        let dir = tempdir().unwrap();
        let mut app = app_with_paths(paths_in(dir.path()));
        app.simulation.model.set(2, 2, 0.5);
        app.load_matrix(&dir.path().join("gone.csv"));
        assert_eq!(app.simulation.model.get(2, 2), 0.5);
        assert!(app.status_message.as_deref().unwrap_or("").starts_with("Load failed"));
    }

    #[test]
    fn test_picker_freezes_simulation() {
        let mut app = app_with_paths(paths_in(Path::new("/nonexistent")));
        app.randomize_matrix();
        app.file_picker = Some(FilePicker::new(vec![PathBuf::from("a.csv")]));
        let before = app.simulation.particles().to_vec();
        app.tick(0.016);
        assert_eq!(app.simulation.particles(), &before[..]);
    }

    #[test]
    fn test_tick_draws_particles() {
        let mut app = app_with_paths(paths_in(Path::new("/nonexistent")));
        app.tick(0.016);
        assert!(!app.canvas.cells(app.simulation.settings.trail_length).is_empty());
    }

    #[test]
    fn test_particle_param_adjusts_count() {
        let mut app = app_with_paths(paths_in(Path::new("/nonexistent")));
        app.focus = Focus::Particles;
        app.adjust_focused_up();
        assert_eq!(app.simulation.particles().len(), 64 + 128);
        app.adjust_focused_down();
        app.adjust_focused_down();
        assert_eq!(app.simulation.particles().len(), 1);
    }
}
