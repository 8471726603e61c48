/// Terminal front-end for the glsteps tutorials
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use glsteps_core::{Mesh, SceneState, Tutorial};

pub mod cli;
pub mod logging;
pub mod renderer;

pub use cli::Cli;
pub use renderer::AsciiRenderer;

/// Degrees the orbit camera moves per key press
const ORBIT_STEP_DEG: f32 = 5.0;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    tutorial: Tutorial,
    mesh: Mesh,
    state: SceneState,
    renderer: AsciiRenderer,
    cell_aspect: f32,
    target_frame_time: Duration,
    running: bool,
    paused: bool,
    clock: Instant,
    paused_at_ms: f64,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(cli: &Cli) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut app = Self::with_size(cli, width as usize, height.saturating_sub(STATUS_ROWS) as usize);
        app.select(cli.scene);
        Ok(app)
    }

    fn with_size(cli: &Cli, width: usize, height: usize) -> Self {
        Self {
            tutorial: cli.scene,
            mesh: cli.scene.mesh(),
            state: SceneState::new(),
            renderer: AsciiRenderer::new(width, height),
            cell_aspect: cli.cell_aspect,
            target_frame_time: cli.frame_time(),
            running: true,
            paused: false,
            clock: Instant::now(),
            paused_at_ms: 0.0,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn tutorial(&self) -> Tutorial {
        self.tutorial
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn select(&mut self, tutorial: Tutorial) {
        log::info!("switching to tutorial '{tutorial}'");
        self.tutorial = tutorial;
        self.mesh = tutorial.mesh();
        self.renderer.set_background(tutorial.clear_color());
        self.renderer.set_cull_back_faces(tutorial.is_3d());
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(width, height) => self
                        .renderer
                        .resize(width as usize, height.saturating_sub(STATUS_ROWS) as usize),
                    _ => {}
                }
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.state = self.state.orbit(0.0, ORBIT_STEP_DEG);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.state = self.state.orbit(0.0, -ORBIT_STEP_DEG);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.state = self.state.orbit(-ORBIT_STEP_DEG, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.state = self.state.orbit(ORBIT_STEP_DEG, 0.0);
            }
            KeyCode::Char('p') => self.toggle_pause(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.select(Tutorial::ALL[index]);
            }
            _ => {}
        }
    }

    fn toggle_pause(&mut self) {
        if self.paused {
            // Resume from where the clock stopped
            let resumed_from = Duration::from_secs_f64(self.paused_at_ms / 1000.0);
            self.clock = Instant::now().checked_sub(resumed_from).unwrap_or_else(Instant::now);
        } else {
            self.paused_at_ms = self.elapsed_ms();
        }
        self.paused = !self.paused;
    }

    fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    fn update(&mut self) {
        let now_ms = if self.paused {
            self.paused_at_ms
        } else {
            self.elapsed_ms()
        };
        self.state = self.state.at(now_ms);
    }

    /// Rasterize the current tutorial into the renderer's buffers
    pub fn render_frame(&mut self) {
        self.renderer.clear();

        let aspect = self.renderer.aspect(self.cell_aspect);
        match self.tutorial.draw_list(&self.state, aspect) {
            Ok(items) => {
                for item in &items {
                    self.renderer.render_mesh(&self.mesh, &item.model_view);
                }
            }
            Err(err) => {
                log::warn!("skipping frame of '{}': {err}", self.tutorial);
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let mut line = format!(
            "glsteps [{}] {} | FPS: {:.1} | 1-5=Scene P=Pause Q=Quit",
            self.tutorial_index() + 1,
            self.tutorial,
            self.fps
        );
        if self.tutorial == Tutorial::Camera {
            line.push_str(&format!(
                " | WASD/Arrows=Orbit h={:.0} v={:.0}",
                self.state.camera_h_deg, self.state.camera_v_deg
            ));
        }
        if self.paused {
            line.push_str(" | paused");
        }
        line
    }

    fn tutorial_index(&self) -> usize {
        Tutorial::ALL
            .iter()
            .position(|t| *t == self.tutorial)
            .unwrap_or(0)
    }
}
