/// Terminal front-end: one camera, one textured quad, ASCII output
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use fly3d_core::{Camera, Mesh, Transformable};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use cli::Cli;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u32 = 2;

/// A discrete user action, decoupled from the crossterm event that caused it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    MoveForward,
    MoveBackwards,
    MoveUp,
    MoveDown,
    TurnLeft,
    TurnRight,
    PitchUp,
    PitchDown,
    Spin,
    Resize(u16, u16),
}

impl Command {
    /// Map a terminal event onto an action, if it has one.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            // Some platforms also report releases; act on presses only
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
                KeyCode::Char('w') | KeyCode::Up => Some(Self::MoveForward),
                KeyCode::Char('s') | KeyCode::Down => Some(Self::MoveBackwards),
                KeyCode::Char('a') | KeyCode::Left => Some(Self::TurnLeft),
                KeyCode::Char('d') | KeyCode::Right => Some(Self::TurnRight),
                KeyCode::Char('e') | KeyCode::PageUp => Some(Self::MoveUp),
                KeyCode::Char('c') | KeyCode::PageDown => Some(Self::MoveDown),
                KeyCode::Char('r') => Some(Self::PitchUp),
                KeyCode::Char('f') => Some(Self::PitchDown),
                KeyCode::Char(' ') => Some(Self::Spin),
                _ => None,
            },
            Event::Mouse(MouseEvent { kind, .. }) => match kind {
                MouseEventKind::ScrollUp => Some(Self::MoveForward),
                MouseEventKind::ScrollDown => Some(Self::MoveBackwards),
                MouseEventKind::Down(MouseButton::Left) => Some(Self::Spin),
                _ => None,
            },
            Event::Resize(width, height) => Some(Self::Resize(*width, *height)),
            _ => None,
        }
    }
}

/// Camera, quad and the per-frame flow, without any terminal I/O
pub struct Scene {
    pub camera: Camera,
    pub quad: Transformable,
    pub mesh: Mesh,
    settings: Cli,
}

impl Scene {
    pub fn new(settings: Cli, width: u16, height: u16) -> anyhow::Result<Self> {
        let mut camera = Camera::from_config(&settings.camera_config())?;
        camera.update_projection_matrix(width as u32, height as u32 * CELL_ASPECT)?;

        Ok(Self {
            camera,
            quad: Transformable::new(settings.offset_x, 0.0, 0.0),
            mesh: Mesh::quad(),
            settings,
        })
    }

    /// Apply one action. Returns `false` once the user asked to quit.
    pub fn apply(&mut self, command: Command) -> bool {
        let step = self.settings.move_step;
        let turn = self.settings.turn_step;
        match command {
            Command::Quit => return false,
            Command::MoveForward => self.camera.move_forward(step),
            Command::MoveBackwards => self.camera.move_backwards(step),
            Command::MoveUp => self.camera.move_up(step),
            Command::MoveDown => self.camera.move_down(step),
            Command::TurnLeft => self.camera.rotate_yaw(-turn),
            Command::TurnRight => self.camera.rotate_yaw(turn),
            Command::PitchUp => self.camera.rotate_pitch(turn),
            Command::PitchDown => self.camera.rotate_pitch(-turn),
            Command::Spin => self.quad.update(self.settings.angle_step),
            Command::Resize(width, height) => {
                if let Err(e) = self
                    .camera
                    .update_projection_matrix(width as u32, height as u32 * CELL_ASPECT)
                {
                    log::debug!("keeping previous projection after resize: {e}");
                }
            }
        }
        log::debug!("{command:?} -> camera at {:?}, yaw {:.1}", self.camera.position(), self.camera.yaw());
        true
    }

    /// Advance automatic animation by one frame.
    pub fn tick(&mut self) {
        if self.settings.spin != 0.0 {
            self.quad.update(self.settings.spin);
        }
    }

    /// Refresh the view matrix and rasterize the quad into `renderer`.
    pub fn draw(&mut self, renderer: &mut AsciiRenderer) -> usize {
        self.camera.update_view_matrix();
        let mvp = self
            .quad
            .compose_mvp(self.camera.view_matrix(), self.camera.projection_matrix());

        renderer.clear();
        renderer.render_mesh(&self.mesh, &mvp)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.settings.fps.max(1)))
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(settings: Cli) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene: Scene::new(settings, width, height)?,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;

        with_restore(
            || Ok(execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?),
            || self.main_loop(),
            restore_terminal,
        )
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = self.scene.frame_interval();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.scene.tick();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> anyhow::Result<()> {
        let Some(command) = Command::from_event(&event::read()?) else {
            return Ok(());
        };

        if let Command::Resize(width, height) = command {
            self.renderer = AsciiRenderer::new(width as usize, height as usize);
        }
        self.running = self.scene.apply(command);
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.scene.draw(&mut self.renderer);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let camera = &self.scene.camera;
        let position = camera.position();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "fly3d | FPS: {:.1} | pos ({:.2}, {:.2}, {:.2}) yaw {:.0} | theta {:.0} | W/S/wheel=Move A/D=Turn E/C=Up/Down Space/click=Spin Q=Quit",
                self.fps,
                position.x,
                position.y,
                position.z,
                camera.yaw(),
                self.scene.quad.theta()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Leave raw mode and the alternate screen. Both steps are attempted even if
/// the first fails.
fn restore_terminal() -> anyhow::Result<()> {
    let raw = terminal::disable_raw_mode();
    execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
    raw?;
    Ok(())
}

/// Run `setup` then `body`, and always run `restore` afterwards, including
/// when `setup` itself failed half way. The first error wins.
fn with_restore<T>(
    setup: impl FnOnce() -> anyhow::Result<()>,
    body: impl FnOnce() -> anyhow::Result<T>,
    restore: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<T> {
    let result = setup().and_then(|()| body());
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}
