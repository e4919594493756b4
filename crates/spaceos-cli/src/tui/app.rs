//! Dashboard driver: terminal setup, the update/render loop and shutdown.
//!
//! The loop is single-threaded. The only other thread is the Ctrl+C handler,
//! which sends one message over a channel; the loop waits on that channel
//! between frames, so an interrupt cuts the current wait short.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use chrono::Local;
use crossterm::{
    cursor, execute,
    style::Stylize,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Rect, Size};
use ratatui::{Terminal, TerminalOptions, Viewport};

use spaceos_core::{NoiseSource, VehicleTelemetry, advance};

use super::ui::{self, Palette, View};
use crate::error::StartupError;

/// Frame size used when the terminal cannot report its own.
pub const FALLBACK_SIZE: Size = Size {
    width: 80,
    height: 30,
};

/// Default pause between frames.
pub const DEFAULT_REFRESH: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Terminal size
// ---------------------------------------------------------------------------

/// Ask the terminal for its size. `None` when the query fails or reports an
/// empty area (e.g. output is not a tty).
pub fn terminal_size() -> Option<Size> {
    match crossterm::terminal::size() {
        Ok((width, height)) if width > 0 && height > 0 => Some(Size { width, height }),
        Ok(_) => None,
        Err(e) => {
            log::debug!("terminal size query failed: {e}");
            None
        }
    }
}

/// Follow the real terminal when it can be measured, otherwise draw into a
/// fixed [`FALLBACK_SIZE`] area.
pub fn viewport_for(size: Option<Size>) -> Viewport {
    match size {
        Some(_) => Viewport::Fullscreen,
        None => {
            log::warn!(
                "terminal size unavailable, using {}x{}",
                FALLBACK_SIZE.width,
                FALLBACK_SIZE.height
            );
            Viewport::Fixed(Rect::new(0, 0, FALLBACK_SIZE.width, FALLBACK_SIZE.height))
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Driver lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pause between frames.
    pub refresh: Duration,
    /// Stop after this many frames; run until interrupted when `None`.
    pub max_frames: Option<u64>,
    pub colored: bool,
    /// Location label shown in the header.
    pub location: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh: DEFAULT_REFRESH,
            max_frames: None,
            colored: true,
            location: "BULAN".to_string(),
        }
    }
}

pub struct App<N> {
    telemetry: VehicleTelemetry,
    noise: N,
    config: AppConfig,
    phase: Phase,
    frames: u64,
}

impl<N: NoiseSource> App<N> {
    pub fn new(telemetry: VehicleTelemetry, noise: N, config: AppConfig) -> Self {
        Self {
            telemetry,
            noise,
            config,
            phase: Phase::Running,
            frames: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn telemetry(&self) -> &VehicleTelemetry {
        &self.telemetry
    }

    /// Take over the real terminal and run until Ctrl+C (or the frame limit).
    pub fn run(&mut self) -> Result<(), StartupError> {
        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })?;

        let viewport = viewport_for(terminal_size());
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::with_options(backend, TerminalOptions { viewport })?;

        // Restore the terminal before the panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
            original_hook(info);
        }));

        log::info!(
            "dashboard running: refresh {:?}, frame limit {:?}",
            self.config.refresh,
            self.config.max_frames
        );
        let result = self.run_loop(&mut terminal, &rx);

        let _ = std::panic::take_hook();
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show,
            Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        result?;

        self.farewell();
        Ok(())
    }

    /// Tick until `stop` receives a message, its sender is dropped, or the
    /// frame limit is reached.
    pub fn run_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        stop: &Receiver<()>,
    ) -> io::Result<()> {
        while self.phase == Phase::Running {
            self.tick(terminal)?;

            if self.config.max_frames.is_some_and(|max| self.frames >= max) {
                log::info!("frame limit reached after {} frames", self.frames);
                self.phase = Phase::Stopped;
                break;
            }

            match stop.recv_timeout(self.config.refresh) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::info!("interrupted after {} frames", self.frames);
                    self.phase = Phase::Stopped;
                }
            }
        }
        Ok(())
    }

    /// One frame: clear, advance the simulation, draw.
    pub fn tick<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.clear()?;
        advance(&mut self.telemetry, &mut self.noise);

        let view = View {
            telemetry: &self.telemetry,
            now: Local::now().fixed_offset(),
            location: &self.config.location,
            palette: Palette::new(self.config.colored),
        };
        terminal.draw(|f| ui::draw(f, &view))?;
        self.frames += 1;
        Ok(())
    }

    fn farewell(&self) {
        let bye = "Exiting Space Vehicle OS...";
        if self.config.colored {
            println!("{}", bye.cyan());
        } else {
            println!("{bye}");
        }
        println!("Thank you for using Space Vehicle OS.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use spaceos_core::{RngNoise, ScriptedNoise};

    fn config(max_frames: Option<u64>) -> AppConfig {
        AppConfig {
            refresh: Duration::from_millis(1),
            max_frames,
            colored: false,
            ..AppConfig::default()
        }
    }

    fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(width, height)).unwrap()
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn tick_advances_and_draws() {
        let mut terminal = test_terminal(80, 30);
        let mut app = App::new(VehicleTelemetry::default(), ScriptedNoise::new(), config(None));

        app.tick(&mut terminal).unwrap();

        assert_eq!(app.frames(), 1);
        assert_eq!(app.telemetry().vehicle.tick, 1);
        assert!(row(&terminal, 0).starts_with('╔'));
        assert!(row(&terminal, 0).ends_with('╗'));
        assert!(row(&terminal, 1).contains("SPACE VEHICLE OPERATING SYSTEM"));
        assert_eq!(row(&terminal, 29).trim_end(), "Press Ctrl+C to exit");
    }

    #[test]
    fn interrupt_stops_after_current_frame() {
        let mut terminal = test_terminal(80, 30);
        let mut app = App::new(VehicleTelemetry::default(), RngNoise::seeded(1), config(None));
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();

        app.run_loop(&mut terminal, &rx).unwrap();

        assert_eq!(app.phase(), Phase::Stopped);
        assert_eq!(app.frames(), 1);
    }

    #[test]
    fn dropped_sender_stops_loop() {
        let mut terminal = test_terminal(80, 30);
        let mut app = App::new(VehicleTelemetry::default(), RngNoise::seeded(2), config(None));
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);

        app.run_loop(&mut terminal, &rx).unwrap();
        assert_eq!(app.phase(), Phase::Stopped);
        assert_eq!(app.frames(), 1);
    }

    #[test]
    fn frame_limit_stops_loop() {
        let mut terminal = test_terminal(80, 30);
        let mut app = App::new(VehicleTelemetry::default(), RngNoise::seeded(3), config(Some(4)));
        let (_tx, rx) = mpsc::channel();

        app.run_loop(&mut terminal, &rx).unwrap();

        assert_eq!(app.phase(), Phase::Stopped);
        assert_eq!(app.frames(), 4);
        assert_eq!(app.telemetry().vehicle.tick, 4);
    }

    #[test]
    fn renders_into_small_terminal() {
        let mut terminal = test_terminal(12, 6);
        let mut app = App::new(VehicleTelemetry::default(), RngNoise::seeded(4), config(Some(2)));
        let (_tx, rx) = mpsc::channel();

        app.run_loop(&mut terminal, &rx).unwrap();

        assert_eq!(row(&terminal, 0), "╔══════════╗");
        assert!(row(&terminal, 1).ends_with('║'));
    }

    #[test]
    fn fallback_viewport_is_fixed() {
        assert_eq!(
            viewport_for(None),
            Viewport::Fixed(Rect::new(0, 0, 80, 30))
        );
        assert_eq!(viewport_for(Some(Size { width: 120, height: 40 })), Viewport::Fullscreen);
    }

    #[test]
    fn default_config_refreshes_twice_per_second() {
        let config = AppConfig::default();
        assert_eq!(config.refresh, Duration::from_millis(500));
        assert!(config.max_frames.is_none());
        assert_eq!(config.location, "BULAN");
    }
}
