//! Application wiring.
//!
//! The timer engine runs on its own thread inside a current-thread tokio
//! runtime. The winit event loop owns the overlay window and the control
//! panel on the main thread. The two sides only exchange messages:
//!
//! - main thread -> engine: [`TimerCommand`] over an unbounded channel
//! - engine -> main thread: [`AppEvent::Snapshot`] through the event loop
//!   proxy, fed by the engine's watch channel

use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::WindowId;

use crate::engine::{TimerCommand, TimerEngine, TimerEvent};
use crate::overlay::{Layout, OverlayController, OverlayError, OverlaySurface, Point, WinitSurface};
use crate::panel::{action_for_key, ControlPanel, PanelAction};
use crate::sound::{get_default_sound, try_create_player, SoundPlayer};
use crate::types::{TimerConfig, TimerSnapshot};

// ============================================================================
// AppEvent
// ============================================================================

/// Events delivered to the winit loop from other threads.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The engine published a new snapshot
    Snapshot(TimerSnapshot),
    /// A tray menu item was clicked
    Menu(String),
    /// The engine thread has exited
    EngineStopped,
}

// ============================================================================
// Entry point
// ============================================================================

/// Opens the timer window and blocks until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the event loop or the
/// window cannot be created, or the engine thread fails.
pub fn run(config: TimerConfig) -> Result<()> {
    config.validate()?;

    let event_loop = EventLoop::<AppEvent>::with_user_event()
        .build()
        .map_err(OverlayError::from)?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let engine = spawn_engine(config.clone(), command_rx, event_loop.create_proxy())?;

    #[cfg(target_os = "macos")]
    {
        let proxy = std::sync::Mutex::new(event_loop.create_proxy());
        crate::panel::forward_menu_events(move |id| {
            if let Ok(proxy) = proxy.lock() {
                let _ = proxy.send_event(AppEvent::Menu(id));
            }
        });
    }

    let mut app = App::new(&config, command_tx);
    let result = event_loop.run_app(&mut app);
    let window_error = app.error.take();

    // Dropping the app closes the command channel, which stops the engine.
    drop(app);
    engine
        .join()
        .map_err(|_| anyhow!("タイマーエンジンのスレッドが異常終了しました"))??;

    result.map_err(OverlayError::from)?;
    match window_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

// ============================================================================
// Engine thread
// ============================================================================

/// Starts the engine on a dedicated thread.
fn spawn_engine(
    config: TimerConfig,
    commands: mpsc::UnboundedReceiver<TimerCommand>,
    proxy: EventLoopProxy<AppEvent>,
) -> Result<JoinHandle<Result<()>>> {
    thread::Builder::new()
        .name("timer-engine".to_string())
        .spawn(move || run_engine(config, commands, proxy))
        .context("タイマーエンジンのスレッドを起動できませんでした")
}

fn run_engine(
    config: TimerConfig,
    commands: mpsc::UnboundedReceiver<TimerCommand>,
    proxy: EventLoopProxy<AppEvent>,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("非同期ランタイムの初期化に失敗しました")?;

    let stop_proxy = proxy.clone();
    runtime.block_on(async move {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut engine = TimerEngine::new(&config, event_tx);

        // The audio stream is not Send, so the player lives on this thread.
        if config.sound_enabled {
            if let Some(player) = try_create_player(false) {
                let player: std::sync::Arc<dyn SoundPlayer> = player;
                engine = engine.with_sound(player, get_default_sound());
            }
        }

        tokio::spawn(forward_snapshots(engine.subscribe(), proxy.clone()));
        tokio::spawn(log_events(event_rx));

        tracing::debug!("タイマーエンジンを開始しました");
        engine.run(commands).await;
    });

    let _ = stop_proxy.send_event(AppEvent::EngineStopped);
    Ok(())
}

/// Pushes every published snapshot into the winit loop.
async fn forward_snapshots(
    mut snapshots: tokio::sync::watch::Receiver<TimerSnapshot>,
    proxy: EventLoopProxy<AppEvent>,
) {
    let initial = snapshots.borrow_and_update().clone();
    if proxy.send_event(AppEvent::Snapshot(initial)).is_err() {
        return;
    }

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        if proxy.send_event(AppEvent::Snapshot(snapshot)).is_err() {
            break;
        }
    }
}

async fn log_events(mut events: mpsc::UnboundedReceiver<TimerEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TimerEvent::Tick { .. } => tracing::trace!(?event, "タイマーイベント"),
            _ => tracing::debug!(?event, "タイマーイベント"),
        }
    }
}

// ============================================================================
// App
// ============================================================================

/// winit application: owns the overlay and the panel on the main thread.
struct App {
    commands: mpsc::UnboundedSender<TimerCommand>,
    overlay: OverlayController<WinitSurface>,
    panel: ControlPanel,
    /// Fatal window error, reported after the loop exits
    error: Option<OverlayError>,
}

impl App {
    fn new(config: &TimerConfig, commands: mpsc::UnboundedSender<TimerCommand>) -> Self {
        let mut overlay = OverlayController::new(Layout::default());
        let initial = crate::types::TimerState::new(config).snapshot();
        overlay.apply_snapshot(initial.clone());

        Self {
            commands,
            overlay,
            panel: ControlPanel::new(initial),
            error: None,
        }
    }

    fn send(&self, command: TimerCommand) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("タイマーエンジンにコマンドを送信できません: {:?}", e.0);
                false
            }
        }
    }

    fn dispatch(&mut self, action: PanelAction, event_loop: &ActiveEventLoop) {
        match action.to_command() {
            Some(command) => {
                let accepted = self.send(command);
                self.panel.event_handler().log_action_result(&action, accepted);
            }
            None => self.quit(event_loop),
        }
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        tracing::info!("終了します");
        self.send(TimerCommand::Shutdown);
        self.panel.shutdown();
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), OverlayError> {
        let surface = WinitSurface::create(event_loop)?;
        let scale = surface.window().scale_factor();
        let work_area = surface.work_area();

        self.overlay.set_scale(scale);
        self.overlay.attach(surface);
        if let Some(area) = work_area {
            self.overlay.place_centered(area);
        }
        if let Some(surface) = self.overlay.surface() {
            surface.show();
            surface.request_redraw();
        }

        if let Err(e) = self.panel.initialize() {
            tracing::warn!("コントロールパネルを初期化できませんでした: {:#}", e);
        }
        Ok(())
    }

    fn redraw(&mut self) {
        let snapshot = self.overlay.snapshot().clone();
        if let Some(surface) = self.overlay.surface_mut() {
            if let Err(e) = surface.draw(&snapshot) {
                tracing::warn!("描画に失敗しました: {}", e);
            }
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.overlay.surface().is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            tracing::error!("{}", e);
            self.error = Some(e);
            self.quit(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                self.overlay.cursor_moved(Point::new(position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => self.overlay.cursor_left(),
            WindowEvent::Moved(position) => {
                self.overlay
                    .window_moved(Point::new(f64::from(position.x), f64::from(position.y)));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    if let Some(command) = self.overlay.pointer_pressed() {
                        self.send(command);
                    }
                }
                ElementState::Released => self.overlay.pointer_released(),
            },
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let Some(action) = action_for_key(&event.logical_key) {
                    self.dispatch(action, event_loop);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.overlay.set_scale(scale_factor);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Snapshot(snapshot) => {
                self.panel.update(&snapshot);
                self.overlay.apply_snapshot(snapshot);
            }
            AppEvent::Menu(id) => {
                if let Some(action) = self.panel.handle_menu_event(&id) {
                    self.dispatch(action, event_loop);
                }
            }
            AppEvent::EngineStopped => {
                tracing::debug!("タイマーエンジンが停止しました");
                event_loop.exit();
            }
        }
    }
}
