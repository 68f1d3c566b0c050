//! Control panel for the floating timer.
//!
//! This module provides:
//! - Tray title text for the macOS menu bar (e.g., "⏱ 04:59")
//! - Menu configuration with presets, opacity levels and quit
//! - Keyboard shortcuts for the overlay window
//! - Mapping from panel clicks to engine commands
//!
//! # Architecture
//!
//! - `icon.rs`: Title text generation (platform-independent, fully testable)
//! - `menu.rs`: Panel configuration (platform-independent, fully testable)
//! - `event.rs`: Actions and item ids (platform-independent, fully testable)
//! - `keymap.rs`: Keyboard shortcuts (platform-independent, fully testable)
//! - `mod.rs`: ControlPanel, which owns the tray icon on macOS
//!
//! Menu clicks arrive on tray-icon's own callback. [`forward_menu_events`]
//! hands their ids to the winit event loop, where
//! [`ControlPanel::handle_menu_event`] turns them into [`PanelAction`]s.

pub mod event;
pub mod icon;
pub mod keymap;
pub mod menu;

pub use event::{EventHandler, PanelAction, PanelItemId};
pub use icon::IconManager;
pub use keymap::action_for_key;
pub use menu::{PanelBuilder, PanelConfig, PanelItemConfig, OPACITY_LEVELS};

use crate::types::TimerSnapshot;

// ============================================================================
// ControlPanel
// ============================================================================

/// Manages the menu bar panel.
///
/// On macOS it owns the tray-icon instance. On other platforms it operates
/// in a no-op mode and the keyboard shortcuts are the only panel.
pub struct ControlPanel {
    icon_manager: IconManager,
    panel_builder: PanelBuilder,
    event_handler: EventHandler,
    /// Latest snapshot from the engine
    snapshot: TimerSnapshot,
    initialized: bool,
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
    /// Status line, updated in place between menu rebuilds
    #[cfg(target_os = "macos")]
    status_item: Option<tray_icon::menu::MenuItem>,
}

impl ControlPanel {
    /// Creates a panel. The tray icon is not created until
    /// [`initialize`](Self::initialize) runs inside the event loop.
    pub fn new(snapshot: TimerSnapshot) -> Self {
        Self {
            icon_manager: IconManager::new(),
            panel_builder: PanelBuilder::new(),
            event_handler: EventHandler::new(),
            snapshot,
            initialized: false,
            #[cfg(target_os = "macos")]
            tray_icon: None,
            #[cfg(target_os = "macos")]
            status_item: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the latest snapshot.
    pub fn snapshot(&self) -> &TimerSnapshot {
        &self.snapshot
    }

    pub fn event_handler(&self) -> &EventHandler {
        &self.event_handler
    }

    /// Generates the current tray title.
    pub fn generate_title(&self) -> String {
        self.icon_manager.generate_title(&self.snapshot)
    }

    /// Generates the current panel configuration.
    pub fn generate_config(&self) -> PanelConfig {
        self.panel_builder.build(&self.snapshot)
    }

    /// Turns a native menu item id into an action.
    pub fn handle_menu_event(&self, id: &str) -> Option<PanelAction> {
        self.event_handler.handle_click(PanelItemId::from_menu_id(id))
    }

    /// Stores a new snapshot and refreshes the tray.
    ///
    /// Returns true if the menu structure changed.
    pub fn update(&mut self, snapshot: &TimerSnapshot) -> bool {
        self.snapshot = snapshot.clone();
        let changed = self.icon_manager.menu_changed(snapshot);
        if self.initialized {
            self.refresh(changed);
        }
        changed
    }

    /// Shuts down the tray icon.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.status_item = None;
            self.tray_icon = None;
        }
    }

    /// Initializes the tray icon (macOS only).
    ///
    /// Must be called on the main thread after the event loop has started.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        let (menu, status_item) = build_native_menu(&self.generate_config())?;
        let tray_icon = TrayIconBuilder::new()
            .with_title(self.generate_title())
            .with_menu(Box::new(menu))
            .with_tooltip("フローティングタイマー")
            .build()
            .context("トレイアイコンの作成に失敗しました")?;

        self.tray_icon = Some(tray_icon);
        self.status_item = Some(status_item);
        self.initialized = true;

        tracing::info!("メニューバーアイコンを初期化しました");
        Ok(())
    }

    /// Initializes the tray icon (non-macOS, no-op).
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::debug!("メニューバーはmacOSでのみ利用できます。キーボード操作を使用してください");
        self.initialized = true;
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn refresh(&mut self, menu_changed: bool) {
        let title = self.generate_title();
        let Some(tray_icon) = self.tray_icon.as_ref() else {
            return;
        };
        tray_icon.set_title(Some(&title));

        if menu_changed {
            match build_native_menu(&self.generate_config()) {
                Ok((menu, status_item)) => {
                    tray_icon.set_menu(Some(Box::new(menu)));
                    self.status_item = Some(status_item);
                    tracing::debug!("メニュー再構築");
                }
                Err(e) => tracing::warn!("メニューの再構築に失敗しました: {}", e),
            }
        } else if let Some(status_item) = self.status_item.as_ref() {
            status_item.set_text(self.generate_config().status.text);
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn refresh(&mut self, _menu_changed: bool) {}
}

impl std::fmt::Debug for ControlPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPanel")
            .field("initialized", &self.initialized)
            .field("icon_manager", &self.icon_manager)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Native menu (macOS)
// ============================================================================

/// Routes tray menu clicks to `sink` as item id strings.
#[cfg(target_os = "macos")]
pub fn forward_menu_events(sink: impl Fn(String) + Send + Sync + 'static) {
    use tray_icon::menu::MenuEvent;

    MenuEvent::set_event_handler(Some(move |event: MenuEvent| sink(event.id.0)));
}

/// Builds the native menu and returns it with its status item.
#[cfg(target_os = "macos")]
fn build_native_menu(
    config: &PanelConfig,
) -> anyhow::Result<(tray_icon::menu::Menu, tray_icon::menu::MenuItem)> {
    use tray_icon::menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu};

    let item = |config: &PanelItemConfig| {
        MenuItem::with_id(config.id.as_menu_id(), &config.text, config.enabled, None)
    };
    let check_item = |config: &PanelItemConfig| {
        CheckMenuItem::with_id(
            config.id.as_menu_id(),
            &config.text,
            config.enabled,
            config.checked,
            None,
        )
    };

    let menu = Menu::new();

    menu.append(&MenuItem::new(&config.title.text, false, None))?;
    let status_item = MenuItem::new(&config.status.text, false, None);
    menu.append(&status_item)?;

    menu.append(&PredefinedMenuItem::separator())?;

    menu.append(&item(&config.toggle))?;
    menu.append(&item(&config.reset))?;

    menu.append(&PredefinedMenuItem::separator())?;

    let presets = Submenu::new("プリセット", true);
    for preset in &config.presets {
        presets.append(&check_item(preset))?;
    }
    menu.append(&presets)?;

    let opacity = Submenu::new("不透明度", true);
    for level in &config.opacity_levels {
        opacity.append(&check_item(level))?;
    }
    menu.append(&opacity)?;

    menu.append(&PredefinedMenuItem::separator())?;

    menu.append(&item(&config.quit))?;

    Ok((menu, status_item))
}

// ============================================================================
// Tests
// ============================================================================
