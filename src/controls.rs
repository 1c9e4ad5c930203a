//! User-facing state: selected color, physics toggle, and whether a stroke
//! is in progress.
//!
//! Everything the UI can change goes through a [`Command`], whether it comes
//! from the keyboard, the egui panel, or a headless script.

use tracing::info;

use crate::error::ControlError;
use crate::input::KeyCode;
use crate::palette::{Color, Palette, Swatch};

/// An action the control panel can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Remove every particle. Paint on the canvas fades out on its own.
    Clear,
    /// Flip physics between running and frozen.
    TogglePhysics,
    /// Select the palette entry at this index for new strokes.
    SelectColor(usize),
}

impl Command {
    /// Default keyboard binding.
    ///
    /// | Key | Command |
    /// |-----|---------|
    /// | `C`, `Backspace` | [`Command::Clear`] |
    /// | `Space`, `P` | [`Command::TogglePhysics`] |
    /// | `1`..`8` | [`Command::SelectColor`] |
    pub fn from_key(key: KeyCode) -> Option<Command> {
        let command = match key {
            KeyCode::C | KeyCode::Backspace => Command::Clear,
            KeyCode::Space | KeyCode::P => Command::TogglePhysics,
            KeyCode::Key1 => Command::SelectColor(0),
            KeyCode::Key2 => Command::SelectColor(1),
            KeyCode::Key3 => Command::SelectColor(2),
            KeyCode::Key4 => Command::SelectColor(3),
            KeyCode::Key5 => Command::SelectColor(4),
            KeyCode::Key6 => Command::SelectColor(5),
            KeyCode::Key7 => Command::SelectColor(6),
            KeyCode::Key8 => Command::SelectColor(7),
            _ => return None,
        };
        Some(command)
    }
}

/// Control panel state.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    palette: Palette,
    selected: usize,
    physics_enabled: bool,
    interacting: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(Palette::DEFAULT)
    }
}

impl Controls {
    /// First swatch selected, physics on, no stroke in progress.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            selected: 0,
            physics_enabled: true,
            interacting: false,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_swatch(&self) -> Swatch {
        // `selected` is only ever set to a validated index
        self.palette.swatches()[self.selected]
    }

    /// Color used for new strokes.
    pub fn selected_color(&self) -> Color {
        self.selected_swatch().color
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    /// True between pointer press and release.
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn set_interacting(&mut self, interacting: bool) {
        self.interacting = interacting;
    }

    pub fn select_color(&mut self, index: usize) -> Result<(), ControlError> {
        let swatch = self.palette.get(index).ok_or(ControlError::NoSuchColor {
            index,
            len: self.palette.len(),
        })?;
        self.selected = index;
        info!(color = swatch.name, hex = %swatch.color, "Selected color");
        Ok(())
    }

    /// Flip physics and return the new state.
    pub fn toggle_physics(&mut self) -> bool {
        self.physics_enabled = !self.physics_enabled;
        info!(enabled = self.physics_enabled, "Physics toggled");
        self.physics_enabled
    }

    /// Label for the physics button, naming the current state.
    pub fn physics_label(&self) -> &'static str {
        if self.physics_enabled {
            "Physics: On"
        } else {
            "Physics: Off"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let controls = Controls::default();
        assert_eq!(controls.selected_index(), 0);
        assert_eq!(controls.selected_swatch().name, "Pink");
        assert!(controls.physics_enabled());
        assert!(!controls.is_interacting());
        assert_eq!(controls.physics_label(), "Physics: On");
    }

    #[test]
    fn test_select_color() {
        let mut controls = Controls::default();
        controls.select_color(7).unwrap();
        assert_eq!(controls.selected_color(), Color::rgb(0x5f, 0x27, 0xcd));
    }

    #[test]
    fn test_select_out_of_range_keeps_selection() {
        let mut controls = Controls::default();
        controls.select_color(2).unwrap();
        let err = controls.select_color(8).unwrap_err();
        assert_eq!(err, ControlError::NoSuchColor { index: 8, len: 8 });
        assert_eq!(controls.selected_index(), 2);
    }

    #[test]
    fn test_toggle_physics_round_trips() {
        let mut controls = Controls::default();
        assert!(!controls.toggle_physics());
        assert_eq!(controls.physics_label(), "Physics: Off");
        assert!(controls.toggle_physics());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::C), Some(Command::Clear));
        assert_eq!(Command::from_key(KeyCode::Backspace), Some(Command::Clear));
        assert_eq!(Command::from_key(KeyCode::Space), Some(Command::TogglePhysics));
        assert_eq!(Command::from_key(KeyCode::Key1), Some(Command::SelectColor(0)));
        assert_eq!(Command::from_key(KeyCode::Key8), Some(Command::SelectColor(7)));
        assert_eq!(Command::from_key(KeyCode::Key9), None);
        assert_eq!(Command::from_key(KeyCode::Escape), None);
    }
}
