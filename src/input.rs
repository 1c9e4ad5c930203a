//! Pointer and keyboard input.
//!
//! Window events arrive in physical pixels. The canvas may be a different
//! resolution than the window (see `render.render_scale`), so every pointer
//! position goes through [`CanvasRect::to_canvas`] before it reaches the
//! emitter.
//!
//! Mouse and touch share one [`Pointer`]. A mouse move only paints while a
//! button is held; a touch move always paints.
//!
//! ```ignore
//! if let Some(segment) = input.handle_event(&event) {
//!     scene.drag(segment);
//! }
//! if input.key_pressed(KeyCode::Space) {
//!     scene.apply(Command::TogglePhysics)?;
//! }
//! input.begin_frame();
//! ```

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the canvas responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    C,
    P,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Space,
    Escape,
    Backspace,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyC => KeyCode::C,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::Digit1 | WinitKeyCode::Numpad1 => KeyCode::Key1,
            WinitKeyCode::Digit2 | WinitKeyCode::Numpad2 => KeyCode::Key2,
            WinitKeyCode::Digit3 | WinitKeyCode::Numpad3 => KeyCode::Key3,
            WinitKeyCode::Digit4 | WinitKeyCode::Numpad4 => KeyCode::Key4,
            WinitKeyCode::Digit5 | WinitKeyCode::Numpad5 => KeyCode::Key5,
            WinitKeyCode::Digit6 | WinitKeyCode::Numpad6 => KeyCode::Key6,
            WinitKeyCode::Digit7 | WinitKeyCode::Numpad7 => KeyCode::Key7,
            WinitKeyCode::Digit8 | WinitKeyCode::Numpad8 => KeyCode::Key8,
            WinitKeyCode::Digit9 | WinitKeyCode::Numpad9 => KeyCode::Key9,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::Backspace => KeyCode::Backspace,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// A pointer movement that should emit particles, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSegment {
    pub from: Vec2,
    pub to: Vec2,
}

impl DragSegment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    /// Distance covered, the drag "speed" in pixels per event.
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}

/// The on-screen rectangle the canvas occupies, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    /// A rect anchored at the window origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Map a window position into canvas pixels.
    ///
    /// `canvas_x = (client_x - left) * (canvas_width / width)`, same for y.
    /// A degenerate rect maps everything to the origin.
    pub fn to_canvas(&self, client: Vec2, canvas_size: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (client.x - self.left) * (canvas_size.x / self.width),
            (client.y - self.top) * (canvas_size.y / self.height),
        )
    }
}

/// Canvas backing size for a window of `logical` size:
/// `logical * scale_factor * render_scale`, rounded.
pub fn canvas_size(logical: Vec2, scale_factor: f64, render_scale: f32) -> (u32, u32) {
    let scaled = logical * (scale_factor as f32) * render_scale;
    (
        scaled.x.round().max(0.0) as u32,
        scaled.y.round().max(0.0) as u32,
    )
}

/// True for a left-button press or a touch start.
pub fn starts_gesture(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::MouseInput {
            state: ElementState::Pressed,
            button: MouseButton::Left,
            ..
        } => true,
        WindowEvent::Touch(touch) => touch.phase == TouchPhase::Started,
        _ => false,
    }
}

/// True for events that release the pointer. These must always reach
/// [`Input::handle_event`], even when an overlay sits under the cursor.
pub fn ends_gesture(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::MouseInput {
            state: ElementState::Released,
            button: MouseButton::Left,
            ..
        } => true,
        WindowEvent::Touch(touch) => matches!(touch.phase, TouchPhase::Ended | TouchPhase::Cancelled),
        WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => true,
        _ => false,
    }
}

/// Shared mouse/touch pointer state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pointer {
    position: Vec2,
    down: bool,
    touch: Option<u64>,
}

impl Pointer {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn press(&mut self, position: Vec2) {
        self.down = true;
        self.position = position;
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    /// Track a mouse move. Paints only while pressed.
    pub fn move_to(&mut self, position: Vec2) -> Option<DragSegment> {
        let from = std::mem::replace(&mut self.position, position);
        self.down.then(|| DragSegment::new(from, position))
    }

    /// A finger went down. Only the first finger is tracked.
    pub fn touch_start(&mut self, id: u64, position: Vec2) {
        if self.touch.is_none() {
            self.touch = Some(id);
            self.press(position);
        }
    }

    /// Track the tracked finger. Always paints.
    pub fn touch_move(&mut self, id: u64, position: Vec2) -> Option<DragSegment> {
        if self.touch != Some(id) {
            return None;
        }
        let from = std::mem::replace(&mut self.position, position);
        Some(DragSegment::new(from, position))
    }

    /// The tracked finger lifted or the touch was cancelled.
    pub fn touch_end(&mut self, id: u64) {
        if self.touch == Some(id) {
            self.touch = None;
            self.release();
        }
    }
}

/// Keyboard and pointer state for one window.
#[derive(Debug)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    pointer: Pointer,
    rect: CanvasRect,
    canvas_size: Vec2,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            pointer: Pointer::default(),
            rect: CanvasRect::from_size(800.0, 600.0),
            canvas_size: Vec2::new(800.0, 600.0),
        }
    }

    /// Check if a key went down since the last [`begin_frame`](Self::begin_frame).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Keys pressed this frame, in no particular order.
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys_pressed.iter().copied()
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Update the window rect (physical pixels) and the canvas size it maps to.
    pub fn set_viewport(&mut self, rect: CanvasRect, canvas_width: u32, canvas_height: u32) {
        self.rect = rect;
        self.canvas_size = Vec2::new(canvas_width as f32, canvas_height as f32);
    }

    /// Clear per-frame key state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a winit window event. Returns a drag segment when the event
    /// should emit particles.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<DragSegment> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key_event(KeyCode::from(code), event.state);
                }
                None
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        let position = self.pointer.position();
                        self.pointer.press(position);
                    }
                    ElementState::Released => self.pointer.release(),
                }
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                let client = Vec2::new(position.x as f32, position.y as f32);
                self.pointer.move_to(self.rect.to_canvas(client, self.canvas_size))
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer.release();
                None
            }

            WindowEvent::Touch(touch) => {
                let client = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                let position = self.rect.to_canvas(client, self.canvas_size);
                match touch.phase {
                    TouchPhase::Started => {
                        self.pointer.touch_start(touch.id, position);
                        None
                    }
                    TouchPhase::Moved => self.pointer.touch_move(touch.id, position),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.pointer.touch_end(touch.id);
                        None
                    }
                }
            }

            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.pointer.release();
                None
            }

            _ => None,
        }
    }

    fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // no auto-repeat
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }
}
