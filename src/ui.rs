//! Immediate-mode control panel.
//!
//! The panel keeps no widget state between frames beyond pointer input and
//! the widget currently being dragged. Widgets are declared every frame
//! between [`ControlPanel::begin_frame`] and [`ControlPanel::render`]; each
//! call draws the value it is given and writes back a new one when the
//! pointer presses or drags on it.
//!
//! A press belongs to the widget under the pointer when it starts. A press
//! and release that both land between two frames act as a click on that
//! widget and leave nothing grabbed.
//!
//! The panel is drawn as flat quads and text rows in physical pixels,
//! anchored top-left.

use instant::Duration;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
};

use crate::{
    filter::{FilterParameterState, MagSelection, MinSelection},
    pipelines::{
        gui::{PanelPipeline, PanelVertex},
        text::GlyphVertex,
    },
    settings::{CAMERA_PAN_RANGE, MAX_ANISOTROPY, MIN_ANISOTROPY},
    text::GlyphAtlas,
};

const MARGIN: f32 = 16.0;
const PADDING: f32 = 10.0;
const CONTENT_WIDTH: f32 = 380.0;
const ROW_HEIGHT: f32 = 20.0;
const GAP: f32 = 4.0;
const HANDLE_WIDTH: f32 = 10.0;
const RADIO_BOX: f32 = 12.0;
const SLIDER_WIDTH: f32 = 200.0;
const TEXT_INSET: f32 = 6.0;
const SECTION_SPACER: f32 = 20.0;

const BACKGROUND: [f32; 4] = [0.05, 0.05, 0.08, 0.8];
const IDLE: [f32; 4] = [0.25, 0.25, 0.3, 1.0];
const HOVERED: [f32; 4] = [0.4, 0.4, 0.48, 1.0];
const SELECTED: [f32; 4] = [0.95, 0.6, 0.1, 1.0];
const TRACK: [f32; 4] = [0.18, 0.18, 0.22, 1.0];
const FILL: [f32; 4] = [0.55, 0.35, 0.08, 1.0];
const TEXT: [f32; 4] = [0.92, 0.92, 0.92, 1.0];

/// Axis-aligned rectangle in physical pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left and top edges are inside, right and bottom edges are not.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Value of a horizontal slider spanning `track` when the pointer is at `x`.
///
/// Positions outside the track clamp to the range ends. With a `step`, the
/// value snaps to the nearest multiple of `step` above `range.0`.
pub fn slider_value(track: Rect, x: f32, range: (f32, f32), step: Option<f32>) -> f32 {
    let (lo, hi) = range;
    let t = if track.width > 0.0 {
        ((x - track.x) / track.width).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut value = lo + t * (hi - lo);
    if let Some(step) = step.filter(|s| *s > 0.0) {
        value = lo + ((value - lo) / step).round() * step;
    }
    value.clamp(lo, hi)
}

/// Position of `value` along a slider over `range`, in `[0, 1]`.
pub fn slider_fraction(value: f32, range: (f32, f32)) -> f32 {
    let (lo, hi) = range;
    if hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// The frame-time readout shown at the bottom of the panel.
pub fn frame_time_readout(average: Duration) -> String {
    let secs = average.as_secs_f64();
    let fps = if secs > 0.0 { 1.0 / secs } else { 0.0 };
    format!(
        "Application average {:.3} ms/frame ({:.1} FPS)",
        secs * 1000.0,
        fps
    )
}

fn to_ndc(x: f32, y: f32, size: PhysicalSize<u32>) -> [f32; 2] {
    let width = size.width.max(1) as f32;
    let height = size.height.max(1) as f32;
    [x / width * 2.0 - 1.0, 1.0 - y / height * 2.0]
}

fn quad_indices(base: u16) -> [u16; 6] {
    [base, base + 1, base + 3, base + 1, base + 2, base + 3]
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Quad {
    rect: Rect,
    colour: [f32; 4],
}

/// A line of text, vertically centred in the row starting at `row_y`.
#[derive(Clone, Debug, PartialEq)]
struct TextRun {
    text: String,
    x: f32,
    row_y: f32,
    colour: [f32; 4],
}

#[derive(Debug, Default)]
pub struct ControlPanel {
    cursor: Option<PhysicalPosition<f32>>,
    pressed: bool,
    just_pressed: bool,
    /// Widget grabbed by the current press, by declaration index.
    active: Option<usize>,
    next_widget: usize,
    layout_y: f32,
    quads: Vec<Quad>,
    texts: Vec<TextRun>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a window event to the panel.
    ///
    /// Returns whether the panel consumed the event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_left();
                false
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.pointer_button(*state == ElementState::Pressed),
            _ => false,
        }
    }

    /// Returns whether a drag is in progress.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        self.cursor = Some(PhysicalPosition::new(x, y));
        self.active.is_some()
    }

    pub fn pointer_left(&mut self) {
        self.cursor = None;
    }

    /// Press or release the primary button. Returns whether the panel took it.
    pub fn pointer_button(&mut self, pressed: bool) -> bool {
        if pressed {
            self.pressed = true;
            self.just_pressed = true;
            self.active = None;
            self.hovers_panel()
        } else {
            let was_dragging = self.active.is_some();
            self.pressed = false;
            self.active = None;
            was_dragging
        }
    }

    /// Forget pointer state, e.g. when the panel is hidden mid-drag.
    pub fn reset_input(&mut self) {
        self.pressed = false;
        self.just_pressed = false;
        self.active = None;
    }

    pub fn begin_frame(&mut self) {
        self.quads.clear();
        self.texts.clear();
        self.next_widget = 0;
        self.layout_y = MARGIN + PADDING;
    }

    /// Vertical space between widget rows.
    pub fn spacer(&mut self, height: f32) {
        self.layout_y += height;
    }

    /// A row of text.
    pub fn label(&mut self, text: &str) {
        self.push_text(text, MARGIN + PADDING, self.layout_y);
        self.layout_y += ROW_HEIGHT + GAP;
    }

    /// One row per option, each with a selection box and its name.
    /// Returns whether `value` changed.
    pub fn radio_group<T: Copy + PartialEq>(
        &mut self,
        options: &[T],
        value: &mut T,
        name: impl Fn(T) -> &'static str,
    ) -> bool {
        let mut changed = false;
        for option in options {
            let id = self.next_id();
            let row = Rect::new(MARGIN + PADDING, self.layout_y, CONTENT_WIDTH, ROW_HEIGHT);
            let hovered = self.hovers(row);
            if hovered && self.just_pressed {
                self.active = Some(id);
                if *value != *option {
                    *value = *option;
                    changed = true;
                }
            }
            let colour = if *value == *option {
                SELECTED
            } else if hovered {
                HOVERED
            } else {
                IDLE
            };
            self.quads.push(Quad {
                rect: Rect::new(
                    row.x,
                    row.y + (ROW_HEIGHT - RADIO_BOX) / 2.0,
                    RADIO_BOX,
                    RADIO_BOX,
                ),
                colour,
            });
            self.push_text(name(*option), row.x + RADIO_BOX + TEXT_INSET, row.y);
            self.layout_y += ROW_HEIGHT + GAP;
        }
        changed
    }

    /// A horizontal slider over `range`, captioned on its right and showing
    /// `readout` of the current value on its track. Returns whether `value` changed.
    pub fn slider(
        &mut self,
        value: &mut f32,
        range: (f32, f32),
        step: Option<f32>,
        caption: &str,
        readout: impl Fn(f32) -> String,
    ) -> bool {
        let id = self.next_id();
        let track = Rect::new(MARGIN + PADDING, self.layout_y, SLIDER_WIDTH, ROW_HEIGHT);
        if self.hovers(track) && self.just_pressed {
            self.active = Some(id);
        }

        let mut changed = false;
        if (self.pressed || self.just_pressed) && self.active == Some(id) {
            if let Some(cursor) = self.cursor {
                let new_value = slider_value(track, cursor.x, range, step);
                if new_value != *value {
                    *value = new_value;
                    changed = true;
                }
            }
        }

        let fraction = slider_fraction(*value, range);
        let handle_x = track.x + fraction * (track.width - HANDLE_WIDTH);
        self.quads.push(Quad {
            rect: track,
            colour: TRACK,
        });
        self.quads.push(Quad {
            rect: Rect::new(track.x, track.y, handle_x - track.x, track.height),
            colour: FILL,
        });
        let handle_colour = if self.active == Some(id) || self.hovers(track) {
            SELECTED
        } else {
            HOVERED
        };
        self.quads.push(Quad {
            rect: Rect::new(handle_x, track.y, HANDLE_WIDTH, track.height),
            colour: handle_colour,
        });
        self.push_text(&readout(*value), track.x + TEXT_INSET, track.y);
        self.push_text(caption, track.x + track.width + TEXT_INSET, track.y);
        self.layout_y += ROW_HEIGHT + GAP;
        changed
    }

    /// Outline of everything declared this frame, background included.
    pub fn bounds(&self) -> Rect {
        let height = (self.layout_y - MARGIN).max(0.0) + PADDING;
        Rect::new(MARGIN, MARGIN, CONTENT_WIDTH + 2.0 * PADDING, height)
    }

    /// Text declared this frame, in declaration order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(|t| t.text.as_str())
    }

    /// Triangles for this frame's widgets in normalised device coordinates.
    pub fn vertices(&self, size: PhysicalSize<u32>) -> (Vec<PanelVertex>, Vec<u16>) {
        let background = Quad {
            rect: self.bounds(),
            colour: BACKGROUND,
        };

        let mut vertices = Vec::with_capacity((self.quads.len() + 1) * 4);
        let mut indices = Vec::with_capacity((self.quads.len() + 1) * 6);
        for quad in std::iter::once(&background).chain(&self.quads) {
            let base = vertices.len() as u16;
            let Rect {
                x,
                y,
                width: w,
                height: h,
            } = quad.rect;
            for (px, py) in [(x, y), (x, y + h), (x + w, y + h), (x + w, y)] {
                vertices.push(PanelVertex {
                    position: to_ndc(px, py, size),
                    colour: quad.colour,
                });
            }
            indices.extend_from_slice(&quad_indices(base));
        }
        (vertices, indices)
    }

    /// Triangles for this frame's text, laid out with `atlas`.
    pub fn glyph_vertices(
        &self,
        atlas: &GlyphAtlas,
        size: PhysicalSize<u32>,
    ) -> (Vec<GlyphVertex>, Vec<u16>) {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let inset = ((ROW_HEIGHT - atlas.line_height()) / 2.0).round();
        for run in &self.texts {
            for glyph in atlas.layout(&run.text, run.x, run.row_y + inset) {
                let base = vertices.len() as u16;
                let ([x0, y0], [x1, y1]) = (glyph.min, glyph.max);
                let ([u0, v0], [u1, v1]) = (glyph.uv_min, glyph.uv_max);
                for (px, py, u, v) in [
                    (x0, y0, u0, v0),
                    (x0, y1, u0, v1),
                    (x1, y1, u1, v1),
                    (x1, y0, u1, v0),
                ] {
                    vertices.push(GlyphVertex {
                        position: to_ndc(px, py, size),
                        uv: [u, v],
                        colour: run.colour,
                    });
                }
                indices.extend_from_slice(&quad_indices(base));
            }
        }
        (vertices, indices)
    }

    /// Draw the panel on top of `target` and end the frame's input.
    pub fn render(
        &mut self,
        pipeline: &mut PanelPipeline,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size: PhysicalSize<u32>,
    ) {
        let (vertices, indices) = self.vertices(size);
        let (glyph_vertices, glyph_indices) = self.glyph_vertices(pipeline.atlas(), size);
        pipeline.draw(
            device,
            queue,
            encoder,
            target,
            (&vertices, &indices),
            (&glyph_vertices, &glyph_indices),
        );
        self.end_frame();
    }

    /// Consume the press edge so it only acts on one frame. A widget grabbed
    /// by a press that has already been released lets go here.
    pub fn end_frame(&mut self) {
        self.just_pressed = false;
        if !self.pressed {
            self.active = None;
        }
    }

    fn push_text(&mut self, text: &str, x: f32, row_y: f32) {
        self.texts.push(TextRun {
            text: text.to_string(),
            x,
            row_y,
            colour: TEXT,
        });
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_widget;
        self.next_widget += 1;
        id
    }

    fn hovers(&self, rect: Rect) -> bool {
        self.cursor.is_some_and(|c| rect.contains(c.x, c.y))
    }

    fn hovers_panel(&self) -> bool {
        self.hovers(self.bounds())
    }
}

/// Declare the demo's widgets: magnification, minification, anisotropy,
/// camera pan and the frame-time readout.
///
/// Returns whether any selection changed this frame.
pub fn filter_controls(
    panel: &mut ControlPanel,
    params: &mut FilterParameterState,
    average_frame_time: Duration,
) -> bool {
    let mut changed = false;

    panel.label("Magnification");
    if panel.radio_group(&MagSelection::ALL, &mut params.mag_selection, MagSelection::label) {
        log::info!("magnification filter: {}", params.mag_selection.label());
        changed = true;
    }

    panel.label("Minification");
    if panel.radio_group(&MinSelection::ALL, &mut params.min_selection, MinSelection::label) {
        log::info!("minification filter: {}", params.min_selection.label());
        changed = true;
    }

    let mut anisotropy = params.anisotropy;
    if panel.slider(
        &mut anisotropy,
        (MIN_ANISOTROPY, MAX_ANISOTROPY),
        Some(1.0),
        "Anisotropic filtering",
        |v| format!("Number of samples: {v:.0}"),
    ) {
        params.set_anisotropy(anisotropy);
        log::info!("anisotropy: {}", params.anisotropy);
        changed = true;
    }
    panel.spacer(SECTION_SPACER);

    let mut pan = params.camera_pan;
    if panel.slider(&mut pan, CAMERA_PAN_RANGE, None, "Camera Panning", |v| {
        format!("{v:.3}")
    }) {
        params.set_camera_pan(pan);
        log::debug!("camera pan: {:.3}", params.camera_pan);
        changed = true;
    }

    panel.label(&frame_time_readout(average_frame_time));
    changed
}
