use filter_lab::{
    filter::{FilterParameterState, MagSelection, MinSelection},
    ui::{ControlPanel, Rect, filter_controls, frame_time_readout, slider_fraction, slider_value},
};
use instant::Duration;

mod common;
use common::test_utils::window;

// Panel layout, top-left anchored: content starts at (26, 26) and is 380
// wide. Rows are 20 high with a gap of 4, sliders are 200 wide.
// Rows: "Magnification", two magnification options, "Minification",
// six minification options, anisotropy, a 20 px spacer, camera pan and the
// frame-time readout. The constants below are row centres.
const MAG_NEAREST_Y: f32 = 60.0;
const MAG_LINEAR_Y: f32 = 84.0;
const MIN_FIRST_Y: f32 = 132.0;
const ROW_PITCH: f32 = 24.0;
const ANISOTROPY_ROW_Y: f32 = 276.0;
const PAN_ROW_Y: f32 = 320.0;
const LEFT: f32 = 26.0;
const SLIDER_RIGHT: f32 = 226.0;

fn frame(panel: &mut ControlPanel, params: &mut FilterParameterState) -> bool {
    panel.begin_frame();
    let changed = filter_controls(panel, params, Duration::from_millis(16));
    panel.end_frame();
    changed
}

fn click(panel: &mut ControlPanel, params: &mut FilterParameterState, x: f32, y: f32) -> bool {
    frame(panel, params);
    panel.pointer_moved(x, y);
    panel.pointer_button(true);
    let changed = frame(panel, params);
    panel.pointer_button(false);
    changed
}

#[test]
fn rect_contains_its_top_left_edge_but_not_its_bottom_right() {
    let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert!(rect.contains(10.0, 20.0));
    assert!(rect.contains(39.9, 59.9));
    assert!(!rect.contains(40.0, 30.0));
    assert!(!rect.contains(20.0, 60.0));
    assert!(!rect.contains(9.9, 30.0));
}

#[test]
fn slider_maps_positions_to_clamped_values() {
    let track = Rect::new(0.0, 0.0, 100.0, 10.0);
    assert_eq!(slider_value(track, 0.0, (-1.0, 1.0), None), -1.0);
    assert_eq!(slider_value(track, 75.0, (-1.0, 1.0), None), 0.5);
    assert_eq!(slider_value(track, 100.0, (-1.0, 1.0), None), 1.0);
    assert_eq!(slider_value(track, -50.0, (-1.0, 1.0), None), -1.0);
    assert_eq!(slider_value(track, 500.0, (-1.0, 1.0), None), 1.0);
}

#[test]
fn stepped_slider_snaps_to_whole_steps() {
    let track = Rect::new(0.0, 0.0, 150.0, 10.0);
    assert_eq!(slider_value(track, 60.0, (1.0, 16.0), Some(1.0)), 7.0);
    assert_eq!(slider_value(track, 64.0, (1.0, 16.0), Some(1.0)), 7.0);
    assert_eq!(slider_value(track, 150.0, (1.0, 16.0), Some(1.0)), 16.0);
    assert_eq!(slider_value(track, 0.0, (1.0, 16.0), Some(1.0)), 1.0);
}

#[test]
fn slider_fraction_is_clamped() {
    assert_eq!(slider_fraction(1.0, (1.0, 16.0)), 0.0);
    assert_eq!(slider_fraction(16.0, (1.0, 16.0)), 1.0);
    assert_eq!(slider_fraction(0.0, (-1.0, 1.0)), 0.5);
    assert_eq!(slider_fraction(5.0, (-1.0, 1.0)), 1.0);
    assert_eq!(slider_fraction(5.0, (1.0, 1.0)), 0.0);
}

#[test]
fn clicking_a_magnification_button_selects_it() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    assert!(click(&mut panel, &mut params, LEFT + 100.0, MAG_LINEAR_Y));
    assert_eq!(params.mag_selection, MagSelection::Linear);

    // Clicking the selected option again changes nothing.
    assert!(!click(&mut panel, &mut params, LEFT + 100.0, MAG_LINEAR_Y));
    assert!(click(&mut panel, &mut params, LEFT + 5.0, MAG_NEAREST_Y));
    assert_eq!(params.mag_selection, MagSelection::Nearest);
}

#[test]
fn minification_buttons_follow_declaration_order() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    for (i, expected) in MinSelection::ALL.iter().enumerate() {
        let y = MIN_FIRST_Y + i as f32 * ROW_PITCH;
        click(&mut panel, &mut params, LEFT + 40.0, y);
        assert_eq!(params.min_selection, *expected);
    }
}

#[test]
fn dragging_the_anisotropy_slider_clamps_to_its_range() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);

    panel.pointer_moved(LEFT, ANISOTROPY_ROW_Y);
    assert!(panel.pointer_button(true));
    assert!(frame(&mut panel, &mut params));
    assert_eq!(params.anisotropy, 1.0);

    // The drag keeps going outside the panel.
    assert!(panel.pointer_moved(SLIDER_RIGHT + 400.0, ANISOTROPY_ROW_Y + 300.0));
    assert!(frame(&mut panel, &mut params));
    assert_eq!(params.anisotropy, 16.0);

    assert!(panel.pointer_button(false));
    panel.pointer_moved(LEFT, ANISOTROPY_ROW_Y);
    assert!(!frame(&mut panel, &mut params));
    assert_eq!(params.anisotropy, 16.0);
}

#[test]
fn pan_slider_centre_is_zero() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    params.set_camera_pan(0.5);
    click(&mut panel, &mut params, (LEFT + SLIDER_RIGHT) / 2.0, PAN_ROW_Y);
    assert_eq!(params.camera_pan, 0.0);
}

#[test]
fn presses_outside_the_panel_are_ignored() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);
    panel.pointer_moved(900.0, 500.0);
    assert!(!panel.pointer_button(true));
    assert!(!frame(&mut panel, &mut params));
    assert_eq!(params, FilterParameterState::default());
}

#[test]
fn reset_input_drops_a_drag() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);
    panel.pointer_moved(LEFT, ANISOTROPY_ROW_Y);
    panel.pointer_button(true);
    frame(&mut panel, &mut params);
    assert_eq!(params.anisotropy, 1.0);

    panel.reset_input();
    panel.pointer_moved(SLIDER_RIGHT, ANISOTROPY_ROW_Y);
    assert!(!frame(&mut panel, &mut params));
    assert_eq!(params.anisotropy, 1.0);
}

#[test]
fn vertices_are_in_normalised_device_coordinates() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);

    let (vertices, indices) = panel.vertices(window(1000, 500));
    assert_eq!(vertices.len() % 4, 0);
    assert_eq!(indices.len(), vertices.len() / 4 * 6);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));

    // The background comes first and starts at the panel's top-left corner.
    let bounds = panel.bounds();
    assert_eq!(bounds.x, 16.0);
    assert_eq!(bounds.y, 16.0);
    let [x, y] = vertices[0].position;
    assert!((x - (16.0 / 1000.0 * 2.0 - 1.0)).abs() < 1e-6);
    assert!((y - (1.0 - 16.0 / 500.0 * 2.0)).abs() < 1e-6);
    assert!(
        vertices
            .iter()
            .flat_map(|v| v.position)
            .all(|c| (-1.0..=1.0).contains(&c))
    );
}

#[test]
fn tapped_slider_takes_the_value_and_lets_go() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);

    // Press and release both arrive before the next frame.
    panel.pointer_moved(LEFT + 150.0, PAN_ROW_Y);
    assert!(panel.pointer_button(true));
    panel.pointer_button(false);
    assert!(frame(&mut panel, &mut params));
    assert_eq!(params.camera_pan, 0.5);

    // A later press far outside the panel must not reach the slider.
    assert!(!panel.pointer_moved(1000.0, 600.0));
    assert!(!panel.pointer_button(true));
    assert!(!frame(&mut panel, &mut params));
    assert_eq!(params.camera_pan, 0.5);
    assert!(!panel.pointer_button(false));
}

#[test]
fn new_press_releases_the_previous_grab() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);

    panel.pointer_moved(LEFT, ANISOTROPY_ROW_Y);
    panel.pointer_button(true);
    frame(&mut panel, &mut params);
    assert_eq!(params.anisotropy, 1.0);

    // The release was lost, e.g. it happened outside the window.
    panel.pointer_moved(LEFT + 5.0, MAG_LINEAR_Y);
    panel.pointer_button(true);
    frame(&mut panel, &mut params);
    assert_eq!(params.mag_selection, MagSelection::Linear);
    assert_eq!(params.anisotropy, 1.0);

    panel.pointer_moved(SLIDER_RIGHT, ANISOTROPY_ROW_Y);
    assert!(!frame(&mut panel, &mut params));
    assert_eq!(params.anisotropy, 1.0);
}

#[test]
fn rows_carry_their_labels() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    frame(&mut panel, &mut params);

    let texts: Vec<&str> = panel.texts().collect();
    assert_eq!(
        texts,
        [
            "Magnification",
            "GL_NEAREST",
            "GL_LINEAR",
            "Minification",
            "GL_NEAREST",
            "GL_LINEAR",
            "GL_NEAREST_MIPMAP_NEAREST",
            "GL_NEAREST_MIPMAP_LINEAR",
            "GL_LINEAR_MIPMAP_NEAREST",
            "GL_LINEAR_MIPMAP_LINEAR",
            "Number of samples: 16",
            "Anisotropic filtering",
            "0.000",
            "Camera Panning",
            "Application average 16.000 ms/frame (62.5 FPS)",
        ]
    );
}

#[test]
fn slider_readouts_follow_the_value() {
    let mut panel = ControlPanel::new();
    let mut params = FilterParameterState::default();
    click(&mut panel, &mut params, LEFT, ANISOTROPY_ROW_Y);
    click(&mut panel, &mut params, SLIDER_RIGHT, PAN_ROW_Y);
    frame(&mut panel, &mut params);

    let texts: Vec<&str> = panel.texts().collect();
    assert!(texts.contains(&"Number of samples: 1"));
    assert!(texts.contains(&"1.000"));
}

#[test]
fn frame_time_readout_shows_milliseconds_and_rate() {
    assert_eq!(
        frame_time_readout(Duration::from_millis(20)),
        "Application average 20.000 ms/frame (50.0 FPS)"
    );
    assert_eq!(
        frame_time_readout(Duration::ZERO),
        "Application average 0.000 ms/frame (0.0 FPS)"
    );
}
