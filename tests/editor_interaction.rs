//! End-to-end editor behavior driven through a headless [`Editor`].
//!
//! At 800x600 the top-down camera shows 80x60 world units, so one unit is ten pixels,
//! the surface center (400, 300) looks at the origin, screen right is world +X and
//! screen down is world +Z. The transform handle is 7.5 units long at zoom 1.

use approx::assert_relative_eq;
use cgmath::{Rotation, Vector3};
use plane_editor::{
    gfx::{
        resources::material::Color,
        scene::{NodeId, ObjectId, Transform},
    },
    input::{KeyboardFocus, PointerEvent},
    selection::{AxisVisibility, TransformMode},
    Editor, EditorConfig,
};
use winit::{
    event::MouseButton,
    keyboard::{Key, NamedKey},
};

fn editor_with_row() -> (Editor, Vec<ObjectId>) {
    let mut editor = Editor::with_size(800, 600, &EditorConfig::default());
    let ids = [0.0, 10.0, 20.0]
        .into_iter()
        .map(|x| editor.spawn(x, 0.0, Color::WHITE))
        .collect();
    (editor, ids)
}

fn root_of(editor: &Editor, id: ObjectId) -> NodeId {
    editor.registry().get(id).unwrap().root()
}

fn transform_of(editor: &Editor, id: ObjectId) -> Transform {
    let root = root_of(editor, id);
    editor.host().scene().node(root).unwrap().transform
}

fn click(editor: &mut Editor, x: f32, y: f32) {
    editor.pointer_down(PointerEvent::primary(x, y), false);
    editor.pointer_up(MouseButton::Left);
}

fn key(editor: &mut Editor, text: &str) {
    editor.key_down(&Key::Character(text.into()), KeyboardFocus::Viewport);
}

fn escape(editor: &mut Editor) {
    editor.key_down(&Key::Named(NamedKey::Escape), KeyboardFocus::Viewport);
}

/// Lift the object off the plane and stretch it vertically
fn disturb(editor: &mut Editor, id: ObjectId) {
    let root = root_of(editor, id);
    let node = editor.host_mut().scene_mut().node_mut(root).unwrap();
    node.transform.position.y = 5.0;
    node.transform.scale.y = 3.0;
}

#[test]
fn pick_selects_middle_object_then_escape_clears() {
    let (mut editor, ids) = editor_with_row();

    click(&mut editor, 500.0, 300.0);
    assert_eq!(editor.selection().selected(), Some(ids[1]));
    assert_eq!(editor.selection().gizmo().object(), Some(root_of(&editor, ids[1])));

    escape(&mut editor);
    assert_eq!(editor.selection().selected(), None);
    assert!(!editor.selection().gizmo().is_visible());
}

#[test]
fn pick_hits_anywhere_on_the_square() {
    let (mut editor, ids) = editor_with_row();

    // 1.5 units right of the third object's center, still on its 4x4 square
    click(&mut editor, 615.0, 310.0);
    assert_eq!(editor.selection().selected(), Some(ids[2]));
}

#[test]
fn pick_miss_deselects() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[2]));

    click(&mut editor, 400.0, 100.0);
    assert_eq!(editor.selection().selected(), None);
}

#[test]
fn selecting_another_object_replaces_attachment() {
    let (mut editor, ids) = editor_with_row();

    click(&mut editor, 600.0, 300.0);
    click(&mut editor, 400.0, 300.0);

    assert_eq!(editor.selection().selected(), Some(ids[0]));
    assert_eq!(editor.selection().gizmo().object(), Some(root_of(&editor, ids[0])));
}

#[test]
fn handle_drag_moves_object_along_x_and_keeps_it_on_the_plane() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[0]));
    disturb(&mut editor, ids[0]);

    // world (5, 0.2) lies on the X arrow, off every square
    editor.pointer_down(PointerEvent::primary(450.0, 302.0), false);
    assert!(editor.selection().is_dragging_gizmo());
    assert!(!editor.host().controls().enabled);
    assert_eq!(editor.selection().selected(), Some(ids[0]));

    editor.pointer_move(480.0, 330.0);
    let transform = transform_of(&editor, ids[0]);
    assert_relative_eq!(transform.position.x, 3.0, epsilon = 1e-3);
    assert_eq!(transform.position.y, 0.0);
    assert_relative_eq!(transform.position.z, 0.0);
    assert_eq!(transform.scale.y, 1.0);

    editor.pointer_up(MouseButton::Left);
    assert!(!editor.selection().is_dragging_gizmo());
    assert!(editor.host().controls().enabled);
}

#[test]
fn scale_drag_stretches_in_plane_only() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[0]));
    key(&mut editor, "s");
    disturb(&mut editor, ids[0]);

    editor.pointer_down(PointerEvent::primary(450.0, 301.0), false);
    editor.pointer_move(487.5, 301.0);
    editor.pointer_up(MouseButton::Left);

    let transform = transform_of(&editor, ids[0]);
    assert_relative_eq!(transform.scale.x, 1.5, epsilon = 1e-3);
    assert_eq!(transform.scale.y, 1.0);
    assert_relative_eq!(transform.scale.z, 1.0);
    assert_eq!(transform.position.y, 0.0);
}

#[test]
fn snapped_translation_lands_on_whole_units() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[0]));
    editor.toggle_snap(true);

    editor.pointer_down(PointerEvent::primary(450.0, 302.0), false);
    editor.pointer_move(483.0, 302.0);
    editor.pointer_up(MouseButton::Left);

    assert_relative_eq!(transform_of(&editor, ids[0]).position.x, 3.0);
}

#[test]
fn snapped_rotation_turns_about_vertical_axis() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[0]));
    editor.toggle_snap(true);
    key(&mut editor, "R");

    // grab the ring at world (7.5, 0) and swing it a quarter turn to (0, -7.5)
    editor.pointer_down(PointerEvent::primary(475.0, 300.0), false);
    assert!(editor.selection().is_dragging_gizmo());
    editor.pointer_move(401.0, 226.0);
    editor.pointer_up(MouseButton::Left);

    let transform = transform_of(&editor, ids[0]);
    let turned = transform.rotation.rotate_vector(Vector3::unit_x());
    assert_relative_eq!(turned.x, 0.0, epsilon = 1e-4);
    assert_relative_eq!(turned.y, 0.0, epsilon = 1e-4);
    assert_relative_eq!(turned.z, -1.0, epsilon = 1e-4);
    assert_eq!(transform.position.y, 0.0);
}

#[test]
fn switching_to_rotate_mid_drag_never_tips_the_square() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[0]));

    editor.pointer_down(PointerEvent::primary(450.0, 302.0), false);
    key(&mut editor, "r");
    editor.pointer_move(450.0, 250.0);

    let transform = transform_of(&editor, ids[0]);
    let up = transform.rotation.rotate_vector(Vector3::unit_y());
    assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);
    assert_relative_eq!(up.z, 0.0, epsilon = 1e-6);
    assert_relative_eq!(transform.position.x, 0.0);

    editor.pointer_up(MouseButton::Left);
    assert!(!editor.selection().is_dragging_gizmo());
    assert!(editor.host().controls().enabled);
}

#[test]
fn right_press_on_empty_space_deselects() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[1]));

    editor.pointer_down(PointerEvent::new(400.0, 100.0, MouseButton::Right), false);
    editor.pointer_up(MouseButton::Right);
    assert_eq!(editor.selection().selected(), None);

    editor.pointer_down(PointerEvent::new(600.0, 300.0, MouseButton::Right), false);
    editor.pointer_up(MouseButton::Right);
    assert_eq!(editor.selection().selected(), Some(ids[2]));
}

#[test]
fn press_during_drag_does_not_reselect() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[0]));

    editor.pointer_down(PointerEvent::primary(450.0, 302.0), false);
    assert!(editor.selection().is_dragging_gizmo());

    // squarely on the second object
    editor.pointer_down(PointerEvent::primary(500.0, 300.0), false);
    assert_eq!(editor.selection().selected(), Some(ids[0]));

    editor.pointer_up(MouseButton::Left);
    click(&mut editor, 500.0, 300.0);
    assert_eq!(editor.selection().selected(), Some(ids[1]));
}

#[test]
fn snap_round_trip() {
    let (mut editor, _) = editor_with_row();

    editor.toggle_snap(true);
    let once = editor.selection().snap_settings();
    assert_eq!(once.translation, Some(1.0));
    assert_eq!(once.rotation, Some(std::f32::consts::PI / 8.0));
    assert_eq!(once.scale, Some(0.25));

    editor.toggle_snap(true);
    assert_eq!(editor.selection().snap_settings(), once);

    editor.toggle_snap(false);
    assert!(editor.selection().snap_settings().is_free());
    assert!(!editor.selection().is_snap_enabled());
}

#[test]
fn mode_shortcuts_follow_axis_table() {
    let (mut editor, _) = editor_with_row();

    for (text, mode) in [
        ("t", TransformMode::Translate),
        ("T", TransformMode::Translate),
        ("r", TransformMode::Rotate),
        ("S", TransformMode::Scale),
        ("t", TransformMode::Translate),
    ] {
        key(&mut editor, text);
        assert_eq!(editor.selection().mode(), mode);
        assert_eq!(editor.selection().axis_visibility(), AxisVisibility::for_mode(mode));
    }

    key(&mut editor, "q");
    assert_eq!(editor.selection().mode(), TransformMode::Translate);
}

#[test]
fn shortcuts_are_ignored_while_typing() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[1]));

    editor.key_down(&Key::Character("r".into()), KeyboardFocus::TextEntry);
    editor.key_down(&Key::Named(NamedKey::Escape), KeyboardFocus::TextEntry);

    assert_eq!(editor.selection().mode(), TransformMode::Translate);
    assert_eq!(editor.selection().selected(), Some(ids[1]));
}

#[test]
fn teardown_is_idempotent_and_keeps_state() {
    let (mut editor, ids) = editor_with_row();
    editor.select(Some(ids[1]));
    key(&mut editor, "s");

    editor.teardown();
    editor.teardown();

    assert!(editor.is_torn_down());
    assert!(!editor.host().is_running());
    assert_eq!(editor.selection().selected(), Some(ids[1]));
    assert_eq!(editor.selection().mode(), TransformMode::Scale);

    // listeners are gone: no shortcuts, no picking, no frames
    key(&mut editor, "t");
    click(&mut editor, 600.0, 300.0);
    assert_eq!(editor.selection().mode(), TransformMode::Scale);
    assert_eq!(editor.selection().selected(), Some(ids[1]));
    assert!(!editor.frame(None::<plane_editor::host::NoUi>));
}

#[test]
fn resize_reprojects_picking() {
    let (mut editor, ids) = editor_with_row();
    editor.resize(1000, 500);

    let camera = editor.host().camera();
    assert_relative_eq!(camera.right - camera.left, 120.0);
    assert_relative_eq!(camera.top - camera.bottom, 60.0);

    // 1000 px now span 120 units
    click(&mut editor, 500.0 + 10.0 * 1000.0 / 120.0, 250.0);
    assert_eq!(editor.selection().selected(), Some(ids[1]));
}

#[test]
fn zoom_shrinks_handles_and_keeps_picking_aligned() {
    let (mut editor, ids) = editor_with_row();
    editor.wheel(3.0);
    assert!(editor.frame(None::<plane_editor::host::NoUi>));

    let zoom = editor.host().camera().zoom;
    assert!(zoom > 1.0);

    let px_per_unit = 10.0 * zoom;
    click(&mut editor, 400.0 + 10.0 * px_per_unit, 300.0);
    assert_eq!(editor.selection().selected(), Some(ids[1]));
}
