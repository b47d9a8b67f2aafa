use std::cell::RefCell;
use std::rc::Rc;

use super::*;

type SaveLog = Rc<RefCell<Vec<Option<String>>>>;

fn recording_pad(left: f64, top: f64) -> (SignaturePad, SaveLog) {
    let log: SaveLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut pad = SignaturePad::new(SignatureSettings::default());
    pad.on_stroke_complete(move |value| sink.borrow_mut().push(value));
    pad.attach(ClientRect::new(left, top, 300.0, 200.0)).unwrap();
    (pad, log)
}

/// Draws a polyline given in surface-local coordinates, offset by the pad origin.
fn draw_stroke(pad: &mut SignaturePad, origin: (f64, f64), points: &[(f64, f64)]) {
    let (ox, oy) = origin;
    let (x0, y0) = points[0];
    pad.handle_event(&PointerEvent::Down(PointerInput::mouse(ox + x0, oy + y0)));
    for &(x, y) in &points[1..] {
        pad.handle_event(&PointerEvent::Move(PointerInput::mouse(ox + x, oy + y)));
    }
    pad.handle_event(&PointerEvent::Up);
}

#[test]
fn straight_stroke_then_clear() {
    let (mut pad, log) = recording_pad(0.0, 0.0);

    draw_stroke(&mut pad, (0.0, 0.0), &[(10.0, 10.0), (10.0, 100.0)]);

    assert!(pad.has_signature());
    {
        let saves = log.borrow();
        assert_eq!(saves.len(), 1);
        let saved = saves[0].as_deref().expect("signature saved");
        assert!(saved.starts_with("data:image/png;base64,"));
    }

    pad.clear();
    assert!(!pad.has_signature());
    assert_eq!(log.borrow().last(), Some(&None));
    assert_eq!(pad.snapshot(), None);
}

#[test]
fn surface_uses_host_width_and_fixed_height() {
    let (pad, _log) = recording_pad(0.0, 0.0);
    let surface = pad.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (300, 200));
}

#[test]
fn press_and_release_without_movement_saves_nothing() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    pad.handle_event(&PointerEvent::Down(PointerInput::mouse(20.0, 20.0)));
    pad.handle_event(&PointerEvent::Up);

    assert!(!pad.has_signature());
    assert!(log.borrow().is_empty());
}

#[test]
fn input_before_layout_is_ignored() {
    let log: SaveLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut pad = SignaturePad::new(SignatureSettings::default());
    pad.on_stroke_complete(move |value| sink.borrow_mut().push(value));

    pad.handle_event(&PointerEvent::Down(PointerInput::mouse(10.0, 10.0)));
    pad.handle_event(&PointerEvent::Move(PointerInput::mouse(10.0, 100.0)));
    pad.handle_event(&PointerEvent::Up);

    assert!(!pad.is_ready());
    assert!(!pad.is_drawing());
    assert!(!pad.has_signature());
    assert!(log.borrow().is_empty());
}

#[test]
fn move_without_press_does_not_draw() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    pad.handle_event(&PointerEvent::Move(PointerInput::mouse(10.0, 10.0)));
    pad.handle_event(&PointerEvent::Move(PointerInput::mouse(50.0, 50.0)));
    pad.handle_event(&PointerEvent::Leave);

    assert!(!pad.has_signature());
    assert!(log.borrow().is_empty());
}

#[test]
fn encoding_happens_only_when_the_stroke_ends() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    pad.handle_event(&PointerEvent::Down(PointerInput::mouse(10.0, 10.0)));
    for y in [20.0, 30.0, 40.0, 50.0] {
        pad.handle_event(&PointerEvent::Move(PointerInput::mouse(10.0, y)));
    }
    assert!(pad.has_signature());
    assert!(pad.is_drawing());
    assert!(log.borrow().is_empty());

    pad.handle_event(&PointerEvent::Leave);
    assert!(!pad.is_drawing());
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn second_stroke_adds_to_the_first() {
    let stroke_a = [(20.0, 20.0), (120.0, 20.0)];
    let stroke_b = [(20.0, 150.0), (200.0, 60.0)];

    let (mut both, both_log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut both, (0.0, 0.0), &stroke_a);
    draw_stroke(&mut both, (0.0, 0.0), &stroke_b);

    let (mut only_b, only_b_log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut only_b, (0.0, 0.0), &stroke_a);
    only_b.clear();
    draw_stroke(&mut only_b, (0.0, 0.0), &stroke_b);

    assert!(both.has_signature());
    let both_saved = both_log.borrow().last().cloned().flatten().unwrap();
    let only_b_saved = only_b_log.borrow().last().cloned().flatten().unwrap();
    assert_ne!(both_saved, only_b_saved);
}

#[test]
fn saved_value_is_the_full_surface_snapshot() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut pad, (0.0, 0.0), &[(20.0, 20.0), (120.0, 20.0)]);
    draw_stroke(&mut pad, (0.0, 0.0), &[(20.0, 150.0), (200.0, 60.0)]);

    assert_eq!(log.borrow().len(), 2);
    assert_eq!(log.borrow().last().cloned().flatten(), pad.snapshot());
}

#[test]
fn surface_position_does_not_change_the_image() {
    let points = [(15.0, 30.0), (80.0, 120.0), (160.0, 40.0), (280.0, 180.0)];

    let (mut near, near_log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut near, (0.0, 0.0), &points);

    let (mut far, far_log) = recording_pad(412.5, 977.0);
    draw_stroke(&mut far, (412.5, 977.0), &points);

    assert_eq!(*near_log.borrow(), *far_log.borrow());
}

#[test]
fn repositioning_keeps_existing_strokes() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut pad, (0.0, 0.0), &[(20.0, 20.0), (120.0, 20.0)]);

    pad.attach(ClientRect::new(50.0, 75.0, 300.0, 200.0)).unwrap();
    assert!(pad.has_signature());

    draw_stroke(&mut pad, (50.0, 75.0), &[(20.0, 150.0), (200.0, 60.0)]);

    let (mut reference, reference_log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut reference, (0.0, 0.0), &[(20.0, 20.0), (120.0, 20.0)]);
    draw_stroke(&mut reference, (0.0, 0.0), &[(20.0, 150.0), (200.0, 60.0)]);

    assert_eq!(log.borrow().last(), reference_log.borrow().last());
}

#[test]
fn touch_input_matches_mouse_input() {
    let (mut mouse_pad, mouse_log) = recording_pad(10.0, 10.0);
    draw_stroke(&mut mouse_pad, (10.0, 10.0), &[(30.0, 30.0), (90.0, 140.0)]);

    let (mut touch_pad, touch_log) = recording_pad(10.0, 10.0);
    touch_pad.handle_event(&PointerEvent::Down(PointerInput::touch(40.0, 40.0)));
    touch_pad.handle_event(&PointerEvent::Move(PointerInput::touch(100.0, 150.0)));
    touch_pad.handle_event(&PointerEvent::Up);

    assert_eq!(*mouse_log.borrow(), *touch_log.borrow());
}

#[test]
fn clear_mid_stroke_stops_drawing() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    pad.handle_event(&PointerEvent::Down(PointerInput::mouse(10.0, 10.0)));
    pad.handle_event(&PointerEvent::Move(PointerInput::mouse(10.0, 60.0)));

    pad.clear();
    pad.handle_event(&PointerEvent::Move(PointerInput::mouse(10.0, 120.0)));
    pad.handle_event(&PointerEvent::Up);

    assert!(!pad.is_drawing());
    assert!(!pad.has_signature());
    assert_eq!(*log.borrow(), vec![None]);
}

#[test]
fn clear_on_empty_pad_still_reports_empty_value() {
    let (mut pad, log) = recording_pad(0.0, 0.0);
    pad.clear();
    pad.clear();
    assert!(!pad.has_signature());
    assert_eq!(*log.borrow(), vec![None, None]);
}

#[test]
fn script_replay_matches_direct_events() {
    let script = StrokeScript::from_json(
        r#"{
            "origin": [100, 200],
            "width": 300,
            "events": [
                { "type": "down", "x": 110, "y": 210 },
                { "type": "move", "x": 110, "y": 300 },
                { "type": "up" }
            ]
        }"#,
    )
    .unwrap();

    let outcome = script.replay(SignatureSettings::default()).unwrap();
    assert!(outcome.has_signature);
    assert_eq!(outcome.save_count, 1);

    let (mut pad, log) = recording_pad(0.0, 0.0);
    draw_stroke(&mut pad, (0.0, 0.0), &[(10.0, 10.0), (10.0, 100.0)]);
    assert_eq!(outcome.saved, log.borrow()[0]);
}

#[test]
fn script_replay_handles_touch_clear_and_reposition() {
    let script = StrokeScript::from_json(
        r#"{
            "events": [
                { "type": "touch_start", "touches": [[10, 10]] },
                { "type": "touch_move", "touches": [[10, 90], [200, 200]] },
                { "type": "touch_end" },
                { "type": "clear" },
                { "type": "reposition", "left": 40, "top": 40 },
                { "type": "touch_start", "touches": [] },
                { "type": "touch_move", "touches": [[60, 60]] },
                { "type": "touch_end" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(script.width, 300);
    let outcome = script.replay(SignatureSettings::default()).unwrap();
    assert!(!outcome.has_signature);
    assert_eq!(outcome.saved, None);
    assert_eq!(outcome.save_count, 2);
}
