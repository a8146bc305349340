//! Property checks for the transform model and the controller.

use landmark_map::{
    apply_pan, apply_zoom_step, map_to_screen, reset, screen_to_map,
    prelude::{Duration, Instant},
    InputEvent, InputHandler, MapBuilder, MapConfig, MountSurface, Point, Scene,
    TransformLimits, ViewTransform, Viewport, ZoomDirection,
};
use landmark_map::input::handler::{Action, ViewState};
use proptest::prelude::*;

fn limits() -> TransformLimits {
    TransformLimits::default()
}

fn within(t: &ViewTransform, limits: &TransformLimits) -> bool {
    t.offset.x.abs() <= limits.max_pan
        && t.offset.y.abs() <= limits.max_pan
        && t.scale >= limits.min_zoom
        && t.scale <= limits.max_zoom
}

#[derive(Debug, Clone)]
enum Op {
    Pan(f64, f64),
    Zoom(bool),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(dx, dy)| Op::Pan(dx, dy)),
        any::<bool>().prop_map(Op::Zoom),
        Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn clamping_is_idempotent(
        ox in -1e6f64..1e6,
        oy in -1e6f64..1e6,
        scale in -10.0f64..10.0,
    ) {
        let limits = limits();
        let once = ViewTransform::new(Point::new(ox, oy), scale).clamped(&limits);
        prop_assert!(within(&once, &limits));
        prop_assert_eq!(once.clamped(&limits), once);
    }

    #[test]
    fn transform_stays_within_limits(ops in prop::collection::vec(op(), 0..64)) {
        let limits = limits();
        let mut t = ViewTransform::identity();
        for op in ops {
            t = match op {
                Op::Pan(dx, dy) => apply_pan(&t, Point::new(dx, dy), &limits),
                Op::Zoom(true) => apply_zoom_step(&t, ZoomDirection::In, &limits),
                Op::Zoom(false) => apply_zoom_step(&t, ZoomDirection::Out, &limits),
                Op::Reset => reset(),
            };
            prop_assert!(within(&t, &limits));
        }
    }

    #[test]
    fn repeated_zoom_converges_to_bound(presses in 11usize..40, zoom_in in any::<bool>()) {
        let limits = limits();
        let direction = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
        let mut t = ViewTransform::identity();
        for _ in 0..presses {
            t = apply_zoom_step(&t, direction, &limits);
        }
        let expected = if zoom_in { limits.max_zoom } else { limits.min_zoom };
        prop_assert_eq!(t.scale, expected);
    }

    #[test]
    fn reset_is_identity_from_any_state(
        dx in -1_000.0f64..1_000.0,
        dy in -1_000.0f64..1_000.0,
        zooms in 0usize..20,
    ) {
        let mut viewport = Viewport::new(Point::new(800.0, 400.0), limits());
        viewport.pan(Point::new(dx, dy));
        for _ in 0..zooms {
            viewport.zoom_step(ZoomDirection::In);
        }
        viewport.reset();
        prop_assert_eq!(*viewport.transform(), ViewTransform::new(Point::ZERO, 1.0));
        prop_assert_eq!(reset(), *viewport.transform());
    }

    #[test]
    fn screen_to_map_inverts_map_to_screen(
        x in 0.0f64..=100.0,
        y in 0.0f64..=100.0,
        ox in -50.0f64..=50.0,
        oy in -50.0f64..=50.0,
        scale in 0.5f64..=3.0,
        w in 1.0f64..2_000.0,
        h in 1.0f64..2_000.0,
    ) {
        let t = ViewTransform::new(Point::new(ox, oy), scale);
        let size = Point::new(w, h);
        let screen = map_to_screen(&Point::new(x, y), &t, &size);
        let back = screen_to_map(&screen, &t, &size).unwrap();
        prop_assert!((back.x - x).abs() < 1e-6);
        prop_assert!((back.y - y).abs() < 1e-6);
    }

    #[test]
    fn rendered_markers_match_independent_formula(
        ox in -50.0f64..=50.0,
        oy in -50.0f64..=50.0,
        scale in 0.5f64..=3.0,
        w in 1.0f64..2_000.0,
        h in 1.0f64..2_000.0,
    ) {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let t = ViewTransform::new(Point::new(ox, oy), scale);
        let scene = Scene::new(&landmarks, t, Point::new(w, h));

        for (landmark, screen) in landmarks.iter().zip(scene.marker_positions()) {
            let cx = w / 2.0;
            let cy = h / 2.0;
            let ex = cx + (landmark.position.x / 100.0 * w - cx) * scale + ox;
            let ey = cy + (landmark.position.y / 100.0 * h - cy) * scale + oy;
            prop_assert!((screen.x - ex).abs() < 1e-9 * w.max(1.0));
            prop_assert!((screen.y - ey).abs() < 1e-9 * h.max(1.0));
        }
    }

    #[test]
    fn drag_offset_is_start_plus_total_delta(
        moves in prop::collection::vec((-300.0f64..300.0, -300.0f64..300.0), 1..16),
    ) {
        let limits = limits();
        let mut handler = InputHandler::new();
        let mut t = ViewTransform::identity();
        let origin = Point::new(400.0, 200.0);

        let feed = |handler: &mut InputHandler, t: &mut ViewTransform, event: InputEvent| {
            let actions = handler.handle_event(event, ViewState {
                transform: &*t,
                limits: &limits,
                info_visible: false,
            });
            for action in actions {
                if let Action::SetTransform(next) = action {
                    *t = next;
                }
            }
        };

        feed(&mut handler, &mut t, InputEvent::PointerDown { position: origin });
        let mut last = origin;
        for (x, y) in moves {
            last = Point::new(origin.x + x, origin.y + y);
            feed(&mut handler, &mut t, InputEvent::PointerMove { position: last });
        }

        let total = last.subtract(&origin);
        let expected = Point::new(
            total.x.clamp(-limits.max_pan, limits.max_pan),
            total.y.clamp(-limits.max_pan, limits.max_pan),
        );
        prop_assert_eq!(t.offset, expected);
    }

    #[test]
    fn at_most_one_pending_hide(clicks in prop::collection::vec((0usize..8, 0u64..6_000), 1..20)) {
        let mut map = landmark_map::MapWidget::mount(
            MapBuilder::new(),
            Some(&MountSurface::new("map", Point::new(800.0, 400.0))),
        ).unwrap();

        let start = Instant::now();
        let mut elapsed = 0u64;
        for (index, gap) in clicks {
            elapsed += gap;
            let now = start + Duration::from_millis(elapsed);
            map.update(now);
            map.click_marker(index, now);
            prop_assert!(map.pending_hides() <= 1);
            prop_assert!(map.visible_info().is_some());
        }
    }
}
