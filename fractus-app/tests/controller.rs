//! End-to-end behaviour of the controller with a recording kernel and an
//! in-memory store.

use std::time::{Duration, Instant};

use fractus_app::{
    Explorer, ExplorerError, ExplorerOptions, FrameSurface, InputEvent, Key, MemoryFragmentStore,
    Outcome, PointerButton, SETTLE_TIMEOUT,
};
use fractus_core::viewport::{MAX_RESOLUTION_FACTOR, MIN_RESOLUTION_FACTOR};
use fractus_core::{Complex, FractalVariant, SurfaceSize};
use fractus_render::{RenderBuffer, RenderError, RenderKernel, RenderRequest};

const EPSILON: f64 = 1e-12;

#[derive(Default)]
struct RecordingKernel {
    requests: Vec<RenderRequest>,
}

impl RenderKernel for RecordingKernel {
    fn render(&mut self, request: &RenderRequest) -> fractus_render::Result<RenderBuffer> {
        self.requests.push(request.clone());
        Ok(RenderBuffer::new(request.width, request.height))
    }
}

struct FailingKernel;

impl RenderKernel for FailingKernel {
    fn render(&mut self, _request: &RenderRequest) -> fractus_render::Result<RenderBuffer> {
        Err(RenderError::Kernel("device lost".into()))
    }
}

struct WrongSizeKernel;

impl RenderKernel for WrongSizeKernel {
    fn render(&mut self, _request: &RenderRequest) -> fractus_render::Result<RenderBuffer> {
        Ok(RenderBuffer::new(1, 1))
    }
}

type TestExplorer<K = RecordingKernel> = Explorer<K, FrameSurface, MemoryFragmentStore>;

fn surface() -> SurfaceSize {
    SurfaceSize::new(1024.0, 768.0, 1.0).unwrap()
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn explorer_with<K: RenderKernel>(kernel: K, store: MemoryFragmentStore) -> TestExplorer<K> {
    Explorer::new(
        kernel,
        FrameSurface::new(),
        store,
        surface(),
        ExplorerOptions::default(),
    )
}

fn started(store: MemoryFragmentStore) -> TestExplorer {
    let mut explorer = explorer_with(RecordingKernel::default(), store);
    explorer.start().unwrap();
    explorer
}

fn last_request(explorer: &TestExplorer) -> &RenderRequest {
    explorer.kernel().requests.last().unwrap()
}

fn down(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown {
        button: PointerButton::Primary,
        x,
        y,
    }
}

fn up(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp {
        button: PointerButton::Primary,
        x,
        y,
    }
}

fn wheel(x: f64, y: f64, delta_y: f64) -> InputEvent {
    InputEvent::Wheel { x, y, delta_y }
}

#[test]
fn start_repairs_malformed_fragment() {
    let explorer = started(MemoryFragmentStore::with_fragment("bad,,2.0"));

    assert_eq!(explorer.store().current(), Some("0.0,0.0,2.0"));
    assert_eq!(explorer.store().writes()[0], "0.0,0.0,2.0");
    assert_eq!(explorer.state().center(), Complex::ZERO);
    assert_eq!(explorer.state().magnification(), 2.0);
    assert_eq!(explorer.state().resolution_factor(), MAX_RESOLUTION_FACTOR);
    assert!(explorer.scheduler().is_idle());

    // One full-resolution frame.
    assert_eq!(explorer.kernel().requests.len(), 1);
    let req = last_request(&explorer);
    assert_eq!((req.width, req.height), (2048, 1536));
    assert_eq!(explorer.surface().revision(), 1);
}

#[test]
fn start_without_saved_view_uses_defaults() {
    let explorer = started(MemoryFragmentStore::new());
    assert_eq!(explorer.store().current(), Some("0.0,0.0,1.0"));
    assert_eq!(explorer.fragment(), "0.0,0.0,1.0");
}

#[test]
fn start_projects_far_center_onto_disk() {
    let explorer = started(MemoryFragmentStore::with_fragment("30.0,40.0,1.0"));
    let center = explorer.state().center();
    assert!(center.norm() <= 2.0);
    assert!((center.re - 1.2).abs() < 1e-9);
    assert!((center.im - 1.6).abs() < 1e-9);
}

#[test]
fn interaction_without_movement_is_exact() {
    for saved in ["0.3,-0.7,3.5", "2.0,0.0,1.0", "-1.25,0.1,0.25"] {
        let mut explorer = started(MemoryFragmentStore::with_fragment(saved));
        let before = *explorer.state();
        let t0 = Instant::now();

        explorer.handle(down(200.0, 200.0), t0).unwrap();
        assert_eq!(explorer.state().resolution_factor(), MIN_RESOLUTION_FACTOR);
        explorer.handle(up(200.0, 200.0), t0).unwrap();
        assert!(explorer.tick(t0 + SETTLE_TIMEOUT).unwrap());

        assert_eq!(*explorer.state(), before, "{saved}");
        assert_eq!(explorer.store().current(), Some(saved));
    }
}

#[test]
fn drag_pans_by_pointer_delta() {
    let mut explorer = started(MemoryFragmentStore::new());
    let t0 = Instant::now();

    assert_eq!(explorer.handle(down(100.0, 100.0), t0).unwrap(), Outcome::Handled);
    assert!(explorer.is_dragging());
    explorer
        .handle(InputEvent::PointerMove { x: 110.0, y: 100.0 }, t0)
        .unwrap();
    assert_eq!(explorer.handle(up(110.0, 100.0), t0).unwrap(), Outcome::Handled);
    assert!(!explorer.is_dragging());
    assert_eq!(explorer.next_deadline(), Some(t0 + SETTLE_TIMEOUT));
    explorer.tick(t0 + SETTLE_TIMEOUT).unwrap();

    // 1024×768 at unit magnification: one logical pixel is 1/192 plane units.
    let center = explorer.state().center();
    assert!((center.re + 10.0 / 192.0).abs() < EPSILON, "{center}");
    assert!(center.im.abs() < EPSILON, "{center}");
    assert_eq!(explorer.state().resolution_factor(), MAX_RESOLUTION_FACTOR);
}

#[test]
fn move_without_drag_is_ignored() {
    let mut explorer = started(MemoryFragmentStore::new());
    let renders = explorer.kernel().requests.len();
    let outcome = explorer
        .handle(InputEvent::PointerMove { x: 5.0, y: 5.0 }, Instant::now())
        .unwrap();
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(explorer.kernel().requests.len(), renders);
}

#[test]
fn secondary_button_is_ignored() {
    let mut explorer = started(MemoryFragmentStore::new());
    let before = *explorer.state();
    let outcome = explorer
        .handle(
            InputEvent::PointerDown {
                button: PointerButton::Secondary,
                x: 10.0,
                y: 10.0,
            },
            Instant::now(),
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Ignored);
    assert!(explorer.scheduler().is_idle());
    assert!(!explorer.is_dragging());
    assert_eq!(*explorer.state(), before);
}

#[test]
fn wheel_at_center_zooms_in_place() {
    let mut explorer = started(MemoryFragmentStore::new());
    let t0 = Instant::now();

    explorer.handle(wheel(512.0, 384.0, -100.0), t0).unwrap();
    let magnification = explorer.state().magnification();
    assert!((magnification - 1.10523).abs() < 1e-4);
    assert!((magnification - 0.999f64.powf(-100.0)).abs() < EPSILON);
    assert_eq!(explorer.state().resolution_factor(), MIN_RESOLUTION_FACTOR);
    // Only the low-resolution grid shift separates the center from the origin.
    assert!(explorer.state().center().norm() < 0.1);

    let req = last_request(&explorer);
    assert_eq!((req.width, req.height), (64, 48));

    assert!(!explorer.tick(t0 + ms(499)).unwrap());
    assert!(explorer.tick(t0 + ms(500)).unwrap());
    assert_eq!(explorer.state().resolution_factor(), MAX_RESOLUTION_FACTOR);
    assert_eq!(explorer.state().magnification(), magnification);
    assert_eq!(explorer.state().center(), Complex::ZERO);
    let req = last_request(&explorer);
    assert_eq!((req.width, req.height), (2048, 1536));
}

#[test]
fn wheel_off_center_keeps_point_under_pointer() {
    let mut explorer = started(MemoryFragmentStore::new());
    let t0 = Instant::now();
    let (px, py) = (256.0, 192.0);

    // Full-resolution plane point under the pointer before zooming.
    let plane_at = |explorer: &TestExplorer| {
        let m = explorer.metrics();
        let k = m.plane_units_per_logical_pixel();
        let (cx, cy) = m.grid_center();
        let c = explorer.state().center();
        (c.re + (px - cx) * k, c.im - (py - cy) * k)
    };
    let before = plane_at(&explorer);

    explorer.handle(wheel(px, py, -200.0), t0).unwrap();
    explorer.tick(t0 + SETTLE_TIMEOUT).unwrap();
    let after = plane_at(&explorer);

    assert!((before.0 - after.0).abs() < 1e-9, "{before:?} {after:?}");
    assert!((before.1 - after.1).abs() < 1e-9, "{before:?} {after:?}");
}

#[test]
fn burst_of_wheel_events_settles_once() {
    let mut explorer = started(MemoryFragmentStore::new());
    let writes_after_start = explorer.store().writes().len();
    let t0 = Instant::now();

    let mut last = t0;
    for i in 0..10u64 {
        last = t0 + ms(i * 300);
        assert!(!explorer.tick(last).unwrap());
        explorer.handle(wheel(300.0, 200.0, -20.0), last).unwrap();
    }
    assert_eq!(explorer.next_deadline(), Some(last + SETTLE_TIMEOUT));

    let mut settles = Vec::new();
    let mut t = last;
    while t < last + ms(2_000) {
        if explorer.tick(t).unwrap() {
            settles.push(t);
        }
        t += ms(10);
    }
    assert_eq!(settles, vec![last + SETTLE_TIMEOUT]);
    assert_eq!(explorer.store().writes().len(), writes_after_start + 1);
    // One frame per wheel event, one for the settle, one at startup.
    assert_eq!(explorer.kernel().requests.len(), 12);
}

#[test]
fn wheel_during_drag_waits_for_pointer_up() {
    let mut explorer = started(MemoryFragmentStore::new());
    let t0 = Instant::now();
    explorer.handle(down(50.0, 50.0), t0).unwrap();
    explorer.handle(wheel(50.0, 50.0, 30.0), t0 + ms(100)).unwrap();
    assert_eq!(explorer.next_deadline(), None);
    assert!(!explorer.tick(t0 + ms(5_000)).unwrap());

    let released = t0 + ms(6_000);
    explorer.handle(up(50.0, 50.0), released).unwrap();
    assert_eq!(explorer.next_deadline(), Some(released + SETTLE_TIMEOUT));
}

#[test]
fn resize_renders_low_and_settles_later() {
    let mut explorer = started(MemoryFragmentStore::new());
    let t0 = Instant::now();
    let resized = SurfaceSize::new(800.0, 600.0, 1.0).unwrap();

    let outcome = explorer.handle(InputEvent::Resize(resized), t0).unwrap();
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(explorer.surface_size(), resized);
    let req = last_request(&explorer);
    assert_eq!((req.width, req.height), (50, 38));
    assert_eq!(explorer.next_deadline(), Some(t0 + SETTLE_TIMEOUT));

    explorer.tick(t0 + SETTLE_TIMEOUT).unwrap();
    let req = last_request(&explorer);
    assert_eq!((req.width, req.height), (1600, 1200));
}

#[test]
fn reset_waits_for_confirmation_and_delay() {
    let mut explorer = started(MemoryFragmentStore::with_fragment("0.5,0.5,8.0"));
    let t0 = Instant::now();

    let outcome = explorer.handle(InputEvent::Key(Key::Backspace), t0).unwrap();
    assert_eq!(outcome, Outcome::ResetRequested);
    assert_eq!(explorer.fragment(), "0.5,0.5,8.0");
    assert_eq!(explorer.next_deadline(), None);

    explorer.confirm_reset(t0);
    assert_eq!(explorer.next_deadline(), Some(t0 + ms(250)));
    assert!(!explorer.tick(t0 + ms(249)).unwrap());
    assert!(explorer.tick(t0 + ms(250)).unwrap());

    assert_eq!(explorer.state().center(), Complex::ZERO);
    assert_eq!(explorer.state().magnification(), 1.0);
    assert_eq!(explorer.store().current(), Some("0.0,0.0,1.0"));
    assert_eq!(explorer.next_deadline(), None);
}

#[test]
fn reset_during_low_resolution_lands_on_origin() {
    let mut explorer = started(MemoryFragmentStore::with_fragment("0.5,0.5,8.0"));
    let t0 = Instant::now();

    explorer.handle(wheel(100.0, 100.0, -50.0), t0).unwrap();
    explorer.confirm_reset(t0);
    assert_eq!(explorer.next_deadline(), Some(t0 + ms(250)));

    explorer.tick(t0 + ms(250)).unwrap();
    assert_eq!(explorer.state().resolution_factor(), MIN_RESOLUTION_FACTOR);
    explorer.tick(t0 + SETTLE_TIMEOUT).unwrap();

    assert_eq!(explorer.state().center(), Complex::ZERO);
    assert_eq!(explorer.state().magnification(), 1.0);
    assert_eq!(explorer.store().current(), Some("0.0,0.0,1.0"));
}

#[test]
fn variant_key_toggles_and_redraws() {
    let mut explorer = started(MemoryFragmentStore::new());
    let t0 = Instant::now();
    assert_eq!(explorer.variant(), FractalVariant::Mandelbrot);

    explorer.handle(InputEvent::Key(Key::Character('f')), t0).unwrap();
    assert_eq!(explorer.variant(), FractalVariant::BurningShip);
    assert_eq!(last_request(&explorer).variant, FractalVariant::BurningShip);

    explorer.handle(InputEvent::Key(Key::Character('F')), t0).unwrap();
    assert_eq!(explorer.variant(), FractalVariant::Mandelbrot);

    let outcome = explorer.handle(InputEvent::Key(Key::Character('x')), t0).unwrap();
    assert_eq!(outcome, Outcome::Ignored);
}

#[test]
fn kernel_failure_is_propagated() {
    let mut explorer = explorer_with(FailingKernel, MemoryFragmentStore::new());
    assert!(matches!(
        explorer.start(),
        Err(ExplorerError::Render(RenderError::Kernel(_)))
    ));
    // The view itself is still restored and persisted.
    assert_eq!(explorer.store().current(), Some("0.0,0.0,1.0"));
    assert_eq!(explorer.surface().revision(), 0);
}

#[test]
fn failed_frame_does_not_strand_low_resolution() {
    let mut explorer = explorer_with(FailingKernel, MemoryFragmentStore::new());
    let _ = explorer.start();
    let t0 = Instant::now();

    assert!(explorer.handle(wheel(10.0, 10.0, -10.0), t0).is_err());
    assert_eq!(explorer.next_deadline(), Some(t0 + SETTLE_TIMEOUT));
    assert!(explorer.tick(t0 + SETTLE_TIMEOUT).is_err());
    assert!(explorer.scheduler().is_idle());
    assert_eq!(explorer.state().resolution_factor(), MAX_RESOLUTION_FACTOR);
}

#[test]
fn wrong_sized_frame_is_rejected() {
    let mut explorer = explorer_with(WrongSizeKernel, MemoryFragmentStore::new());
    assert!(matches!(
        explorer.start(),
        Err(ExplorerError::Render(RenderError::BufferSize { .. }))
    ));
    assert_eq!(explorer.surface().revision(), 0);
}
