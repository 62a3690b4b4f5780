use portfolio::animation::confetti::{MAX_PIECES, MIN_PIECES};
use portfolio::animation::trail::{RING_TTL, RINGS_PER_MOVE};
use portfolio::animation::{
    Confetti, CursorGlow, CustomCursor, DriverOutcome, FrameDriver, MagneticButton, MouseTrail,
    Phase, Point, Rect, Rgb, Simulation, Theme, Tick, Typewriter, Viewport,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

#[test]
fn confetti_spawns_a_bounded_burst() {
    let mut confetti = Confetti::seeded(viewport(), 42);
    assert!(!confetti.is_active());
    assert!(confetti.trigger());

    let count = confetti.pieces().len();
    assert!(
        (MIN_PIECES..MAX_PIECES).contains(&count),
        "Spawned {} pieces",
        count
    );
    for piece in confetti.pieces() {
        assert_eq!(piece.life, 0.0);
        assert!(piece.max_life >= 300.0 && piece.max_life < 500.0);
        assert_eq!(piece.opacity(), 1.0);
    }
}

#[test]
fn confetti_count_never_grows_and_run_finishes() {
    let mut confetti = Confetti::seeded(viewport(), 7);
    confetti.trigger();

    let mut previous = confetti.pieces().len();
    let mut frames = 0;
    while confetti.tick(1.0) == Tick::Continue {
        let now = confetti.pieces().len();
        assert!(now <= previous, "Piece count grew from {} to {}", previous, now);
        previous = now;
        frames += 1;
        assert!(frames < 500, "Every piece must expire within its max life");
    }

    assert!(confetti.pieces().is_empty());
    assert!(!confetti.is_active());
}

#[test]
fn confetti_ignores_retrigger_while_running() {
    let completions = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&completions);

    let mut confetti = Confetti::seeded(viewport(), 1);
    confetti.on_complete(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    assert!(confetti.trigger());
    confetti.tick(1.0);
    let before = confetti.pieces().len();
    assert!(!confetti.trigger(), "A second trigger mid-run must be ignored");
    assert_eq!(confetti.pieces().len(), before);

    let outcome = FrameDriver::default().run_frames(&mut confetti, 1000);
    assert!(matches!(outcome, DriverOutcome::Completed { .. }), "{:?}", outcome);
    assert_eq!(completions.load(Ordering::SeqCst), 1, "Callback fires once per run");

    assert!(confetti.trigger(), "A new run is accepted after completion");
    FrameDriver::default().run_frames(&mut confetti, 1000);
    assert_eq!(completions.load(Ordering::SeqCst), 2);
}

#[test]
fn confetti_pieces_fade_linearly() {
    let mut confetti = Confetti::seeded(viewport(), 9);
    confetti.trigger();
    for _ in 0..30 {
        confetti.tick(1.0);
    }
    for piece in confetti.pieces() {
        let expected = 1.0 - piece.life / piece.max_life;
        assert!((piece.opacity() - expected).abs() < 1e-9);
    }
}

#[test]
fn glow_follows_pointer_and_fades_out() {
    let mut glow = CursorGlow::new(Viewport::new(800.0, 600.0), Theme::Light);

    glow.pointer_enter(Point::new(100.0, 100.0));
    assert_eq!(glow.target_radius(), 600.0, "Radius targets the shorter side");

    assert_eq!(glow.tick(1.0), Tick::Continue);
    assert!((glow.radius() - 60.0).abs() < 1e-9);
    assert!((glow.position().x - 370.0).abs() < 1e-9);
    assert!((glow.position().y - 280.0).abs() < 1e-9);

    for _ in 0..100 {
        glow.tick(1.0);
    }
    assert!(glow.position().distance(Point::new(100.0, 100.0)) < 1.0);

    glow.pointer_leave();
    assert_eq!(glow.target_radius(), 0.0);
    let outcome = FrameDriver::default().run_frames(&mut glow, 1000);
    assert!(matches!(outcome, DriverOutcome::Completed { .. }));
    assert!(outcome.frames() > 1, "Leaving fades instead of cutting");
    assert_eq!(glow.radius(), 0.0);
}

#[test]
fn glow_gradient_swaps_base_colours_by_theme() {
    let light = CursorGlow::new(viewport(), Theme::Light).gradient();
    let dark = CursorGlow::new(viewport(), Theme::Dark).gradient();

    assert_eq!(light.len(), 17);
    assert_eq!(light[0].offset, 0.0);
    assert_eq!(light[16].offset, 1.0);
    assert_eq!(light[0].color, Rgb(0, 114, 177).css(0.3));
    assert_eq!(dark[0].color, Rgb(44, 148, 208).css(0.3));
    assert_eq!(light[16].color, Rgb(44, 148, 208).css(0.0));
    assert!(light.windows(2).all(|w| w[0].offset < w[1].offset));
}

#[test]
fn magnetic_button_pulls_toward_pointer() {
    let mut button = MagneticButton::new(Rect::new(0.0, 0.0, 100.0, 100.0));

    button.pointer_move(Point::new(150.0, 50.0));
    assert_eq!(button.offset(), Point::ZERO, "No pull before hover");

    button.pointer_enter();
    let offset = button.pointer_move(Point::new(150.0, 50.0));
    // 100px away: 100 * (540 / 640) * 1.2
    assert!((offset.x - 101.25).abs() < 1e-9);
    assert_eq!(offset.y, 0.0);
    assert_eq!(button.transform(), "translate(101.25px, 0.00px)");
    assert_eq!(button.tick(1.0), Tick::Continue);

    button.pointer_move(Point::new(750.0, 50.0));
    assert_eq!(button.offset(), Point::ZERO, "Outside the radius snaps to rest");

    button.pointer_move(Point::new(50.0, 80.0));
    assert!(button.is_attracted());
    button.pointer_leave();
    assert_eq!(button.offset(), Point::ZERO);
    assert_eq!(button.transform(), "translate(0.00px, 0.00px)");
    assert_eq!(button.tick(1.0), Tick::Stop);
}

#[test]
fn trail_rings_spawn_near_pointer_and_expire() {
    let mut trail = MouseTrail::seeded(3);
    assert_eq!(trail.tick(1.0), Tick::Stop, "Nothing to draw without movement");

    let at = Point::new(400.0, 300.0);
    trail.pointer_move(at);
    assert_eq!(trail.rings().len(), RINGS_PER_MOVE);
    for ring in trail.rings() {
        assert!((ring.start.x - at.x).abs() <= 20.0);
        assert!((ring.start.y - at.y).abs() <= 20.0);
        assert!((ring.end.x - ring.start.x).abs() <= 300.0);
        assert!((30.0..=40.0).contains(&ring.size));
        assert_eq!(ring.alpha(), 0.0);
    }

    for _ in 0..60 {
        trail.tick(1.0);
    }
    for ring in trail.rings() {
        assert!((ring.alpha() - 1.0).abs() < 1e-9, "Fully visible mid-life");
        assert!(ring.size < ring.start_size);
    }

    let outcome = FrameDriver::default().run_frames(&mut trail, 1000);
    assert_eq!(outcome, DriverOutcome::Completed { frames: RING_TTL as u64 - 60 + 1 });
    assert!(trail.rings().is_empty());
}

#[test]
fn cursor_dot_tracks_and_outline_chases() {
    let mut cursor = CustomCursor::new();
    cursor.pointer_move(Point::new(100.0, 50.0));
    assert_eq!(cursor.dot(), Point::new(100.0, 50.0));

    assert_eq!(cursor.tick(1.0), Tick::Continue);
    assert!((cursor.outline().x - 18.0).abs() < 1e-9);
    assert!((cursor.outline().y - 9.0).abs() < 1e-9);

    cursor.set_hovering(true);
    assert!(cursor.is_hovering());

    cursor.pointer_leave();
    assert!(cursor.is_hidden());
    assert_eq!(cursor.opacity(), 0.0);
    cursor.pointer_move(Point::new(0.0, 0.0));
    assert!(!cursor.is_hidden(), "Moving brings the cursor back");
}

#[test]
fn driver_stops_on_cancel_and_budget() {
    let driver = FrameDriver::default();
    let mut cursor = CustomCursor::new();

    assert_eq!(
        driver.run_frames(&mut cursor, 10),
        DriverOutcome::Exhausted { frames: 10 }
    );

    driver.cancel_token().cancel();
    assert_eq!(
        driver.run_frames(&mut cursor, 10),
        DriverOutcome::Cancelled { frames: 0 }
    );

    driver.cancel_token().reset();
    assert_eq!(driver.run_frames(&mut cursor, 1).frames(), 1);
}

#[tokio::test]
async fn async_driver_runs_until_cancelled() {
    let driver = FrameDriver::new(Duration::from_millis(5));
    let token = driver.cancel_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let mut cursor = CustomCursor::new();
    cursor.pointer_move(Point::new(500.0, 500.0));
    let outcome = driver.run(&mut cursor).await;
    assert!(matches!(outcome, DriverOutcome::Cancelled { .. }), "{:?}", outcome);
    assert!(cursor.outline().x > 0.0);
}

#[tokio::test]
async fn async_driver_completes_settled_simulation() {
    let driver = FrameDriver::new(Duration::from_millis(5));
    let mut glow = CursorGlow::new(viewport(), Theme::Dark);
    assert_eq!(driver.run(&mut glow).await, DriverOutcome::Completed { frames: 1 });
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn typewriter_types_pauses_deletes_and_wraps() {
    let mut writer = Typewriter::new("I build ", vec!["ab".to_string(), "c".to_string()]);
    assert_eq!(writer.text(), "I build ");

    writer.advance(ms(100));
    assert_eq!(writer.current(), "a");
    writer.advance(ms(99));
    assert_eq!(writer.current(), "a", "Nothing happens before the delay is due");
    writer.advance(ms(1));
    assert_eq!(writer.current(), "ab");

    // One more typing delay notices the phrase is complete
    writer.advance(ms(100));
    assert_eq!(writer.phase(), Phase::Paused);
    writer.advance(ms(1999));
    assert_eq!(writer.phase(), Phase::Paused);
    writer.advance(ms(1));
    assert_eq!(writer.phase(), Phase::Deleting);
    assert_eq!(writer.text(), "I build ab");

    writer.advance(ms(50));
    assert_eq!(writer.current(), "a");
    writer.advance(ms(50));
    assert_eq!(writer.current(), "");
    writer.advance(ms(50));
    assert_eq!(writer.phase(), Phase::Typing);
    assert_eq!(writer.index(), 1);

    // Whole second cycle in one go: type, notice, pause, delete, empty
    writer.advance(ms(100 + 100 + 2000 + 50 + 50));
    assert_eq!(writer.index(), 0, "Wraps back to the first phrase");
    assert_eq!(writer.phase(), Phase::Typing);
    assert_eq!(writer.current(), "");
}

#[test]
fn typewriter_counts_characters_not_bytes() {
    let mut writer = Typewriter::new("", vec!["héllo".to_string()]);
    writer.advance(ms(200));
    assert_eq!(writer.current(), "hé");
}

#[test]
fn typewriter_without_phrases_is_idle() {
    let mut writer = Typewriter::new("Hi", Vec::new());
    writer.advance(ms(10_000));
    assert_eq!(writer.text(), "Hi");
    assert_eq!(writer.tick(1.0), Tick::Stop);
    assert_eq!(
        FrameDriver::default().run_frames(&mut writer, 10),
        DriverOutcome::Completed { frames: 1 }
    );
}

#[test]
fn typewriter_ticks_in_frames() {
    let mut writer = Typewriter::new("", vec!["abc".to_string()]);
    // Seven frames of ~16.7 ms pass the first 100 ms typing delay
    let outcome = FrameDriver::default().run_frames(&mut writer, 7);
    assert_eq!(outcome, DriverOutcome::Exhausted { frames: 7 });
    assert_eq!(writer.current(), "a");
}
