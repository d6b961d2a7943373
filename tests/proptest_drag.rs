use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::test_runner::Config;
use station_rota::schedule::drag::DragConfig;
use station_rota::schedule::{
    CalendarItem, ColumnRules, DragController, DragOutcome, GridGeometry, ItemKind, PointerEvent,
    Schedule, SurfacePoint, ViewMode, ViewportGeometry, WeekLayout,
};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

fn viewport() -> ViewportGeometry {
    ViewportGeometry {
        origin_x: 0.0,
        origin_y: 0.0,
        day_width: 100.0,
        days: 7,
        grid: GridGeometry::default(),
        snap_minutes: 15,
    }
}

/// One-off event on Monday, laid out at 80px per hour from 06:00.
fn setup(start: u16, duration: u16) -> (Schedule, WeekLayout) {
    let end = start + duration;
    let item = CalendarItem::new(
        "ev",
        "Desk",
        ItemKind::Event,
        &format!("{:02}:{:02}", start / 60, start % 60),
        &format!("{:02}:{:02}", end / 60, end % 60),
    )
    .with_anchor(monday());
    let schedule = Schedule {
        items: vec![item],
        ..Default::default()
    };
    let layout = WeekLayout::build(
        &schedule,
        monday(),
        ViewMode::Schedule,
        GridGeometry::default(),
        ColumnRules::default(),
    );
    (schedule, layout)
}

fn top_of(start: u16) -> i32 {
    (start as i32 - 360) * 80 / 60
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn moving_keeps_the_duration(
        start_q in 24_u16..80,
        len_q in 2_u16..12,
        to_x in 0_i32..700,
        to_y in 0_i32..1440,
    ) {
        let (start, duration) = (start_q * 15, len_q * 15);
        let (mut schedule, layout) = setup(start, duration);
        let vp = viewport();
        let mut drag = DragController::new(DragConfig::default());

        let height = duration as i32 * 80 / 60;
        let press = SurfacePoint::new(50, top_of(start) + height / 2);
        let pressed = drag.handle(PointerEvent::Down(press), &layout, &vp);
        let is_press = matches!(pressed, DragOutcome::Pressed { .. });
        prop_assert!(is_press);
        drag.handle(PointerEvent::Move(SurfacePoint::new(to_x, to_y)), &layout, &vp);
        let outcome = drag.handle(PointerEvent::Up(SurfacePoint::new(to_x, to_y)), &layout, &vp);

        match outcome {
            DragOutcome::Committed(change) => {
                prop_assert_eq!(change.end_minutes - change.start_minutes, duration);
                prop_assert_eq!(change.start_minutes % 15, 0);
                schedule.apply(&change).expect("apply");
                let span = schedule.item("ev").unwrap().span().expect("span");
                prop_assert_eq!(span.end - span.start, duration);
            }
            DragOutcome::Rejected { .. } | DragOutcome::Click { .. } => {}
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn resizing_end_above_start_is_refused(
        start_q in 24_u16..80,
        len_q in 2_u16..12,
        to_y in 0_i32..1440,
    ) {
        let (start, duration) = (start_q * 15, len_q * 15);
        let (schedule, layout) = setup(start, duration);
        let vp = viewport();
        let mut drag = DragController::new(DragConfig::default());

        let height = duration as i32 * 80 / 60;
        let bottom = top_of(start) + height - 2;
        let target_y = to_y.min(top_of(start));
        drag.handle(PointerEvent::Down(SurfacePoint::new(50, bottom)), &layout, &vp);
        drag.handle(PointerEvent::Move(SurfacePoint::new(50, target_y)), &layout, &vp);
        let outcome = drag.handle(PointerEvent::Up(SurfacePoint::new(50, target_y)), &layout, &vp);

        let refused = matches!(outcome, DragOutcome::Rejected { .. });
        prop_assert!(refused, "got {:?}", outcome);
        let item = schedule.item("ev").unwrap();
        prop_assert_eq!(item.span().expect("span").start, start);
        prop_assert!(!drag.is_active());
    }
}
