use tagview::{
    Canvas, Config, DrawOp, ELLIPSIS, IntRect, MeasureSpec, MonospaceMeasurer, RecordingCanvas,
    TagConfig, TagView, TextMeasure, Theme, fit_text, render_tag, Tag,
};

fn measurer() -> MonospaceMeasurer {
    // 60px per code point at the default 64px text size.
    MonospaceMeasurer::new(0.9375)
}

fn view() -> TagView<MonospaceMeasurer> {
    TagView::new(TagConfig::default(), Theme::leveled(), measurer())
}

fn text_op(canvas: &RecordingCanvas) -> String {
    canvas
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .expect("draw pass emits a text op")
}

#[test]
fn draw_is_idempotent() {
    let mut view = view();
    view.set_tag("a fairly long tag label", 1);
    view.layout(IntRect::from_size(900, 600));

    let mut first = RecordingCanvas::new();
    let mut second = RecordingCanvas::new();
    let pass_a = view.draw(&mut first);
    let pass_b = view.draw(&mut second);

    assert_eq!(pass_a, pass_b);
    assert_eq!(first.ops(), second.ops());
}

#[test]
fn body_height_never_exceeds_available_space() {
    for height in [400, 420, 450, 500, 523, 524, 800] {
        for text in ["", "a", "alert", "a much longer label than fits"] {
            let mut view = view();
            view.set_tag(text, 0);
            view.layout(IntRect::from_size(1000, height));
            let pass = view.plan();
            let available = (height as f32 - 400.0).max(0.0);
            assert!(
                pass.tag_rect.height() <= available,
                "height {height}, text {text:?}: {}",
                pass.tag_rect.height()
            );
        }
    }
}

#[test]
fn pivot_maps_corners_to_opposites() {
    for width in [600, 700, 913, 2000] {
        let mut view = view();
        view.set_tag("severity", 2);
        view.layout(IntRect::from_size(width, 777));
        let pass = view.plan();
        let rect = pass.text_rect;
        assert_eq!(rect.top_left().rotate_half_turn(pass.pivot), rect.bottom_right());
        assert_eq!(rect.bottom_right().rotate_half_turn(pass.pivot), rect.top_left());
    }
}

#[test]
fn fitted_text_is_maximal_across_widths() {
    let measurer = measurer();
    let text = "warning: disk";
    for width in (500..1500).step_by(37) {
        let mut view = view();
        view.set_tag(text, 2);
        view.layout(IntRect::from_size(width, 800));
        let pass = view.plan();
        let fitted = &pass.text;
        assert!(fitted.advance <= pass.max_text_width || fitted.text.is_empty());
        if fitted.truncated && !fitted.text.is_empty() {
            let prefix = fitted.text.trim_end_matches(ELLIPSIS);
            let longer: String = text.chars().take(prefix.chars().count() + 1).collect();
            let longer = format!("{longer}{ELLIPSIS}");
            assert!(measurer.advance_width(&longer, 64.0) > pass.max_text_width);
        }
        assert_eq!(pass.tag_rect.width(), 200.0 + fitted.advance);
    }
}

#[test]
fn alert_examples_hold() {
    let wide = fit_text("alert", &measurer(), 64.0, 2000.0 - 400.0 - 200.0);
    assert_eq!(wide.text, "alert");
    assert_eq!(200.0 + wide.advance, 500.0);

    let narrow = fit_text("alert", &measurer(), 64.0, 700.0 - 400.0 - 200.0);
    assert!(narrow.truncated);
    assert!(narrow.text.ends_with(ELLIPSIS));
    assert!(narrow.advance <= 100.0);
}

#[test]
fn set_tag_then_draw_uses_previous_bounds() {
    let mut view = view();
    view.set_tag("alert", 2);
    view.layout(IntRect::from_size(2000, 800));
    let bounds = view.bounds();

    view.set_tag("x", 5);
    let mut canvas = RecordingCanvas::new();
    let pass = view.draw(&mut canvas);

    assert_eq!(pass.bounds, bounds);
    assert_eq!(pass.text.text, "x");
    assert_eq!(pass.level, 5);
    assert_eq!(text_op(&canvas), "x");
    match &canvas.ops()[0] {
        DrawOp::Appearance { name, level, .. } => {
            assert_eq!(name, "alert");
            assert_eq!(*level, 5);
        }
        other => panic!("expected background first, got {other:?}"),
    }
}

#[test]
fn measure_before_tag_fails_but_draw_succeeds() {
    let mut view = view();
    assert!(view
        .measure(MeasureSpec::AtMost(100), MeasureSpec::AtMost(100))
        .is_err());
    view.layout(IntRect::from_size(1000, 600));
    let mut canvas = RecordingCanvas::new();
    let pass = view.draw(&mut canvas);
    assert_eq!(text_op(&canvas), "");
    assert_eq!(pass.text.advance, 0.0);
}

#[test]
fn degenerate_bounds_still_draw() {
    let mut view = view();
    view.set_tag("alert", 0);
    view.layout(IntRect::from_size(10, 10));
    let mut canvas = RecordingCanvas::new();
    let pass = view.draw(&mut canvas);
    assert_eq!(pass.text.text, "");
    assert_eq!(pass.tag_rect.height(), 0.0);
    assert_eq!(canvas.save_depth(), 0);
}

#[test]
fn rotation_is_scoped_to_text() {
    struct Depth {
        depth: usize,
        rotated_text: bool,
    }
    impl Canvas for Depth {
        fn save(&mut self) {
            self.depth += 1;
        }
        fn restore(&mut self) {
            self.depth -= 1;
        }
        fn clip_rect(&mut self, _rect: tagview::Rect) {
            assert!(self.depth > 0, "clip outside a save leaks");
        }
        fn rotate(&mut self, degrees: f32, _pivot: tagview::Point) {
            assert_eq!(degrees, 180.0);
            assert!(self.depth > 0, "rotation outside a save leaks");
        }
        fn draw_appearance(&mut self, _appearance: &tagview::Appearance, _bounds: IntRect, _level: u32) {
            assert_eq!(self.depth, 0);
        }
        fn draw_text(&mut self, _text: &str, _origin: tagview::Point, _style: &tagview::TextStyle) {
            self.rotated_text = self.depth > 0;
        }
    }

    let mut view = view();
    view.set_tag("alert", 1);
    view.layout(IntRect::from_size(1200, 800));
    let mut canvas = Depth {
        depth: 0,
        rotated_text: false,
    };
    view.draw(&mut canvas);
    assert_eq!(canvas.depth, 0);
    assert!(canvas.rotated_text);
}

#[test]
fn render_tag_produces_svg() {
    let rendered = render_tag(&Tag::new("ok", 1), &Config::default(), measurer()).unwrap();
    assert!(rendered.svg.contains("<svg"));
    assert!(rendered.svg.contains("</svg>"));
    assert!(rendered.svg.contains(">ok</text>"));
}
