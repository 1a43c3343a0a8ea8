//! Scissor conversion laws and frame sampling through the public API.

use imbridge_core::*;
use proptest::prelude::*;

proptest! {
    /// The scissor is offset by the display origin, scaled, and measured from
    /// the bottom of the display.
    #[test]
    fn scissor_flip_law(
        pos_x in -500.0f32..500.0,
        pos_y in -500.0f32..500.0,
        rel_x in 0.0f32..1000.0,
        rel_y in 0.0f32..1000.0,
        w in 0.0f32..1000.0,
        h in 0.0f32..1000.0,
        display_h in 1.0f32..2000.0,
        scale in prop::sample::select(vec![1.0f32, 1.5, 2.0, 3.0]),
    ) {
        let display_pos = Vec2::new(pos_x, pos_y);
        let clip = ClipRect::from_pos_size(display_pos + Vec2::new(rel_x, rel_y), Vec2::new(w, h));
        let s = ScissorRect::from_clip(
            clip,
            display_pos,
            Vec2::new(1000.0, display_h),
            Vec2::splat(scale),
        );

        #[allow(clippy::cast_possible_truncation)]
        let expect = |v: f32| (v * scale) as i32;
        // Float error from the offset round-trip can move a value across an integer boundary.
        prop_assert!((s.x - expect(rel_x)).abs() <= 1);
        prop_assert!((s.width - expect(w)).abs() <= 1);
        prop_assert!((s.height - expect(h)).abs() <= 1);
        prop_assert!((s.y - expect(display_h - (rel_y + h))).abs() <= 1);
    }

    /// Flipping twice around the display height returns the original top edge.
    #[test]
    fn scissor_flip_is_involutive(
        y in 0.0f32..500.0,
        h in 0.0f32..500.0,
    ) {
        let display = Vec2::new(800.0, 1000.0);
        let first = ScissorRect::from_clip(
            ClipRect::from_pos_size(Vec2::new(0.0, y), Vec2::new(10.0, h)),
            Vec2::ZERO,
            display,
            Vec2::ONE,
        );
        #[allow(clippy::cast_precision_loss)]
        let flipped_top = first.y as f32;
        let second = ScissorRect::from_clip(
            ClipRect::from_pos_size(Vec2::new(0.0, flipped_top), Vec2::new(10.0, h)),
            Vec2::ZERO,
            display,
            Vec2::ONE,
        );
        #[allow(clippy::cast_possible_truncation)]
        let original = y as i32;
        prop_assert!((second.y - original).abs() <= 2);
    }
}

#[test]
fn test_frame_capture_orders_keys() {
    let map = KeyMap::new();
    let mut input = InputState::new(Vec2::new(640.0, 480.0));
    input.key(HostKey::A, true);
    input.key(HostKey::VolumeUp, true);
    input.key(HostKey::Enter, true);
    input.key(HostKey::A, false);
    input.key(HostKey::LeftControl, true);
    input.char_typed('a');
    input.mouse_moved(Vec2::new(12.0, 34.0));
    input.mouse_button(HostMouseButton::Forward, true);

    let frame = FrameInput::capture(&mut input, &map);

    assert_eq!(
        frame.keys,
        vec![
            (GuiKey::A, true),
            (GuiKey::Enter, true),
            (GuiKey::LeftCtrl, true),
            (GuiKey::A, false),
        ]
    );
    assert_eq!(frame.text, vec!['a']);
    assert!(frame.modifiers.ctrl);
    assert!(!frame.modifiers.shift);
    assert_eq!(frame.mouse_position, Vec2::new(12.0, 34.0));
    // Forward is the fourth forwarded button.
    assert!(frame.buttons[3].pressed);
    assert!(!frame.buttons[0].pressed);

    // queues were drained
    assert_eq!(input.next_key_pressed(), None);
    assert_eq!(input.next_char_pressed(), None);
}
