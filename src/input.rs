// filepath: src/input.rs
//! Input translation for mu-canvas
//!
//! Samples the host's input state once per frame and forwards it to the
//! toolkit as discrete events.

use log::{debug, trace, warn};

use crate::config::InputConfig;
use crate::host::{HostInput, Key, MouseButton};

bitflags::bitflags! {
    /// Toolkit mouse buttons. Several may fire in the same frame.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Toolkit keys
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Keys: u8 {
        const SHIFT     = 1 << 0;
        const CTRL      = 1 << 1;
        const ALT       = 1 << 2;
        const BACKSPACE = 1 << 3;
        const RETURN    = 1 << 4;
    }
}

/// Input side of the toolkit context
pub trait InputSink {
    fn input_mouse_move(&mut self, x: i32, y: i32);

    fn input_scroll(&mut self, x: i32, y: i32);

    fn input_mouse_down(&mut self, x: i32, y: i32, buttons: MouseButtons);

    fn input_mouse_up(&mut self, x: i32, y: i32, buttons: MouseButtons);

    fn input_key_down(&mut self, key: Keys);

    fn input_key_up(&mut self, key: Keys);

    fn input_text(&mut self, text: &str);
}

const BUTTON_MAP: [(MouseButton, MouseButtons); 3] = [
    (MouseButton::Left, MouseButtons::LEFT),
    (MouseButton::Middle, MouseButtons::MIDDLE),
    (MouseButton::Right, MouseButtons::RIGHT),
];

const KEY_MAP: [(Keys, &[Key]); 5] = [
    (Keys::CTRL, &[Key::LeftControl, Key::RightControl]),
    (Keys::SHIFT, &[Key::LeftShift, Key::RightShift]),
    (Keys::ALT, &[Key::LeftAlt, Key::RightAlt]),
    (Keys::BACKSPACE, &[Key::Backspace]),
    (Keys::RETURN, &[Key::Enter]),
];

/// Per-frame input forwarder
#[derive(Debug, Clone)]
pub struct InputPusher {
    scroll_multiplier: [f32; 2],
    text_limit: Option<usize>,
    text: String,
}

impl Default for InputPusher {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl InputPusher {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            scroll_multiplier: config.scroll_multiplier,
            text_limit: config.text_limit,
            text: String::new(),
        }
    }

    /// Forward this frame's host input to the toolkit.
    ///
    /// Call once per frame, before the toolkit begins the frame.
    pub fn push_inputs<H, S>(&mut self, host: &mut H, sink: &mut S)
    where
        H: HostInput + ?Sized,
        S: InputSink + ?Sized,
    {
        let (mx, my) = host.mouse_position();
        let (x, y) = (mx as i32, my as i32);
        sink.input_mouse_move(x, y);

        let (wx, wy) = host.mouse_wheel_move();
        let dx = (wx * self.scroll_multiplier[0]) as i32;
        let dy = (wy * self.scroll_multiplier[1]) as i32;
        if dx != 0 || dy != 0 {
            trace!("Scroll ({}, {}) -> ({}, {})", wx, wy, dx, dy);
            sink.input_scroll(dx, dy);
        }

        let pressed = collect_buttons(|b| host.is_mouse_button_pressed(b));
        if !pressed.is_empty() {
            debug!("Mouse down {:?} at ({}, {})", pressed, x, y);
            sink.input_mouse_down(x, y, pressed);
        }

        let released = collect_buttons(|b| host.is_mouse_button_released(b));
        if !released.is_empty() {
            debug!("Mouse up {:?} at ({}, {})", released, x, y);
            sink.input_mouse_up(x, y, released);
        }

        self.collect_text(host);
        if !self.text.is_empty() {
            sink.input_text(&self.text);
        }

        for (key, host_keys) in KEY_MAP {
            if host_keys.iter().any(|&k| host.is_key_pressed(k)) {
                sink.input_key_down(key);
            }
            if host_keys.iter().any(|&k| host.is_key_released(k)) {
                sink.input_key_up(key);
            }
        }
    }

    /// Drain pending characters into the scratch buffer, honoring the limit
    fn collect_text<H: HostInput + ?Sized>(&mut self, host: &mut H) {
        self.text.clear();

        let mut count = 0;
        let mut dropped = 0;
        while let Some(ch) = host.next_char() {
            if ch.is_control() {
                continue;
            }
            if self.text_limit.is_some_and(|limit| count >= limit) {
                dropped += 1;
                continue;
            }
            self.text.push(ch);
            count += 1;
        }

        if dropped > 0 {
            warn!(
                "Dropped {} typed characters over the per-frame limit of {}",
                dropped,
                self.text_limit.unwrap_or_default()
            );
        }
    }
}

fn collect_buttons(mut fired: impl FnMut(MouseButton) -> bool) -> MouseButtons {
    BUTTON_MAP
        .iter()
        .filter(|(host, _)| fired(*host))
        .fold(MouseButtons::empty(), |acc, (_, button)| acc | *button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FrameInput;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Move(i32, i32),
        Scroll(i32, i32),
        Down(i32, i32, MouseButtons),
        Up(i32, i32, MouseButtons),
        KeyDown(Keys),
        KeyUp(Keys),
        Text(String),
    }

    #[derive(Default)]
    struct Sink {
        events: Vec<Event>,
    }

    impl InputSink for Sink {
        fn input_mouse_move(&mut self, x: i32, y: i32) {
            self.events.push(Event::Move(x, y));
        }

        fn input_scroll(&mut self, x: i32, y: i32) {
            self.events.push(Event::Scroll(x, y));
        }

        fn input_mouse_down(&mut self, x: i32, y: i32, buttons: MouseButtons) {
            self.events.push(Event::Down(x, y, buttons));
        }

        fn input_mouse_up(&mut self, x: i32, y: i32, buttons: MouseButtons) {
            self.events.push(Event::Up(x, y, buttons));
        }

        fn input_key_down(&mut self, key: Keys) {
            self.events.push(Event::KeyDown(key));
        }

        fn input_key_up(&mut self, key: Keys) {
            self.events.push(Event::KeyUp(key));
        }

        fn input_text(&mut self, text: &str) {
            self.events.push(Event::Text(text.to_string()));
        }
    }

    fn push(pusher: &mut InputPusher, host: &mut FrameInput) -> Vec<Event> {
        let mut sink = Sink::default();
        pusher.push_inputs(host, &mut sink);
        sink.events
    }

    #[test]
    fn idle_frame_still_reports_position() {
        let mut host = FrameInput::new();
        host.set_mouse_pos(12.7, 40.2);

        let mut pusher = InputPusher::default();
        assert_eq!(push(&mut pusher, &mut host), [Event::Move(12, 40)]);
        assert_eq!(push(&mut pusher, &mut host), [Event::Move(12, 40)]);
    }

    #[test]
    fn wheel_is_scaled_and_zero_is_suppressed() {
        let mut host = FrameInput::new();
        host.add_wheel(0.0, 1.0);

        let mut pusher = InputPusher::default();
        assert_eq!(
            push(&mut pusher, &mut host),
            [Event::Move(0, 0), Event::Scroll(0, -30)]
        );

        host.new_frame();
        assert_eq!(push(&mut pusher, &mut host), [Event::Move(0, 0)]);
    }

    #[test]
    fn wheel_that_scales_to_nothing_is_suppressed() {
        let mut host = FrameInput::new();
        host.add_wheel(0.5, 0.01);

        let mut pusher = InputPusher::default();
        assert_eq!(push(&mut pusher, &mut host), [Event::Move(0, 0)]);

        host.new_frame();
        host.add_wheel(0.0, 0.1);
        assert_eq!(
            push(&mut pusher, &mut host),
            [Event::Move(0, 0), Event::Scroll(0, -3)]
        );
    }

    #[test]
    fn custom_scroll_multiplier() {
        let mut host = FrameInput::new();
        host.add_wheel(2.0, -1.0);

        let mut pusher = InputPusher::new(&InputConfig {
            scroll_multiplier: [5.0, 10.0],
            text_limit: None,
        });
        assert_eq!(
            push(&mut pusher, &mut host),
            [Event::Move(0, 0), Event::Scroll(10, -10)]
        );
    }

    #[test]
    fn buttons_in_one_frame_are_one_event() {
        let mut host = FrameInput::new();
        host.set_mouse_pos(5.0, 6.0);
        host.set_mouse_button(MouseButton::Left, true);
        host.set_mouse_button(MouseButton::Right, true);

        let mut pusher = InputPusher::default();
        assert_eq!(
            push(&mut pusher, &mut host),
            [
                Event::Move(5, 6),
                Event::Down(5, 6, MouseButtons::LEFT | MouseButtons::RIGHT)
            ]
        );
    }

    #[test]
    fn rapid_tap_fires_down_and_up() {
        let mut host = FrameInput::new();
        host.set_mouse_button(MouseButton::Middle, true);
        host.set_mouse_button(MouseButton::Middle, false);

        let mut pusher = InputPusher::default();
        assert_eq!(
            push(&mut pusher, &mut host),
            [
                Event::Move(0, 0),
                Event::Down(0, 0, MouseButtons::MIDDLE),
                Event::Up(0, 0, MouseButtons::MIDDLE)
            ]
        );
    }

    #[test]
    fn typed_characters_are_batched() {
        let mut host = FrameInput::new();
        host.push_char('a');
        host.push_char('b');
        host.push_char('c');

        let mut pusher = InputPusher::default();
        assert_eq!(
            push(&mut pusher, &mut host),
            [Event::Move(0, 0), Event::Text("abc".into())]
        );

        // Nothing carries over into the next frame
        assert_eq!(push(&mut pusher, &mut host), [Event::Move(0, 0)]);
    }

    #[test]
    fn long_bursts_are_not_truncated_without_a_limit() {
        let burst: String = std::iter::repeat('x').take(1000).collect();
        let mut host = FrameInput::new();
        host.push_str(&burst);

        let mut pusher = InputPusher::default();
        assert_eq!(push(&mut pusher, &mut host)[1], Event::Text(burst));
    }

    #[test_log::test]
    fn text_limit_drops_the_overflow() {
        let mut host = FrameInput::new();
        host.push_str("hello\u{8}world");

        let mut pusher = InputPusher::new(&InputConfig {
            text_limit: Some(7),
            ..InputConfig::default()
        });
        assert_eq!(
            push(&mut pusher, &mut host),
            [Event::Move(0, 0), Event::Text("hellowo".into())]
        );
        assert_eq!(host.next_char(), None);
    }

    #[test]
    fn keys_fire_for_either_side_and_in_order() {
        let mut host = FrameInput::new();
        host.set_key(Key::RightControl, true);
        host.set_key(Key::Enter, true);
        host.set_key(Key::LeftShift, true);
        host.set_key(Key::LeftShift, false);

        let mut pusher = InputPusher::default();
        assert_eq!(
            push(&mut pusher, &mut host),
            [
                Event::Move(0, 0),
                Event::KeyDown(Keys::CTRL),
                Event::KeyDown(Keys::SHIFT),
                Event::KeyUp(Keys::SHIFT),
                Event::KeyDown(Keys::RETURN),
            ]
        );

        host.new_frame();
        host.set_key(Key::RightControl, false);
        host.set_key(Key::Enter, false);
        assert_eq!(
            push(&mut pusher, &mut host),
            [
                Event::Move(0, 0),
                Event::KeyUp(Keys::CTRL),
                Event::KeyUp(Keys::RETURN),
            ]
        );
    }

    #[test]
    fn event_order_within_a_frame() {
        let mut host = FrameInput::new();
        host.set_mouse_pos(1.0, 2.0);
        host.add_wheel(0.0, -1.0);
        host.set_mouse_button(MouseButton::Left, true);
        host.push_char('z');
        host.set_key(Key::Backspace, true);

        let mut pusher = InputPusher::default();
        assert_eq!(
            push(&mut pusher, &mut host),
            [
                Event::Move(1, 2),
                Event::Scroll(0, 30),
                Event::Down(1, 2, MouseButtons::LEFT),
                Event::Text("z".into()),
                Event::KeyDown(Keys::BACKSPACE),
            ]
        );
    }
}
