// filepath: src/main.rs
//! Headless demo: drives a few scripted frames through the adapter and writes
//! the last one to a PNG.

use std::sync::Arc;

use log::{debug, info};
use mu_canvas::{
    Adapter, BackendConfig, Canvas, Color, Command, FrameInput, InputSink, Key, Keys, MouseButton,
    MouseButtons, Rect, TextMetrics, ToolkitContext, Vec2,
};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;

const WINDOW: Rect = Rect::new(40, 40, 320, 200);
const TITLE_HEIGHT: i32 = 24;
const CHECKBOX: Rect = Rect::new(56, 80, 18, 18);
const TREE_NODE: Rect = Rect::new(56, 108, 18, 18);

/// Tiny stand-in for a toolkit: one window with a checkbox, a tree node and
/// a text field, plus a log of the events it received.
#[derive(Default)]
struct DemoUi {
    metrics: Option<Arc<dyn TextMetrics>>,
    mouse: (i32, i32),
    scroll: i32,
    checked: bool,
    expanded: bool,
    text: String,
    log: Vec<String>,
}

impl InputSink for DemoUi {
    fn input_mouse_move(&mut self, x: i32, y: i32) {
        self.mouse = (x, y);
    }

    fn input_scroll(&mut self, x: i32, y: i32) {
        self.scroll += y;
        self.log.push(format!("scroll {x},{y}"));
    }

    fn input_mouse_down(&mut self, x: i32, y: i32, buttons: MouseButtons) {
        self.log.push(format!("down {:?}", buttons));
        if buttons.contains(MouseButtons::LEFT) {
            if CHECKBOX.contains(x, y) {
                self.checked = !self.checked;
            }
            if TREE_NODE.contains(x, y) {
                self.expanded = !self.expanded;
            }
        }
    }

    fn input_mouse_up(&mut self, _x: i32, _y: i32, buttons: MouseButtons) {
        self.log.push(format!("up {:?}", buttons));
    }

    fn input_key_down(&mut self, key: Keys) {
        self.log.push(format!("key down {:?}", key));
        if key == Keys::BACKSPACE {
            self.text.pop();
        }
    }

    fn input_key_up(&mut self, key: Keys) {
        self.log.push(format!("key up {:?}", key));
    }

    fn input_text(&mut self, text: &str) {
        self.log.push(format!("text {:?}", text));
        self.text.push_str(text);
    }
}

impl ToolkitContext for DemoUi {
    fn set_text_metrics(&mut self, metrics: Arc<dyn TextMetrics>) {
        self.metrics = Some(metrics);
    }
}

impl DemoUi {
    fn text_width(&self, text: &str) -> i32 {
        self.metrics
            .as_ref()
            .map_or(0, |m| m.text_width(None, text))
    }

    fn text_height(&self) -> i32 {
        self.metrics.as_ref().map_or(0, |m| m.text_height(None))
    }

    fn label(&self, x: i32, y: i32, text: impl Into<String>) -> Command {
        Command::Text {
            font: None,
            pos: Vec2::new(x, y),
            color: Color::new(230, 230, 230, 255),
            text: text.into(),
        }
    }

    /// Build this frame's command list
    fn frame(&self) -> Vec<Command> {
        let border = Color::new(25, 25, 25, 255);
        let title_bg = Color::new(25, 25, 25, 255);
        let body = Color::new(50, 50, 50, 255);
        let base = Color::new(30, 30, 30, 255);
        let hover = Color::new(40, 40, 40, 255);
        let text_h = self.text_height();

        let mut commands = vec![
            Command::Clip { rect: WINDOW },
            Command::Rect {
                rect: WINDOW,
                color: border,
            },
            Command::Rect {
                rect: Rect::new(WINDOW.x + 1, WINDOW.y + 1, WINDOW.w - 2, WINDOW.h - 2),
                color: body,
            },
            Command::Rect {
                rect: Rect::new(WINDOW.x, WINDOW.y, WINDOW.w, TITLE_HEIGHT),
                color: title_bg,
            },
            self.label(
                WINDOW.x + 6,
                WINDOW.y + (TITLE_HEIGHT - text_h) / 2,
                "Demo Window",
            ),
            Command::Icon {
                id: 1,
                rect: Rect::new(WINDOW.x + WINDOW.w - TITLE_HEIGHT, WINDOW.y, TITLE_HEIGHT, TITLE_HEIGHT),
                color: Color::new(230, 230, 230, 255),
            },
            Command::Rect {
                rect: CHECKBOX,
                color: if CHECKBOX.contains(self.mouse.0, self.mouse.1) {
                    hover
                } else {
                    base
                },
            },
        ];

        if self.checked {
            commands.push(Command::Icon {
                id: 2,
                rect: CHECKBOX,
                color: Color::new(230, 230, 230, 255),
            });
        }
        commands.push(self.label(CHECKBOX.x + CHECKBOX.w + 6, CHECKBOX.y + 4, "Checkbox"));

        commands.push(Command::Icon {
            id: if self.expanded { 4 } else { 3 },
            rect: TREE_NODE,
            color: Color::new(230, 230, 230, 255),
        });
        commands.push(self.label(TREE_NODE.x + TREE_NODE.w + 6, TREE_NODE.y + 4, "Tree node"));

        let field = Rect::new(WINDOW.x + 16, WINDOW.y + 140, WINDOW.w - 32, 22);
        commands.push(Command::Rect {
            rect: field,
            color: base,
        });
        commands.push(Command::Clip { rect: field });
        commands.push(self.label(field.x + 4, field.y + (field.h - text_h) / 2, self.text.clone()));
        let caret_x = field.x + 4 + self.text_width(&self.text) + 1;
        commands.push(Command::Rect {
            rect: Rect::new(caret_x, field.y + 4, 1, field.h - 8),
            color: Color::WHITE,
        });

        commands.push(Command::Clip { rect: WINDOW });
        commands.push(self.label(
            WINDOW.x + 16,
            WINDOW.y + WINDOW.h - 20,
            format!("scroll: {}", self.scroll),
        ));
        commands
    }
}

/// Input for each scripted frame
fn script(frame: usize, input: &mut FrameInput) {
    match frame {
        0 => {
            input.set_mouse_pos(60.0, 85.0);
            input.set_mouse_button(MouseButton::Left, true);
        }
        1 => {
            input.set_mouse_button(MouseButton::Left, false);
            input.set_mouse_pos(60.0, 112.0);
            input.set_mouse_button(MouseButton::Left, true);
            input.set_mouse_button(MouseButton::Left, false);
        }
        2 => {
            input.push_str("hello, canvas!");
            input.add_wheel(0.0, -2.0);
        }
        3 => {
            input.set_key(Key::Backspace, true);
            input.set_key(Key::Backspace, false);
        }
        _ => {}
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting mu-canvas demo");

    let config = BackendConfig::load_from_file().unwrap_or_default();
    info!("Configuration loaded");

    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let mut ui = DemoUi::default();
    let mut adapter = Adapter::new(config);
    adapter.setup(&mut ui, &mut canvas)?;

    let mut input = FrameInput::new();
    for frame in 0..5 {
        script(frame, &mut input);
        adapter.push_inputs(&mut input, &mut ui);
        input.new_frame();

        let commands = ui.frame();
        canvas.clear(Color::new(90, 95, 100, 255));
        let rejected = adapter.render(&mut canvas, &commands)?;
        debug!("Frame {}: {} commands, {} rejected", frame, commands.len(), rejected);
    }

    for line in &ui.log {
        info!("toolkit received: {}", line);
    }

    let out = std::env::var("MU_CANVAS_OUT").unwrap_or_else(|_| "frame.png".to_string());
    canvas.to_image().save(&out)?;
    info!("Wrote {}", out);
    Ok(())
}
