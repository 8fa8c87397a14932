//! The demo window: one of every widget, wired together through callbacks.

use papaya_core::{Container, WidgetHandle, WidgetResult};
use papaya_widgets::{
    Button, CheckBox, Heading, ProgressBar, RadioGroup, ScrollBar, Slider, WidgetExt, theme,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Cross-widget updates requested from inside callbacks. Callbacks only see
/// their own widget, so the container applies these once dispatch returns.
#[derive(Debug, Clone, PartialEq)]
enum DemoAction {
    IncrementProgress,
    ProgressChanged(f64),
    CheckedChanged(bool),
    SliderChanged(f64),
}

type ActionQueue = Rc<RefCell<Vec<DemoAction>>>;

pub struct Demo {
    pub heading: WidgetHandle<Heading>,
    pub button: WidgetHandle<Button>,
    pub progress: WidgetHandle<ProgressBar>,
    pub progress_label: WidgetHandle<Heading>,
    pub checkbox: WidgetHandle<CheckBox>,
    pub checkbox_label: WidgetHandle<Heading>,
    pub radio: WidgetHandle<RadioGroup>,
    pub scrollbar: WidgetHandle<ScrollBar>,
    pub slider: WidgetHandle<Slider>,
    pub slider_label: WidgetHandle<Heading>,
    actions: ActionQueue,
}

impl Demo {
    /// Add the demo widgets to `container`, placing the scroll bar and the
    /// slider relative to its size.
    pub fn build(container: &mut Container) -> WidgetResult<Self> {
        let actions: ActionQueue = Rc::new(RefCell::new(Vec::new()));
        let size = container.size();

        let heading = container.add(
            Heading::new("Jenson first to press the drs")
                .with_font_size(16.0)
                .with_tab_index(1)
                .at(20.0, 35.0),
        )?;

        let mut button = Button::new()
            .with_label("Click Me!")
            .with_font_size(14.0)
            .with_size(100.0, 50.0)
            .with_tab_index(2)
            .at(30.0, 100.0);
        let queue = actions.clone();
        button.on_click(move |_, _| {
            log::info!("Button was clicked!");
            queue.borrow_mut().push(DemoAction::IncrementProgress);
        });
        let button = container.add(button)?;

        let mut progress = ProgressBar::new()
            .with_value(0.0)
            .with_size(200.0, 20.0)
            .with_tab_index(3)
            .at(30.0, 170.0);
        let queue = actions.clone();
        progress.on_value_change(move |_, args| {
            log::info!(
                "Progress incremented: {}% -> {}%",
                args.previous_value(),
                args.current_value()
            );
            queue
                .borrow_mut()
                .push(DemoAction::ProgressChanged(args.current_value()));
        });
        let progress = container.add(progress)?;

        let progress_label = container.add(
            Heading::new("Progress: 0%")
                .with_font_size(14.0)
                .with_tab_index(4)
                .at(30.0, 197.0),
        )?;

        let mut checkbox = CheckBox::new()
            .with_label("Accept Terms")
            .with_font_size(14.0)
            .with_tab_index(6)
            .at(30.0, 275.0);
        let queue = actions.clone();
        checkbox.on_checked_change(move |_, args| {
            log::info!(
                "Checkbox state changed: {}",
                if args.is_checked() { "Checked" } else { "Unchecked" }
            );
            queue
                .borrow_mut()
                .push(DemoAction::CheckedChanged(args.is_checked()));
        });
        let checkbox = container.add(checkbox)?;

        let checkbox_label = container.add(
            Heading::new("Checkbox Text: Accept Terms")
                .with_font_size(14.0)
                .with_tab_index(5)
                .at(30.0, 300.0),
        )?;

        let mut radio = RadioGroup::new()
            .with_labels(["DRS Enabled", "DRS Disabled", "Auto"])
            .with_tab_index(7)
            .at(30.0, 340.0);
        radio.on_selection_change(|_, args| {
            log::info!(
                "Selected option: {} (index {})",
                args.selected_label(),
                args.selected_index()
            );
        });
        let radio = container.add(radio)?;

        let mut scrollbar = ScrollBar::new()
            .with_scrollbar_height(200.0)
            .with_tab_index(8)
            .at(size.width - 50.0, 80.0);
        scrollbar.on_thumb_move(|_, args| {
            log::info!(
                "Thumb moved: {:?}, position: {}px",
                args.direction(),
                args.position()
            );
        });
        let scrollbar = container.add(scrollbar)?;

        let mut slider = Slider::new()
            .with_width(200.0)
            .with_value(40.0)
            .with_track_color(theme::ACCENT)
            .with_thumb_color(papaya_core::SerializableColor::hex(0xFFC87C))
            .with_tab_index(9)
            .at(30.0, size.height - 70.0);
        let queue = actions.clone();
        slider.on_value_change(move |_, args| {
            log::info!(
                "Slider value changed: {}% -> {}%",
                args.previous_value(),
                args.current_value()
            );
            queue
                .borrow_mut()
                .push(DemoAction::SliderChanged(args.current_value()));
        });
        let slider_value = slider.value();
        let slider = container.add(slider)?;

        container.add(
            Heading::new("Papaya Slider")
                .with_font_size(14.0)
                .at(30.0, size.height - 90.0),
        )?;
        let slider_label = container.add(
            Heading::new(format!("Slider Value: {}%", slider_value))
                .with_font_size(14.0)
                .at(240.0, size.height - 70.0),
        )?;

        log::info!("Demo built with {} widget(s)", container.widget_count());
        Ok(Self {
            heading,
            button,
            progress,
            progress_label,
            checkbox,
            checkbox_label,
            radio,
            scrollbar,
            slider,
            slider_label,
            actions,
        })
    }

    /// Apply queued cross-widget updates, including any they queue in turn.
    /// Returns how many were applied.
    pub fn apply_pending(&self, container: &mut Container) -> WidgetResult<usize> {
        let mut applied = 0;
        loop {
            let batch = std::mem::take(&mut *self.actions.borrow_mut());
            if batch.is_empty() {
                return Ok(applied);
            }
            for action in batch {
                self.apply(container, action)?;
                applied += 1;
            }
        }
    }

    fn apply(&self, container: &mut Container, action: DemoAction) -> WidgetResult<()> {
        match action {
            DemoAction::IncrementProgress => {
                container.modify(self.progress, |bar| bar.increment())?;
            }
            DemoAction::ProgressChanged(value) => {
                container.modify(self.progress_label, |label| {
                    label.set_text(format!("Progress: {}%", value))
                })?;
            }
            DemoAction::CheckedChanged(checked) => {
                let text = if checked {
                    "Checkbox Text: Accept Terms"
                } else {
                    "Checkbox Text: Terms not accepted"
                };
                container.modify(self.checkbox_label, |label| label.set_text(text))?;
            }
            DemoAction::SliderChanged(value) => {
                container.modify(self.slider_label, |label| {
                    label.set_text(format!("Slider Value: {}%", value))
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use papaya_core::{Instant, Key, KeyEvent, MouseButton, PointerEvent, Widget};

    fn click(container: &mut Container, x: f64, y: f64) {
        let now = Instant::now();
        let position = Point::new(x, y);
        let button = MouseButton::Left;
        container
            .handle_pointer_event(PointerEvent::Move { position }, now)
            .unwrap();
        container
            .handle_pointer_event(PointerEvent::Down { position, button }, now)
            .unwrap();
        container
            .handle_pointer_event(PointerEvent::Up { position, button }, now)
            .unwrap();
    }

    fn demo() -> (Container, Demo) {
        let mut container = Container::new(1280.0, 800.0);
        let demo = Demo::build(&mut container).unwrap();
        (container, demo)
    }

    #[test]
    fn test_build_places_widgets() {
        let (container, demo) = demo();
        assert_eq!(container.widget_count(), 11);
        let scrollbar = container.get(demo.scrollbar).unwrap();
        assert_eq!(scrollbar.core().position(), Point::new(1230.0, 80.0));
        let slider = container.get(demo.slider).unwrap();
        assert_eq!(slider.core().position(), Point::new(30.0, 730.0));
        assert!((slider.value() - 40.0).abs() < f64::EPSILON);
        assert_eq!(
            container.get(demo.slider_label).unwrap().text(),
            "Slider Value: 40%"
        );
        assert_eq!(
            container.get(demo.heading).unwrap().text(),
            "Jenson first to press the drs"
        );
    }

    #[test]
    fn test_button_drives_progress_and_label() {
        let (mut container, demo) = demo();
        click(&mut container, 80.0, 125.0);
        click(&mut container, 80.0, 125.0);
        assert_eq!(demo.apply_pending(&mut container).unwrap(), 4);

        assert!((container.get(demo.progress).unwrap().value() - 20.0).abs() < f64::EPSILON);
        assert_eq!(
            container.get(demo.progress_label).unwrap().text(),
            "Progress: 20%"
        );
        assert_eq!(demo.apply_pending(&mut container).unwrap(), 0);
    }

    #[test]
    fn test_checkbox_updates_label() {
        let (mut container, demo) = demo();
        click(&mut container, 38.0, 283.0);
        demo.apply_pending(&mut container).unwrap();
        assert!(container.get(demo.checkbox).unwrap().is_checked());
        assert_eq!(
            container.get(demo.checkbox_label).unwrap().text(),
            "Checkbox Text: Accept Terms"
        );

        click(&mut container, 38.0, 283.0);
        demo.apply_pending(&mut container).unwrap();
        assert_eq!(
            container.get(demo.checkbox_label).unwrap().text(),
            "Checkbox Text: Terms not accepted"
        );
    }

    #[test]
    fn test_slider_keys_update_label() {
        let (mut container, demo) = demo();
        let now = Instant::now();
        container.focus(Some(demo.slider.id()), now).unwrap();
        container
            .handle_key_event(KeyEvent::Pressed(Key::ArrowRight), now)
            .unwrap();
        demo.apply_pending(&mut container).unwrap();
        assert_eq!(
            container.get(demo.slider_label).unwrap().text(),
            "Slider Value: 41%"
        );
    }

    #[test]
    fn test_tab_starts_at_heading() {
        let (mut container, demo) = demo();
        let now = Instant::now();
        container.handle_key_event(KeyEvent::Pressed(Key::Tab), now).unwrap();
        assert_eq!(container.router().focused(), Some(demo.heading.id()));
        container.handle_key_event(KeyEvent::Pressed(Key::Tab), now).unwrap();
        assert_eq!(container.router().focused(), Some(demo.button.id()));
    }
}
