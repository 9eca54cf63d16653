// Module for displaying and editing the palettes of the open collection
use iced::{
    alignment::Vertical,
    mouse,
    widget::{button, canvas, column, container, horizontal_space, row, text, text_input, Column},
    Element, Length, Size,
};
use iced_aw::number_input;

use crate::{
    helpers::{alpha_blend, contrast_color},
    message::Message,
    state::{Color, EditorState, PaletteId},
};

use super::{modal_background_style, Cell, SectionView};

#[derive(Debug)]
struct ColorBox {
    color: Color,
    thickness: f32,
    selected: bool,
    palette_id: PaletteId,
    row: usize,
}

fn to_iced(c: Color) -> iced::Color {
    iced::Color::from_rgb8(c.red, c.green, c.blue)
}

impl canvas::Program<Message> for ColorBox {
    // No internal state
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if cursor.position_in(bounds).is_none() {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => (
                canvas::event::Status::Captured,
                Some(Message::SelectColor {
                    palette_id: self.palette_id,
                    row: self.row,
                }),
            ),
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        // Translucent colors are shown over white.
        let shown = alpha_blend(Color::WHITE, self.color);
        frame.fill_rectangle(iced::Point::ORIGIN, frame.size(), to_iced(shown));

        let label = canvas::Text {
            content: self.color.to_string(),
            position: iced::Point { x: 8.0, y: 5.0 },
            color: to_iced(contrast_color(shown)),
            font: iced::Font::MONOSPACE,
            ..canvas::Text::default()
        };
        frame.fill_text(label);

        if self.selected {
            let thickness = self.thickness;
            let size = Size {
                width: frame.size().width - thickness,
                height: frame.size().height - thickness,
            };
            frame.stroke_rectangle(
                iced::Point {
                    x: thickness / 2.0,
                    y: thickness / 2.0,
                },
                size,
                canvas::Stroke {
                    width: thickness,
                    style: to_iced(contrast_color(shown)).into(),
                    ..Default::default()
                },
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

pub fn section_view(state: &EditorState, section: SectionView) -> Element<Message> {
    let mut col: Column<Message> = Column::new().spacing(2);
    let palette_id = section.palette_id;

    if let (Some(header), Some(id)) = (section.header, palette_id) {
        col = col.push(
            row![
                text(header).size(18),
                horizontal_space(),
                button(text("\u{F4CB}").font(iced_fonts::BOOTSTRAP_FONT))
                    .on_press(Message::RenamePaletteDialogue(id)),
                button(text("\u{F5DE}").font(iced_fonts::BOOTSTRAP_FONT))
                    .style(button::danger)
                    .on_press(Message::DeletePaletteDialogue(id)),
            ]
            .spacing(10)
            .align_y(Vertical::Center),
        );
    }

    for cell in section.cells {
        match cell {
            Cell::Empty(msg) => {
                col = col.push(text(msg));
            }
            Cell::Color { row, color } => {
                let Some(id) = palette_id else {
                    continue;
                };
                col = col.push(
                    canvas(ColorBox {
                        color,
                        thickness: 3.0,
                        selected: state.selected == Some((id, row)),
                        palette_id: id,
                        row,
                    })
                    .width(Length::Fill)
                    .height(28),
                );
            }
        }
    }

    if let (true, Some(id)) = (section.footer, palette_id) {
        col = col.push(
            button(text("\u{F64D}").font(iced_fonts::BOOTSTRAP_FONT))
                .style(button::success)
                .on_press(Message::AddColor(id)),
        );
    }

    container(col).padding(5).into()
}

pub fn color_editor_view(state: &EditorState) -> Element<Message> {
    let c = &state.selected_color;
    let width = 80;
    row![
        text("Red"),
        number_input(&c.red, 0..=255, Message::ChangeRed).width(width),
        iced::widget::Space::with_width(10),
        text("Green"),
        number_input(&c.green, 0..=255, Message::ChangeGreen).width(width),
        iced::widget::Space::with_width(10),
        text("Blue"),
        number_input(&c.blue, 0..=255, Message::ChangeBlue).width(width),
        iced::widget::Space::with_width(10),
        text("Alpha"),
        number_input(&c.alpha, 0..=255, Message::ChangeAlpha).width(width),
    ]
    .spacing(5)
    .align_y(Vertical::Center)
    .into()
}

pub fn rename_palette_view(id: PaletteId, name: &str) -> Element<Message> {
    let rename_msg = Message::RenamePalette {
        id,
        name: name.to_string(),
    };
    container(
        column![
            text("Rename palette"),
            text_input("", name)
                .id("DialogueText")
                .on_input(Message::SetDialogueText)
                .on_submit(rename_msg.clone())
                .padding(5),
            button(text("Rename palette")).on_press(rename_msg),
        ]
        .spacing(10),
    )
    .width(350)
    .padding(25)
    .style(modal_background_style)
    .into()
}

pub fn delete_palette_view(state: &EditorState, id: PaletteId) -> Element<Message> {
    let title = state
        .collection
        .as_ref()
        .and_then(|c| c.section_of(id).map(|s| c.title_of_palette(s)))
        .unwrap_or("");
    container(
        column![
            text(format!("Delete palette \"{}\"?", title)),
            button(text("Delete palette"))
                .style(button::danger)
                .on_press(Message::DeletePalette(id)),
        ]
        .spacing(10),
    )
    .width(350)
    .padding(25)
    .style(modal_background_style)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Point, Rectangle};

    fn click(b: &ColorBox, at: Point) -> (canvas::event::Status, Option<Message>) {
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(100.0, 28.0));
        let event = canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        <ColorBox as canvas::Program<Message>>::update(
            b,
            &mut (),
            event,
            bounds,
            mouse::Cursor::Available(at),
        )
    }

    #[test]
    fn test_left_click_selects_color() {
        let b = ColorBox {
            color: Color::CYAN,
            thickness: 3.0,
            selected: false,
            palette_id: 7,
            row: 2,
        };
        let (status, msg) = click(&b, Point::new(10.0, 10.0));
        assert_eq!(status, canvas::event::Status::Captured);
        assert_eq!(
            msg,
            Some(Message::SelectColor {
                palette_id: 7,
                row: 2
            })
        );

        let (status, msg) = click(&b, Point::new(150.0, 10.0));
        assert_eq!(status, canvas::event::Status::Ignored);
        assert_eq!(msg, None);
    }
}
