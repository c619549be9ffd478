//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No network or file I/O happens here.

pub mod cards;
pub mod form;
pub mod layout;
pub mod popup;
pub mod quiz;
pub mod spinner;
pub mod theme;

use ratatui::{
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::cycle::WAITING_MESSAGE;
use crate::app::state::{ActiveView, AppState, Focus, MessageKind};
use crate::core::mode::Mode;

use self::cards::DeckWidget;
use self::form::{FormWidget, TabsBar};
use self::layout::AppLayout;
use self::popup::HelpPopup;
use self::quiz::QuizWidget;
use self::spinner::BusyIndicator;
use self::theme::Theme;

/// Draw one full frame from `state`.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let layout = AppLayout::from_area(frame.area());

    frame.render_widget(TabsBar { mode: state.mode }, layout.tabs_area);
    let generating = state
        .message
        .as_ref()
        .is_some_and(|m| m.text == WAITING_MESSAGE);
    frame.render_widget(
        BusyIndicator {
            visible: state.busy(),
            tick: state.tick,
            label: if generating { "generating" } else { "working" },
        },
        layout.tabs_area,
    );

    let button_label = state.generate_label();
    frame.render_widget(
        FormWidget {
            topic: &state.topic,
            count: &state.count,
            difficulty: &state.difficulty,
            button_label: &button_label,
            focus: state.focus,
        },
        layout.form_area,
    );

    if let Some(msg) = &state.message {
        let style = match msg.kind {
            MessageKind::Info => Theme::info_style(),
            MessageKind::Error => Theme::error_style(),
        };
        frame.render_widget(
            Paragraph::new(format!(" {}", msg.text)).style(style),
            layout.message_area,
        );
    }

    let focused = state.focus == Focus::Content;
    let title = match state.mode {
        Mode::Flashcard => format!(" Flashcards ({}) ", state.deck.len()),
        Mode::Mcq => match state.quiz.last_score {
            Some(score) => format!(" Quiz ({}) · {score} ", state.quiz.len()),
            None => format!(" Quiz ({}) ", state.quiz.len()),
        },
    };
    let content_block = Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::card_border_style(true)
        } else {
            Theme::border_style()
        });
    frame.render_widget(content_block, layout.content_area);

    let inner = layout.content_inner();
    match state.mode {
        Mode::Flashcard => frame.render_widget(
            DeckWidget {
                deck: &state.deck,
                focused,
            },
            inner,
        ),
        Mode::Mcq => frame.render_widget(
            QuizWidget {
                quiz: &state.quiz,
                focused,
            },
            inner,
        ),
    }

    let hint = state.config.status_bar_hint();
    frame.render_widget(
        Paragraph::new(format!(" {hint}")).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.active_view == ActiveView::Help {
        frame.render_widget(HelpPopup { config: &state.config }, frame.area());
    }
}
