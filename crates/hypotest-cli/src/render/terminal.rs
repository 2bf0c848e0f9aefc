use std::io::{self, IsTerminal as _};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use hypotest_analysis::figure::{Figure, RenderError, Renderer};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use super::widgets::PanelWidget;

/// Shows each figure full-screen until the user presses `q` or `Esc`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, figure: &Figure) -> Result<(), RenderError> {
        if !io::stdout().is_terminal() {
            return Err(RenderError::NoTerminal);
        }
        let mut terminal = ratatui::try_init()?;
        let result = FigureView::new(figure).run(&mut terminal);
        ratatui::try_restore()?;
        result
    }
}

#[derive(Debug)]
struct FigureView<'a> {
    figure: &'a Figure,
    exiting: bool,
}

impl<'a> FigureView<'a> {
    fn new(figure: &'a Figure) -> Self {
        Self {
            figure,
            exiting: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<(), RenderError> {
        while !self.exiting {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let title = self
            .figure
            .title
            .lines()
            .map(|l| Line::from(l.to_owned()))
            .collect::<Vec<_>>();
        let title_height = u16::try_from(title.len()).unwrap_or(u16::MAX);

        let [title_area, body_area, help_area] = Layout::vertical([
            Constraint::Length(title_height),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(title)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD)),
            title_area,
        );

        let panel_areas = Layout::vertical(self.figure.panels.iter().map(|_| Constraint::Fill(1)))
            .split(body_area);
        for (panel, area) in self.figure.panels.iter().zip(panel_areas.iter()) {
            frame.render_widget(PanelWidget { panel }, *area);
        }

        frame.render_widget(
            Paragraph::new("q/Esc: close").style(Style::default().add_modifier(Modifier::DIM)),
            help_area,
        );
    }

    fn handle_events(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.exiting = true;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
