use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Categories ({}) ", app.categories.len()),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :category <name>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, cat)| {
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(theme::category_color(&cat.name))),
                Span::styled(cat.name.clone(), style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
