use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::Category;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.budgets.is_empty() {
        render_empty(f, area, app);
        return;
    }

    let current_bucket = app.rollup.current();

    let items: Vec<ListItem> = app
        .budgets
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, budget)| {
            let cat_name = Category::find_by_id(&app.categories, budget.category_id)
                .map(|c| c.name.as_str())
                .unwrap_or("Unknown");

            // Actual spending comes from the reconciled current bucket.
            let spent = current_bucket
                .categories
                .iter()
                .find(|c| c.name == cat_name)
                .map(|c| c.transaction_amount)
                .unwrap_or(Decimal::ZERO);

            let ratio = if budget.amount > Decimal::ZERO {
                (spent / budget.amount).to_f64().unwrap_or(0.0).min(1.0)
            } else {
                0.0
            };

            let color = if ratio > 0.9 {
                theme::RED
            } else if ratio > 0.7 {
                theme::YELLOW
            } else {
                theme::GREEN
            };

            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let bar = create_progress_bar(ratio, 20);
            let display_name = truncate(cat_name, 17);

            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(theme::category_color(cat_name))),
                Span::styled(format!("{display_name:<18}"), style),
                Span::styled(
                    format!("{}/{} ", format_amount(spent), format_amount(budget.amount)),
                    Style::default().fg(color),
                ),
                Span::styled(bar, Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}%", ratio * 100.0),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    if budget.description.is_empty() {
                        String::new()
                    } else {
                        format!("  {}", truncate(&budget.description, 24))
                    },
                    theme::dim_style(),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Budgets for {} ", app.current_month()),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No budgets set for {}", app.current_month()),
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Use :budget <category> <amount> to set a spending limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Budgets ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(msg, area);
}

fn create_progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
