use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Budget vs spent chart
            Constraint::Length(9), // Breakdown + recent transactions
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_budget_chart(f, chunks[1], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_breakdown(f, bottom[0], app);
    render_recent(f, bottom[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let current = app.rollup.current();
    let budgeted = current.total_budgeted();
    let spent = current.total_spent();
    let remaining = budgeted - spent;

    render_card(
        f,
        cards[0],
        "Budgeted",
        budgeted,
        theme::ACCENT,
        Some(format!("{} categories", current.categories.len())),
    );
    render_card(
        f,
        cards[1],
        "Spent",
        spent,
        if spent > budgeted {
            theme::RED
        } else {
            theme::GREEN
        },
        None,
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        remaining,
        if remaining >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        None,
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub_text, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_budget_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Budget vs Spending (6 months) ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let has_data = app
        .rollup
        .months
        .iter()
        .any(|bucket| !bucket.categories.is_empty());
    if !has_data {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No data yet. Add a transaction with :add or set a budget with :budget",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3);

    // Oldest month on the left, current month on the right.
    for bucket in app.rollup.months.iter().rev() {
        let budgeted = bucket.total_budgeted();
        let spent = bucket.total_spent();
        let spent_color = if spent > budgeted {
            theme::RED
        } else {
            theme::GREEN
        };
        let bars = [
            Bar::default()
                .value(budgeted.to_u64().unwrap_or(0))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
            Bar::default()
                .value(spent.to_u64().unwrap_or(0))
                .style(Style::default().fg(spent_color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(spent_color)
                        .add_modifier(Modifier::BOLD),
                ),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(Span::styled(
                    bucket.month.short_name(),
                    theme::dim_style(),
                )))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let current = app.rollup.current();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {} by Category ", current.month),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if current.categories.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing recorded this month",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = current
        .categories
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|cat| {
            let over = cat.budget_amount > Decimal::ZERO
                && cat.transaction_amount > cat.budget_amount;
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(theme::category_color(&cat.name))),
                Span::styled(format!("{:<16}", truncate(&cat.name, 15)), theme::normal_style()),
                Span::styled(
                    format!(
                        "{} / {}",
                        format_amount(cat.transaction_amount),
                        format_amount(cat.budget_amount)
                    ),
                    if over {
                        Style::default().fg(theme::RED)
                    } else {
                        theme::dim_style()
                    },
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Recent Transactions ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.recent.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .recent
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|txn| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", txn.date), theme::dim_style()),
                Span::styled(
                    format!("{:<22}", truncate(&txn.description, 21)),
                    theme::normal_style(),
                ),
                Span::styled(format_amount(txn.amount), Style::default().fg(theme::RED)),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
