//! Keyboard input dispatch: overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    if app.overlay == Overlay::ErrorHistory {
        handle_error_overlay(app, key);
        return;
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.shutdown();
            return;
        }
        KeyCode::Char('E') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(panel) = c.to_digit(10).and_then(|d| Panel::from_index(d as usize - 1)) {
                app.set_panel(panel);
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.set_panel(app.active_panel.prev());
            } else {
                app.set_panel(app.active_panel.next());
            }
            return;
        }
        KeyCode::BackTab => {
            app.set_panel(app.active_panel.prev());
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Summary => handle_summary_key(app, key),
        Panel::Chart => handle_chart_key(app, key),
        Panel::Help => {}
        panel if panel.is_table() => handle_table_key(app, key),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('E') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_summary_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_run(1),
        KeyCode::Char('k') | KeyCode::Up => app.select_run(-1),
        KeyCode::Enter => app.load_selected_run(),
        KeyCode::Char('r') => app.reload_backtest(),
        _ => {}
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.with_active_table(|t| {
            t.move_column(-1);
            Ok(())
        }),
        KeyCode::Char('l') | KeyCode::Right => app.with_active_table(|t| {
            t.move_column(1);
            Ok(())
        }),
        KeyCode::Char('s') | KeyCode::Enter => app.with_active_table(|t| t.sort_selected()),
        KeyCode::Char('f') => app.with_active_table(|t| t.cycle_filter()),
        KeyCode::Char('n') | KeyCode::PageDown => app.with_active_table(|t| {
            t.next_page();
            Ok(())
        }),
        KeyCode::Char('p') | KeyCode::PageUp => app.with_active_table(|t| {
            t.prev_page();
            Ok(())
        }),
        KeyCode::Char('x') => app.export_active_table(),
        KeyCode::Char('r') => app.reload_backtest(),
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(']') => app.chart_step_symbol(1),
        KeyCode::Char('[') => app.chart_step_symbol(-1),
        KeyCode::Char('e') => app.chart_cycle_exchange(),
        KeyCode::Char('t') => app.chart_cycle_timeframe(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.chart_adjust_ma(1),
        KeyCode::Char('-') => app.chart_adjust_ma(-1),
        KeyCode::Char('>') | KeyCode::Char('.') => app.chart_adjust_osc(1),
        KeyCode::Char('<') | KeyCode::Char(',') => app.chart_adjust_osc(-1),
        KeyCode::Char('r') => app.chart_refresh(),
        KeyCode::Char('a') => app.chart_toggle_auto_refresh(),
        _ => {}
    }
}
