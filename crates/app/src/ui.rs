use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use orgchart_core::dial_codes::format_phone_number;
use orgchart_core::{DepthLimit, EmployeeId};

use crate::state::AppState;

const CARD_SIZE: Vec2 = Vec2::new(220.0, 44.0);
const ROW_HEIGHT: f32 = 56.0;
const INDENT: f32 = 48.0;
const TOGGLE_SIZE: f32 = 18.0;

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    app.set_window_width(ctx.screen_rect().width());
    if app.poll_nav() | app.poll_dial_codes() {
        ctx.request_repaint();
    }
    if app.dial_rx.is_some() {
        ctx.request_repaint_after(std::time::Duration::from_millis(200));
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::SidePanel::left("nav")
        .resizable(false)
        .exact_width(app.nav.effective_width())
        .show(ctx, |ui| nav_panel(ui, app));

    egui::SidePanel::right("details")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| details_panel(ui, app));

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(status) = &app.status {
            ui.colored_label(Color32::from_rgb(200, 120, 0), status);
        }
        chart_canvas(ui, app);
    });
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("Open…").clicked() {
            if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
                app.open_directory(path);
            }
        }
        if ui.add_enabled(app.source.is_some(), egui::Button::new("Reload")).clicked() {
            app.reload();
        }
        ui.separator();

        ui.label("Depth:");
        let mut depth = app.chart.state().depth_limit();
        egui::ComboBox::from_id_source("depth")
            .selected_text(depth.to_string())
            .show_ui(ui, |ui| {
                for n in 1..=5 {
                    ui.selectable_value(&mut depth, DepthLimit::Limited(n), n.to_string());
                }
                ui.selectable_value(&mut depth, DepthLimit::Unlimited, "All");
            });
        if depth != app.chart.state().depth_limit() {
            app.chart.set_depth(depth);
        }

        if ui.add_enabled(app.chart.selected().is_some(), egui::Button::new("Go up")).clicked() {
            app.chart.go_up();
        }
        ui.separator();

        ui.label("Find:");
        let response = ui.text_edit_singleline(&mut app.search);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Locate").clicked() || submitted {
            app.locate();
        }
        ui.separator();

        ui.menu_button("Export", |ui| {
            if ui.button("PDF…").clicked() {
                ui.close_menu();
                if let Some(path) = rfd::FileDialog::new().set_file_name("org-chart.pdf").save_file() {
                    if let Err(e) = orgchart_core::export::to_pdf(app.chart.visible(), &path) {
                        app.status = Some(e.to_string());
                    }
                }
            }
            if ui.button("CSV…").clicked() {
                ui.close_menu();
                if let Some(path) = rfd::FileDialog::new().set_file_name("org-chart.csv").save_file() {
                    let result = std::fs::File::create(&path)
                        .map_err(orgchart_core::ExportError::from)
                        .and_then(|file| orgchart_core::export::to_csv(app.chart.visible(), file));
                    if let Err(e) = result {
                        app.status = Some(e.to_string());
                    }
                }
            }
        });
    });
}

fn nav_panel(ui: &mut Ui, app: &mut AppState) {
    let label = if app.nav.expanded { "« Collapse" } else { "»" };
    if ui.button(label).clicked() {
        app.toggle_nav();
    }
    ui.separator();
    if app.nav.expanded && !app.nav.tablet {
        ui.heading("People");
        ui.label(format!("{} employees", app.chart.directory().len()));
        if let Some(path) = &app.source {
            ui.small(path.display().to_string());
        }
    } else {
        ui.label("👥");
    }
}

fn details_panel(ui: &mut Ui, app: &mut AppState) {
    ui.heading("Employee");
    ui.separator();
    let Some(employee) = app.chart.selected_employee().cloned() else {
        ui.label("Click someone in the chart.");
        return;
    };

    ui.strong(&employee.name);
    ui.label(&employee.department);
    ui.label(format!("{} · {}", employee.location, employee.division));
    if !employee.email.is_empty() && ui.link(&employee.email).clicked() {
        if let Err(e) = open::that(format!("mailto:{}", employee.email)) {
            tracing::warn!(error = %e, "could not open mail client");
        }
    }
    ui.label(&employee.phone);
    if let Some(manager) = employee.reports_to.and_then(|m| app.chart.directory().get(m)) {
        ui.label(format!("Reports to {}", manager.name));
    }
    ui.label(format!("{} direct report(s)", employee.direct_reports));

    ui.add_space(12.0);
    ui.heading("Phone");
    if app.dial_codes.is_empty() {
        return;
    }
    let idx = app.phone_country.min(app.dial_codes.len() - 1);
    let selected = &app.dial_codes[idx];
    egui::ComboBox::from_id_source("dial_code")
        .selected_text(format!("{} {}", selected.flag, selected.dial_code))
        .show_ui(ui, |ui| {
            for (i, option) in app.dial_codes.iter().enumerate() {
                let text = format!("{} {} {}", option.flag, option.country, option.dial_code);
                ui.selectable_value(&mut app.phone_country, i, text);
            }
        });
    let option = &app.dial_codes[app.phone_country.min(app.dial_codes.len() - 1)];
    if ui
        .add(egui::TextEdit::singleline(&mut app.phone_input).hint_text(&option.format_hint))
        .changed()
    {
        app.phone_input = format_phone_number(&app.phone_input, option);
    }
}

fn chart_canvas(ui: &mut Ui, app: &mut AppState) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let area = response.rect;
    app.chart.center_on_mount(area.width());

    if response.dragged() {
        let delta = response.drag_delta();
        app.chart.pan_by(delta.x, delta.y);
    }
    if response.hovered() {
        let (scroll, zoom_modifier) = ui.input(|i| (i.raw_scroll_delta.y, i.modifiers.command));
        if zoom_modifier && scroll != 0.0 {
            if scroll > 0.0 {
                app.chart.zoom_in();
            } else {
                app.chart.zoom_out();
            }
        }
    }

    let zoom = app.chart.viewport().zoom();
    let (pan_x, pan_y) = app.chart.viewport().pan();
    let origin = area.min + Vec2::new(pan_x, pan_y);
    let selected = app.chart.selected();

    // (node rect, toggle rect, id)
    let mut hits: Vec<(Rect, Option<Rect>, EmployeeId)> = Vec::new();
    let mut parents: Vec<Pos2> = Vec::new();
    let text_color = ui.visuals().text_color();

    for (row, node) in app.chart.visible().enumerate() {
        let depth = node.depth as usize;
        let min = origin + Vec2::new(INDENT * depth as f32, ROW_HEIGHT * row as f32) * zoom;
        let rect = Rect::from_min_size(min, CARD_SIZE * zoom);

        parents.truncate(depth);
        if let Some(parent) = parents.last() {
            let elbow = Pos2::new(parent.x, rect.center().y);
            let stroke = Stroke::new(1.0, Color32::GRAY);
            painter.line_segment([*parent, elbow], stroke);
            painter.line_segment([elbow, Pos2::new(rect.min.x, rect.center().y)], stroke);
        }
        parents.push(Pos2::new(rect.min.x + 12.0 * zoom, rect.max.y));

        if !area.expand(CARD_SIZE.x * zoom).intersects(rect) {
            continue;
        }

        let is_selected = selected == Some(node.id());
        let fill = if is_selected {
            Color32::from_rgb(215, 236, 212)
        } else {
            ui.visuals().extreme_bg_color
        };
        let outline = if is_selected { Color32::from_rgb(60, 140, 60) } else { Color32::GRAY };
        painter.rect(rect, 6.0 * zoom, fill, Stroke::new(1.0, outline));
        painter.text(
            rect.left_center() + Vec2::new(10.0 * zoom, -7.0 * zoom),
            Align2::LEFT_CENTER,
            &node.employee.name,
            FontId::proportional(14.0 * zoom),
            text_color,
        );
        painter.text(
            rect.left_center() + Vec2::new(10.0 * zoom, 9.0 * zoom),
            Align2::LEFT_CENTER,
            &node.employee.department,
            FontId::proportional(11.0 * zoom),
            Color32::GRAY,
        );

        let toggle = node.employee.has_reports().then(|| {
            let size = Vec2::splat(TOGGLE_SIZE * zoom);
            let toggle = Rect::from_center_size(rect.right_center() - Vec2::new(size.x, 0.0), size);
            let symbol = if node.has_hidden_children {
                format!("+{}", node.employee.direct_reports)
            } else {
                "−".to_string()
            };
            painter.rect_stroke(toggle, 3.0 * zoom, Stroke::new(1.0, Color32::GRAY));
            painter.text(
                toggle.center(),
                Align2::CENTER_CENTER,
                symbol,
                FontId::monospace(10.0 * zoom),
                text_color,
            );
            toggle
        });
        hits.push((rect, toggle, node.id()));
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let hit = hits.iter().find(|(rect, _, _)| rect.contains(pos));
            match hit {
                Some((_, Some(toggle), id)) if toggle.contains(pos) => app.chart.toggle_expand(*id),
                Some((_, _, id)) => app.select(*id),
                None => {}
            }
        }
    }

    zoom_controls(ui, app, area);
}

fn zoom_controls(ui: &mut Ui, app: &mut AppState, area: Rect) {
    let controls = Rect::from_min_size(area.right_bottom() - Vec2::new(140.0, 44.0), Vec2::new(130.0, 34.0));
    ui.allocate_ui_at_rect(controls, |ui| {
        ui.horizontal(|ui| {
            if ui.button("−").clicked() {
                app.chart.zoom_out();
            }
            ui.label(format!("{:.0}%", app.chart.viewport().zoom() * 100.0));
            if ui.button("+").clicked() {
                app.chart.zoom_in();
            }
        });
    });
}
