use eframe::egui::{self, Align2, Color32, FontId, Rect, ScrollArea, Sense, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::color::DivergingScale;
use crate::data::plots::{CorrelationSpec, HistogramSpec, ScatterSpec};
use crate::state::{LoadedSession, SelectionSlot, Session, SessionEvent};

// ---------------------------------------------------------------------------
// Plot panel (right side)
// ---------------------------------------------------------------------------

pub fn plot_panel(
    ui: &mut Ui,
    session: &Session,
    scale: &DivergingScale,
    events: &mut Vec<SessionEvent>,
) {
    let Some(loaded) = session.loaded() else {
        ui.label("Plots appear once a dataset is loaded.");
        return;
    };
    let numeric = loaded.working.numeric_column_names();

    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.heading("Histogram");
        column_combo(ui, loaded, &numeric, SelectionSlot::Histogram, "Histogram Column", events);
        match &loaded.views.histogram {
            Some(spec) => histogram_plot(ui, spec),
            None => {
                ui.label("Select a numeric column.");
            }
        }

        ui.add_space(10.0);
        ui.heading("Scatter Plot");
        ui.horizontal(|ui: &mut Ui| {
            column_combo(ui, loaded, &numeric, SelectionSlot::ScatterX, "X Axis", events);
            column_combo(ui, loaded, &numeric, SelectionSlot::ScatterY, "Y Axis", events);
        });
        match &loaded.views.scatter {
            Some(spec) if spec.is_renderable() => scatter_plot(ui, spec),
            Some(_) => {
                ui.label("Fewer than two complete (x, y) pairs.");
            }
            None => {
                ui.label("Select numeric X and Y columns.");
            }
        }

        ui.add_space(10.0);
        ui.heading("Correlation Heatmap");
        match &loaded.views.correlation {
            Some(spec) => correlation_heatmap(ui, spec, scale),
            None => {
                ui.label(egui::RichText::new("Not enough numeric columns").strong());
            }
        }
    });
}

fn column_combo(
    ui: &mut Ui,
    loaded: &LoadedSession,
    numeric: &[String],
    slot: SelectionSlot,
    label: &str,
    events: &mut Vec<SessionEvent>,
) {
    let current = loaded.selection.get(slot);
    egui::ComboBox::from_label(label)
        .selected_text(current.unwrap_or(""))
        .show_ui(ui, |ui: &mut Ui| {
            for col in numeric {
                if ui
                    .selectable_label(current == Some(col.as_str()), col)
                    .clicked()
                    && current != Some(col.as_str())
                {
                    events.push(SessionEvent::SelectionChanged(slot, Some(col.clone())));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, spec: &HistogramSpec) {
    let bars: Vec<Bar> = spec
        .bins()
        .iter()
        .map(|bin| {
            Bar::new((bin.start + bin.end) / 2.0, bin.count as f64).width(bin.end - bin.start)
        })
        .collect();

    Plot::new("histogram_plot")
        .height(250.0)
        .x_axis_label(&spec.column)
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::LIGHT_BLUE)
                    .name(format!("Histogram of {}", spec.column)),
            );
        });
}

fn scatter_plot(ui: &mut Ui, spec: &ScatterSpec) {
    let points: PlotPoints = spec.points.iter().map(|&(x, y)| [x, y]).collect();

    Plot::new("scatter_plot")
        .height(300.0)
        .legend(egui_plot::Legend::default())
        .x_axis_label(&spec.x_column)
        .y_axis_label(&spec.y_column)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.5)
                    .color(Color32::LIGHT_BLUE)
                    .name(format!("{} vs {}", spec.x_column, spec.y_column)),
            );

            if let (Some([(x0, y0), (x1, y1)]), Some(fit)) = (spec.fit_segment(), spec.fit) {
                let line: PlotPoints = vec![[x0, y0], [x1, y1]].into();
                plot_ui.line(
                    Line::new(line)
                        .color(Color32::RED)
                        .width(1.5)
                        .name(format!("OLS  R² = {:.3}", fit.r_squared)),
                );
            }
        });
}

fn correlation_heatmap(ui: &mut Ui, spec: &CorrelationSpec, scale: &DivergingScale) {
    const LABEL_WIDTH: f32 = 90.0;
    const HEADER_HEIGHT: f32 = 20.0;

    let n = spec.column_names.len();
    let cell = ((ui.available_width() - LABEL_WIDTH) / n as f32).clamp(24.0, 60.0);
    let size = egui::vec2(LABEL_WIDTH + cell * n as f32, HEADER_HEIGHT + cell * n as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let label_font = FontId::proportional(11.0);

    for (i, name) in spec.column_names.iter().enumerate() {
        let short: String = name.chars().take(10).collect();
        painter.text(
            origin + egui::vec2(LABEL_WIDTH + cell * (i as f32 + 0.5), HEADER_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            &short,
            label_font.clone(),
            ui.visuals().text_color(),
        );
        painter.text(
            origin + egui::vec2(LABEL_WIDTH - 4.0, HEADER_HEIGHT + cell * (i as f32 + 0.5)),
            Align2::RIGHT_CENTER,
            &short,
            label_font.clone(),
            ui.visuals().text_color(),
        );
    }

    for (i, row) in spec.matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let min = origin + egui::vec2(LABEL_WIDTH + cell * j as f32, HEADER_HEIGHT + cell * i as f32);
            let rect = Rect::from_min_size(min, egui::vec2(cell, cell)).shrink(0.5);
            painter.rect_filled(rect, 0.0, scale.color_for(value));
            let text = value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                label_font.clone(),
                scale.text_color_for(value),
            );
        }
    }
}
