use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use expression_heatmap::data::model::Metric;

use crate::state::{AppState, View, SCALE_STEP};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Metric selector ----
    ui.heading("Metric");
    let current = state.selection.metric;
    egui::ComboBox::from_id_salt("metric_selector")
        .selected_text(current.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                if ui.selectable_label(current == metric, metric.label()).clicked() {
                    state.set_metric(metric);
                }
            }
        });
    ui.separator();

    // ---- Colour-scale bounds ----
    ui.heading("Color scale");
    let (min, max) = state.slider_extent;
    let [mut low, mut high] = state.selection.scale_range;
    if ui
        .add(egui::Slider::new(&mut low, min..=max).step_by(SCALE_STEP).text("min"))
        .changed()
    {
        state.set_scale_low(low);
    }
    if ui
        .add(egui::Slider::new(&mut high, min..=max).step_by(SCALE_STEP).text("max"))
        .changed()
    {
        state.set_scale_high(high);
    }
    ui.separator();

    gene_selector(ui, state);
}

/// Selected genes (in selection order) above a searchable list of all genes.
fn gene_selector(ui: &mut Ui, state: &mut AppState) {
    let n_total = state.table().gene_ids().len();
    let n_selected = state.selection.genes.len();

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Genes");
        ui.label(format!("({n_selected}/{n_total})"));
        if ui.small_button("Clear").clicked() {
            state.clear_genes();
        }
    });
    if n_selected == 0 {
        ui.label(RichText::new("No genes selected: showing all").italics());
    }

    // ---- Current selection ----
    let selected = state.selection.genes.clone();
    ScrollArea::vertical()
        .id_salt("selected_genes")
        .max_height(150.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for gene in &selected {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("✕").clicked() {
                        state.toggle_gene(gene);
                    }
                    ui.label(gene);
                });
            }
        });
    ui.separator();

    // ---- Search + full list ----
    ui.add(
        egui::TextEdit::singleline(&mut state.gene_query)
            .hint_text("Search genes")
            .desired_width(f32::INFINITY),
    );

    let matches = state.matching_genes(usize::MAX);
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
    ScrollArea::vertical()
        .id_salt("all_genes")
        .auto_shrink([false, false])
        .show_rows(ui, row_height, matches.len(), |ui: &mut Ui, range| {
            for gene in &matches[range] {
                let mut checked = state.is_selected(gene);
                if ui.checkbox(&mut checked, gene.as_str()).changed() {
                    state.toggle_gene(gene);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let has_output = state.output.is_some();
            if ui
                .add_enabled(has_output, egui::Button::new("Export heatmap PNG…"))
                .clicked()
            {
                state.export_png();
                ui.close_menu();
            }
            if ui
                .add_enabled(has_output, egui::Button::new("Export matrix CSV…"))
                .clicked()
            {
                state.export_csv();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, View::Heatmap, "Heatmap");
        ui.selectable_value(&mut state.view, View::Table, "Table");

        ui.separator();

        let table = state.table();
        ui.label(format!(
            "{} rows, {} genes, {} comparisons",
            table.len(),
            table.gene_ids().len(),
            table.comparisons().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom bar
// ---------------------------------------------------------------------------

/// Applied colour bounds, or the heatmap error.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if let Some(err) = &state.error_message {
            ui.label(RichText::new(err).color(Color32::RED));
        } else if let Some(output) = &state.output {
            ui.label(&output.status);
        }
    });
}
