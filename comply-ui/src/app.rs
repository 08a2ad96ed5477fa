// eframe shell: widgets reflecting the controller state. No logic beyond
// wiring clicks to controller calls.

use std::time::Duration;

use crate::controller::{Controller, FormFields, Stage, SubmitState};
use crate::render;

use comply_protocol::AuditCheck;

pub struct ComplianceApp {
    controller: Controller,
    fields: FormFields,
    /// Alert currently on screen; dismissed with its OK button.
    alert: Option<String>,
}

impl ComplianceApp {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            fields: FormFields::default(),
            alert: None,
        }
    }

    fn intro_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Model Compliance Checker");
        ui.label(
            "Upload a model and (optionally) its dataset, pick the audits to run, \
             and get back a compliance score with suggested fixes.",
        );
        ui.add_space(8.0);
        if ui.button("Next").clicked() {
            self.controller.advance_intro();
        }
    }

    fn form_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Submit a model");

        ui.label("Model name");
        ui.text_edit_singleline(&mut self.fields.model_name);

        ui.label("Model description");
        ui.text_edit_multiline(&mut self.fields.model_description);

        ui.label("Model file (path, optional)");
        ui.text_edit_singleline(&mut self.fields.model_file);

        ui.label("Dataset file (path, optional)");
        ui.text_edit_singleline(&mut self.fields.dataset_file);

        ui.add_space(4.0);
        ui.label("Audit checks");
        ui.checkbox(&mut self.fields.bias_check, AuditCheck::BiasCheck.label());
        ui.checkbox(
            &mut self.fields.transparency_audit,
            AuditCheck::TransparencyAudit.label(),
        );
        ui.checkbox(&mut self.fields.privacy_scan, AuditCheck::PrivacyScan.label());

        ui.add_space(8.0);
        let idle = self.controller.state() == SubmitState::Idle;
        if ui
            .add_enabled(idle, egui::Button::new("Run analysis"))
            .clicked()
        {
            self.controller.submit(&self.fields);
        }
    }

    fn status_panel(&mut self, ui: &mut egui::Ui) {
        if self.controller.state() == SubmitState::Pending {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Analyzing model...");
            });
            return;
        }

        if let Some(report) = self.controller.latest_report() {
            ui.add_space(8.0);
            ui.separator();
            ui.heading("Results");

            ui.add(egui::ProgressBar::new(render::score_fill(report)).text(render::score_text(report)));
            ui.label(render::risk_line(report).to_string());

            ui.add_space(4.0);
            ui.label("Suggestions:");
            for line in render::suggestion_lines(report) {
                ui.label(format!("• {line}"));
            }
        }
    }
}

impl eframe::App for ComplianceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        if self.alert.is_none() {
            self.alert = self.controller.take_alert();
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.controller.stage() {
            Stage::Intro => self.intro_panel(ui),
            Stage::Form => {
                self.form_panel(ui);
                self.status_panel(ui);
            }
        });

        if let Some(message) = self.alert.clone() {
            egui::Window::new("Analysis failed")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&message);
                    if ui.button("OK").clicked() {
                        self.alert = None;
                    }
                });
        }

        // Keep polling while a request is in flight.
        if self.controller.state() == SubmitState::Pending {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
