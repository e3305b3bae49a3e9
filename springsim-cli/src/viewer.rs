//! Interactive viewer for springsim scenarios
//!
//! Draws points and springs with a simple oblique projection and exposes
//! the live tuning controls. An optional config file is watched and
//! reloaded when it changes.

use eframe::egui;
use notify::{Event, RecommendedWatcher, Watcher};
use springsim_core::{Integrator, ScenarioId, Simulation, SimulationConfig};
use std::path::PathBuf;
use std::sync::mpsc;

/// Open the viewer window and block until it is closed
pub fn run(
    scenario: ScenarioId,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &config_path {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let sim = Simulation::new(config, scenario)?;

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "springsim",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(sim, config_path, cc)))),
    )?;
    Ok(())
}

struct DrawOptions {
    points: bool,
    springs: bool,
}

pub struct ViewerApp {
    sim: Simulation,
    config_path: Option<PathBuf>,
    last_error: Option<String>,
    playing: bool,
    /// Only advance when the Step button is pressed
    run_by_step: bool,
    draw: DrawOptions,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    fn new(
        sim: Simulation,
        config_path: Option<PathBuf>,
        _cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), config_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                log::warn!("Not watching {:?}: {}", path, e);
            }
        }

        Self {
            sim,
            config_path,
            last_error: None,
            playing: true,
            run_by_step: false,
            draw: DrawOptions {
                points: true,
                springs: true,
            },
            file_watcher: watcher,
            file_receiver: rx,
        }
    }

    fn check_config_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if let Some(path) = &self.config_path {
                        needs_reload |= paths.contains(path);
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!("File watcher error: {}", e),
            }
        }

        if needs_reload {
            self.reload_config();
        }
    }

    fn reload_config(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        let result = SimulationConfig::load(path)
            .and_then(|config| self.sim.replace_config(config))
            .map_err(|e| e.to_string())
            .and_then(|()| self.sim.reset().map_err(|e| e.to_string()));
        self.report(result);
    }

    fn report<E: ToString>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                let message = e.to_string();
                log::warn!("{}", message);
                self.last_error = Some(message);
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut selected = self.sim.scenario();
            egui::ComboBox::from_label("Scenario")
                .selected_text(selected.name())
                .show_ui(ui, |ui| {
                    for id in ScenarioId::ALL {
                        ui.selectable_value(&mut selected, id, id.name());
                    }
                });
            if selected != self.sim.scenario() {
                let result = self.sim.select_scenario(selected);
                self.report(result);
            }

            if ui.button("Reset").clicked() {
                let result = self.sim.reset();
                self.report(result);
            }

            ui.separator();

            if ui.button(if self.playing { "Pause" } else { "Play" }).clicked() {
                self.playing = !self.playing;
            }
            ui.checkbox(&mut self.run_by_step, "Run by step");
            if ui.button("Step").clicked() {
                self.sim.step();
            }

            ui.separator();
            ui.label(format!("Step: {}", self.sim.current_step));
        });

        ui.horizontal(|ui| {
            let mut midpoint = self.sim.config().integrator == Integrator::Midpoint;
            if ui.checkbox(&mut midpoint, "Midpoint").changed() {
                self.sim.set_integrator(if midpoint {
                    Integrator::Midpoint
                } else {
                    Integrator::Euler
                });
            }

            let mut gravity = self.sim.config().gravity_enabled;
            if ui.checkbox(&mut gravity, "Gravity").changed() {
                self.sim.set_gravity_enabled(gravity);
            }

            let mut damping = self.sim.config().damping;
            ui.label("Damping:");
            if ui
                .add(egui::Slider::new(&mut damping, 0.0..=20.0).step_by(0.2))
                .changed()
            {
                let result = self.sim.set_damping(damping);
                self.report(result);
            }

            let increment = self.sim.config().stiffness_increment;
            if ui.button(format!("Stiffness +{}", increment)).clicked() {
                let result = self.sim.increase_stiffness();
                self.report(result);
            }
            if ui.button(format!("Stiffness -{}", increment)).clicked() {
                let result = self.sim.decrease_stiffness();
                self.report(result);
            }

            ui.separator();
            ui.checkbox(&mut self.draw.points, "Draw points");
            ui.checkbox(&mut self.draw.springs, "Draw springs");
        });
    }

    fn canvas(&self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let painter = ui.painter();

        // Scenarios live roughly within [-2, 4] on every axis
        let world_range = 8.0;
        let center = rect.center() + egui::vec2(0.0, rect.height() * 0.25);
        let scale = (rect.width().min(rect.height()) / world_range) * 0.9;
        let project = |p: glam::Vec3| {
            center + egui::vec2((p.x + 0.5 * p.z) * scale, -(p.y + 0.3 * p.z) * scale)
        };

        // floor line
        let floor_y = self.sim.config().floor_height;
        painter.line_segment(
            [
                project(glam::Vec3::new(-4.0, floor_y, 0.0)),
                project(glam::Vec3::new(6.0, floor_y, 0.0)),
            ],
            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
        );

        if self.draw.springs {
            for segment in self.sim.spring_segments() {
                painter.line_segment(
                    [project(segment.a), project(segment.b)],
                    egui::Stroke::new(1.5, egui::Color32::GREEN),
                );
            }
        }

        if self.draw.points {
            for point in self.sim.point_states() {
                let color = if point.fixed {
                    egui::Color32::RED
                } else {
                    egui::Color32::LIGHT_BLUE
                };
                painter.circle_filled(project(point.position), 5.0, color);
            }
        }

        if let Some(report) = self.sim.last_report() {
            painter.text(
                rect.left_top() + egui::vec2(10.0, 10.0),
                egui::Align2::LEFT_TOP,
                report.to_string(),
                egui::FontId::monospace(12.0),
                egui::Color32::WHITE,
            );
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_config_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));

        if self.last_error.is_some() {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.set_max_height(100.0);
                if let Some(ref error) = self.last_error {
                    ui.label(
                        egui::RichText::new(format!("Error: {}", error))
                            .color(egui::Color32::RED),
                    );
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        if self.playing && !self.run_by_step {
            let elapsed = ctx.input(|i| i.stable_dt);
            self.sim.advance(elapsed);
            ctx.request_repaint();
        }
    }
}
