use anyhow::Context;
use landmark_map::{
    rendering::{egui::EguiAdapter, MountSurface},
    ui::{timer::TokioTimer, UiMapExt},
    MapBuilder, MapConfig, MapWidget,
};

/// Standalone landmark map viewer.
///
/// Usage: `landmark-map-app [config.json]`. Without a config file the
/// built-in Alexandria site is shown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    landmark_map::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading map config {}", path))?;
            MapConfig::from_json(&json).with_context(|| format!("parsing map config {}", path))?
        }
        None => MapConfig::alexandria(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_title(config.institute.name.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "landmark-map-app",
        options,
        Box::new(move |cc| Box::new(LandmarkMapApp::new(cc, config))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))?;

    Ok(())
}

/// The main application struct
struct LandmarkMapApp {
    map: Option<MapWidget>,
    adapter: EguiAdapter,
    show_side_panel: bool,
}

impl LandmarkMapApp {
    fn new(_cc: &eframe::CreationContext<'_>, config: MapConfig) -> Self {
        let adapter = EguiAdapter::new();
        let surface = MountSurface::new("interactive-map", config.viewport_size);

        let mut builder = MapBuilder::new()
            .with_config(config)
            .with_adapter(adapter.clone());
        match TokioTimer::current() {
            Some(timer) => builder = builder.with_timer(timer),
            None => log::warn!("no tokio runtime, auto-hide falls back to frame polling"),
        }

        Self {
            map: MapWidget::mount(builder, Some(&surface)),
            adapter,
            show_side_panel: true,
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        let Some(map) = self.map.as_mut() else {
            ui.label("Map failed to load, see the log for details.");
            return;
        };

        ui.heading(map.institute().name.as_str());
        ui.label(map.institute().address.as_str());
        ui.separator();

        let transform = *map.transform();
        ui.label(format!(
            "Offset: {:.0}, {:.0} | Zoom: {:.1}",
            transform.offset.x, transform.offset.y, transform.scale
        ));
        ui.label(format!("Dragging: {}", map.is_dragging()));
        ui.separator();

        ui.label("Landmarks:");
        let now = landmark_map::prelude::Instant::now();
        let mut clicked = None;
        for (index, landmark) in map.landmarks().iter().enumerate() {
            let distance = map.landmarks().distance_meters(landmark);
            if ui
                .button(format!("{} {} ({} m)", landmark.category.symbol(), landmark.name, distance))
                .clicked()
            {
                clicked = Some(index);
            }
        }
        if let Some(index) = clicked {
            map.click_marker(index, now);
        }
    }
}

impl eframe::App for LandmarkMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_side_panel, "Landmark Panel");
                });
            });
        });

        if self.show_side_panel {
            egui::SidePanel::right("landmark_panel")
                .resizable(true)
                .show(ctx, |ui| self.side_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(map) = self.map.as_mut() {
                if ui.landmark_map(map, &self.adapter) {
                    ctx.request_repaint_after(std::time::Duration::from_millis(100));
                }
            }
        });
    }
}
