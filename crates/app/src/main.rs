mod state;
mod ui;

use eframe::egui;
use orgchart_core::preferences::NavPreference;
use state::AppState;
use tracing_subscriber::EnvFilter;

const NAV_KEY: &str = "nav";

struct MyApp {
    state: AppState,
}

impl MyApp {
    fn new(cc: &eframe::CreationContext<'_>, file: Option<std::path::PathBuf>) -> Self {
        let nav: NavPreference = cc
            .storage
            .and_then(|s| eframe::get_value(s, NAV_KEY))
            .unwrap_or_default();
        let mut state = AppState::new(nav);
        if let Some(path) = file {
            state.open_directory(path);
        }
        Self { state }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, NAV_KEY, &self.state.nav_hub.current());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let file = std::env::args_os().nth(1).map(std::path::PathBuf::from);
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Org Chart",
        options,
        Box::new(|cc| Ok(Box::new(MyApp::new(cc, file)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
