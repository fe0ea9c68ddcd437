use crossbeam_channel::{unbounded, Receiver};
use orgchart_core::dial_codes::{self, DialCodeOption};
use orgchart_core::preferences::{NavPreference, PreferenceHub};
use orgchart_core::search::find_employees;
use orgchart_core::{Directory, EmployeeId, OrgChart};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AppState {
    pub source: Option<PathBuf>,
    pub chart: OrgChart,
    pub search: String,
    pub status: Option<String>,
    pub nav_hub: Arc<PreferenceHub>,
    /// Layout's subscription to the navigation preference.
    pub nav_rx: Receiver<NavPreference>,
    pub nav: NavPreference,
    pub dial_rx: Option<Receiver<Vec<DialCodeOption>>>,
    pub dial_codes: Vec<DialCodeOption>,
    pub phone_country: usize,
    pub phone_input: String,
}

impl AppState {
    pub fn new(nav: NavPreference) -> Self {
        let nav_hub = Arc::new(PreferenceHub::new(nav));
        let nav_rx = nav_hub.subscribe();
        let mut state = Self {
            source: None,
            chart: OrgChart::new(Directory::sample()),
            search: String::new(),
            status: None,
            nav_hub,
            nav_rx,
            nav,
            dial_rx: None,
            dial_codes: dial_codes::default_options(),
            phone_country: 0,
            phone_input: String::new(),
        };
        state.load_dial_codes();
        state
    }

    fn read_directory(&mut self, path: &Path) -> Option<Directory> {
        match Directory::from_path(path) {
            Ok(directory) => {
                let issues = directory.validate().len();
                self.status = (issues > 0).then(|| format!("{issues} data problem(s), see log"));
                Some(directory)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to open employee file");
                self.status = Some(e.to_string());
                None
            }
        }
    }

    /// Start a fresh chart from another employee file.
    pub fn open_directory(&mut self, path: PathBuf) {
        if let Some(directory) = self.read_directory(&path) {
            self.chart = OrgChart::new(directory);
            self.source = Some(path);
        }
    }

    /// Re-read the current file, keeping expansion and selection where the
    /// ids still exist.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else { return; };
        if let Some(directory) = self.read_directory(&path) {
            self.chart.replace_directory(directory);
        }
    }

    /// Jump to the best search match.
    pub fn locate(&mut self) {
        let hit = find_employees(self.chart.directory(), &self.search, 1)
            .first()
            .map(|h| h.employee.id);
        match hit {
            Some(id) => {
                self.chart.jump_to(id);
                self.status = None;
            }
            None => self.status = Some(format!("No employee matches \"{}\"", self.search.trim())),
        }
    }

    pub fn select(&mut self, id: EmployeeId) {
        self.chart.click(id);
    }

    pub fn toggle_nav(&self) {
        self.nav_hub.update(|p| NavPreference {
            expanded: !p.expanded,
            ..p
        });
    }

    pub fn set_window_width(&self, width: f32) {
        self.nav_hub.update(|p| p.with_viewport_width(width));
    }

    /// Drain preference changes published since the last frame.
    pub fn poll_nav(&mut self) -> bool {
        let mut changed = false;
        while let Ok(pref) = self.nav_rx.try_recv() {
            changed |= pref != self.nav;
            self.nav = pref;
        }
        changed
    }

    fn load_dial_codes(&mut self) {
        let (tx, rx) = unbounded();
        self.dial_rx = Some(rx);
        std::thread::spawn(move || {
            let _ = tx.send(dial_codes::load_country_dial_codes().to_vec());
        });
    }

    pub fn poll_dial_codes(&mut self) -> bool {
        let Some(rx) = self.dial_rx.take() else { return false; };
        match rx.try_recv() {
            Ok(options) => {
                let current = self.dial_codes.get(self.phone_country).map(|o| o.key.clone());
                self.phone_country = current
                    .and_then(|key| options.iter().position(|o| o.key == key))
                    .unwrap_or(0);
                self.dial_codes = options;
                true
            }
            Err(crossbeam_channel::TryRecvError::Empty) => {
                self.dial_rx = Some(rx);
                false
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => false,
        }
    }
}
