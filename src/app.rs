use log::info;

use crate::{LabConfig, LabError, MutabilityHarness, ProxyStore, SnapshotStore, Todo, TodoStore};


/// What a UI layer owns: both todo stores side by side and the mutability harness.
///
/// Constructed once at start-up and handed to whatever renders it.
pub struct App {
    snapshot_store: SnapshotStore,
    proxy_store: ProxyStore,
    harness: MutabilityHarness,
}

impl App {
    pub fn new(config: &LabConfig) -> Self {
        Self {
            snapshot_store: SnapshotStore::new(config.id_policy),
            proxy_store: ProxyStore::new(config.id_policy),
            harness: MutabilityHarness::new(config),
        }
    }

    pub fn snapshot_store(&self) -> &SnapshotStore {
        &self.snapshot_store
    }
    pub fn proxy_store(&self) -> &ProxyStore {
        &self.proxy_store
    }
    pub fn harness(&self) -> &MutabilityHarness {
        &self.harness
    }

    /// Runs the harness. Fails if a run is already in progress.
    pub async fn run_tests(&self) -> Result<(), LabError> {
        if self.harness.is_running() {
            return Err(LabError::AlreadyRunning);
        }
        self.harness.run().await;
        Ok(())
    }

    /// Resets the harness. Fails while a run is in progress.
    pub fn reset_tests(&self) -> Result<(), LabError> {
        if self.harness.is_running() {
            return Err(LabError::AlreadyRunning);
        }
        self.harness.reset();
        Ok(())
    }

    /// Empties both todo stores and resets the harness.
    pub fn reset_all(&self) -> Result<(), LabError> {
        self.reset_tests()?;
        self.snapshot_store.reset();
        self.proxy_store.reset();
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut s = String::new();
        render_todos(&mut s, "Snapshot Todos", &self.snapshot_store.todos());
        s.push('\n');
        render_todos(&mut s, "Proxy Todos", &self.proxy_store.todos());
        for report in self.harness.reports() {
            s.push('\n');
            s.push_str(&report.to_string());
        }
        s
    }

    pub fn log_state(&self) {
        info!("snapshot store state: {:?}", self.snapshot_store);
        info!("proxy store state: {:?}", self.proxy_store);
    }
}
impl Default for App {
    fn default() -> Self {
        Self::new(&LabConfig::default())
    }
}

fn render_todos(s: &mut String, title: &str, todos: &[Todo]) {
    s.push_str(&format!("# {title}\n"));
    for todo in todos {
        let mark = if todo.done { 'x' } else { ' ' };
        s.push_str(&format!("[{mark}] {}\n", todo.text));
    }
}
