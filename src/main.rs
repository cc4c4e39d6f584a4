use std::process::ExitCode;

use log::error;
use statelab::{App, LabConfig, LabError, TodoId, TodoStore, logging::init_logging};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), LabError> {
    let _logger = init_logging("info")?;
    let config = match std::env::args().nth(1) {
        Some(path) => LabConfig::load(path)?,
        None => LabConfig::default(),
    };
    let app = App::new(&config);

    let stores: [&dyn TodoStore; 2] = [app.snapshot_store(), app.proxy_store()];
    for (i, store) in stores.into_iter().enumerate() {
        let base = (i as u64 + 1) * 100;
        store.add_todo_with_id(TodoId(base + 1), "learn copy-on-write");
        store.add_todo_with_id(TodoId(base + 2), "learn observers");
        store.add_todo_with_id(TodoId(base + 3), "remove me");
        store.toggle_todo(TodoId(base + 1));
        store.remove_todo(TodoId(base + 3));
    }
    app.log_state();

    futures::executor::block_on(app.run_tests())?;
    print!("{}", app.render());
    Ok(())
}
