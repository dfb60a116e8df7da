mod app;
mod catalog;
mod config;
mod player;
mod runtime;
mod store;
mod ui;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
