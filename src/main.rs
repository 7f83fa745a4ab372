fn main() {
    if let Err(e) = clock_dashboard_wasm::run() {
        gloo::console::error!("dashboard failed to start:", e);
    }
}
