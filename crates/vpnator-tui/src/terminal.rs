//! Terminal setup and restoration

/// Install a panic hook that puts the terminal back into cooked mode
/// before the default hook prints the panic.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        default_hook(info);
    }));
}
