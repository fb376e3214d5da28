//! Flat-shaded triangle sample, fixed-function pipeline.

#[cfg(not(windows))]
fn main() {
    eprintln!("the Direct3D9 samples only run on Windows");
}

#[cfg(windows)]
fn main() -> sample_direct3d9::error::AppResult<()> {
    use sample_direct3d9::app::App;
    use sample_direct3d9::flat_triangle::FlatTriangle;
    use sample_direct3d9::run_loop::run_message_loop;
    use sample_direct3d9::strategy::RenderStrategy;
    use sample_direct3d9::window;
    use tracing::info;
    use windows::Win32::UI::WindowsAndMessaging::ShowWindow;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOW;

    color_eyre::install()?;
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .init();

    let instance = window::module_handle()?;
    window::register_window_class(instance)?;
    let hwnd = window::create_window(instance, FlatTriangle::TITLE)?;
    unsafe { _ = ShowWindow(hwnd, SW_SHOW) };

    let client_size = window::client_size(hwnd)?;
    let mut app = App::<FlatTriangle>::initialize(hwnd, client_size)?;

    let exit_code = run_message_loop(&mut app);
    info!("window closed, exit code {exit_code}");
    drop(app);
    std::process::exit(exit_code)
}
