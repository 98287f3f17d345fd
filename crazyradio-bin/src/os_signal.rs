use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Set once the OS has asked the program to quit.
pub struct Quit(CancellationToken);

impl Quit {
    pub fn is_quit(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// Start watching for quit signals on a background thread.
///
/// The radio loops are blocking, so signals are caught by a small
/// single-threaded runtime of their own, and polled with [`Quit::is_quit`].
pub fn quit_watch() -> std::io::Result<Quit> {
    let cancel = CancellationToken::new();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;
    let cancel_tx = cancel.clone();
    std::thread::Builder::new()
        .name("os-signal".into())
        .spawn(move || {
            runtime.block_on(async move {
                if let Err(e) = wait_for_signal().await {
                    warn!("Couldn't listen for OS signals: {e}");
                    return;
                }
                cancel_tx.cancel();
            })
        })?;
    Ok(Quit(cancel))
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;
    tokio::select! {
        _ = interrupt.recv() => (),
        _ = hangup.recv() => (),
        _ = terminate.recv() => (),
        _ = quit.recv() => (),
    }
    Ok(())
}

#[cfg(windows)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::windows;

    let mut ctrl_c = windows::ctrl_c()?;
    let mut ctrl_break = windows::ctrl_break()?;
    let mut ctrl_close = windows::ctrl_close()?;
    tokio::select! {
        _ = ctrl_c.recv() => (),
        _ = ctrl_break.recv() => (),
        _ = ctrl_close.recv() => (),
    }
    Ok(())
}
