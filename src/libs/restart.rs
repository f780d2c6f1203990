//! Hard process restart primitive.
//!
//! A successful call never returns: the running process is replaced by a
//! fresh instance started with the same arguments. Callers encode that in
//! the return type by matching on the `Infallible` success value, so no
//! code path can accidentally assume a normal return.

use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use std::convert::Infallible;
use std::env;

/// Restarts the current process with its original arguments.
///
/// On Unix the current image is replaced via `exec`, so the PID survives.
/// On Windows a detached copy is spawned and this process exits. Either
/// way, `Ok` is never produced; an `Err` means the restart could not be
/// started and the current process keeps running.
pub fn restart() -> Result<Infallible> {
    msg_print!(Message::RestartingProcess);
    let current_exe = env::current_exe()?;
    let args: Vec<String> = env::args().skip(1).collect();

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // exec only returns on failure
        let err = std::process::Command::new(current_exe).args(&args).exec();
        Err(msg_error_anyhow!(Message::RestartFailed(err.to_string())))
    }

    #[cfg(windows)]
    {
        std::process::Command::new(current_exe)
            .args(&args)
            .spawn()
            .map_err(|e| msg_error_anyhow!(Message::RestartFailed(e.to_string())))?;
        std::process::exit(0);
    }

    #[cfg(not(any(unix, windows)))]
    {
        Err(msg_error_anyhow!(Message::RestartFailed("unsupported platform".to_string())))
    }
}
