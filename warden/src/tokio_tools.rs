//! Module to handle easy sending functions to tokio
//!
//! run_in_tokio creates a current thread runtime and drives the function to completion on it.
//! This lets the scheduler run on its own thread without the host providing a runtime.

use crate::error::WardenError;
use futures::Future;
use log::info;

/// run async function inside tokio instance on current thread
///
/// Blocking tasks still running when the function completes (eg a closure probe stuck
/// past its timeout) are left behind instead of being waited on.
pub fn run_in_tokio<F, T>(my_function: F) -> F::Output
where
    F: Future<Output = Result<T, WardenError>>,
{
    info!("starting Tokio");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let reply = rt.block_on(my_function);
    rt.shutdown_background();
    reply
}
