//! Process-wide PDFium owner
//!
//! `Pdfium::new` initializes and `Drop` tears down library state shared by the
//! whole process, so a single dedicated thread binds PDFium once, keeps it for
//! the life of the process, and runs document jobs one at a time.

use crate::error::{Error, Result};
use pdfium_render::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, OnceLock};
use std::thread;

type Job = Box<dyn FnOnce(Result<&Pdfium>) + Send>;

static WORKER: OnceLock<mpsc::Sender<Job>> = OnceLock::new();

/// Bind to a bundled library first, then fall back to the system one
fn create_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

fn worker() -> &'static mpsc::Sender<Job> {
    WORKER.get_or_init(|| {
        let (sender, receiver) = mpsc::channel::<Job>();
        if let Err(e) = thread::Builder::new()
            .name("pdfium".to_string())
            .spawn(move || run(receiver))
        {
            // Receiver was dropped with the closure; every job will report it
            tracing::error!("Failed to start PDFium worker thread: {}", e);
        }
        sender
    })
}

fn run(receiver: mpsc::Receiver<Job>) {
    let mut pdfium: Option<Pdfium> = None;

    for job in receiver {
        // Binding is retried until it succeeds, then kept
        if pdfium.is_none() {
            match create_pdfium() {
                Ok(bound) => {
                    tracing::info!("PDFium initialized");
                    pdfium = Some(bound);
                }
                Err(e) => {
                    tracing::error!(error = %e, "PDFium unavailable");
                    job(Err(e));
                    continue;
                }
            }
        }

        if let Some(bound) = pdfium.as_ref() {
            if catch_unwind(AssertUnwindSafe(|| job(Ok(bound)))).is_err() {
                tracing::error!("PDFium job panicked");
            }
        }
    }
}

/// Run `f` against the shared PDFium instance, blocking until it finishes
pub fn with_pdfium<T, F>(f: F) -> Result<T>
where
    F: FnOnce(&Pdfium) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let (reply, result) = mpsc::sync_channel(1);
    let job: Job = Box::new(move |pdfium: Result<&Pdfium>| {
        let _ = reply.send(pdfium.and_then(f));
    });

    let unavailable = |reason: &str| Error::Pdfium {
        reason: reason.to_string(),
    };
    worker()
        .send(job)
        .map_err(|_| unavailable("PDFium worker is not running"))?;
    result
        .recv()
        .map_err(|_| unavailable("PDFium worker dropped the job"))?
}

/// Whether the PDFium library can be bound in this process
pub fn pdfium_available() -> bool {
    with_pdfium(|_| Ok(())).is_ok()
}
